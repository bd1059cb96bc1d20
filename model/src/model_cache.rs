use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;
use parking_lot::Mutex;

use super::load::Load;

/// Identifies a loaded model by the artifact it was read from and the board it was built for.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModelConfigKey {
    model_file: PathBuf,
    width: usize,
    height: usize,
}

impl ModelConfigKey {
    pub fn new(model_file: impl Into<PathBuf>, width: usize, height: usize) -> Self {
        Self {
            model_file: model_file.into(),
            width,
            height,
        }
    }

    pub fn model_file(&self) -> &Path {
        &self.model_file
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

/// Lazily loads models and keeps them for the lifetime of the cache.
///
/// A single lock guards the whole check-load-insert sequence, so a model is constructed at
/// most once per key no matter how many callers miss at the same time. Loads for different
/// keys are serialized behind the same lock. Entries are never evicted.
pub struct ModelCache<L: Load> {
    loader: L,
    models: Mutex<HashMap<L::MR, Arc<L::M>>>,
}

impl<L> ModelCache<L>
where
    L: Load,
    L::MR: Clone + Debug + Eq + Hash,
{
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            models: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, model_ref: &L::MR) -> Result<Arc<L::M>> {
        let mut models = self.models.lock();

        if let Some(model) = models.get(model_ref) {
            return Ok(model.clone());
        }

        let start = Instant::now();
        let model = self
            .loader
            .load(model_ref)
            .with_context(|| format!("Failed to load model {:?}", model_ref))?;

        info!("Loaded model {:?} in {:.1?}", model_ref, start.elapsed());

        let model = Arc::new(model);
        models.insert(model_ref.clone(), model.clone());

        Ok(model)
    }

    pub fn len(&self) -> usize {
        self.models.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }
}
