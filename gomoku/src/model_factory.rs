use anyhow::Result;
use log::debug;
use model::{Load, ModelConfigKey};

use super::PolicyValueNet;

/// Builds networks from parameter files on disk.
#[derive(Default)]
pub struct ModelFactory {}

impl ModelFactory {
    pub fn new() -> Self {
        Self {}
    }
}

impl Load for ModelFactory {
    type MR = ModelConfigKey;
    type M = PolicyValueNet;

    fn load(&self, model_ref: &Self::MR) -> Result<Self::M> {
        debug!("Reading model parameters from {:?}", model_ref.model_file());

        PolicyValueNet::load(model_ref.model_file(), model_ref.width(), model_ref.height())
    }
}
