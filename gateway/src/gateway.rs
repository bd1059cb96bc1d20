use gomoku::{build_game_state, RequestPayload};
use log::debug;
use model::{Load, ModelCache, ModelConfigKey};

use super::{GatewayError, GatewayOptions, InferenceResult, Search, SearchInvoker};

/// Everything a request needs: options, the process wide model cache and the search.
pub struct Gateway<L: Load, S> {
    options: GatewayOptions,
    cache: ModelCache<L>,
    invoker: SearchInvoker<S>,
}

impl<L, S> Gateway<L, S>
where
    L: Load<MR = ModelConfigKey>,
    S: Search<Model = L::M>,
{
    pub fn new(options: GatewayOptions, loader: L, search: S) -> Self {
        Self {
            options,
            cache: ModelCache::new(loader),
            invoker: SearchInvoker::new(search),
        }
    }

    pub fn options(&self) -> &GatewayOptions {
        &self.options
    }

    pub fn cache(&self) -> &ModelCache<L> {
        &self.cache
    }

    pub fn invoker(&self) -> &SearchInvoker<S> {
        &self.invoker
    }

    /// Validates the payload, fetches the model and searches. Blocks for the duration of the
    /// search, so callers on the async runtime should move it to the blocking pool.
    pub fn infer(&self, payload: &RequestPayload) -> Result<InferenceResult, GatewayError> {
        let game_state = build_game_state(&self.options.board, payload)?;

        let model = self
            .cache
            .get(&self.options.model_key())
            .map_err(GatewayError::ModelLoad)?;

        if game_state.is_full() {
            return Err(GatewayError::BoardFull);
        }

        debug!(
            "Searching for player {}\n{}",
            game_state.current_player(),
            game_state
        );

        self.invoker
            .run(&*model, &game_state, &self.options.search)
            .map_err(GatewayError::Inference)
    }
}
