use anyhow::{ensure, Context, Result};
use futures::executor::block_on;
use gomoku::{Action, Engine, GameState, PolicyValueNet};
use mcts::{ConstantCPUCT, MCTSOptions, TemperatureConstant, MCTS};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq)]
pub struct SearchOptions {
    pub c_puct: f32,
    pub n_playout: usize,
    pub temperature: f32,
    pub fpu: f32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            c_puct: 5.0,
            n_playout: 400,
            temperature: 1e-3,
            fpu: 0.5,
        }
    }
}

/// The move chosen by a search along with the probability of every move it considered.
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    pub action: Action,
    pub action_probabilities: Vec<(Action, f32)>,
}

/// A decision search over a loaded model. Implementations must not be called on a full board.
pub trait Search {
    type Model;

    fn search(
        &self,
        model: &Self::Model,
        game_state: &GameState,
        options: &SearchOptions,
    ) -> Result<SearchOutcome>;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    #[serde(rename = "move")]
    pub action: usize,
    pub location: [usize; 2],
    /// One entry per cell. Cells that were not searched are zero.
    pub move_probs: Vec<f32>,
}

/// Monte-Carlo tree search guided by the policy/value network.
#[derive(Default)]
pub struct MctsSearch {
    engine: Engine,
}

impl MctsSearch {
    pub fn new() -> Self {
        Self {
            engine: Engine::new(),
        }
    }
}

impl Search for MctsSearch {
    type Model = PolicyValueNet;

    fn search(
        &self,
        model: &PolicyValueNet,
        game_state: &GameState,
        options: &SearchOptions,
    ) -> Result<SearchOutcome> {
        let mut mcts = MCTS::new(
            game_state.clone(),
            &self.engine,
            model,
            MCTSOptions::new(options.fpu, options.fpu),
            ConstantCPUCT::new(options.c_puct),
            TemperatureConstant::new(options.temperature),
        );

        block_on(mcts.search_playouts(options.n_playout))?;

        Ok(SearchOutcome {
            action: mcts.select_action()?,
            action_probabilities: mcts.action_probabilities()?,
        })
    }
}

pub struct SearchInvoker<S> {
    search: S,
}

impl<S: Search> SearchInvoker<S> {
    pub fn new(search: S) -> Self {
        Self { search }
    }

    pub fn search(&self) -> &S {
        &self.search
    }

    pub fn run(
        &self,
        model: &S::Model,
        game_state: &GameState,
        options: &SearchOptions,
    ) -> Result<InferenceResult> {
        ensure!(!game_state.is_full(), "Cannot search a full board");

        let outcome = self
            .search
            .search(model, game_state, options)
            .context("Search failed")?;

        let params = game_state.params();
        let mut move_probs = vec![0.0; params.num_cells()];

        for (action, probability) in &outcome.action_probabilities {
            let cell = move_probs
                .get_mut(action.index())
                .with_context(|| format!("Search returned off-board move {}", action))?;
            *cell = *probability;
        }

        let action = outcome.action.index();
        ensure!(
            game_state.availables().contains(&action),
            "Search chose occupied or off-board move {}",
            action
        );

        Ok(InferenceResult {
            action,
            location: params.move_to_location(action),
            move_probs,
        })
    }
}
