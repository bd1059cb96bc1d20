use std::path::Path;

use anyhow::{ensure, Result};
use common::softmax;
use futures::future;
use model::analytics::{ActionWithPolicy, GameAnalyzer, GameStateAnalysis};

use super::network::{relu, NetworkParams, INPUT_PLANES};
use super::{Action, GameState, Value};

/// Policy/value network evaluated on the CPU. Immutable once built.
#[derive(Debug)]
pub struct PolicyValueNet {
    params: NetworkParams,
}

impl PolicyValueNet {
    pub fn new(params: NetworkParams) -> Result<Self> {
        params.validate()?;

        Ok(Self { params })
    }

    /// Reads a parameter file and checks that it was built for a `height x width` board.
    pub fn load(path: impl AsRef<Path>, width: usize, height: usize) -> Result<Self> {
        let params = NetworkParams::read(path)?;

        ensure!(
            params.width == width && params.height == height,
            "Model was built for a {}x{} board but {}x{} was requested",
            params.height,
            params.width,
            height,
            width
        );

        Self::new(params)
    }

    pub fn width(&self) -> usize {
        self.params.width
    }

    pub fn height(&self) -> usize {
        self.params.height
    }

    /// Encodes the board from the perspective of the player to move. Rows are flipped so that
    /// row 0 of the board is the last row of each plane.
    pub fn game_state_to_input(&self, game_state: &GameState) -> Vec<f32> {
        let (width, height) = (self.width(), self.height());
        let plane = width * height;
        let mut input = vec![0.0; INPUT_PLANES * plane];

        let input_index = |channel: usize, index: usize| {
            let (x, y) = (index / width, index % width);
            channel * plane + (height - 1 - x) * width + y
        };

        for (&index, &player) in game_state.states() {
            if index >= plane {
                continue;
            }

            let channel = if player == game_state.current_player() { 0 } else { 1 };
            input[input_index(channel, index)] = 1.0;
        }

        if let Some(last_move) = game_state.last_move().filter(|m| *m < plane) {
            input[input_index(2, last_move)] = 1.0;
        }

        if game_state.states().len() % 2 == 0 {
            input[3 * plane..].iter_mut().for_each(|v| *v = 1.0);
        }

        input
    }

    /// Returns the move probabilities over every cell and the position value in `[-1, 1]` for
    /// the player to move.
    pub fn policy_value(&self, game_state: &GameState) -> (Vec<f32>, f32) {
        let (width, height) = (self.width(), self.height());
        let p = &self.params;

        let mut x = self.game_state_to_input(game_state);
        for conv in [&p.conv1, &p.conv2, &p.conv3] {
            x = conv.forward(&x, height, width);
            relu(&mut x);
        }

        let mut policy = p.policy_conv.forward(&x, height, width);
        relu(&mut policy);
        let policy_logits = p.policy_dense.forward(&policy);
        let policy = softmax(&policy_logits, 1.0);

        let mut value = p.value_conv.forward(&x, height, width);
        relu(&mut value);
        let mut value = p.value_dense1.forward(&value);
        relu(&mut value);
        let value = p.value_dense2.forward(&value)[0].tanh();

        (policy, value)
    }

    /// Priors restricted to the legal moves and renormalized, plus the value for both players.
    pub fn analyse(&self, game_state: &GameState) -> GameStateAnalysis<Action, Value> {
        let (policy, value) = self.policy_value(game_state);

        let legal = game_state
            .legal_moves()
            .filter(|m| *m < policy.len())
            .collect::<Vec<_>>();
        let total = legal.iter().map(|m| policy[*m]).sum::<f32>();

        let policy_scores = legal
            .iter()
            .map(|&m| {
                let score = if total > 0.0 {
                    policy[m] / total
                } else {
                    1.0 / legal.len() as f32
                };

                ActionWithPolicy::new(Action::Place(m), score)
            })
            .collect();

        GameStateAnalysis::new(
            Value::from_network_output(value, game_state.current_player()),
            policy_scores,
        )
    }
}

impl GameAnalyzer for PolicyValueNet {
    type Action = Action;
    type State = GameState;
    type Future = future::Ready<GameStateAnalysis<Action, Value>>;
    type Value = Value;

    fn get_state_analysis(&self, game_state: &GameState) -> Self::Future {
        future::ready(self.analyse(game_state))
    }
}
