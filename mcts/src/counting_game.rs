use engine::engine::GameEngine;
use futures::future;
use model::analytics::{ActionWithPolicy, GameAnalyzer, GameStateAnalysis};

/// Players take turns nudging a shared counter. Player 1 wins when it reaches 100, player 2
/// when it reaches 0.
#[derive(Hash, PartialEq, Eq, Clone, Debug)]
pub struct CountingGameState {
    pub p1_turn: bool,
    pub count: usize,
}

impl CountingGameState {
    pub fn new(count: usize) -> Self {
        Self {
            p1_turn: true,
            count,
        }
    }

    pub fn is_terminal_state(&self) -> Option<Value> {
        if self.count >= 100 {
            Some(Value([1.0, 0.0]))
        } else if self.count == 0 {
            Some(Value([0.0, 1.0]))
        } else {
            None
        }
    }
}

pub struct CountingGameEngine {}

impl CountingGameEngine {
    pub fn new() -> Self {
        Self {}
    }
}

#[derive(Clone, Debug)]
pub struct Value(pub [f32; 2]);

impl engine::value::Value for Value {
    fn get_value_for_player(&self, player: usize) -> f32 {
        self.0[player - 1]
    }
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub enum CountingAction {
    Increment,
    Decrement,
    Stay,
}

impl GameEngine for CountingGameEngine {
    type Action = CountingAction;
    type State = CountingGameState;
    type Value = Value;

    fn take_action(&self, game_state: &Self::State, action: &Self::Action) -> Self::State {
        let count = game_state.count;

        let new_count = match action {
            CountingAction::Increment => count + 1,
            CountingAction::Decrement => count - 1,
            CountingAction::Stay => count,
        };

        Self::State {
            p1_turn: !game_state.p1_turn,
            count: new_count,
        }
    }

    fn terminal_state(&self, game_state: &Self::State) -> Option<Self::Value> {
        game_state.is_terminal_state()
    }

    fn player_to_move(&self, game_state: &Self::State) -> usize {
        if game_state.p1_turn {
            1
        } else {
            2
        }
    }
}

pub struct CountingAnalyzer {
    policy_scores: [f32; 3],
}

impl CountingAnalyzer {
    pub fn new(policy_scores: [f32; 3]) -> Self {
        Self { policy_scores }
    }
}

impl GameAnalyzer for CountingAnalyzer {
    type Action = CountingAction;
    type State = CountingGameState;
    type Future = future::Ready<GameStateAnalysis<Self::Action, Self::Value>>;
    type Value = Value;

    fn get_state_analysis(&self, _game_state: &Self::State) -> Self::Future {
        let policy_scores = vec![
            ActionWithPolicy::new(CountingAction::Increment, self.policy_scores[0]),
            ActionWithPolicy::new(CountingAction::Decrement, self.policy_scores[1]),
            ActionWithPolicy::new(CountingAction::Stay, self.policy_scores[2]),
        ];

        future::ready(GameStateAnalysis::new(Value([0.5, 0.5]), policy_scores))
    }
}
