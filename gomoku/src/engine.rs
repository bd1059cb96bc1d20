use engine::GameEngine;

use super::{Action, GameState, Value};

#[derive(Default)]
pub struct Engine {}

impl Engine {
    pub fn new() -> Self {
        Self {}
    }
}

impl GameEngine for Engine {
    type Action = Action;
    type State = GameState;
    type Value = Value;

    fn take_action(&self, game_state: &Self::State, action: &Self::Action) -> Self::State {
        match action {
            Action::Place(index) => game_state.place(*index),
        }
    }

    fn player_to_move(&self, game_state: &Self::State) -> usize {
        game_state.current_player()
    }

    fn terminal_state(&self, game_state: &Self::State) -> Option<Self::Value> {
        game_state.is_terminal()
    }
}
