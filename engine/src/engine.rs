use super::value::Value;

pub trait GameEngine {
    type Action;
    type State;
    type Value: Value;

    fn take_action(&self, game_state: &Self::State, action: &Self::Action) -> Self::State;
    fn player_to_move(&self, game_state: &Self::State) -> usize;

    /// Returns the final value of the game when the state is terminal, otherwise None.
    fn terminal_state(&self, game_state: &Self::State) -> Option<Self::Value>;
}
