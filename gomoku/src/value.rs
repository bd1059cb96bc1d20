/// Win probability for each player, indexed by player number minus one.
#[derive(Clone, Debug, PartialEq)]
pub struct Value(pub [f32; 2]);

impl Value {
    pub fn win(player: usize) -> Self {
        if player == 1 {
            Value([1.0, 0.0])
        } else {
            Value([0.0, 1.0])
        }
    }

    pub fn draw() -> Self {
        Value([0.5, 0.5])
    }

    /// Maps a network output in `[-1, 1]`, scored for `player_to_move`, onto both players.
    pub fn from_network_output(output: f32, player_to_move: usize) -> Self {
        let curr_val = (output.clamp(-1.0, 1.0) + 1.0) / 2.0;
        let opp_val = 1.0 - curr_val;

        if player_to_move == 1 {
            Value([curr_val, opp_val])
        } else {
            Value([opp_val, curr_val])
        }
    }
}

impl engine::value::Value for Value {
    fn get_value_for_player(&self, player: usize) -> f32 {
        self.0[player - 1]
    }
}
