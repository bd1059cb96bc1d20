use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display, Formatter};

use super::{BoardParams, Value};

const DIRECTIONS: [(i64, i64); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GameState {
    params: BoardParams,
    states: BTreeMap<usize, usize>,
    availables: BTreeSet<usize>,
    last_move: Option<usize>,
    current_player: usize,
}

impl GameState {
    pub fn initial(params: BoardParams) -> Self {
        Self::from_stones(params, BTreeMap::new(), None, 1)
    }

    /// `availables` is always derived as the complement of `states`.
    pub(crate) fn from_stones(
        params: BoardParams,
        states: BTreeMap<usize, usize>,
        last_move: Option<usize>,
        current_player: usize,
    ) -> Self {
        let availables = (0..params.num_cells())
            .filter(|index| !states.contains_key(index))
            .collect();

        Self {
            params,
            states,
            availables,
            last_move,
            current_player,
        }
    }

    pub fn params(&self) -> &BoardParams {
        &self.params
    }

    pub fn width(&self) -> usize {
        self.params.width
    }

    pub fn height(&self) -> usize {
        self.params.height
    }

    pub fn n_in_row(&self) -> usize {
        self.params.n_in_row
    }

    /// Occupied cells, linear index to player.
    pub fn states(&self) -> &BTreeMap<usize, usize> {
        &self.states
    }

    pub fn availables(&self) -> &BTreeSet<usize> {
        &self.availables
    }

    pub fn last_move(&self) -> Option<usize> {
        self.last_move
    }

    pub fn current_player(&self) -> usize {
        self.current_player
    }

    pub fn opponent(&self) -> usize {
        if self.current_player == 1 {
            2
        } else {
            1
        }
    }

    pub fn is_full(&self) -> bool {
        self.availables.is_empty()
    }

    pub fn legal_moves(&self) -> impl Iterator<Item = usize> + '_ {
        self.availables.iter().copied()
    }

    /// The current player places a stone on an empty cell and the turn passes.
    pub fn place(&self, index: usize) -> Self {
        let mut states = self.states.clone();
        let mut availables = self.availables.clone();

        states.insert(index, self.current_player);
        availables.remove(&index);

        Self {
            params: self.params,
            states,
            availables,
            last_move: Some(index),
            current_player: self.opponent(),
        }
    }

    pub fn stone_at(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.height() || y >= self.width() {
            return None;
        }

        self.states.get(&(x * self.width() + y)).copied()
    }

    /// The player owning a line of `n_in_row` stones, if any.
    pub fn winner(&self) -> Option<usize> {
        let n = self.n_in_row();

        if n == 0 || self.states.len() < n {
            return None;
        }

        self.states.iter().find_map(|(&index, &player)| {
            let [x, y] = self.params.move_to_location(index);

            DIRECTIONS
                .iter()
                .any(|&(dx, dy)| self.is_line(x as i64, y as i64, dx, dy, player))
                .then_some(player)
        })
    }

    /// Some when a player has won or no cell remains.
    pub fn is_terminal(&self) -> Option<Value> {
        if let Some(player) = self.winner() {
            return Some(Value::win(player));
        }

        if self.is_full() {
            return Some(Value::draw());
        }

        None
    }

    fn is_line(&self, x: i64, y: i64, dx: i64, dy: i64, player: usize) -> bool {
        (1..self.n_in_row() as i64).all(|step| {
            let (x, y) = (x + dx * step, y + dy * step);

            x >= 0 && y >= 0 && self.stone_at(x as usize, y as usize) == Some(player)
        })
    }
}

impl Display for GameState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        write!(f, "    ")?;
        for y in 0..self.width() {
            write!(f, "{:>3}", y)?;
        }
        writeln!(f)?;

        for x in 0..self.height() {
            write!(f, "{:>3} ", x)?;
            for y in 0..self.width() {
                let p = match self.stone_at(x, y) {
                    Some(1) => "X",
                    Some(_) => "O",
                    None => ".",
                };
                write!(f, "{:>3}", p)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
