use std::fmt::{self, Display, Formatter};

/// Places a stone on the cell at the given linear index.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Action {
    Place(usize),
}

impl Action {
    pub fn index(&self) -> usize {
        let Action::Place(index) = self;
        *index
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let Action::Place(index) = self;
        write!(f, "{}", index)
    }
}
