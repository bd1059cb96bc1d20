use generational_arena::Index;
use model::ActionWithPolicy;

#[derive(Debug)]
pub struct MCTSNode<S, A, V> {
    pub(crate) game_state: S,
    pub(crate) value_score: V,
    pub(crate) visits: usize,
    pub(crate) children: Vec<MCTSEdge<A>>,
}

#[allow(non_snake_case)]
#[derive(Debug)]
pub struct MCTSEdge<A> {
    pub(crate) action: A,
    pub(crate) W: f32,
    pub(crate) visits: usize,
    pub(crate) policy_score: f32,
    pub(crate) node: Option<Index>,
}

impl<S, A, V> MCTSNode<S, A, V> {
    pub fn new(game_state: S, value_score: V, policy_scores: Vec<ActionWithPolicy<A>>) -> Self {
        Self {
            game_state,
            value_score,
            visits: 1,
            children: policy_scores.into_iter().map(|p| p.into()).collect(),
        }
    }

    pub fn terminal(game_state: S, value_score: V) -> Self {
        Self::new(game_state, value_score, Vec::new())
    }

    pub fn is_terminal(&self) -> bool {
        self.children.is_empty()
    }
}

#[allow(non_snake_case)]
impl<A> MCTSEdge<A> {
    pub fn Qsa(&self) -> Option<f32> {
        if self.visits == 0 {
            None
        } else {
            Some(self.W / self.visits as f32)
        }
    }
}

impl<A> From<ActionWithPolicy<A>> for MCTSEdge<A> {
    fn from(action_with_policy: ActionWithPolicy<A>) -> Self {
        MCTSEdge {
            action: action_with_policy.action,
            W: 0.0,
            visits: 0,
            policy_score: action_with_policy.policy_score,
            node: None,
        }
    }
}
