#[allow(non_snake_case)]
#[derive(PartialEq, Debug)]
pub struct NodeMetrics<A> {
    /// The total number of visits of the node. Should be children.visits.sum() + 1.
    pub visits: usize,
    pub children: Vec<EdgeMetrics<A>>,
}

impl<A> NodeMetrics<A> {
    pub fn child_max_visits(&self) -> Option<&EdgeMetrics<A>> {
        self.children.iter().max_by_key(|c| c.visits)
    }
}

#[allow(non_snake_case)]
#[derive(PartialEq, Debug)]
pub struct EdgeMetrics<A> {
    pub action: A,
    pub visits: usize,
    /// Average value of the edge for the player choosing it.
    pub Qsa: f32,
}
