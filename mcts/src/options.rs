pub struct MCTSOptions {
    pub(crate) fpu: f32,
    pub(crate) fpu_root: f32,
}

impl MCTSOptions {
    /// `fpu` is the value assumed for unvisited children. Values are win probabilities in
    /// `0.0..=1.0`, so `0.5` treats an unvisited move as even.
    pub fn new(fpu: f32, fpu_root: f32) -> Self {
        MCTSOptions { fpu, fpu_root }
    }
}

impl Default for MCTSOptions {
    fn default() -> Self {
        Self::new(0.5, 0.5)
    }
}
