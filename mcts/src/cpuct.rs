pub trait CPUCT {
    type State;

    fn cpuct(&self, state: &Self::State, nsb: usize, is_root: bool) -> f32;
}

pub struct ConstantCPUCT<S> {
    cpuct: f32,
    _marker: std::marker::PhantomData<S>,
}

impl<S> ConstantCPUCT<S> {
    pub fn new(cpuct: f32) -> Self {
        Self {
            cpuct,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<S> CPUCT for ConstantCPUCT<S> {
    type State = S;

    fn cpuct(&self, _: &Self::State, _: usize, _: bool) -> f32 {
        self.cpuct
    }
}
