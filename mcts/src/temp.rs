pub trait Temperature {
    type State;

    fn temp(&self, state: &Self::State) -> f32;
}

/// Always picks the most visited action.
pub struct NoTemp<S> {
    pub _phantom: std::marker::PhantomData<S>,
}

impl<S> NoTemp<S> {
    pub fn new() -> Self {
        Default::default()
    }
}

impl<S> Default for NoTemp<S> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<S> Temperature for NoTemp<S> {
    type State = S;

    fn temp(&self, _: &Self::State) -> f32 {
        0.0
    }
}

pub struct TemperatureConstant<S> {
    pub temperature: f32,
    pub _phantom: std::marker::PhantomData<S>,
}

impl<S> TemperatureConstant<S> {
    pub fn new(temperature: f32) -> Self {
        Self {
            temperature,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<S> Temperature for TemperatureConstant<S> {
    type State = S;

    fn temp(&self, _: &Self::State) -> f32 {
        self.temperature
    }
}
