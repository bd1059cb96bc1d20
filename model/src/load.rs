use anyhow::Result;

/// Constructs a model from a reference to its stored artifact.
pub trait Load {
    type MR;
    type M;

    fn load(&self, model_ref: &Self::MR) -> Result<Self::M>;
}
