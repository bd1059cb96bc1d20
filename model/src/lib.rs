pub mod analytics;
pub mod load;
pub mod model_cache;

pub use analytics::*;
pub use load::*;
pub use model_cache::*;
