pub mod config;
pub mod env;
pub mod softmax;

pub use config::*;
pub use env::*;
pub use softmax::*;
