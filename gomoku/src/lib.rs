pub mod action;
pub mod board;
pub mod builder;
pub mod engine;
pub mod game_state;
pub mod model;
pub mod model_factory;
pub mod network;
pub mod value;

pub use action::*;
pub use board::*;
pub use builder::*;
pub use crate::engine::*;
pub use game_state::*;
pub use crate::model::*;
pub use model_factory::*;
pub use network::*;
pub use value::*;
