#[cfg(test)]
mod counting_game;
pub mod cpuct;
pub mod mcts;
#[cfg(test)]
mod mcts_tests;
mod node;
pub mod node_metrics;
pub mod options;
pub mod temp;

pub use cpuct::*;
pub use mcts::*;
pub use node_metrics::*;
pub use options::*;
pub use temp::*;
