pub mod access_log;
pub mod auth;
pub mod error;
pub mod gateway;
pub mod invoker;
pub mod options;
pub mod routes;

pub use access_log::*;
pub use auth::*;
pub use error::*;
pub use gateway::*;
pub use invoker::*;
pub use options::*;
pub use routes::*;
