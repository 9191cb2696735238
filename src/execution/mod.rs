//! Build execution

pub mod engine;
pub mod server;
pub mod watch;

pub use engine::{BuildEngine, BuildEvent, EngineError, EventHandler};
