mod engine;
pub mod merge;

pub use engine::{PushEngine, PushResult};
