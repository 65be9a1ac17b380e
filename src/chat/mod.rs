pub mod command;
pub mod pipeline;

pub use command::{ChatCommand, ChatError};
pub use pipeline::{ChatOutcome, ChatPipeline};
