pub mod chatter;
pub mod directory;
pub mod feed;
pub mod session;

pub use directory::{channels, find_channel};
pub use feed::ChatFeed;
pub use session::{ChannelSession, SessionPhase, StreamingSessionState};
