mod messages;

pub use messages::{ClientMessage, DEFAULT_PORT, ErrorKind, ProgressSnapshot, ServerMessage};
