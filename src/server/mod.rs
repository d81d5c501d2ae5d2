//! Quiz server module.
//!
//! Serves the quiz pages and the WebSocket realtime channel.

mod error;
mod gateway;
mod pages;
mod registry;
mod server;
mod state;
mod tracker;

pub use error::GatewayError;
pub use gateway::{Connection, handle_client_message, handle_text};
pub use registry::SessionRegistry;
pub use server::{router, run, serve};
pub use state::{QuizStore, SharedStore};
pub use tracker::{AnswerOutcome, AnswerPolicy, ProgressTracker, Progression};
