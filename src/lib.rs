//! Covo - Streaming chat client library
//!
//! This library provides the core functionality for the Covo chat
//! client: the streaming completion pipeline, the conversation message
//! store, the backend API client, and configuration.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `completion`: Request building, frame decoding, event accumulation,
//!   and the turn driver for streamed assistant replies
//! - `store`: The parent-linked message list for the open conversation
//! - `api`: Client for the backend's plain request/response endpoints
//! - `chat_mode`: Interactive session state and slash-command parsing
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use covo::completion::{Frame, StreamAccumulator};
//!
//! let mut accumulator = StreamAccumulator::new();
//! let frame = Frame {
//!     event: "data".to_string(),
//!     message: "Hello".to_string(),
//! };
//! accumulator.apply(&frame);
//! assert_eq!(accumulator.data(), "Hello");
//! ```

pub mod api;
pub mod chat_mode;
pub mod cli;
pub mod commands;
pub mod completion;
pub mod config;
pub mod error;
pub mod store;

// Re-export commonly used types
pub use api::ApiClient;
pub use completion::{CompletionClient, StreamAccumulator, TurnDriver};
pub use config::Config;
pub use error::{CovoError, Result};
pub use store::MessageStore;
