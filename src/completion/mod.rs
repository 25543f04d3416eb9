//! Streaming completion pipeline
//!
//! The pipeline for one turn: [`request`] builds the outgoing payload,
//! [`turn`] opens the stream and drives it, [`decoder`] cuts the byte
//! stream into frames, and [`accumulator`] folds frames into the growing
//! assistant reply.

pub mod accumulator;
pub mod decoder;
pub mod request;
pub mod turn;

pub use accumulator::{EventKind, FrameEffect, StreamAccumulator, DONE_SENTINEL};
pub use decoder::{Frame, FrameDecoder};
pub use request::{CompletionRequest, LlmRef, MessageRequest, ToolRef, ToolSelection};
pub use turn::{CompletionClient, TurnDriver, TurnOutcome, FAILURE_APOLOGY};
