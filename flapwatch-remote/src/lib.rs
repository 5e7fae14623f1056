//! Chunked remote-write client for flap counters.
//!
//! Pushes [`RemoteSample`](flapwatch_types::RemoteSample) batches to a
//! time-series write endpoint in bounded-size chunks. Chunks are
//! independent: one rejected chunk never blocks the rest of the batch,
//! and no retry happens at this layer - retry policy, if any, belongs to
//! the transport or the backend in front of it.

mod client;
mod error;

pub use client::{ChunkFailure, PushReport, RemoteWriter};
pub use error::RemoteWriteError;
