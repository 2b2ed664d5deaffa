//! bscforge NVIDIA - Hosted-endpoint integration for embeddings and
//! streaming code generation.
//!
//! This crate provides an async client for NVIDIA's OpenAI-compatible API,
//! the fixed generation prompt, and the streaming accumulation loop.

mod client;
mod error;
pub mod generation;
mod types;

pub use client::NvidiaClient;
pub use error::{ApiError, ApiResult};
pub use generation::{accumulate_stream, build_generation_prompt, GenerationOutcome};
pub use types::*;
