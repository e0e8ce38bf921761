//! Language-model provider abstraction for pricelens
//!
//! This crate provides provider-agnostic types for a single chat completion:
//!
//! - Message types for the conversation
//! - Completion request/response types
//! - The [`LLMProvider`] trait
//! - An OpenAI-compatible provider, which also serves Gemini through its
//!   OpenAI-compatible endpoint

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;
pub mod providers;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, FinishReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;
