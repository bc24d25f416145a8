//! Text generation backends

use async_trait::async_trait;

use crate::Result;

pub mod gemini;

pub use gemini::{GeminiClient, MODEL_CANDIDATES};

/// A hosted model that turns a prompt into text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for `prompt`.
    ///
    /// Returns trimmed, non-empty text. Blank output is `EmptyCompletion`;
    /// transport, auth, quota and decoding failures are `ModelUnavailable`.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Identifier of the model answering requests
    fn model(&self) -> &str;
}
