//! Model boundary: the `LanguageModel` capability and its chat-completions client

pub mod model;
pub mod openai_client;

pub use model::{LanguageModel, ModelRequest, ResponseFormat, TokenStream};
pub use openai_client::{ChatCompletionRequest, OpenAIClient};
