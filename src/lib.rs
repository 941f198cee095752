//! voyage-rs: fact-grounded travel recommendations from free-text preferences
//!
//! A language model turns chat messages into structured preferences and then
//! phrases recommendations, while weather, flight and trip cost estimates,
//! hotels and fun/food scores are computed deterministically and override
//! anything the model writes.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use voyage_rs::{ChatMessage, ExtractRequest, RecommendRequest, TravelAssistant};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let assistant = TravelAssistant::from_env()?;
//!
//!     let text = "Beach trip in Europe this July, under $2000, love food and hiking";
//!     let extracted = assistant
//!         .extract(ExtractRequest { text: text.to_string(), history: Vec::new() })
//!         .await?;
//!
//!     let response = assistant
//!         .recommend(RecommendRequest {
//!             preferences: extracted.preferences,
//!             history: vec![ChatMessage::user(text)],
//!             tone: Some("friendly".to_string()),
//!         })
//!         .await?;
//!     println!("{}", response.markdown);
//!     Ok(())
//! }
//! ```

extern crate self as voyage_rs;

pub mod config;
pub mod core;
pub mod error;
pub mod schemas;
pub mod services;
pub mod tools;
pub mod types;

pub use config::Config;
pub use core::{
    clarifying_question, FollowUpMode, MarkdownStream, ModeSchema, TravelAssistant,
    STREAM_ERROR_NOTICE,
};
pub use error::{Result, TravelError};
pub use schemas::{CompletionSchema, SchemaHandle};
pub use services::{LanguageModel, ModelRequest, OpenAIClient, ResponseFormat, TokenStream};
pub use tools::{FactEngine, MemoryCache, OpenMeteoSource, TtlCache, WeatherSource};
pub use types::{
    ChatMessage, Destination, ExtractRequest, ExtractResponse, FactSheetEntry, Hotel,
    ParsedPreferences, RecommendRequest, RecommendResponse, Recommendation, Role, Score, Tone,
};
pub use voyage_macros::completion_schema;

pub use schemas as schema;

#[cfg(feature = "cli")]
pub mod cli;
