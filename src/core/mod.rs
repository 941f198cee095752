pub mod agent;
pub mod candidates;
pub mod clarify;
pub mod extraction;
pub mod intent;
pub mod prompts;
pub mod render;
pub mod repair;

pub use agent::{MarkdownStream, TravelAssistant, STREAM_ERROR_NOTICE};
pub use candidates::{select_candidates, CANDIDATE_POOL};
pub use clarify::{clarifying_question, missing_groups};
pub use intent::FollowUpMode;
pub use repair::ModeSchema;
