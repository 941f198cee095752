pub mod api;
pub mod facts;
pub mod message;
pub mod preferences;
pub mod recommendation;
pub mod tone;

pub use api::{ExtractRequest, ExtractResponse, RecommendRequest, RecommendResponse};
pub use facts::{Candidate, FactSheetEntry};
pub use message::{latest_user_message, ChatMessage, Role};
pub use preferences::{ParsedPreferences, TripDates};
pub use recommendation::{Destination, Hotel, Recommendation, Score};
pub use tone::{Tone, UnknownTone};
