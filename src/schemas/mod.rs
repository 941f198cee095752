//! JSON schema handles and validation for model-produced payloads

pub mod schema;
pub mod validation;

pub use schema::{apply_doc_comments, CompletionSchema, SchemaHandle};
pub use validation::{decode_structured, parse_model_object, validate_structured_payload};
