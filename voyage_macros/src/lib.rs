mod completion_schema;
mod schema_extraction;

use proc_macro::TokenStream;

/// Attaches a lazily-built JSON schema handle to a named struct.
///
/// The struct must also derive `schemars::JsonSchema` and `serde::Deserialize`.
/// Doc comments on the struct and its fields become schema metadata, keyed by
/// the property names serde will actually emit (`rename_all` and `rename` are
/// honoured).
///
/// ```ignore
/// #[derive(Deserialize, JsonSchema)]
/// #[serde(rename_all = "camelCase")]
/// #[completion_schema(name = "TripSketch")]
/// struct TripSketch {
///     /// Destination name
///     destination_name: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn completion_schema(attr: TokenStream, item: TokenStream) -> TokenStream {
    completion_schema::completion_schema(attr, item)
}
