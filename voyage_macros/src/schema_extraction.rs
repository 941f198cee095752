use proc_macro2::Span;
use syn::{
    parse::Parser, punctuated::Punctuated, spanned::Spanned, Attribute, Expr, ExprLit, Fields,
    ItemStruct, Lit, LitStr, MetaNameValue, Token,
};

#[derive(Default)]
pub struct CompletionSchemaArgs {
    pub name: Option<LitStr>,
    pub description: Option<LitStr>,
}

/// Subset of serde's `rename_all` rules that matter for snake_case field idents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenameRule {
    #[default]
    None,
    Lower,
    Upper,
    Camel,
    Pascal,
    Kebab,
    ScreamingSnake,
}

impl RenameRule {
    fn from_serde(value: &str) -> Option<Self> {
        match value {
            "lowercase" | "snake_case" => Some(Self::Lower),
            "UPPERCASE" => Some(Self::Upper),
            "SCREAMING_SNAKE_CASE" => Some(Self::ScreamingSnake),
            "camelCase" => Some(Self::Camel),
            "PascalCase" => Some(Self::Pascal),
            "kebab-case" => Some(Self::Kebab),
            _ => None,
        }
    }

    pub fn apply(self, field: &str) -> String {
        match self {
            Self::None | Self::Lower => field.to_string(),
            Self::Upper | Self::ScreamingSnake => field.to_ascii_uppercase(),
            Self::Kebab => field.replace('_', "-"),
            Self::Camel | Self::Pascal => {
                let mut out = String::with_capacity(field.len());
                let mut upper_next = self == Self::Pascal;
                for ch in field.chars() {
                    if ch == '_' {
                        upper_next = !out.is_empty() || self == Self::Pascal;
                        continue;
                    }
                    if upper_next {
                        out.extend(ch.to_uppercase());
                        upper_next = false;
                    } else {
                        out.push(ch);
                    }
                }
                out
            }
        }
    }
}

pub fn parse_completion_schema_args(
    attr: proc_macro::TokenStream,
) -> syn::Result<CompletionSchemaArgs> {
    if attr.is_empty() {
        return Ok(CompletionSchemaArgs::default());
    }

    let parser = Punctuated::<MetaNameValue, Token![,]>::parse_terminated;
    let args = parser.parse(attr)?;

    let mut result = CompletionSchemaArgs::default();

    for nested in args {
        let ident = nested
            .path
            .get_ident()
            .ok_or_else(|| syn::Error::new_spanned(&nested.path, "expected identifier"))?;

        let lit_str = match &nested.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(lit), ..
            }) => lit.clone(),
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "expected string literal value",
                ));
            }
        };

        match ident.to_string().as_str() {
            "name" => {
                if result.name.is_some() {
                    return Err(syn::Error::new(ident.span(), "duplicate `name` argument"));
                }
                result.name = Some(lit_str);
            }
            "description" => {
                if result.description.is_some() {
                    return Err(syn::Error::new(
                        ident.span(),
                        "duplicate `description` argument",
                    ));
                }
                result.description = Some(lit_str);
            }
            other => {
                return Err(syn::Error::new(
                    ident.span(),
                    format!("unsupported argument `{other}`"),
                ));
            }
        }
    }

    Ok(result)
}

/// Model payloads map to JSON objects, so only plain named-field structs qualify.
pub fn ensure_supported_struct(item: &ItemStruct) -> syn::Result<()> {
    if !matches!(item.fields, Fields::Named(_)) {
        return Err(syn::Error::new(
            item.struct_token.span(),
            "`#[completion_schema]` needs named fields: the model answers with a JSON object",
        ));
    }
    if !item.generics.params.is_empty() {
        return Err(syn::Error::new(
            item.generics.span(),
            "`#[completion_schema]` types cannot be generic: each type owns one cached schema",
        ));
    }
    Ok(())
}

pub fn collect_doc_comments(attrs: &[Attribute]) -> Option<String> {
    let mut docs = Vec::new();

    for attr in attrs {
        if !attr.path().is_ident("doc") {
            continue;
        }
        if let syn::Meta::NameValue(MetaNameValue {
            value: Expr::Lit(ExprLit {
                lit: Lit::Str(lit), ..
            }),
            ..
        }) = &attr.meta
        {
            docs.push(lit.value().trim().to_string());
        }
    }

    if docs.is_empty() {
        None
    } else {
        Some(docs.join("\n"))
    }
}

/// Reads the `key = "value"` string entries out of every `#[serde(...)]` attribute.
fn serde_string_entries(attrs: &[Attribute]) -> Vec<(String, String)> {
    let mut entries = Vec::new();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        let _ = attr.parse_nested_meta(|meta| {
            let key = meta
                .path
                .get_ident()
                .map(|ident| ident.to_string())
                .unwrap_or_default();

            if meta.input.peek(Token![=]) {
                let value: Expr = meta.value()?.parse()?;
                if let Expr::Lit(ExprLit {
                    lit: Lit::Str(lit), ..
                }) = value
                {
                    entries.push((key, lit.value()));
                }
            } else if meta.input.peek(syn::token::Paren) {
                let content;
                syn::parenthesized!(content in meta.input);
                content.parse::<proc_macro2::TokenStream>()?;
            }
            Ok(())
        });
    }

    entries
}

pub fn serde_rename_rule(attrs: &[Attribute]) -> RenameRule {
    serde_string_entries(attrs)
        .into_iter()
        .find(|(key, _)| key == "rename_all")
        .and_then(|(_, value)| RenameRule::from_serde(&value))
        .unwrap_or_default()
}

/// Field docs keyed by the JSON property name serde will serialize.
pub fn collect_field_docs(item: &ItemStruct, rule: RenameRule) -> Vec<(String, String)> {
    let mut results = Vec::new();

    if let Fields::Named(fields) = &item.fields {
        for field in &fields.named {
            let Some(ident) = &field.ident else {
                continue;
            };
            let Some(doc) = collect_doc_comments(&field.attrs) else {
                continue;
            };

            let property = serde_string_entries(&field.attrs)
                .into_iter()
                .find(|(key, _)| key == "rename")
                .map(|(_, value)| value)
                .unwrap_or_else(|| rule.apply(&ident.to_string()));

            results.push((property, doc));
        }
    }

    results
}

pub fn infer_schema_name(item: &ItemStruct, explicit: Option<&LitStr>) -> LitStr {
    if let Some(explicit) = explicit {
        return explicit.clone();
    }

    LitStr::new(&item.ident.to_string(), Span::call_site())
}

pub fn infer_description(explicit: Option<&LitStr>, doc: Option<String>) -> Option<LitStr> {
    if let Some(explicit) = explicit {
        return Some(explicit.clone());
    }

    doc.map(|text| LitStr::new(&text, Span::call_site()))
}
