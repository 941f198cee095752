use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{parse_macro_input, ItemStruct, LitStr};

use crate::schema_extraction::{
    collect_doc_comments, collect_field_docs, ensure_supported_struct, infer_description,
    infer_schema_name, parse_completion_schema_args, serde_rename_rule, CompletionSchemaArgs,
};

pub fn completion_schema(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match parse_completion_schema_args(attr) {
        Ok(args) => args,
        Err(err) => return err.into_compile_error().into(),
    };
    let payload = parse_macro_input!(item as ItemStruct);

    expand(&args, &payload)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Re-emits the payload struct with a `CompletionSchema` impl whose handle is
/// built on first use and shared afterwards.
fn expand(args: &CompletionSchemaArgs, payload: &ItemStruct) -> syn::Result<TokenStream2> {
    ensure_supported_struct(payload)?;

    let ident = &payload.ident;
    let schema_name = infer_schema_name(payload, args.name.as_ref());
    let type_name = LitStr::new(&ident.to_string(), Span::call_site());
    let description = match infer_description(
        args.description.as_ref(),
        collect_doc_comments(&payload.attrs),
    ) {
        Some(lit) => quote! { Some(#lit) },
        None => quote! { None },
    };
    let property_docs = property_doc_pairs(payload);

    Ok(quote! {
        #payload

        impl voyage_rs::schema::CompletionSchema for #ident {
            fn schema() -> &'static voyage_rs::schema::SchemaHandle {
                const PROPERTY_DOCS: &[(&str, &str)] = &[#(#property_docs),*];
                static SCHEMA: std::sync::OnceLock<voyage_rs::schema::SchemaHandle> =
                    std::sync::OnceLock::new();

                SCHEMA.get_or_init(|| {
                    let mut root = schemars::schema_for!(Self);
                    voyage_rs::schema::apply_doc_comments(
                        &mut root,
                        #schema_name,
                        #description,
                        PROPERTY_DOCS,
                    );
                    voyage_rs::schema::SchemaHandle::from_root_schema::<Self>(
                        #schema_name,
                        #type_name,
                        root,
                    )
                })
            }
        }
    })
}

/// `(json_property, doc)` literals keyed the way serde names the fields on the wire.
fn property_doc_pairs(payload: &ItemStruct) -> Vec<TokenStream2> {
    let rule = serde_rename_rule(&payload.attrs);
    collect_field_docs(payload, rule)
        .into_iter()
        .map(|(property, doc)| {
            let property = LitStr::new(&property, Span::call_site());
            let doc = LitStr::new(&doc, Span::call_site());
            quote! { (#property, #doc) }
        })
        .collect()
}
