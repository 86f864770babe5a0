use heck::ToUpperCamelCase;
use proc_macro_error2::abort;
use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Data, DeriveInput, Fields, spanned::Spanned};

/// Lifecycle fields in trait order: attribute key and the accessor it implements.
const FIELDS: [(&str, &str); 9] = [
    ("id", "id_col"),
    ("is_deleted", "deleted_flag_col"),
    ("deleted_at", "deleted_at_col"),
    ("deleted_by", "deleted_by_col"),
    ("created_at", "created_at_col"),
    ("created_by", "created_by_col"),
    ("updated_at", "updated_at_col"),
    ("updated_by", "updated_by_col"),
    ("version", "version_col"),
];

/// How one lifecycle field was declared in `#[audit(...)]`.
enum Mapping {
    Column(String, Span),
    Skipped(Span),
}

#[derive(Default)]
struct AuditConfig {
    soft_delete: Option<(String, Span)>,
    mappings: [Option<Mapping>; 9],
}

#[allow(clippy::needless_pass_by_value)] // DeriveInput is consumed by proc-macro pattern
pub fn expand_derive_audited(input: DeriveInput) -> TokenStream {
    let model_fields = named_fields(&input);
    let config = parse_audit_attrs(&input);

    let accessors = FIELDS.iter().zip(&config.mappings).map(|((key, method), mapping)| {
        let column = resolve_column(key, mapping.as_ref(), &model_fields);
        generate_col_impl(method, column.as_deref(), input.ident.span())
    });

    let strategy = config.soft_delete.map(|(name, span)| {
        let lit = syn::LitStr::new(&name, span);
        quote! {
            const SOFT_DELETE_STRATEGY: &'static str = #lit;
        }
    });

    let entity_ident = syn::Ident::new("Entity", input.ident.span());

    quote! {
        impl ::lifecycle_db::AuditedEntity for #entity_ident {
            #strategy

            #(#accessors)*
        }
    }
}

fn named_fields(input: &DeriveInput) -> Vec<String> {
    let Data::Struct(data) = &input.data else {
        abort!(
            input.span(),
            "#[derive(Audited)] can only be applied to structs"
        );
    };
    let Fields::Named(fields) = &data.fields else {
        abort!(
            input.span(),
            "#[derive(Audited)] requires a struct with named fields"
        );
    };
    fields
        .named
        .iter()
        .filter_map(|f| f.ident.as_ref().map(ToString::to_string))
        .collect()
}

/// Model field backing `key`: the explicit mapping, else the canonical name if the
/// model has it.
fn resolve_column(key: &str, mapping: Option<&Mapping>, model_fields: &[String]) -> Option<String> {
    match mapping {
        Some(Mapping::Skipped(_)) => None,
        Some(Mapping::Column(name, span)) => {
            if !model_fields.iter().any(|f| f == name) {
                abort!(
                    *span,
                    "audit: `{}` maps to `{}`, but the model has no such field",
                    key,
                    name
                );
            }
            Some(name.clone())
        }
        None => model_fields
            .iter()
            .find(|f| f.as_str() == key)
            .cloned(),
    }
}

fn generate_col_impl(method_name: &str, column: Option<&str>, default_span: Span) -> TokenStream {
    let method_ident = syn::Ident::new(method_name, default_span);

    if let Some(column) = column {
        let col_ident = syn::Ident::new(&field_to_variant(column), default_span);
        quote! {
            fn #method_ident() -> ::core::option::Option<Column> {
                ::core::option::Option::Some(Column::#col_ident)
            }
        }
    } else {
        quote! {
            fn #method_ident() -> ::core::option::Option<Column> {
                ::core::option::Option::None
            }
        }
    }
}

/// Parse all `#[audit(...)]` attributes with duplicate detection
fn parse_audit_attrs(input: &DeriveInput) -> AuditConfig {
    let mut config = AuditConfig::default();

    for attr in &input.attrs {
        if !attr.path().is_ident("audit") {
            continue;
        }

        let result = attr.parse_nested_meta(|meta| {
            let span = meta.path.span();
            let key = meta
                .path
                .get_ident()
                .map(ToString::to_string)
                .unwrap_or_default();

            if key.is_empty() {
                abort!(span, "Expected attribute name");
            }

            if let Some(field) = key.strip_prefix("no_") {
                let Some(idx) = field_index(field) else {
                    abort!(span, "Unknown attribute '{}'. {}", key, valid_attributes());
                };
                match config.mappings[idx] {
                    Some(Mapping::Skipped(_)) => abort!(span, "duplicate attribute '{}'", key),
                    Some(Mapping::Column(..)) => abort!(
                        span,
                        "audit: specify either `{}` or `no_{}`, not both",
                        field,
                        field
                    ),
                    None => config.mappings[idx] = Some(Mapping::Skipped(span)),
                }
                return Ok(());
            }

            let value: String = match meta.value() {
                Ok(v) => match v.parse::<syn::LitStr>() {
                    Ok(lit) => lit.value(),
                    Err(_) => abort!(span, "Expected string literal"),
                },
                Err(_) => abort!(span, "Expected '=' followed by a string value"),
            };

            if key == "soft_delete" {
                if config.soft_delete.is_some() {
                    abort!(span, "duplicate attribute 'soft_delete'");
                }
                if value.is_empty() {
                    abort!(span, "audit: soft_delete strategy name must not be empty");
                }
                config.soft_delete = Some((value, span));
                return Ok(());
            }

            let Some(idx) = field_index(&key) else {
                abort!(span, "Unknown attribute '{}'. {}", key, valid_attributes());
            };
            match config.mappings[idx] {
                Some(Mapping::Column(..)) => abort!(span, "duplicate attribute '{}'", key),
                Some(Mapping::Skipped(_)) => abort!(
                    span,
                    "audit: specify either `{}` or `no_{}`, not both",
                    key,
                    key
                ),
                None => config.mappings[idx] = Some(Mapping::Column(value, span)),
            }
            Ok(())
        });

        if let Err(err) = result {
            abort!(err.span(), "{}", err);
        }
    }

    if let Some(Mapping::Skipped(span)) = &config.mappings[0] {
        abort!(*span, "audit: the primary key cannot be opted out");
    }

    config
}

fn field_index(key: &str) -> Option<usize> {
    FIELDS.iter().position(|(name, _)| *name == key)
}

fn valid_attributes() -> String {
    let fields: Vec<&str> = FIELDS.iter().map(|(name, _)| *name).collect();
    format!(
        "Valid attributes: soft_delete, {} (each also as no_<field>)",
        fields.join(", ")
    )
}

/// Convert a `snake_case` model field to its SeaORM `Column` variant
fn field_to_variant(s: &str) -> String {
    s.to_upper_camel_case()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn field_to_variant_matches_sea_orm_columns() {
        assert_eq!(field_to_variant("is_deleted"), "IsDeleted");
        assert_eq!(field_to_variant("id"), "Id");
        assert_eq!(field_to_variant("row_version"), "RowVersion");
    }

    #[test]
    fn canonical_names_resolve_only_when_present() {
        let fields = vec!["id".to_owned(), "created_at".to_owned()];
        assert_eq!(resolve_column("created_at", None, &fields).as_deref(), Some("created_at"));
        assert_eq!(resolve_column("deleted_by", None, &fields), None);
        assert_eq!(
            resolve_column("created_at", Some(&Mapping::Skipped(Span::call_site())), &fields),
            None
        );
    }

    #[test]
    fn expands_canonical_model() {
        let input: DeriveInput = syn::parse_quote! {
            #[audit(soft_delete = "ARCHIVE", version = "revision", no_updated_by)]
            pub struct Model {
                pub id: Uuid,
                pub is_deleted: bool,
                pub created_at: OffsetTimestamp,
                pub updated_at: OffsetTimestamp,
                pub updated_by: Option<Uuid>,
                pub revision: i32,
            }
        };
        let out = expand_derive_audited(input).to_string();

        assert!(out.contains("const SOFT_DELETE_STRATEGY"), "{out}");
        assert!(out.contains("\"ARCHIVE\""), "{out}");
        assert!(out.contains("Column :: Revision"), "{out}");
        assert!(out.contains("Column :: IsDeleted"), "{out}");
        assert!(!out.contains("Column :: UpdatedBy"), "{out}");
        assert!(!out.contains("Column :: DeletedAt"), "{out}");
    }
}
