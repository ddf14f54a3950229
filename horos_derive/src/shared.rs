use proc_macro_crate::{FoundCrate, crate_name};
use quote::quote;
use syn::{Attribute, Expr, ExprLit, Field, Lit, LitStr, Meta, punctuated::Punctuated};

pub fn import_horos() -> proc_macro2::TokenStream {
    // This finds the horos crate in the user's dependencies
    let found_crate = crate_name("horos").unwrap_or(FoundCrate::Itself);

    match found_crate {
        FoundCrate::Itself => quote! { ::horos },
        FoundCrate::Name(name) => {
            let ident = syn::Ident::new(&name, proc_macro2::Span::call_site());
            quote! { ::#ident }
        }
    }
}

/// Flattened arguments of every `#[projection(...)]` attribute in `attrs`.
pub fn projection_args(attrs: &[Attribute]) -> syn::Result<Vec<Meta>> {
    let mut args = Vec::new();
    for attr in attrs.iter().filter(|a| a.path().is_ident("projection")) {
        let nested =
            attr.parse_args_with(Punctuated::<Meta, syn::Token![,]>::parse_terminated)?;
        args.extend(nested);
    }
    Ok(args)
}

/// Whether a bare flag such as `skip` is present.
pub fn has_flag(args: &[Meta], flag: &str) -> bool {
    args.iter()
        .any(|meta| matches!(meta, Meta::Path(path) if path.is_ident(flag)))
}

/// Value of `key = "..."`, if present.
pub fn string_value(args: &[Meta], key: &str) -> syn::Result<Option<LitStr>> {
    for meta in args {
        if let Meta::NameValue(nv) = meta {
            if nv.path.is_ident(key) {
                return match &nv.value {
                    Expr::Lit(ExprLit {
                        lit: Lit::Str(s), ..
                    }) => Ok(Some(s.clone())),
                    other => Err(syn::Error::new_spanned(
                        other,
                        format!("`{}` must be a string literal", key),
                    )),
                };
            }
        }
    }
    Ok(None)
}

/// Rejects anything other than the listed flags and keys.
pub fn check_known(args: &[Meta], flags: &[&str], keys: &[&str]) -> syn::Result<()> {
    for meta in args {
        let known = match meta {
            Meta::Path(path) => flags.iter().any(|f| path.is_ident(f)),
            Meta::NameValue(nv) => keys.iter().any(|k| nv.path.is_ident(k)),
            Meta::List(_) => false,
        };
        if !known {
            return Err(syn::Error::new_spanned(
                meta,
                "unsupported `projection` argument",
            ));
        }
    }
    Ok(())
}

/// Check if a field has #[projection(skip)] attribute
pub fn is_skipped(field: &Field) -> syn::Result<bool> {
    let args = projection_args(&field.attrs)?;
    check_known(&args, &["skip"], &[])?;
    Ok(has_flag(&args, "skip"))
}
