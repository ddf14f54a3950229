mod projection;
mod shared;

use proc_macro::TokenStream;

/// Derives `FieldTarget` and `ConstructorTarget` for a struct with named
/// fields, plus `SetterTarget` under `#[projection(setters)]`.
///
/// Struct arguments:
/// - `setters`: bind through `set_<field>` methods the type provides.
/// - `constructor = "new"`: build through `Self::new(..)` taking every
///   non-skipped field in declaration order, instead of a struct literal.
///
/// Field arguments:
/// - `skip`: not bindable; filled with `Default::default()` by the
///   struct-literal constructor.
#[proc_macro_derive(Projection, attributes(projection))]
pub fn derive_projection(input: TokenStream) -> TokenStream {
    projection::derive(input)
}
