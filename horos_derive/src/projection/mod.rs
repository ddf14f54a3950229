use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DeriveInput, Fields, Ident, Type, ext::IdentExt, parse_macro_input};

use crate::shared::{check_known, has_flag, import_horos, is_skipped, projection_args, string_value};

struct Member<'a> {
    ident: &'a Ident,
    name: String,
    ty: &'a Type,
}

pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let horos = import_horos();
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(s) => match &s.fields {
            Fields::Named(f) => &f.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    ident,
                    "Projection only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                ident,
                "Projection only supports structs",
            ));
        }
    };

    let args = projection_args(&input.attrs)?;
    check_known(&args, &["setters"], &["constructor"])?;
    let with_setters = has_flag(&args, "setters");
    let constructor = string_value(&args, "constructor")?;

    let mut members = Vec::new();
    let mut skipped = Vec::new();
    for field in fields {
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };
        if is_skipped(field)? {
            skipped.push(field_ident);
        } else {
            members.push(Member {
                ident: field_ident,
                name: field_ident.unraw().to_string(),
                ty: &field.ty,
            });
        }
    }

    let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
    let arity = members.len();

    let unknown = |arg: proc_macro2::TokenStream| {
        quote! {
            ::core::result::Result::Err(#horos::error::ProjectionError::UnknownMember {
                target: ::core::any::type_name::<Self>(),
                member: ::std::string::ToString::to_string(#arg),
            })
        }
    };

    // FieldTarget
    let field_arms = members.iter().map(|m| {
        let name = &m.name;
        let member = m.ident;
        quote! {
            #name => {
                self.#member = #horos::row::convert(#name, value)?;
                ::core::result::Result::Ok(())
            }
        }
    });
    let unknown_field = unknown(quote!(field));
    let field_impl = quote! {
        impl #impl_generics #horos::projection::FieldTarget for #ident #ty_generics #where_clause {
            const FIELDS: &'static [&'static str] = &[#(#names),*];

            fn set_field(
                &mut self,
                field: &str,
                value: #horos::value::Value,
            ) -> ::core::result::Result<(), #horos::error::ProjectionError> {
                match field {
                    #(#field_arms)*
                    _ => #unknown_field,
                }
            }
        }
    };

    // SetterTarget
    let setter_impl = if with_setters {
        let setter_arms = members.iter().map(|m| {
            let name = &m.name;
            let setter = format_ident!("set_{}", m.name);
            quote! {
                #name => {
                    self.#setter(#horos::row::convert(#name, value)?);
                    ::core::result::Result::Ok(())
                }
            }
        });
        let unknown_property = unknown(quote!(property));
        quote! {
            impl #impl_generics #horos::projection::SetterTarget for #ident #ty_generics #where_clause {
                const PROPERTIES: &'static [&'static str] = &[#(#names),*];

                fn set_property(
                    &mut self,
                    property: &str,
                    value: #horos::value::Value,
                ) -> ::core::result::Result<(), #horos::error::ProjectionError> {
                    match property {
                        #(#setter_arms)*
                        _ => #unknown_property,
                    }
                }
            }
        }
    } else {
        quote! {}
    };

    // ConstructorTarget
    let temps: Vec<Ident> = members
        .iter()
        .map(|m| format_ident!("__{}", m.name))
        .collect();
    let reads = members.iter().zip(&temps).map(|(m, temp)| {
        let name = &m.name;
        let ty = m.ty;
        quote! {
            let #temp: #ty = #horos::row::convert(
                #name,
                ::core::iter::Iterator::next(&mut args).unwrap_or_default(),
            )?;
        }
    });
    let build = match &constructor {
        Some(func) => {
            let func = func.parse::<Ident>()?;
            quote! { Self::#func(#(#temps),*) }
        }
        None => {
            let idents = members.iter().map(|m| m.ident);
            quote! {
                Self {
                    #(#idents: #temps,)*
                    #(#skipped: ::core::default::Default::default(),)*
                }
            }
        }
    };
    let constructor_impl = quote! {
        impl #impl_generics #horos::projection::ConstructorTarget for #ident #ty_generics #where_clause {
            const PARAMETERS: &'static [&'static str] = &[#(#names),*];

            fn construct(
                args: ::std::vec::Vec<#horos::value::Value>,
            ) -> ::core::result::Result<Self, #horos::error::ProjectionError> {
                if args.len() != #arity {
                    return ::core::result::Result::Err(
                        #horos::error::ProjectionError::ArityMismatch {
                            target: ::core::any::type_name::<Self>(),
                            expected: #arity,
                            found: args.len(),
                        },
                    );
                }
                let mut args = ::std::iter::IntoIterator::into_iter(args);
                #(#reads)*
                ::core::result::Result::Ok(#build)
            }
        }
    };

    Ok(quote! {
        #field_impl
        #setter_impl
        #constructor_impl
    })
}
