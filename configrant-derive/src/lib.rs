//! Derive macro implementation for configrant

use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Visibility};

mod attrs;

use attrs::FieldAttrs;

/// `Configrant` derive macro
///
/// Implements `configrant::Record` and `configrant::Member` for the struct and
/// adds the inherent methods `configure()` and `configure_with(&Args)`.
///
/// # Supported Attributes
///
/// **Field-level**:
/// - `#[cfgrant("arg:KEY,env:NAME,default:LITERAL")]`: Tag string
/// - `#[cfgrant(arg = "KEY", env = "NAME", default = "LITERAL")]`: Same, as options
/// - `#[cfgrant("-")]` or `#[cfgrant(skip)]`: Never bind this field
///
/// Private fields and excluded fields are listed without storage, so their
/// types need not be bindable. Every other field type must implement
/// `configrant::Member`: supported leaf types, `Option`/`Box` of them, or
/// another `Configrant` struct.
///
/// # Example
///
/// See the `configrant` crate documentation for usage examples.
#[proc_macro_derive(Configrant, attributes(cfgrant))]
pub fn derive_configrant(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    // Struct name
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    // Extract fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(
                    struct_name,
                    "Configrant only supports structs with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(struct_name, "Configrant only supports structs")
                .to_compile_error()
                .into();
        }
    };

    // Generate one field reference per declared field
    let mut field_refs = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };
        let field_name = field_ident.unraw().to_string();

        let attrs = match FieldAttrs::from_field(field) {
            Ok(attrs) => attrs,
            Err(err) => return err.to_compile_error().into(),
        };

        let exported = !matches!(field.vis, Visibility::Inherited);
        let tag = match &attrs.tag {
            Some(tag) => quote! { ::core::option::Option::Some(#tag) },
            None => quote! { ::core::option::Option::None },
        };

        // Private and excluded fields are never handed out
        let member = if exported && !attrs.is_excluded() {
            quote! {
                ::core::option::Option::Some(
                    &mut self.#field_ident as &mut dyn ::configrant::Member
                )
            }
        } else {
            quote! { ::core::option::Option::None }
        };

        field_refs.push(quote! {
            ::configrant::FieldRef {
                name: #field_name,
                tag: #tag,
                exported: #exported,
                member: #member,
            }
        });
    }

    let expanded = quote! {
        impl #impl_generics ::configrant::Record for #struct_name #ty_generics #where_clause {
            fn fields(&mut self) -> ::std::vec::Vec<::configrant::FieldRef<'_>> {
                ::std::vec![#(#field_refs),*]
            }
        }

        impl #impl_generics ::configrant::Member for #struct_name #ty_generics #where_clause {
            fn node(&mut self) -> ::configrant::Node<'_> {
                ::configrant::Node::Record(self)
            }

            fn is_record(&self) -> bool {
                true
            }
        }

        impl #impl_generics #struct_name #ty_generics #where_clause {
            /// Bind fields from the process arguments, the environment and tag defaults
            ///
            /// # Errors
            ///
            /// - A field tag is malformed or a field type is not supported
            /// - A source literal cannot be converted to its field's type
            pub fn configure(&mut self) -> ::core::result::Result<(), ::configrant::Error> {
                ::configrant::process(self)
            }

            /// Bind fields from `args`, the environment and tag defaults
            ///
            /// # Errors
            ///
            /// - A field tag is malformed or a field type is not supported
            /// - A source literal cannot be converted to its field's type
            pub fn configure_with(
                &mut self,
                args: &::configrant::Args,
            ) -> ::core::result::Result<(), ::configrant::Error> {
                ::configrant::process_with(self, args)
            }
        }
    };

    TokenStream::from(expanded)
}
