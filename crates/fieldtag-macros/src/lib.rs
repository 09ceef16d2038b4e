//! Procedural macros for fieldtag
//!
//! This crate provides the derive used to make a struct validatable:
//!
//! - `#[derive(Reflect)]` - exposes the struct's fields, in declaration order,
//!   together with the tag declared by `#[validate("rule:param")]`

use proc_macro::TokenStream;
use proc_macro2::TokenTree;
use quote::{quote, ToTokens};
use syn::ext::IdentExt;
use syn::{
    parse_macro_input, parse_quote, Attribute, Data, DeriveInput, Expr, ExprLit, Ident, Lit,
    LitStr, Meta, Type, Visibility,
};

/// Attribute key carrying a field's validation tag.
const TAG_KEY: &str = "validate";

/// Derive `fieldtag_validate::Reflect` for a struct.
///
/// Each field may carry one tag, either `#[validate("min:3")]` or
/// `#[validate = "min:3"]`. A field counts as exported only when it is
/// declared plain `pub`; the value of an unexported or untagged field is
/// never read. Positional fields are named by their index.
///
/// # Example
///
/// ```rust,ignore
/// use fieldtag_validate::{Reflect, Validate};
///
/// #[derive(Reflect)]
/// pub struct Signup {
///     #[validate("min:3")]
///     pub username: String,
///
///     #[validate = "in:free,pro"]
///     pub plan: String,
///
///     #[validate("min:0")]
///     pub scores: Vec<i32>,
/// }
///
/// let signup = Signup {
///     username: "al".into(),
///     plan: "pro".into(),
///     scores: vec![1, -2],
/// };
/// assert!(signup.validate().is_err());
/// ```
#[proc_macro_derive(Reflect, attributes(validate))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    expand_reflect(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_reflect(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Reflect can only be derived for structs",
            ))
        }
    };

    let name = &input.ident;
    let type_params: Vec<&Ident> = input.generics.type_params().map(|p| &p.ident).collect();
    let mut generics = input.generics.clone();

    let mut descriptors = Vec::with_capacity(fields.len());
    for (index, field) in fields.iter().enumerate() {
        let tag = field_tag(&field.attrs)?;

        let (field_name, access) = match &field.ident {
            Some(ident) => (ident.unraw().to_string(), quote!(#ident)),
            None => {
                let index = syn::Index::from(index);
                (index.index.to_string(), quote!(#index))
            }
        };

        let exported = matches!(field.vis, Visibility::Public(_));
        let tag_value = tag.as_ref().map(LitStr::value).unwrap_or_default();

        // Only exported, tagged fields are read.
        let value = if exported && !tag_value.is_empty() {
            let ty = &field.ty;
            if mentions_type_param(ty, &type_params) {
                generics
                    .make_where_clause()
                    .predicates
                    .push(parse_quote!(#ty: ::fieldtag_validate::Reflect));
            }
            quote!(::fieldtag_validate::FieldValue::of(&self.#access))
        } else {
            quote!(::fieldtag_validate::FieldValue::Other)
        };

        descriptors.push(quote! {
            ::fieldtag_validate::Field {
                name: #field_name,
                exported: #exported,
                tag: #tag_value,
                value: #value,
            }
        });
    }

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::fieldtag_validate::Reflect for #name #ty_generics #where_clause {
            const KIND: ::fieldtag_validate::Kind = ::fieldtag_validate::Kind::Struct;

            fn reflect(&self) -> ::fieldtag_validate::Shape<'_> {
                ::fieldtag_validate::Shape::Struct(::std::vec![#(#descriptors),*])
            }
        }
    })
}

/// Whether `ty` refers to one of the struct's type parameters.
fn mentions_type_param(ty: &Type, params: &[&Ident]) -> bool {
    fn scan(tokens: proc_macro2::TokenStream, params: &[&Ident]) -> bool {
        tokens.into_iter().any(|tt| match tt {
            TokenTree::Ident(ident) => params.iter().any(|p| **p == ident),
            TokenTree::Group(group) => scan(group.stream(), params),
            _ => false,
        })
    }

    !params.is_empty() && scan(ty.to_token_stream(), params)
}

/// Extract the single `#[validate]` tag of a field, if any.
fn field_tag(attrs: &[Attribute]) -> syn::Result<Option<LitStr>> {
    let mut tag = None;

    for attr in attrs.iter().filter(|a| a.path().is_ident(TAG_KEY)) {
        if tag.is_some() {
            return Err(syn::Error::new_spanned(
                attr,
                "only one #[validate] tag is allowed per field",
            ));
        }

        let lit = match &attr.meta {
            Meta::List(_) => attr.parse_args::<LitStr>()?,
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(lit), ..
                }) => lit.clone(),
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "expected a string tag like \"min:3\"",
                    ))
                }
            },
            Meta::Path(path) => {
                return Err(syn::Error::new_spanned(
                    path,
                    "expected #[validate(\"rule:param\")]",
                ))
            }
        };
        tag = Some(lit);
    }

    Ok(tag)
}
