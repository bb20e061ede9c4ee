use proc_macro2::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, Ident, Type};

use super::{FieldAttributes, PersistMeta, TypeAttributes};

// -----------------------------------------------------------------------------
// PersistDerive

/// Parsed input of `#[derive(Persist)]`, by the kind the type persists as.
pub(crate) enum PersistDerive<'a> {
    /// Named or unit struct.
    Composite(PersistStruct<'a>),
    /// Fieldless enum, stored by discriminant.
    Enum(PersistEnum<'a>),
    Opaque(PersistMeta<'a>),
}

impl<'a> PersistDerive<'a> {
    pub fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        let attrs = TypeAttributes::parse_attrs(&input.attrs)?;

        if !input.generics.params.is_empty() {
            return Err(syn::Error::new(
                input.generics.span(),
                "`#[derive(Persist)]` does not support generic types",
            ));
        }

        let opaque = attrs.opaque.is_some();
        let meta = PersistMeta::new(attrs, &input.ident);
        if opaque {
            return Ok(Self::Opaque(meta));
        }

        match &input.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(fields) => {
                    let fields = fields
                        .named
                        .iter()
                        .map(StructField::new)
                        .collect::<syn::Result<Vec<_>>>()?;
                    PersistStruct::new(meta, fields).map(Self::Composite)
                }
                Fields::Unit => PersistStruct::new(meta, Vec::new()).map(Self::Composite),
                Fields::Unnamed(fields) => Err(syn::Error::new(
                    fields.span(),
                    "tuple structs persist by field name; name the fields or use `#[persist(opaque)]`",
                )),
            },
            Data::Enum(data) => {
                if let Some(variant) = data.variants.iter().find(|v| !v.fields.is_empty()) {
                    return Err(syn::Error::new(
                        variant.fields.span(),
                        "only fieldless enums can persist; use `#[persist(opaque)]`",
                    ));
                }
                let variants = data.variants.iter().map(|v| v.ident.clone()).collect();
                Ok(Self::Enum(PersistEnum { meta, variants }))
            }
            Data::Union(data) => Err(syn::Error::new(
                data.union_token.span(),
                "unions cannot persist; use `#[persist(opaque)]`",
            )),
        }
    }
}

// -----------------------------------------------------------------------------
// PersistStruct

pub(crate) struct StructField<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    pub attrs: FieldAttributes,
}

impl<'a> StructField<'a> {
    fn new(field: &'a syn::Field) -> syn::Result<Self> {
        let attrs = FieldAttributes::parse_attrs(&field.attrs)?;
        let Some(ident) = &field.ident else {
            return Err(syn::Error::new(field.span(), "expected a named field"));
        };
        Ok(Self {
            ident,
            ty: &field.ty,
            attrs,
        })
    }

    #[inline]
    pub fn name(&self) -> String {
        self.ident.to_string()
    }
}

pub(crate) struct PersistStruct<'a> {
    meta: PersistMeta<'a>,
    /// Fields in the schema, excluding the base and `ignore` fields.
    fields: Vec<StructField<'a>>,
    base: Option<StructField<'a>>,
}

impl<'a> PersistStruct<'a> {
    fn new(meta: PersistMeta<'a>, fields: Vec<StructField<'a>>) -> syn::Result<Self> {
        let mut base = None;
        let mut active = Vec::with_capacity(fields.len());

        for field in fields {
            if let Some(span) = field.attrs.base {
                if base.is_some() {
                    return Err(syn::Error::new(span, "a type can have only one `base` field"));
                }
                base = Some(field);
            } else if field.attrs.ignore.is_none() {
                active.push(field);
            }
        }

        Ok(Self {
            meta,
            fields: active,
            base,
        })
    }

    #[inline]
    pub fn meta(&self) -> &PersistMeta<'a> {
        &self.meta
    }

    #[inline]
    pub fn fields(&self) -> &[StructField<'a>] {
        &self.fields
    }

    #[inline]
    pub fn base(&self) -> Option<&StructField<'a>> {
        self.base.as_ref()
    }

    /// The `TypeInfo` expression of the struct.
    pub fn to_info_tokens(&self) -> TokenStream {
        let fb_persist_path = self.meta.fb_persist_path();
        let type_info_ = crate::path::type_info_(fb_persist_path);
        let composite_info_ = crate::path::composite_info_(fb_persist_path);
        let field_info_ = crate::path::field_info_(fb_persist_path);
        let field_markers_ = crate::path::field_markers_(fb_persist_path);

        let field_infos = self.fields.iter().map(|field| {
            let name = field.name();
            let ty = field.ty;
            let FieldAttributes { save, skip, .. } = field.attrs;
            quote! {
                #field_info_::new::<#ty>(#name).with_markers(#field_markers_ {
                    save: #save,
                    skip: #skip,
                })
            }
        });

        let with_base = match &self.base {
            Some(base) => {
                let ty = base.ty;
                quote! { .with_base::<#ty>() }
            }
            None => crate::utils::empty(),
        };

        let exclusive = self.meta.attrs().exclusive;
        let markers = self.meta.markers_expression();

        quote! {
            #type_info_::composite::<Self>(
                #composite_info_::new::<Self>(#exclusive, &[ #(#field_infos),* ]) #with_base
            )
            .with_markers(#markers)
        }
    }

    /// Field types to register along with the struct.
    pub fn active_types(&self) -> impl Iterator<Item = &'a Type> + '_ {
        self.base.iter().chain(&self.fields).map(|field| field.ty)
    }
}

// -----------------------------------------------------------------------------
// PersistEnum

pub(crate) struct PersistEnum<'a> {
    meta: PersistMeta<'a>,
    variants: Vec<Ident>,
}

impl<'a> PersistEnum<'a> {
    #[inline]
    pub fn meta(&self) -> &PersistMeta<'a> {
        &self.meta
    }

    #[inline]
    pub fn variants(&self) -> &[Ident] {
        &self.variants
    }

    /// The `TypeInfo` expression of the enum.
    pub fn to_info_tokens(&self) -> TokenStream {
        let fb_persist_path = self.meta.fb_persist_path();
        let type_info_ = crate::path::type_info_(fb_persist_path);
        let scalar_kind_ = crate::path::scalar_kind_(fb_persist_path);
        let markers = self.meta.markers_expression();

        quote! {
            #type_info_::primitive::<Self>(#scalar_kind_::Enum).with_markers(#markers)
        }
    }
}
