use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::{Attribute, Ident, LitBool, LitStr};

use crate::PERSIST_ATTRIBUTE_NAME;

// -----------------------------------------------------------------------------
// Type attributes

/// Category names accepted by `#[persist(ignored = ...)]`, with the
/// matching `IgnoreReason` variant.
const IGNORE_REASONS: [(&str, &str); 5] = [
    ("scene_handle", "SceneHandle"),
    ("resource", "Resource"),
    ("callback", "Callback"),
    ("coroutine", "Coroutine"),
    ("synthesized", "Synthesized"),
];

/// Controls whether a trait implementation is generated.
#[derive(Debug)]
pub(crate) struct ImplSwitches {
    pub impl_type_path: bool,
    pub impl_typed: bool,
    pub impl_get_type_meta: bool,
    /// Only takes effect for named and unit structs.
    pub impl_composite: bool,
}

impl Default for ImplSwitches {
    #[inline]
    fn default() -> Self {
        Self {
            impl_type_path: true,
            impl_typed: true,
            impl_get_type_meta: true,
            impl_composite: true,
        }
    }
}

/// Standard and crate traits declared available with flags.
#[derive(Default, Debug)]
pub(crate) struct AvailableTraits {
    pub default: Option<Span>,
    pub clone: Option<Span>,
    pub post_restore: Option<Span>,
}

#[derive(Default, Debug)]
pub(crate) struct TypeAttributes {
    pub type_path: Option<LitStr>,
    pub exclusive: bool,
    pub always_save: bool,
    /// `IgnoreReason` variant name.
    pub ignored: Option<Ident>,
    pub opaque: Option<Span>,
    pub auto_register: Option<Span>,
    pub avail_traits: AvailableTraits,
    pub impl_switches: ImplSwitches,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();
        for attr in attrs {
            if attr.path().is_ident(PERSIST_ATTRIBUTE_NAME) {
                attr.parse_nested_meta(|meta| out.parse_meta(meta))?;
            }
        }
        Ok(out)
    }

    fn parse_meta(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        let Some(ident) = meta.path.get_ident() else {
            return Err(meta.error("expected an identifier"));
        };
        let span = ident.span();

        match ident.to_string().as_str() {
            "type_path" => self.type_path = Some(meta.value()?.parse()?),
            "exclusive" => self.exclusive = true,
            "always_save" => self.always_save = true,
            "ignored" => {
                let reason: Ident = meta.value()?.parse()?;
                let name = reason.to_string();
                let Some((_, variant)) = IGNORE_REASONS.iter().find(|(key, _)| *key == name)
                else {
                    let expected = IGNORE_REASONS.map(|(key, _)| key).join(", ");
                    return Err(syn::Error::new(
                        reason.span(),
                        format!("unknown ignore reason `{name}`, expected one of: {expected}"),
                    ));
                };
                self.ignored = Some(Ident::new(variant, reason.span()));
            }
            "opaque" => self.opaque = Some(span),
            "auto_register" => self.auto_register = Some(span),
            "default" => self.avail_traits.default = Some(span),
            "clone" => self.avail_traits.clone = Some(span),
            "post_restore" => self.avail_traits.post_restore = Some(span),
            "TypePath" => self.impl_switches.impl_type_path = parse_switch(&meta)?,
            "Typed" => self.impl_switches.impl_typed = parse_switch(&meta)?,
            "GetTypeMeta" => self.impl_switches.impl_get_type_meta = parse_switch(&meta)?,
            "Composite" => self.impl_switches.impl_composite = parse_switch(&meta)?,
            "save" | "skip" | "ignore" | "base" => {
                return Err(meta.error(format!("`{ident}` is a field attribute")));
            }
            _ => return Err(meta.error(format!("unknown persist attribute `{ident}`"))),
        }
        Ok(())
    }
}

fn parse_switch(meta: &ParseNestedMeta) -> syn::Result<bool> {
    let value: LitBool = meta.value()?.parse()?;
    Ok(value.value)
}

// -----------------------------------------------------------------------------
// Field attributes

#[derive(Default, Debug)]
pub(crate) struct FieldAttributes {
    pub save: bool,
    pub skip: bool,
    pub ignore: Option<Span>,
    pub base: Option<Span>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut out = Self::default();
        for attr in attrs {
            if attr.path().is_ident(PERSIST_ATTRIBUTE_NAME) {
                attr.parse_nested_meta(|meta| out.parse_meta(meta))?;
            }
        }

        if let (Some(span), true) = (out.base, out.save || out.skip || out.ignore.is_some()) {
            return Err(syn::Error::new(
                span,
                "`base` cannot be combined with other field attributes",
            ));
        }
        Ok(out)
    }

    fn parse_meta(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        let Some(ident) = meta.path.get_ident() else {
            return Err(meta.error("expected an identifier"));
        };

        match ident.to_string().as_str() {
            "save" => self.save = true,
            "skip" => self.skip = true,
            "ignore" => self.ignore = Some(ident.span()),
            "base" => self.base = Some(ident.span()),
            _ => return Err(meta.error(format!("unknown persist field attribute `{ident}`"))),
        }
        Ok(())
    }
}
