//! `#[replica(...)]` attribute parsing

use syn::ext::IdentExt;
use syn::{Attribute, Ident, LitStr};

/// Case convention applied to member and variant names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum RenameRule {
    /// Names as written in source
    #[default]
    None,
    PascalCase,
    CamelCase,
    SnakeCase,
    ScreamingSnakeCase,
}

impl RenameRule {
    fn parse(lit: &LitStr) -> syn::Result<Self> {
        match lit.value().as_str() {
            "PascalCase" => Ok(Self::PascalCase),
            "camelCase" => Ok(Self::CamelCase),
            "snake_case" => Ok(Self::SnakeCase),
            "SCREAMING_SNAKE_CASE" => Ok(Self::ScreamingSnakeCase),
            other => Err(syn::Error::new_spanned(
                lit,
                format!(
                    "unknown rename rule `{other}`, expected one of \
                     PascalCase, camelCase, snake_case, SCREAMING_SNAKE_CASE"
                ),
            )),
        }
    }

    /// Rename a snake_case field name
    pub(crate) fn apply_to_field(self, field: &str) -> String {
        match self {
            Self::None | Self::SnakeCase => field.to_string(),
            Self::PascalCase => field.split('_').map(capitalize).collect(),
            Self::CamelCase => {
                let pascal: String = field.split('_').map(capitalize).collect();
                lowercase_first(&pascal)
            }
            Self::ScreamingSnakeCase => field.to_ascii_uppercase(),
        }
    }

    /// Rename a PascalCase variant name
    pub(crate) fn apply_to_variant(self, variant: &str) -> String {
        match self {
            Self::None | Self::PascalCase => variant.to_string(),
            Self::CamelCase => lowercase_first(variant),
            Self::SnakeCase => to_snake(variant),
            Self::ScreamingSnakeCase => to_snake(variant).to_ascii_uppercase(),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lowercase_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn to_snake(word: &str) -> String {
    let mut out = String::with_capacity(word.len() + 4);
    for (i, ch) in word.char_indices() {
        if ch.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Attributes on the deriving type
#[derive(Debug, Default)]
pub(crate) struct ContainerAttrs {
    pub(crate) rename_all: RenameRule,
}

/// Attributes on a field or variant
#[derive(Debug, Default)]
pub(crate) struct MemberAttrs {
    pub(crate) rename: Option<String>,
    pub(crate) skip: bool,
}

pub(crate) fn container_attrs(attrs: &[Attribute]) -> syn::Result<ContainerAttrs> {
    let mut out = ContainerAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("replica")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let value: LitStr = meta.value()?.parse()?;
                out.rename_all = RenameRule::parse(&value)?;
                Ok(())
            } else {
                Err(meta.error("unsupported container attribute, expected `rename_all`"))
            }
        })?;
    }
    Ok(out)
}

pub(crate) fn member_attrs(attrs: &[Attribute]) -> syn::Result<MemberAttrs> {
    let mut out = MemberAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("replica")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                out.rename = Some(value.value());
                Ok(())
            } else if meta.path.is_ident("skip") {
                out.skip = true;
                Ok(())
            } else {
                Err(meta.error("unsupported member attribute, expected `rename` or `skip`"))
            }
        })?;
    }
    Ok(out)
}

/// Member name of a named field after renaming
pub(crate) fn field_name(ident: &Ident, attrs: &MemberAttrs, rule: RenameRule) -> String {
    attrs
        .rename
        .clone()
        .unwrap_or_else(|| rule.apply_to_field(&ident.unraw().to_string()))
}

/// Scalar name of a unit variant after renaming
pub(crate) fn variant_name(ident: &Ident, attrs: &MemberAttrs, rule: RenameRule) -> String {
    attrs
        .rename
        .clone()
        .unwrap_or_else(|| rule.apply_to_variant(&ident.unraw().to_string()))
}
