//! Attribute parsing for `#[cfgrant(...)]` annotations.
//!
//! Both attribute forms are rendered to the runtime tag grammar
//! (`arg:..,env:..,default:..` or `-`) during macro expansion.

use syn::{Field, LitStr};

const EXCLUDE: &str = "-";

/// Parsed `#[cfgrant(...)]` attributes from a struct field.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    /// Tag in runtime grammar, `None` when the field carries no attribute.
    pub tag: Option<String>,
}

#[derive(Default)]
struct Options {
    arg: Option<String>,
    env: Option<String>,
    default: Option<String>,
    skip: bool,
}

impl FieldAttrs {
    /// Extract and validate `#[cfgrant(...)]` attributes from a struct field.
    ///
    /// Accepts either a raw tag string, `#[cfgrant("env:NAME,default:x")]`, or
    /// the structured form `#[cfgrant(arg = "..", env = "..", default = "..")]`
    /// and `#[cfgrant(skip)]`. Mixing both forms on one field is rejected.
    pub fn from_field(field: &Field) -> syn::Result<Self> {
        let mut raw: Option<LitStr> = None;
        let mut options = Options::default();
        let mut structured = false;

        for attr in &field.attrs {
            if !attr.path().is_ident("cfgrant") {
                continue;
            }

            if let Ok(lit) = attr.parse_args::<LitStr>() {
                if raw.is_some() || structured {
                    return Err(syn::Error::new_spanned(
                        attr,
                        "only one cfgrant tag is allowed per field",
                    ));
                }
                validate_tag(&lit)?;
                raw = Some(lit);
                continue;
            }

            if raw.is_some() {
                return Err(syn::Error::new_spanned(
                    attr,
                    "cannot combine a cfgrant tag string with cfgrant options",
                ));
            }
            structured = true;

            attr.parse_nested_meta(|meta| {
                // skip
                if meta.path.is_ident("skip") {
                    options.skip = true;
                    return Ok(());
                }

                // arg = "...", env = "...", default = "..."
                let slot = if meta.path.is_ident("arg") {
                    &mut options.arg
                } else if meta.path.is_ident("env") {
                    &mut options.env
                } else if meta.path.is_ident("default") {
                    &mut options.default
                } else {
                    return Err(meta.error("unsupported cfgrant attribute"));
                };

                let value: LitStr = meta.value()?.parse()?;
                if value.value().contains(',') {
                    return Err(syn::Error::new_spanned(
                        &value,
                        "cfgrant values cannot contain ','",
                    ));
                }
                *slot = Some(value.value());
                Ok(())
            })?;
        }

        let tag = match raw {
            Some(lit) => Some(lit.value()),
            None if structured => Some(options.render()),
            None => None,
        };

        Ok(Self { tag })
    }

    /// True when the field is excluded from binding.
    pub fn is_excluded(&self) -> bool {
        self.tag.as_deref() == Some(EXCLUDE)
    }
}

impl Options {
    fn render(&self) -> String {
        if self.skip {
            return EXCLUDE.to_string();
        }

        [
            ("arg", &self.arg),
            ("env", &self.env),
            ("default", &self.default),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_ref().map(|value| format!("{key}:{value}")))
        .collect::<Vec<_>>()
        .join(",")
    }
}

/// Reject options without a `:` at compile time.
fn validate_tag(lit: &LitStr) -> syn::Result<()> {
    let tag = lit.value();
    if tag.is_empty() || tag == EXCLUDE {
        return Ok(());
    }

    match tag.split(',').find(|option| !option.contains(':')) {
        Some(option) => Err(syn::Error::new_spanned(
            lit,
            format!("malformed cfgrant option '{option}', expected key:value"),
        )),
        None => Ok(()),
    }
}
