//! Field descriptors: one bindable leaf of a record

use tracing::trace;

use crate::args::Args;
use crate::error::Error;
use crate::record::{FieldRef, Record};
use crate::resolve::{Resolved, Sources};
use crate::setter::{setter_for, Setter, Value};
use crate::slot::{Node, Slot};
use crate::tag::{Tag, EXCLUDE};

/// A configurable leaf field together with its sources and setter.
///
/// Built fresh for every binding pass and dropped afterwards.
pub struct Descriptor<'a> {
    path: String,
    sources: Sources,
    setter: Setter,
    slot: &'a mut dyn Slot,
}

/// A literal converted for one descriptor, not yet stored.
#[derive(Debug)]
pub struct Prepared {
    /// The literal and the source it was taken from
    pub resolved: Resolved,
    /// The converted literal
    pub value: Value,
}

/// Outcome of building one field.
pub enum Built<'a> {
    /// Private, excluded, or without storage
    Skipped,
    Leaf(Descriptor<'a>),
    Record {
        path: String,
        record: &'a mut dyn Record,
    },
}

/// Build the descriptor for `field`, located at `path`.
///
/// Private fields, fields without storage and fields tagged `-` are skipped
/// without being touched. Otherwise unset `Option` storage is allocated before
/// the field's shape is inspected, so nested optional records are walked too.
/// The tag of a nested record field is not used and therefore not parsed.
pub fn build<'a>(path: String, field: FieldRef<'a>) -> Result<Built<'a>, Error> {
    let member = match field.member {
        Some(member) if field.exported => member,
        _ => {
            trace!(field = %path, "skipping field without accessible storage");
            return Ok(Built::Skipped);
        }
    };

    if field.tag == Some(EXCLUDE) {
        trace!(field = %path, "skipping excluded field");
        return Ok(Built::Skipped);
    }

    let slot = match member.node() {
        Node::Record(record) => return Ok(Built::Record { path, record }),
        Node::Leaf(slot) => slot,
    };

    let sources = match Tag::parse(field.tag.unwrap_or_default()) {
        Ok(Tag::Bind(sources)) => sources,
        Ok(Tag::Exclude) => return Ok(Built::Skipped),
        Err(e) => {
            return Err(Error::TagFormat {
                field: path,
                option: e.option,
            })
        }
    };

    let setter = setter_for(&slot.kind()).map_err(|_| Error::UnsupportedType {
        field: path.clone(),
        type_name: slot.type_name().to_string(),
    })?;
    Ok(Built::Leaf(Descriptor {
        path,
        sources,
        setter,
        slot,
    }))
}

impl Descriptor<'_> {
    /// Dotted path of the field, e.g. `database.port`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Argument key, environment variable and default of the field.
    pub fn sources(&self) -> &Sources {
        &self.sources
    }

    /// True while the field still holds its type's zero value.
    pub fn is_zero(&self) -> bool {
        self.slot.is_zero()
    }

    /// Resolve and convert the literal for this field.
    ///
    /// Returns `None` when the field already holds a non-zero value or when no
    /// source yields a literal; the field is left as is in both cases.
    pub fn prepare(&self, args: &Args) -> Result<Option<Prepared>, Error> {
        if !self.is_zero() {
            trace!(field = %self.path, "keeping value provided by caller");
            return Ok(None);
        }

        let Some(resolved) = self.sources.resolve(args) else {
            trace!(field = %self.path, "no source configured or set");
            return Ok(None);
        };

        let value = self
            .setter
            .parse(&resolved.value)
            .map_err(|e| e.at(&self.path, resolved.source))?;
        Ok(Some(Prepared { resolved, value }))
    }

    /// Store a value produced by [`Descriptor::prepare`].
    pub fn commit(&mut self, prepared: Prepared) -> Result<(), Error> {
        let Prepared { resolved, value } = prepared;
        self.slot
            .store(value)
            .map_err(|e| e.at(&self.path, resolved.source))
    }
}

impl std::fmt::Debug for Descriptor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Descriptor")
            .field("path", &self.path)
            .field("sources", &self.sources)
            .field("setter", &self.setter)
            .field("type", &self.slot.type_name())
            .finish()
    }
}
