//! Records: structs whose fields are bound

use crate::slot::Member;

/// A struct whose fields can be bound.
///
/// Usually derived with `#[derive(Configrant)]`, which lists every named field
/// in declaration order. Hand-written implementations must list fields the
/// same way and hand out disjoint `&mut` borrows.
pub trait Record {
    fn fields(&mut self) -> Vec<FieldRef<'_>>;
}

/// One declared field of a record, as seen by the descriptor builder.
pub struct FieldRef<'a> {
    /// Field identifier as declared
    pub name: &'a str,
    /// Raw tag, `None` when the field carries no tag
    pub tag: Option<&'a str>,
    /// Whether the field is visible outside its module
    pub exported: bool,
    /// Storage of the field, `None` when it must never be touched
    pub member: Option<&'a mut dyn Member>,
}

impl<'a> FieldRef<'a> {
    /// An exported, untagged field.
    pub fn new(name: &'a str, member: &'a mut dyn Member) -> Self {
        Self {
            name,
            tag: None,
            exported: true,
            member: Some(member),
        }
    }

    /// A field without accessible storage; it is never bound.
    pub fn opaque(name: &'a str) -> Self {
        Self {
            name,
            tag: None,
            exported: false,
            member: None,
        }
    }

    pub fn with_tag(mut self, tag: &'a str) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn exported(mut self, exported: bool) -> Self {
        self.exported = exported;
        self
    }
}

impl std::fmt::Debug for FieldRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRef")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("exported", &self.exported)
            .field("member", &self.member.is_some())
            .finish()
    }
}
