//! Document snapshots and change events.

use crate::values::{FieldMap, Timestamp};

/// A single document snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    /// Full resource name of the document
    pub name: String,
    /// Document contents, in source order
    pub fields: FieldMap,
    /// When the document was created (if known)
    pub create_time: Option<Timestamp>,
    /// When the document was last changed (if known)
    pub update_time: Option<Timestamp>,
}

impl Document {
    /// Create a document without timing metadata.
    pub fn new(name: impl Into<String>, fields: FieldMap) -> Self {
        Self {
            name: name.into(),
            fields,
            create_time: None,
            update_time: None,
        }
    }
}

/// What kind of mutation a [`ChangeEvent`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Only a current snapshot: the document was created
    Created,
    /// Both snapshots: the document was updated
    Updated,
    /// Only a previous snapshot: the document was deleted
    Deleted,
    /// Neither snapshot
    Empty,
}

/// A document mutation: the state after the change and the state before it.
///
/// Either side may be absent. Creation has no previous state, deletion has no
/// current state, and an event with neither is still valid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChangeEvent {
    /// Document state after the change
    pub current: Option<Document>,
    /// Document state before the change
    pub previous: Option<Document>,
    /// Field paths touched by an update (empty when not provided)
    pub update_mask: Vec<String>,
}

impl ChangeEvent {
    pub fn new(current: Option<Document>, previous: Option<Document>) -> Self {
        Self {
            current,
            previous,
            update_mask: Vec::new(),
        }
    }

    /// Fields of the current snapshot, if present.
    pub fn current_fields(&self) -> Option<&FieldMap> {
        self.current.as_ref().map(|doc| &doc.fields)
    }

    /// Fields of the previous snapshot, if present.
    pub fn previous_fields(&self) -> Option<&FieldMap> {
        self.previous.as_ref().map(|doc| &doc.fields)
    }

    pub fn kind(&self) -> ChangeKind {
        match (&self.current, &self.previous) {
            (Some(_), None) => ChangeKind::Created,
            (Some(_), Some(_)) => ChangeKind::Updated,
            (None, Some(_)) => ChangeKind::Deleted,
            (None, None) => ChangeKind::Empty,
        }
    }

    /// Resource name of the affected document, preferring the current snapshot.
    pub fn document_name(&self) -> Option<&str> {
        self.current
            .as_ref()
            .or(self.previous.as_ref())
            .map(|doc| doc.name.as_str())
    }
}
