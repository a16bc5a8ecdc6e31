//! Core types for firestore-event-json.
//!
//! This crate provides the decoded, in-memory form of a document change event:
//!
//! - [`TypedValue`] - Tagged union holding one field's content
//! - [`FieldMap`] - Insertion-ordered mapping of field name to [`TypedValue`]
//! - [`Timestamp`] / [`GeoPoint`] - The two leaf payloads whose JSON form is pluggable
//! - [`Document`] - One document snapshot (fields plus metadata)
//! - [`ChangeEvent`] - Paired current/previous snapshots describing a mutation
//!
//! # Architecture
//!
//! ```text
//! event-core (this crate)
//!    │
//!    ├─── firestore-types  (decodes wire bytes into ChangeEvent)
//!    │
//!    └─── json-types       (converts TypedValue / FieldMap into JSON)
//! ```
//!
//! # Example
//!
//! ```rust
//! use event_core::{Document, FieldMap, TypedValue};
//!
//! let mut fields = FieldMap::new();
//! fields.insert("title".to_string(), TypedValue::string("hello"));
//! fields.insert("count".to_string(), TypedValue::Integer(3));
//!
//! let doc = Document::new("projects/p/databases/(default)/documents/posts/1", fields);
//! assert_eq!(doc.fields.len(), 2);
//! ```

pub mod event;
pub mod values;

pub use event::{ChangeEvent, ChangeKind, Document};
pub use values::{FieldMap, GeoPoint, Timestamp, TypedValue};
