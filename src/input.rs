//! The three shapes a change event can arrive in.

use event_core::ChangeEvent;

/// Input accepted by the [`ChangeEventConverter`](crate::ChangeEventConverter)
/// entry points.
///
/// Bytes and events convert with `.into()`. Base64 text has to be marked
/// explicitly with [`EventInput::base64`], since a `&str` could equally be
/// meant as raw bytes.
#[derive(Debug, Clone, Copy)]
pub enum EventInput<'a> {
    /// Already decoded
    Decoded(&'a ChangeEvent),
    /// Protobuf-encoded `DocumentEventData`
    Bytes(&'a [u8]),
    /// Base64 text of the protobuf encoding
    Base64(&'a str),
}

impl<'a> EventInput<'a> {
    pub fn base64(text: &'a str) -> Self {
        EventInput::Base64(text)
    }
}

impl<'a> From<&'a ChangeEvent> for EventInput<'a> {
    fn from(event: &'a ChangeEvent) -> Self {
        EventInput::Decoded(event)
    }
}

impl<'a> From<&'a [u8]> for EventInput<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        EventInput::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for EventInput<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        EventInput::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for EventInput<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        EventInput::Bytes(bytes)
    }
}
