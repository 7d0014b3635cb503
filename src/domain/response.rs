use crate::domain::request::Message;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of a successful send.
pub struct SentMessage {
    /// The message as handed to the transport.
    pub original: Message,
    /// Descriptor of the transport that sent it (`d7://host?from=..&defaultLocale=..`).
    pub transport: String,
    /// Identifier assigned by D7.
    pub message_id: String,
}
