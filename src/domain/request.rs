use crate::domain::validation::ValidationError;
use crate::domain::value::RawPhoneNumber;

/// Longest plain body D7 accepts, in bytes.
pub const MAX_CONTENT_LENGTH: usize = 765;

/// D7 `coding` value for UCS-2 encoded bodies.
pub const UNICODE_CODING: u8 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
/// A message handed to a notifier transport.
pub enum Message {
    Sms(SmsMessage),
    Chat(ChatMessage),
}

impl Message {
    /// Short name of the message kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Sms(_) => "sms",
            Self::Chat(_) => "chat",
        }
    }
}

impl From<SmsMessage> for Message {
    fn from(value: SmsMessage) -> Self {
        Self::Sms(value)
    }
}

impl From<ChatMessage> for Message {
    fn from(value: ChatMessage) -> Self {
        Self::Chat(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Text message for a single recipient. The subject may be empty.
pub struct SmsMessage {
    phone: RawPhoneNumber,
    subject: String,
}

impl SmsMessage {
    pub fn new(
        phone: impl Into<String>,
        subject: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            phone: RawPhoneNumber::new(phone)?,
            subject: subject.into(),
        })
    }

    pub fn phone(&self) -> &RawPhoneNumber {
        &self.phone
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    subject: String,
}

impl ChatMessage {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Body of a D7 send request: either plain text or UCS-2 hex.
pub enum RequestContent {
    Plain { content: String },
    Unicode { hex_content: String, coding: u8 },
}
