//! Domain layer: strong types with validation and invariants (no I/O).

mod phone;
mod request;
mod response;
mod validation;
mod value;

pub use phone::{LibPhoneNumberFormatter, PhoneFormatter, normalize_recipient};
pub use request::{
    ChatMessage, MAX_CONTENT_LENGTH, Message, RequestContent, SmsMessage, UNICODE_CODING,
};
pub use response::SentMessage;
pub use validation::ValidationError;
pub use value::{AuthToken, PhoneNumber, RawPhoneNumber, Region, SenderId, is_e164};
