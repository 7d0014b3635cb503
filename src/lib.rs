//! D7 Networks SMS transport for a pluggable notifier.
//!
//! The crate has a domain layer of strong types, a transport layer for wire-format
//! quirks, a client layer that sends, and a factory that builds configured transports
//! from `d7://` DSNs. [`notifier`] holds the contracts other channels implement too.
//!
//! ```rust,no_run
//! use d7_notifier::{D7TransportFactory, SmsMessage, Transport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = D7TransportFactory::new()
//!         .create_from_str("d7://TOKEN@default?from=MyBrand&defaultLocale=AU")?;
//!     let message = SmsMessage::new("0412 345 678", "hello")?;
//!     let sent = transport.send(message.into()).await?;
//!     println!("{}", sent.message_id);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
pub mod factory;
pub mod notifier;
mod transport;

pub use client::{D7Error, D7Transport, D7TransportBuilder, TransportConfig};
pub use domain::{
    AuthToken, ChatMessage, LibPhoneNumberFormatter, Message, PhoneFormatter, PhoneNumber,
    RawPhoneNumber, Region, SenderId, SentMessage, SmsMessage, ValidationError,
};
pub use factory::{D7TransportFactory, Dsn, DsnError};
pub use notifier::{Transport, TransportFactory};
pub use transport::TransportError;
