//! Notifier contracts: what a channel transport and its factory must provide.

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::domain::{Message, SentMessage};
use crate::factory::{Dsn, DsnError};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A configured channel able to deliver some kinds of [`Message`].
///
/// `Display` renders the transport descriptor, without credentials.
pub trait Transport: fmt::Display + Send + Sync {
    type Error: StdError + Send + Sync + 'static;

    /// Whether this transport can deliver `message`.
    fn supports(&self, message: &Message) -> bool;

    /// Deliver `message`, returning the provider's receipt.
    fn send(&self, message: Message) -> BoxFuture<'_, Result<SentMessage, Self::Error>>;
}

/// Builds a [`Transport`] out of a connection descriptor.
pub trait TransportFactory: Send + Sync {
    type Transport: Transport;

    /// DSN schemes this factory handles.
    fn supported_schemes(&self) -> &'static [&'static str];

    fn supports(&self, dsn: &Dsn) -> bool {
        self.supported_schemes().contains(&dsn.scheme())
    }

    fn create(&self, dsn: &Dsn) -> Result<Self::Transport, DsnError>;
}
