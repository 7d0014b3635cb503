use std::io;

use d7_notifier::{D7TransportFactory, SmsMessage, Transport};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let dsn = std::env::var("D7_DSN").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "D7_DSN environment variable is required (d7://TOKEN@default?from=..&defaultLocale=..)",
        )
    })?;
    let phone = std::env::var("D7_PHONE").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "D7_PHONE environment variable is required",
        )
    })?;
    let text = std::env::var("D7_MESSAGE")
        .unwrap_or_else(|_| "Hello from the d7-notifier demo.".to_owned());

    let transport = D7TransportFactory::new().create_from_str(&dsn)?;
    let message = SmsMessage::new(phone, text)?;

    let sent = transport.send(message.into()).await?;
    println!("sent via {}: message id {}", sent.transport, sent.message_id);

    Ok(())
}
