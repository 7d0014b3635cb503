//! Client layer: validates, encodes and dispatches sends, and maps responses to results.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

use crate::domain::{
    AuthToken, LibPhoneNumberFormatter, Message, PhoneFormatter, Region, RequestContent,
    SenderId, SentMessage, SmsMessage, ValidationError, normalize_recipient,
};
use crate::notifier::{BoxFuture, Transport};

const DEFAULT_HOST: &str = "rest-api.d7networks.com";
const SEND_PATH: &str = "/secure/send";

#[derive(Debug, Clone)]
pub(crate) struct HttpResponse {
    pub(crate) status: u16,
    pub(crate) body: String,
}

pub(crate) trait HttpTransport: Send + Sync {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        authorization: String,
        body: Value,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
pub(crate) struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub(crate) fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        authorization: String,
        body: Value,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self
                .client
                .post(url)
                .header(CONTENT_TYPE, "application/json")
                .header(AUTHORIZATION, authorization)
                .json(&body)
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`D7Transport`].
///
/// Validation failures keep their own message so they can be shown to users as-is.
pub enum D7Error {
    /// The message kind is not something D7 can deliver.
    #[error("{transport} only supports sms messages, got {actual}")]
    UnsupportedMessageType {
        transport: String,
        actual: &'static str,
    },

    /// Sender id, recipient, or body were rejected before anything was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// DNS, TLS, connect, or body read failure.
    #[error("Could not reach remote D7 service.")]
    Unreachable(#[source] Box<dyn StdError + Send + Sync>),

    /// D7 answered with a 4xx status.
    #[error(
        "Unable to send SMS. {status}: {}",
        .message.as_deref().unwrap_or("no error message")
    )]
    Rejected { status: u16, message: Option<String> },

    /// D7 answered with any other status outside `200..=208`.
    #[error("Unable to send SMS: Status {status}")]
    Failed { status: u16, body: Option<String> },

    /// Success response body could not be decoded.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// The HTTP client could not be constructed.
    #[error("HTTP client setup failed: {0}")]
    Setup(#[source] Box<dyn StdError + Send + Sync>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// D7 transport configuration. Read-only once the transport is built.
///
/// `sender_id` is kept unvalidated; it is checked on every send.
pub struct TransportConfig {
    pub auth_token: AuthToken,
    pub sender_id: String,
    pub default_locale: Region,
    pub allow_unicode: bool,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl TransportConfig {
    /// Configuration with unicode allowed and the default D7 host.
    pub fn new(auth_token: AuthToken, sender_id: impl Into<String>, default_locale: Region) -> Self {
        Self {
            auth_token,
            sender_id: sender_id.into(),
            default_locale,
            allow_unicode: true,
            host: None,
            port: None,
        }
    }

    /// `host[:port]`, falling back to [`D7Transport::HOST`].
    pub fn endpoint(&self) -> String {
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        match self.port {
            Some(port) => format!("{host}:{port}"),
            None => host.to_owned(),
        }
    }
}

#[derive(Clone)]
/// Builder for [`D7Transport`].
///
/// Use this when you need a custom host, timeout, user-agent or phone formatter.
pub struct D7TransportBuilder {
    config: TransportConfig,
    phone_formatter: Option<Arc<dyn PhoneFormatter>>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl D7TransportBuilder {
    /// Create a builder with unicode allowed, the default host and the `phonenumber` formatter.
    pub fn new(config: TransportConfig) -> Self {
        Self {
            config,
            phone_formatter: Some(Arc::new(LibPhoneNumberFormatter)),
            timeout: None,
            user_agent: None,
        }
    }

    /// Allow non-ASCII bodies to be sent as UCS-2 (default `true`).
    pub fn allow_unicode(mut self, allow_unicode: bool) -> Self {
        self.config.allow_unicode = allow_unicode;
        self
    }

    /// Override the D7 host. `None` restores the default.
    pub fn host(mut self, host: Option<String>) -> Self {
        self.config.host = host;
        self
    }

    pub fn port(mut self, port: Option<u16>) -> Self {
        self.config.port = port;
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Replace the recipient formatter.
    pub fn phone_formatter(mut self, formatter: Arc<dyn PhoneFormatter>) -> Self {
        self.phone_formatter = Some(formatter);
        self
    }

    /// Send recipients as given; they must then already be E.164.
    pub fn without_phone_formatter(mut self) -> Self {
        self.phone_formatter = None;
        self
    }

    pub(crate) fn set_phone_formatter(mut self, formatter: Option<Arc<dyn PhoneFormatter>>) -> Self {
        self.phone_formatter = formatter;
        self
    }

    /// Build a [`D7Transport`] with its own HTTP client.
    pub fn build(self) -> Result<D7Transport, D7Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent.as_deref() {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| D7Error::Setup(Box::new(err)))?;

        Ok(self.assemble(Arc::new(ReqwestTransport::new(client))))
    }

    pub(crate) fn assemble(self, http: Arc<dyn HttpTransport>) -> D7Transport {
        D7Transport {
            config: self.config,
            phone_formatter: self.phone_formatter,
            http,
        }
    }
}

#[derive(Clone)]
/// SMS transport for the D7 Networks REST API.
///
/// Each send validates the sender id, formats the recipient, picks plain or UCS-2
/// content, and posts JSON to `https://<host>/secure/send`.
pub struct D7Transport {
    config: TransportConfig,
    phone_formatter: Option<Arc<dyn PhoneFormatter>>,
    http: Arc<dyn HttpTransport>,
}

impl D7Transport {
    /// Default D7 REST API host.
    pub const HOST: &'static str = DEFAULT_HOST;

    /// Create a transport with a default HTTP client and the `phonenumber` formatter.
    ///
    /// For more customization, use [`D7Transport::builder`].
    pub fn new(config: TransportConfig) -> Self {
        D7TransportBuilder::new(config)
            .assemble(Arc::new(ReqwestTransport::new(reqwest::Client::new())))
    }

    /// Start building a transport with custom settings.
    pub fn builder(
        auth_token: AuthToken,
        sender_id: impl Into<String>,
        default_locale: Region,
    ) -> D7TransportBuilder {
        D7TransportBuilder::new(TransportConfig::new(auth_token, sender_id, default_locale))
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// `host[:port]` the transport posts to.
    pub fn endpoint(&self) -> String {
        self.config.endpoint()
    }

    /// Send an SMS through D7.
    ///
    /// Errors:
    /// - [`D7Error::Validation`] for a bad sender id, recipient, or an over-long body,
    /// - [`D7Error::Unreachable`] when the request does not complete,
    /// - [`D7Error::Rejected`] for 4xx and [`D7Error::Failed`] for other non-success statuses,
    /// - [`D7Error::Parse`] when the success body carries no message id.
    pub async fn send_sms(&self, message: SmsMessage) -> Result<SentMessage, D7Error> {
        let from = SenderId::parse(self.config.sender_id.as_str())?;
        let to = normalize_recipient(
            self.phone_formatter.as_deref(),
            message.phone(),
            &self.config.default_locale,
        )?;
        let content =
            crate::transport::encode_request_content(message.subject(), self.config.allow_unicode)?;
        let unicode = matches!(content, RequestContent::Unicode { .. });
        let body = crate::transport::encode_send_sms_json(&from, &to, &content);

        let url = format!("https://{}{SEND_PATH}", self.endpoint());
        tracing::debug!(%url, unicode, "sending SMS through D7");

        let response = self
            .http
            .post_json(
                &url,
                format!("Basic {}", self.config.auth_token.as_str()),
                body,
            )
            .await
            .map_err(D7Error::Unreachable)?;

        if !(200..=208).contains(&response.status) {
            let status = response.status;
            if (400..=499).contains(&status) {
                let message = crate::transport::decode_error_message(&response.body);
                tracing::warn!(status, message = ?message, "D7 rejected SMS");
                return Err(D7Error::Rejected { status, message });
            }

            tracing::warn!(status, "D7 send failed");
            let body = if response.body.trim().is_empty() {
                None
            } else {
                Some(response.body)
            };
            return Err(D7Error::Failed { status, body });
        }

        let message_id = crate::transport::decode_send_sms_json_response(&response.body)
            .map_err(|err| D7Error::Parse(Box::new(err)))?;
        tracing::debug!(%message_id, "D7 accepted SMS");

        Ok(SentMessage {
            original: Message::Sms(message),
            transport: self.to_string(),
            message_id,
        })
    }
}

impl Transport for D7Transport {
    type Error = D7Error;

    fn supports(&self, message: &Message) -> bool {
        matches!(message, Message::Sms(_))
    }

    fn send(&self, message: Message) -> BoxFuture<'_, Result<SentMessage, D7Error>> {
        Box::pin(async move {
            match message {
                Message::Sms(sms) => self.send_sms(sms).await,
                other => Err(D7Error::UnsupportedMessageType {
                    transport: self.to_string(),
                    actual: other.kind(),
                }),
            }
        })
    }
}

impl fmt::Display for D7Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "d7://{}?from={}&defaultLocale={}",
            self.endpoint(),
            self.config.sender_id,
            self.config.default_locale
        )
    }
}

impl fmt::Debug for D7Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("D7Transport")
            .field("config", &self.config)
            .field("phone_formatter", &self.phone_formatter.is_some())
            .finish_non_exhaustive()
    }
}
