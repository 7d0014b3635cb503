//! Factory layer: turns a `d7://` DSN into a configured [`D7Transport`].

mod dsn;

use std::sync::Arc;

pub use dsn::{Dsn, DsnError};

use crate::client::{D7Transport, HttpTransport, ReqwestTransport};
use crate::domain::{AuthToken, LibPhoneNumberFormatter, PhoneFormatter, Region, SenderId};
use crate::notifier::TransportFactory;

/// DSN option toggling UCS-2 bodies (default `true`).
pub const ALLOW_UNICODE_OPTION: &str = "allowUnicode";

/// Host placeholder meaning "use the D7 default host".
pub const DEFAULT_HOST_PLACEHOLDER: &str = "default";

#[derive(Clone)]
/// Builds [`D7Transport`]s from DSNs such as
/// `d7://TOKEN@default?from=MyBrand&defaultLocale=AU&allowUnicode=1`.
///
/// Every transport it creates shares one HTTP client and phone formatter.
pub struct D7TransportFactory {
    http: Arc<dyn HttpTransport>,
    phone_formatter: Option<Arc<dyn PhoneFormatter>>,
}

impl D7TransportFactory {
    pub const SCHEME: &'static str = "d7";

    /// Factory with a default HTTP client and the `phonenumber` formatter.
    pub fn new() -> Self {
        Self::with_http_client(reqwest::Client::new())
    }

    /// Factory whose transports share `client` (timeouts, proxies, user-agent...).
    pub fn with_http_client(client: reqwest::Client) -> Self {
        Self {
            http: Arc::new(ReqwestTransport::new(client)),
            phone_formatter: Some(Arc::new(LibPhoneNumberFormatter)),
        }
    }

    pub fn phone_formatter(mut self, formatter: Arc<dyn PhoneFormatter>) -> Self {
        self.phone_formatter = Some(formatter);
        self
    }

    /// Created transports require recipients to already be E.164.
    pub fn without_phone_formatter(mut self) -> Self {
        self.phone_formatter = None;
        self
    }

    /// Parse `dsn` and create a transport from it.
    pub fn create_from_str(&self, dsn: &str) -> Result<D7Transport, DsnError> {
        self.create(&Dsn::parse(dsn)?)
    }
}

impl Default for D7TransportFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl TransportFactory for D7TransportFactory {
    type Transport = D7Transport;

    fn supported_schemes(&self) -> &'static [&'static str] {
        &[Self::SCHEME]
    }

    fn create(&self, dsn: &Dsn) -> Result<D7Transport, DsnError> {
        if dsn.scheme() != Self::SCHEME {
            return Err(DsnError::UnsupportedScheme {
                scheme: dsn.scheme().to_owned(),
                supported: self.supported_schemes(),
            });
        }

        let auth_token = AuthToken::new(dsn.user().ok_or(DsnError::MissingUser)?)?;
        let from = dsn.required_option(SenderId::FIELD)?;
        let locale = dsn.required_option(Region::FIELD)?;
        let default_locale = Region::new(locale).map_err(|err| DsnError::InvalidOption {
            option: Region::FIELD.to_owned(),
            value: locale.to_owned(),
            reason: err.to_string(),
        })?;
        let allow_unicode = dsn.bool_option(ALLOW_UNICODE_OPTION, true)?;

        let host = match dsn.host() {
            DEFAULT_HOST_PLACEHOLDER => None,
            host => Some(host.to_owned()),
        };

        tracing::debug!(
            host = host.as_deref().unwrap_or(D7Transport::HOST),
            port = ?dsn.port(),
            from,
            allow_unicode,
            "creating D7 transport"
        );

        Ok(D7Transport::builder(auth_token, from, default_locale)
            .allow_unicode(allow_unicode)
            .host(host)
            .port(dsn.port())
            .set_phone_formatter(self.phone_formatter.clone())
            .assemble(Arc::clone(&self.http)))
    }
}

#[cfg(test)]
mod tests {
    use crate::client::D7Error;
    use crate::client::tests::{FakeTransport, FixedFormatter};
    use crate::domain::{SmsMessage, ValidationError};
    use crate::notifier::Transport;

    use super::*;

    fn make_factory(transport: FakeTransport) -> D7TransportFactory {
        D7TransportFactory {
            http: Arc::new(transport),
            phone_formatter: Some(Arc::new(LibPhoneNumberFormatter)),
        }
    }

    fn factory() -> D7TransportFactory {
        make_factory(FakeTransport::new(200, "{}"))
    }

    #[test]
    fn create_renders_descriptor_without_credential() {
        let transport = factory()
            .create_from_str("d7://authToken@host.test?from=0611223344&defaultLocale=AU")
            .unwrap();
        assert_eq!(
            transport.to_string(),
            "d7://host.test?from=0611223344&defaultLocale=AU"
        );
    }

    #[test]
    fn default_host_placeholder_uses_d7_host() {
        let transport = factory()
            .create_from_str("d7://authToken@default?from=0611223344&defaultLocale=AU")
            .unwrap();
        assert_eq!(transport.config().host, None);
        assert_eq!(
            transport.to_string(),
            "d7://rest-api.d7networks.com?from=0611223344&defaultLocale=AU"
        );
    }

    #[test]
    fn port_is_applied() {
        let transport = factory()
            .create_from_str("d7://authToken@host.test:8443?from=0611223344&defaultLocale=AU")
            .unwrap();
        assert_eq!(transport.config().port, Some(8443));
        assert_eq!(
            transport.to_string(),
            "d7://host.test:8443?from=0611223344&defaultLocale=AU"
        );
    }

    #[test]
    fn supports_only_d7_scheme() {
        let factory = factory();
        let d7 = Dsn::parse("d7://authToken@default?from=0611223344&defaultLocale=AU").unwrap();
        let other =
            Dsn::parse("somethingElse://authToken@default?from=0611223344&defaultLocale=AU")
                .unwrap();
        assert!(factory.supports(&d7));
        assert!(!factory.supports(&other));
        assert_eq!(factory.supported_schemes(), &["d7"]);
    }

    #[test]
    fn unsupported_scheme_wins_over_missing_options() {
        for dsn in [
            "somethingElse://authToken@default?from=0611223344",
            "somethingElse://authToken@default",
            "somethingElse://authToken@default?defaultLocale=AU",
        ] {
            let err = factory().create_from_str(dsn).unwrap_err();
            assert!(matches!(err, DsnError::UnsupportedScheme { .. }), "{dsn}");
        }
    }

    #[test]
    fn missing_required_options_are_reported() {
        let err = factory()
            .create_from_str("d7://authToken@default")
            .unwrap_err();
        assert!(matches!(
            err,
            DsnError::MissingOption { ref option } if option == "from"
        ));

        let err = factory()
            .create_from_str("d7://authToken@default?from=0611223344")
            .unwrap_err();
        assert!(matches!(
            err,
            DsnError::MissingOption { ref option } if option == "defaultLocale"
        ));
    }

    #[test]
    fn missing_credential_is_reported() {
        let err = factory()
            .create_from_str("d7://default?from=0611223344&defaultLocale=AU")
            .unwrap_err();
        assert!(matches!(err, DsnError::MissingUser));
    }

    #[test]
    fn unknown_locale_is_an_invalid_option() {
        let err = factory()
            .create_from_str("d7://authToken@default?from=0611223344&defaultLocale=XX1")
            .unwrap_err();
        assert!(matches!(
            err,
            DsnError::InvalidOption { ref option, .. } if option == "defaultLocale"
        ));
    }

    #[test]
    fn allow_unicode_defaults_to_true_and_is_parsed() {
        let transport = factory()
            .create_from_str("d7://authToken@default?from=sender&defaultLocale=AU")
            .unwrap();
        assert!(transport.config().allow_unicode);

        let transport = factory()
            .create_from_str("d7://authToken@default?from=sender&defaultLocale=AU&allowUnicode=0")
            .unwrap();
        assert!(!transport.config().allow_unicode);

        let err = factory()
            .create_from_str(
                "d7://authToken@default?from=sender&defaultLocale=AU&allowUnicode=perhaps",
            )
            .unwrap_err();
        assert!(matches!(
            err,
            DsnError::InvalidOption { ref option, .. } if option == ALLOW_UNICODE_OPTION
        ));
    }

    #[test]
    fn sender_id_is_not_checked_at_creation() {
        let transport = factory()
            .create_from_str("d7://authToken@default?from=a&defaultLocale=AU")
            .unwrap();
        assert_eq!(transport.config().sender_id, "a");
    }

    #[tokio::test]
    async fn created_transport_sends_through_shared_client() {
        let fake = FakeTransport::new(
            200,
            r#"{"data":"Success \"7ed74619-8af4-4434-a7e0-0927ce272f8c","message":"foo"}"#,
        );
        let transport = make_factory(fake.clone())
            .create_from_str("d7://secret@host.test?from=MyBrand&defaultLocale=FR")
            .unwrap();

        let message = SmsMessage::new("06 12 34 56 78", "Bonjour").unwrap();
        let sent = transport.send(message.into()).await.unwrap();
        assert_eq!(sent.message_id, "7ed74619-8af4-4434-a7e0-0927ce272f8c");
        assert_eq!(
            sent.transport,
            "d7://host.test?from=MyBrand&defaultLocale=FR"
        );

        let (url, authorization, body) = fake.last_request().unwrap();
        assert_eq!(url, "https://host.test/secure/send");
        assert_eq!(authorization, "Basic secret");
        assert_eq!(body["to"], "+33 6 12 34 56 78");
    }

    #[tokio::test]
    async fn percent_encoded_credential_is_sent_decoded() {
        let fake = FakeTransport::new(200, r#"{"data":"Success \"abc"}"#);
        let transport = make_factory(fake.clone())
            .create_from_str("d7://dXNlcjpwYXNz=@default?from=MyBrand&defaultLocale=AU")
            .unwrap();

        transport
            .send(SmsMessage::new("+33612345678", "Hello!").unwrap().into())
            .await
            .unwrap();
        let (_, authorization, _) = fake.last_request().unwrap();
        assert_eq!(authorization, "Basic dXNlcjpwYXNz=");
    }

    #[tokio::test]
    async fn injected_formatter_is_shared_with_created_transports() {
        let fake = FakeTransport::new(200, r#"{"data":"Success \"abc"}"#);
        let formatter = FixedFormatter::new(Ok("+1 555".to_owned()));
        let factory = make_factory(fake.clone()).phone_formatter(Arc::new(formatter.clone()));
        let transport = factory
            .create_from_str("d7://secret@default?from=MyBrand&defaultLocale=FR")
            .unwrap();

        transport
            .send(SmsMessage::new("06 12 34 56 78", "Bonjour").unwrap().into())
            .await
            .unwrap();
        let (_, _, body) = fake.last_request().unwrap();
        assert_eq!(body["to"], "+1 555");
        assert_eq!(
            formatter.calls(),
            vec![("06 12 34 56 78".to_owned(), "FR".to_owned())]
        );

        let failing = make_factory(FakeTransport::new(200, "{}")).phone_formatter(Arc::new(
            FixedFormatter::new(Err(ValidationError::InvalidPhoneNumber {
                input: "06".to_owned(),
            })),
        ));
        let err = failing
            .create_from_str("d7://secret@default?from=MyBrand&defaultLocale=FR")
            .unwrap()
            .send(SmsMessage::new("06", "Bonjour").unwrap().into())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            D7Error::Validation(ValidationError::InvalidPhoneNumber { .. })
        ));
    }

    #[tokio::test]
    async fn invalid_sender_fails_on_send() {
        let transport = factory()
            .without_phone_formatter()
            .create_from_str("d7://authToken@default?from=a&defaultLocale=AU")
            .unwrap();
        let err = transport
            .send(SmsMessage::new("+33612345678", "Hello!").unwrap().into())
            .await
            .unwrap_err();
        assert!(matches!(err, D7Error::Validation(_)));
    }
}
