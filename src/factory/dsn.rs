use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use percent_encoding::percent_decode_str;
use url::Url;

use crate::domain::ValidationError;

#[derive(Debug, thiserror::Error)]
/// Errors raised while reading a DSN or turning it into a transport.
pub enum DsnError {
    #[error("invalid DSN \"{dsn}\": {source}")]
    Invalid {
        dsn: String,
        #[source]
        source: url::ParseError,
    },

    #[error("DSN \"{dsn}\" has no host")]
    MissingHost { dsn: String },

    #[error(
        "the \"{scheme}\" scheme is not supported; supported schemes are: \"{}\"",
        .supported.join("\", \"")
    )]
    UnsupportedScheme {
        scheme: String,
        supported: &'static [&'static str],
    },

    #[error("DSN is missing the user (credential) part")]
    MissingUser,

    #[error("DSN is missing the required option \"{option}\"")]
    MissingOption { option: String },

    #[error("invalid value \"{value}\" for option \"{option}\": {reason}")]
    InvalidOption {
        option: String,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Parsed connection descriptor: `scheme://user@host:port?option=value`.
///
/// The scheme is lower-cased. The user part and option values are percent-decoded.
pub struct Dsn {
    original: String,
    scheme: String,
    host: String,
    user: Option<String>,
    port: Option<u16>,
    options: BTreeMap<String, String>,
}

impl Dsn {
    pub fn parse(dsn: &str) -> Result<Self, DsnError> {
        let url = Url::parse(dsn).map_err(|source| DsnError::Invalid {
            dsn: dsn.to_owned(),
            source,
        })?;

        let host = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| DsnError::MissingHost {
                dsn: dsn.to_owned(),
            })?
            .to_owned();

        let user = match url.username() {
            "" => None,
            encoded => Some(
                percent_decode_str(encoded)
                    .decode_utf8()
                    .map_err(|err| DsnError::InvalidOption {
                        option: "user".to_owned(),
                        value: encoded.to_owned(),
                        reason: err.to_string(),
                    })?
                    .into_owned(),
            ),
        };

        let options = url
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        Ok(Self {
            original: dsn.to_owned(),
            scheme: url.scheme().to_owned(),
            host,
            user,
            port: url.port(),
            options,
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Credential part, if any.
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    pub fn required_option(&self, name: &str) -> Result<&str, DsnError> {
        self.option(name).ok_or_else(|| DsnError::MissingOption {
            option: name.to_owned(),
        })
    }

    /// Read a boolean option, accepting `1/true/on/yes` and `0/false/off/no/""`.
    pub fn bool_option(&self, name: &str, default: bool) -> Result<bool, DsnError> {
        let Some(value) = self.option(name) else {
            return Ok(default);
        };
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "on" | "yes" => Ok(true),
            "0" | "false" | "off" | "no" | "" => Ok(false),
            _ => Err(DsnError::InvalidOption {
                option: name.to_owned(),
                value: value.to_owned(),
                reason: "expected a boolean".to_owned(),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }
}

impl FromStr for Dsn {
    type Err = DsnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Dsn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}
