use std::fmt;

use crate::domain::validation::ValidationError;

use phonenumber::country;

#[derive(Clone, PartialEq, Eq, Hash)]
/// D7 API bearer token, sent as `Authorization: Basic <token>`.
///
/// Invariant: non-empty after trimming. `Debug` never prints the token.
pub struct AuthToken(String);

impl AuthToken {
    /// Descriptor part carrying the token (the DSN user).
    pub const FIELD: &'static str = "authToken";

    /// Create a validated [`AuthToken`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// D7 sender id (`from`).
///
/// Invariant: either an alphanumeric id of 2 to 11 ASCII letters, digits or spaces,
/// or an E.164 number (`+` then a non-zero digit then 1 to 14 digits).
pub struct SenderId(String);

impl SenderId {
    /// JSON / DSN field name (`from`).
    pub const FIELD: &'static str = "from";

    /// Validate a sender id. The value is kept as given, spaces included.
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if is_alphanumeric_sender(&value) || is_e164(&value) {
            return Ok(Self(value));
        }
        Err(ValidationError::InvalidSenderId { value })
    }

    /// Borrow the validated sender id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_alphanumeric_sender(value: &str) -> bool {
    let len = value.chars().count();
    (2..=11).contains(&len) && value.chars().all(|c| c.is_ascii_alphanumeric() || c == ' ')
}

/// Whether `value` is literally an E.164 number (`^\+[1-9]\d{1,14}$`).
pub fn is_e164(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('+') else {
        return false;
    };
    (2..=15).contains(&digits.len())
        && digits.bytes().all(|b| b.is_ascii_digit())
        && !digits.starts_with('0')
}

#[derive(Debug, Clone)]
/// Two-letter region code used as the parsing hint for local phone numbers.
///
/// Invariant: upper-case and known to the `phonenumber` metadata.
pub struct Region {
    code: String,
    id: country::Id,
}

impl Region {
    /// DSN option name (`defaultLocale`).
    pub const FIELD: &'static str = "defaultLocale";

    /// Create a validated [`Region`] from a code like `"AU"` or `"fr"`.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let code = value.trim().to_ascii_uppercase();
        if code.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        let id = code
            .parse::<country::Id>()
            .map_err(|_| ValidationError::InvalidRegion {
                input: value.clone(),
            })?;
        Ok(Self { code, id })
    }

    /// Upper-case region code.
    pub fn as_str(&self) -> &str {
        &self.code
    }

    /// Region id understood by the `phonenumber` crate.
    pub fn id(&self) -> country::Id {
        self.id
    }
}

impl PartialEq for Region {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Region {}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Recipient phone number as supplied by the caller (`to`).
///
/// Invariant: not blank. The value is kept exactly as given, surrounding whitespace
/// included; the transport formats or checks it right before sending.
pub struct RawPhoneNumber(String);

impl RawPhoneNumber {
    /// JSON field name used by D7 (`to`).
    pub const FIELD: &'static str = "to";

    /// Create a validated (non-blank) raw phone number.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Value as supplied by the caller.
    pub fn raw(&self) -> &str {
        &self.0
    }
}

impl From<PhoneNumber> for RawPhoneNumber {
    /// Convert an already-parsed phone number to its E.164 form.
    fn from(value: PhoneNumber) -> Self {
        Self(value.e164)
    }
}

#[derive(Debug, Clone)]
/// Parsed phone number with E.164 and international renderings.
///
/// Equality and hashing are based on the E.164 form.
pub struct PhoneNumber {
    raw: String,
    e164: String,
    international: String,
}

impl PhoneNumber {
    /// JSON field name used by D7 (`to`).
    pub const FIELD: &'static str = "to";

    /// Parse a phone number, using `default_region` when the input has no country prefix.
    pub fn parse(
        default_region: Option<&Region>,
        input: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let input = input.into();
        let raw = input.trim().to_owned();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }

        let parsed = phonenumber::parse(default_region.map(Region::id), &raw)
            .map_err(|_| ValidationError::InvalidPhoneNumber { input: raw.clone() })?;

        let e164 = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::E164)
            .to_string();
        let international = phonenumber::format(&parsed)
            .mode(phonenumber::Mode::International)
            .to_string();

        Ok(Self {
            raw,
            e164,
            international,
        })
    }

    /// Raw input after trimming.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized E.164 representation (`+61412345678`).
    pub fn e164(&self) -> &str {
        &self.e164
    }

    /// International representation with spacing (`+61 412 345 678`).
    pub fn international(&self) -> &str {
        &self.international
    }
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl std::hash::Hash for PhoneNumber {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}
