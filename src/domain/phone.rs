use crate::domain::validation::ValidationError;
use crate::domain::value::{PhoneNumber, RawPhoneNumber, Region, is_e164};

/// Pluggable recipient formatting.
///
/// Implementations parse `raw` with `region` as the hint for numbers without a country
/// prefix and return the international rendering sent to D7.
pub trait PhoneFormatter: Send + Sync {
    fn format_international(&self, raw: &str, region: &Region) -> Result<String, ValidationError>;
}

/// [`PhoneFormatter`] backed by the `phonenumber` crate metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct LibPhoneNumberFormatter;

impl PhoneFormatter for LibPhoneNumberFormatter {
    fn format_international(&self, raw: &str, region: &Region) -> Result<String, ValidationError> {
        let parsed = PhoneNumber::parse(Some(region), raw)?;
        Ok(parsed.international().to_owned())
    }
}

/// Turn the caller's recipient into the `to` value sent to D7.
///
/// Without a formatter the number must already be literal E.164, with no surrounding
/// whitespace.
pub fn normalize_recipient(
    formatter: Option<&dyn PhoneFormatter>,
    phone: &RawPhoneNumber,
    region: &Region,
) -> Result<String, ValidationError> {
    match formatter {
        Some(formatter) => formatter.format_international(phone.raw(), region),
        None if is_e164(phone.raw()) => Ok(phone.raw().to_owned()),
        None => Err(ValidationError::InvalidRecipient {
            value: phone.raw().to_owned(),
        }),
    }
}
