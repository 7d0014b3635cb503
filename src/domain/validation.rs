use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidSenderId { value: String },
    InvalidRecipient { value: String },
    InvalidPhoneNumber { input: String },
    InvalidRegion { input: String },
    MessageTooLong { max: usize, actual: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidSenderId { value } => write!(
                f,
                "The \"From\" number \"{value}\" is not a valid phone number, shortcode, or alphanumeric sender ID."
            ),
            Self::InvalidRecipient { value } => write!(
                f,
                "The recipient number \"{value}\" is not a valid internationally formatted number."
            ),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::InvalidRegion { input } => write!(f, "unknown region code: {input}"),
            Self::MessageTooLong { max, actual } => write!(
                f,
                "D7 can only handle messages up to {max} characters (message was {actual} characters)."
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn display_messages_are_human_readable() {
        let err = ValidationError::Empty { field: "to" };
        assert_eq!(err.to_string(), "to must not be empty");

        let err = ValidationError::InvalidSenderId {
            value: "a".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "The \"From\" number \"a\" is not a valid phone number, shortcode, or alphanumeric sender ID."
        );

        let err = ValidationError::InvalidRecipient {
            value: "0611223344".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "The recipient number \"0611223344\" is not a valid internationally formatted number."
        );

        let err = ValidationError::InvalidPhoneNumber {
            input: "bad".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid phone number: bad");

        let err = ValidationError::MessageTooLong {
            max: 765,
            actual: 766,
        };
        assert_eq!(
            err.to_string(),
            "D7 can only handle messages up to 765 characters (message was 766 characters)."
        );
    }
}
