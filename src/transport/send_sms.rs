use serde::Deserialize;
use serde_json::{Value, json};

use crate::domain::{
    MAX_CONTENT_LENGTH, RequestContent, SenderId, UNICODE_CODING, ValidationError,
};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response is missing the `data` field")]
    MissingData,

    #[error("response `data` does not carry a quoted message id: {data}")]
    MalformedData { data: String },
}

#[derive(Debug, Clone, Deserialize)]
struct SendSmsJsonResponse {
    #[serde(default)]
    data: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorJsonResponse {
    #[serde(default)]
    message: Option<String>,
}

/// Pick the body representation for `body`.
///
/// Non-ASCII bodies become UCS-2 hex when unicode is allowed; everything else is sent
/// verbatim and must fit in a single D7 message.
pub fn encode_request_content(
    body: &str,
    allow_unicode: bool,
) -> Result<RequestContent, ValidationError> {
    if allow_unicode && !body.is_ascii() {
        let bytes = body
            .encode_utf16()
            .flat_map(u16::to_be_bytes)
            .collect::<Vec<u8>>();
        return Ok(RequestContent::Unicode {
            hex_content: hex::encode(bytes),
            coding: UNICODE_CODING,
        });
    }

    if body.len() > MAX_CONTENT_LENGTH {
        return Err(ValidationError::MessageTooLong {
            max: MAX_CONTENT_LENGTH,
            actual: body.len(),
        });
    }

    Ok(RequestContent::Plain {
        content: body.to_owned(),
    })
}

pub fn encode_send_sms_json(from: &SenderId, to: &str, content: &RequestContent) -> Value {
    match content {
        RequestContent::Plain { content } => json!({
            "from": from.as_str(),
            "to": to,
            "content": content,
        }),
        RequestContent::Unicode {
            hex_content,
            coding,
        } => json!({
            "from": from.as_str(),
            "to": to,
            "hex_content": hex_content,
            "coding": coding,
        }),
    }
}

/// Decode a 2xx body into the D7 message id.
pub fn decode_send_sms_json_response(json: &str) -> Result<String, TransportError> {
    let parsed: SendSmsJsonResponse = serde_json::from_str(json)?;
    let data = parsed.data.ok_or(TransportError::MissingData)?;
    extract_message_id(&data)
}

/// Read the `message` field of an error body, if there is one.
pub fn decode_error_message(json: &str) -> Option<String> {
    serde_json::from_str::<ErrorJsonResponse>(json)
        .ok()
        .and_then(|parsed| parsed.message)
}

/// Extract the id from a `data` value shaped like `Success "<id>`.
///
/// The id is whatever follows the first `"`, minus an optional closing quote.
pub fn extract_message_id(data: &str) -> Result<String, TransportError> {
    let malformed = || TransportError::MalformedData {
        data: data.to_owned(),
    };

    let (_, rest) = data.split_once('"').ok_or_else(malformed)?;
    let id = rest.trim();
    let id = id.strip_suffix('"').unwrap_or(id).trim();
    if id.is_empty() {
        return Err(malformed());
    }
    Ok(id.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_bodies_are_sent_verbatim() {
        for body in [
            "Lorem ipsum dolor sit amet, consectetur adipiscing elit.",
            "",
        ] {
            let content = encode_request_content(body, true).unwrap();
            assert_eq!(
                content,
                RequestContent::Plain {
                    content: body.to_owned()
                }
            );
        }
    }

    #[test]
    fn unicode_bodies_are_hex_encoded_ucs2() {
        for body in ["😂❤😊💩🏆👍", "Lorem 👩‍❤️‍💋‍👨 ipsum", "héllo"] {
            let content = encode_request_content(body, true).unwrap();
            assert!(matches!(
                content,
                RequestContent::Unicode {
                    coding: UNICODE_CODING,
                    ..
                }
            ));
        }

        let content = encode_request_content("é", true).unwrap();
        assert_eq!(
            content,
            RequestContent::Unicode {
                hex_content: "00e9".to_owned(),
                coding: 8,
            }
        );

        let content = encode_request_content("😂", true).unwrap();
        assert_eq!(
            content,
            RequestContent::Unicode {
                hex_content: "d83dde02".to_owned(),
                coding: 8,
            }
        );
    }

    #[test]
    fn unicode_disallowed_falls_back_to_plain() {
        let content = encode_request_content("héllo", false).unwrap();
        assert_eq!(
            content,
            RequestContent::Plain {
                content: "héllo".to_owned()
            }
        );
    }

    #[test]
    fn plain_length_limit_is_enforced() {
        let body = ".".repeat(MAX_CONTENT_LENGTH);
        assert!(encode_request_content(&body, true).is_ok());

        let body = ".".repeat(MAX_CONTENT_LENGTH + 1);
        assert_eq!(
            encode_request_content(&body, true),
            Err(ValidationError::MessageTooLong {
                max: 765,
                actual: 766,
            })
        );
    }

    #[test]
    fn payload_carries_exactly_one_content_shape() {
        let from = SenderId::parse("from").unwrap();

        let plain = encode_send_sms_json(
            &from,
            "+33 6 12 34 56 78",
            &RequestContent::Plain {
                content: "Hello!".to_owned(),
            },
        );
        assert_eq!(
            plain,
            json!({"from": "from", "to": "+33 6 12 34 56 78", "content": "Hello!"})
        );

        let unicode = encode_send_sms_json(
            &from,
            "+33 6 12 34 56 78",
            &RequestContent::Unicode {
                hex_content: "00e9".to_owned(),
                coding: 8,
            },
        );
        assert_eq!(
            unicode,
            json!({"from": "from", "to": "+33 6 12 34 56 78", "hex_content": "00e9", "coding": 8})
        );
    }

    #[test]
    fn decode_extracts_id_after_first_quote() {
        let json = r#"{"data":"Success \"7ed74619-8af4-4434-a7e0-0927ce272f8c","message":"foo","more_info":"bar"}"#;
        assert_eq!(
            decode_send_sms_json_response(json).unwrap(),
            "7ed74619-8af4-4434-a7e0-0927ce272f8c"
        );
    }

    #[test]
    fn extract_strips_closing_quote() {
        assert_eq!(extract_message_id("Success \"abc-123\"").unwrap(), "abc-123");
    }

    #[test]
    fn extract_rejects_missing_separator_or_empty_id() {
        assert!(matches!(
            extract_message_id("Success"),
            Err(TransportError::MalformedData { .. })
        ));
        assert!(matches!(
            extract_message_id("Success \""),
            Err(TransportError::MalformedData { .. })
        ));
    }

    #[test]
    fn decode_reports_missing_data_and_bad_json() {
        assert!(matches!(
            decode_send_sms_json_response(r#"{"message":"foo"}"#),
            Err(TransportError::MissingData)
        ));
        assert!(matches!(
            decode_send_sms_json_response("{ not json }"),
            Err(TransportError::Json(_))
        ));
    }

    #[test]
    fn error_message_is_read_leniently() {
        assert_eq!(
            decode_error_message(r#"{"message":"bad token"}"#).as_deref(),
            Some("bad token")
        );
        assert_eq!(decode_error_message(""), None);
        assert_eq!(decode_error_message(r#"{"detail":"x"}"#), None);
    }
}
