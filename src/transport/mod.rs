//! Transport layer: HTTP and wire-format details (serialization/deserialization).

mod send_sms;

pub use send_sms::{
    TransportError, decode_error_message, decode_send_sms_json_response, encode_request_content,
    encode_send_sms_json,
};
