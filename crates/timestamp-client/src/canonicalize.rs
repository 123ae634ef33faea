//! Canonical payload encoding.
//!
//! The producer signs the compact JSON encoding of the payload: fields in
//! declared order, no whitespace, integers in plain decimal. Its string
//! escaping also rewrites `<`, `>`, `&`, U+2028 and U+2029 as `\uXXXX`, so
//! the same is done here. Any byte of difference breaks every signature.

use std::io;

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};

use crate::error::{ClientError, ClientResult};
use crate::types::TimestampPayload;

/// Compact JSON formatter with the producer's string escaping.
#[derive(Debug, Clone, Copy, Default)]
struct ProducerFormatter;

impl Formatter for ProducerFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            let escaped = match ch {
                '<' => "\\u003c",
                '>' => "\\u003e",
                '&' => "\\u0026",
                '\u{2028}' => "\\u2028",
                '\u{2029}' => "\\u2029",
                _ => continue,
            };
            writer.write_all(fragment[start..i].as_bytes())?;
            writer.write_all(escaped.as_bytes())?;
            start = i + ch.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Encode a payload into the exact bytes the producer signed.
pub fn encode(payload: &TimestampPayload) -> ClientResult<Vec<u8>> {
    to_canonical_bytes(payload)
}

/// Canonical bytes of any serializable value.
pub fn to_canonical_bytes<T: Serialize + ?Sized>(value: &T) -> ClientResult<Vec<u8>> {
    let mut out = Vec::with_capacity(128);
    let mut serializer = Serializer::with_formatter(&mut out, ProducerFormatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| ClientError::Encode {
            message: e.to_string(),
        })?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TimestampPayload {
        TimestampPayload {
            software_version: "1.0".to_string(),
            date_utc: "2024-01-01".to_string(),
            time_utc: "00:00:00".to_string(),
            epoch_utc: 1_704_067_200,
        }
    }

    #[test]
    fn test_exact_bytes() {
        let bytes = encode(&sample()).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"swVersion":"1.0","dateIsoUtc":"2024-01-01","time24Utc":"00:00:00","dateTimeEpocUtc":1704067200}"#
        );
    }

    #[test]
    fn test_deterministic() {
        let payload = sample();
        let first = encode(&payload).unwrap();
        for _ in 0..16 {
            assert_eq!(encode(&payload).unwrap(), first);
            assert_eq!(encode(&payload.clone()).unwrap(), first);
        }
    }

    #[test]
    fn test_field_order_independent_of_wire_order() {
        let a = crate::envelope::decode(
            br#"{"data":{"dateTimeEpocUtc":1704067200,"time24Utc":"00:00:00","dateIsoUtc":"2024-01-01","swVersion":"1.0"}}"#,
        )
        .unwrap();
        let b = crate::envelope::decode(
            br#"{"data":{"swVersion":"1.0","dateIsoUtc":"2024-01-01","time24Utc":"00:00:00","dateTimeEpocUtc":1704067200}}"#,
        )
        .unwrap();
        assert_eq!(encode(&a.payload).unwrap(), encode(&b.payload).unwrap());
    }

    #[test]
    fn test_html_sensitive_characters_escaped() {
        let payload = TimestampPayload {
            software_version: "<v1> & \u{2028}\u{2029}".to_string(),
            ..TimestampPayload::default()
        };
        let text = String::from_utf8(encode(&payload).unwrap()).unwrap();
        assert!(
            text.starts_with(r#"{"swVersion":"\u003cv1\u003e \u0026 \u2028\u2029","#),
            "{text}"
        );
    }

    #[test]
    fn test_json_escapes() {
        let payload = TimestampPayload {
            software_version: "a\"b\\c\nd\te\u{1}".to_string(),
            ..TimestampPayload::default()
        };
        let text = String::from_utf8(encode(&payload).unwrap()).unwrap();
        assert!(
            text.starts_with(r#"{"swVersion":"a\"b\\c\nd\te\u0001","#),
            "{text}"
        );
    }

    #[test]
    fn test_non_ascii_passthrough() {
        let payload = TimestampPayload {
            software_version: "zürich-é".to_string(),
            ..TimestampPayload::default()
        };
        let text = String::from_utf8(encode(&payload).unwrap()).unwrap();
        assert!(text.contains("zürich-é"));
    }

    #[test]
    fn test_zero_and_negative_epoch() {
        let zero = String::from_utf8(encode(&TimestampPayload::default()).unwrap()).unwrap();
        assert_eq!(
            zero,
            r#"{"swVersion":"","dateIsoUtc":"","time24Utc":"","dateTimeEpocUtc":0}"#
        );

        let payload = TimestampPayload {
            epoch_utc: -86_400,
            ..TimestampPayload::default()
        };
        let text = String::from_utf8(encode(&payload).unwrap()).unwrap();
        assert!(text.ends_with(r#""dateTimeEpocUtc":-86400}"#));
    }
}
