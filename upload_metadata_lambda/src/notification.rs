use std::borrow::Cow;

use aws_lambda_events::event::s3::S3Entity;
use lambda_runtime::tracing;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ShapeError;

/// The bucket and decoded key named by the first record of a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

/// Validates the raw notification payload and resolves the object it refers to.
///
/// Only `Records[0]` is consulted; any further records are ignored.
pub fn parse(payload: &Value) -> Result<ObjectRef, ShapeError> {
    let record = payload
        .get("Records")
        .and_then(Value::as_array)
        .and_then(|records| records.first())
        .ok_or(ShapeError::MissingRecords)?;

    let entity = record
        .get("s3")
        .ok_or(ShapeError::MissingObjectRef)
        .and_then(|s3| {
            S3Entity::deserialize(s3).map_err(|err| {
                tracing::debug!(error = %err, "unable to read s3 entity of first record");
                ShapeError::MissingObjectRef
            })
        })?;

    let bucket = entity.bucket.name.ok_or(ShapeError::MissingObjectRef)?;
    let raw_key = entity.object.key.ok_or(ShapeError::MissingObjectRef)?;

    Ok(ObjectRef {
        bucket,
        key: decode_key(&raw_key)?,
    })
}

/// Decodes an S3 notification key.
///
/// `+` is turned into a space before percent-decoding so that an encoded
/// `%2B` still yields a literal `+`. Every `%` must start a two hex digit
/// escape.
pub fn decode_key(raw_key: &str) -> Result<String, ShapeError> {
    let spaced = raw_key.replace('+', " ");
    if !has_valid_escapes(&spaced) {
        return Err(ShapeError::MalformedKeyEscape);
    }
    urlencoding::decode(&spaced)
        .map(Cow::into_owned)
        .map_err(ShapeError::InvalidKeyEncoding)
}

fn has_valid_escapes(key: &str) -> bool {
    let bytes = key.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            match bytes.get(i + 1..i + 3) {
                Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => i += 3,
                _ => return false,
            }
        } else {
            i += 1;
        }
    }
    true
}
