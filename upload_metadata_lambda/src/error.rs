use std::string::FromUtf8Error;

/// The inbound notification could not be turned into a bucket/key pair.
///
/// The display text of each variant is the `message` returned to the caller
/// with a 400 status.
#[derive(Debug, thiserror::Error)]
pub enum ShapeError {
    /// `Records` is absent, not an array, or empty
    #[error("Event structure is not as expected: missing Records array")]
    MissingRecords,
    /// The first record has no readable `s3.bucket.name` / `s3.object.key`
    #[error("Event structure is not as expected: missing bucket name or object key")]
    MissingObjectRef,
    /// The object key decodes to bytes that are not UTF-8
    #[error("Event structure is not as expected: object key is not valid percent-encoded UTF-8")]
    InvalidKeyEncoding(#[source] FromUtf8Error),
    /// A `%` in the object key is not followed by two hex digits
    #[error("Event structure is not as expected: object key has a malformed percent escape")]
    MalformedKeyEscape,
}

/// Failure of the head object lookup. Every variant is surfaced as a 500.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The service reported that the object does not exist
    #[error("object {key} was not found in bucket {bucket}")]
    NotFound { bucket: String, key: String },
    /// Any other service, permission or transport failure
    #[error("storage service error: {0:#}")]
    Service(#[from] anyhow::Error),
}
