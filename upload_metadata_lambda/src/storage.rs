use std::collections::HashMap;
use std::future::Future;

use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::operation::head_object::HeadObjectOutput;
use aws_sdk_s3::primitives::DateTimeFormat;
use lambda_runtime::tracing;
use serde::Serialize;

use crate::error::LookupError;

/// Object attributes returned by a head request. Only logged, never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_length: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(rename = "ETag", skip_serializing_if = "Option::is_none")]
    pub e_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_control: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept_ranges: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_side_encryption: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
    /// User-defined `x-amz-meta-*` pairs
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl From<HeadObjectOutput> for ObjectMetadata {
    fn from(output: HeadObjectOutput) -> Self {
        Self {
            content_length: output.content_length(),
            content_type: output.content_type().map(str::to_string),
            e_tag: output.e_tag().map(str::to_string),
            last_modified: output
                .last_modified()
                .and_then(|at| at.fmt(DateTimeFormat::DateTime).ok()),
            version_id: output.version_id().map(str::to_string),
            cache_control: output.cache_control().map(str::to_string),
            content_encoding: output.content_encoding().map(str::to_string),
            accept_ranges: output.accept_ranges().map(str::to_string),
            server_side_encryption: output
                .server_side_encryption()
                .map(|sse| sse.as_str().to_string()),
            storage_class: output
                .storage_class()
                .map(|class| class.as_str().to_string()),
            metadata: output.metadata().cloned().unwrap_or_default(),
        }
    }
}

/// Read-only metadata probe against the object store.
pub trait ObjectMetadataLookup {
    /// Fetches the metadata of `key` in `bucket` without transferring its body.
    fn head_object(
        &self,
        bucket: &str,
        key: &str,
    ) -> impl Future<Output = Result<ObjectMetadata, LookupError>> + Send;
}

#[derive(Clone, Debug)]
pub struct S3MetadataClient {
    inner: S3Client,
}

impl S3MetadataClient {
    pub fn new(inner: S3Client) -> Self {
        Self { inner }
    }
}

impl ObjectMetadataLookup for S3MetadataClient {
    #[tracing::instrument(skip(self))]
    async fn head_object(&self, bucket: &str, key: &str) -> Result<ObjectMetadata, LookupError> {
        let resp = self.inner.head_object().bucket(bucket).key(key).send().await;

        match resp {
            Ok(output) => Ok(output.into()),
            Err(e) if e.as_service_error().map(|e| e.is_not_found()) == Some(true) => {
                Err(LookupError::NotFound {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                })
            }
            Err(e) => Err(LookupError::Service(
                anyhow::Error::new(e).context("failed to perform head object operation"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::error::ErrorMetadata;
    use aws_sdk_s3::operation::head_object::HeadObjectError;
    use aws_sdk_s3::primitives::DateTime;
    use aws_sdk_s3::types::StorageClass;
    use aws_sdk_s3::types::error::NotFound;
    use aws_smithy_mocks::{mock, mock_client};

    #[tokio::test]
    async fn test_head_object_success() {
        let head_object_rule = mock!(aws_sdk_s3::Client::head_object)
            .match_requests(|req| {
                req.bucket() == Some("test-bucket") && req.key() == Some("test object")
            })
            .then_output(|| {
                HeadObjectOutput::builder()
                    .content_length(1234)
                    .content_type("text/plain")
                    .e_tag("\"d41d8cd98f00b204e9800998ecf8427e\"")
                    .last_modified(DateTime::from_secs(0))
                    .storage_class(StorageClass::Standard)
                    .metadata("uploaded-by", "tester")
                    .build()
            });
        let s3 = mock_client!(aws_sdk_s3, [&head_object_rule]);
        let client = S3MetadataClient::new(s3);

        let metadata = client.head_object("test-bucket", "test object").await.unwrap();

        assert_eq!(head_object_rule.num_calls(), 1);
        assert_eq!(metadata.content_length, Some(1234));
        assert_eq!(metadata.content_type.as_deref(), Some("text/plain"));
        assert_eq!(
            metadata.e_tag.as_deref(),
            Some("\"d41d8cd98f00b204e9800998ecf8427e\"")
        );
        assert_eq!(metadata.last_modified.as_deref(), Some("1970-01-01T00:00:00Z"));
        assert_eq!(metadata.storage_class.as_deref(), Some("STANDARD"));
        assert_eq!(
            metadata.metadata.get("uploaded-by").map(String::as_str),
            Some("tester")
        );
    }

    #[tokio::test]
    async fn test_head_object_not_found() {
        let head_object_rule = mock!(aws_sdk_s3::Client::head_object)
            .then_error(|| HeadObjectError::NotFound(NotFound::builder().build()));
        let s3 = mock_client!(aws_sdk_s3, [&head_object_rule]);
        let client = S3MetadataClient::new(s3);

        let err = client.head_object("test-bucket", "missing.txt").await.unwrap_err();

        assert_eq!(head_object_rule.num_calls(), 1);
        assert!(matches!(
            err,
            LookupError::NotFound { ref bucket, ref key } if bucket == "test-bucket" && key == "missing.txt"
        ));
    }

    #[tokio::test]
    async fn test_head_object_service_error() {
        let head_object_rule = mock!(aws_sdk_s3::Client::head_object).then_error(|| {
            HeadObjectError::generic(
                ErrorMetadata::builder()
                    .code("AccessDenied")
                    .message("Access Denied")
                    .build(),
            )
        });
        let s3 = mock_client!(aws_sdk_s3, [&head_object_rule]);
        let client = S3MetadataClient::new(s3);

        let err = client.head_object("test-bucket", "secret.txt").await.unwrap_err();

        assert!(matches!(err, LookupError::Service(_)));
        assert!(err.to_string().contains("failed to perform head object operation"));
    }

    #[test]
    fn test_metadata_json_skips_absent_fields() {
        let metadata = ObjectMetadata {
            content_length: Some(3),
            e_tag: Some("\"abc\"".to_string()),
            ..Default::default()
        };
        let rendered = serde_json::to_string(&metadata).unwrap();
        assert_eq!(rendered, r#"{"ContentLength":3,"ETag":"\"abc\""}"#);
    }
}
