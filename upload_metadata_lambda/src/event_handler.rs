use lambda_runtime::{tracing, Error, LambdaEvent};
use serde::Serialize;
use serde_json::Value;

use crate::notification;
use crate::storage::ObjectMetadataLookup;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// JSON-encoded `{"message": ...}`
    pub body: String,
}

impl Response {
    fn with_message(status_code: u16, message: &str) -> Self {
        Self {
            status_code,
            body: serde_json::json!({ "message": message }).to_string(),
        }
    }
}

/// Looks up and logs the metadata of the object named by the first record of
/// an upload notification.
///
/// Never fails: malformed events yield a 400 and lookup failures a 500.
pub async fn handle<L: ObjectMetadataLookup>(lookup: &L, event: &Value) -> Response {
    tracing::info!("Received event...");

    let object = match notification::parse(event) {
        Ok(object) => object,
        Err(err) => {
            tracing::error!(error = ?err, "{}", err);
            return Response::with_message(400, &err.to_string());
        }
    };

    match lookup.head_object(&object.bucket, &object.key).await {
        Ok(metadata) => {
            let rendered = serde_json::to_string_pretty(&metadata)
                .unwrap_or_else(|_| format!("{:?}", metadata));
            tracing::info!(
                bucket = %object.bucket,
                key = %object.key,
                "Metadata of the uploaded file {}: {}",
                object.key,
                rendered
            );
            Response::with_message(
                200,
                &format!("Metadata logged successfully for {}", object.key),
            )
        }
        Err(err) => {
            tracing::error!(
                bucket = %object.bucket,
                key = %object.key,
                error = %err,
                "Error getting metadata for {} from {}",
                object.key,
                object.bucket
            );
            Response::with_message(500, &format!("Error getting metadata for {}", object.key))
        }
    }
}

#[tracing::instrument(skip_all, fields(request_id = %event.context.request_id))]
pub(crate) async fn function_handler<L: ObjectMetadataLookup>(
    event: LambdaEvent<Value>,
    lookup: &L,
) -> Result<Response, Error> {
    Ok(handle(lookup, &event.payload).await)
}
