use aws_config::BehaviorVersion;
use aws_sdk_s3::Client as S3Client;
use lambda_runtime::{run, service_fn, tracing, Error};
mod config;
mod error;
mod event_handler;
mod notification;
mod storage;
use config::Config;
use event_handler::function_handler;
use storage::S3MetadataClient;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env()?;
    config.init_tracing();

    let shared_config = aws_config::load_defaults(BehaviorVersion::v2025_01_17()).await;
    let s3_client = if config.use_path_style_buckets {
        tracing::info!("Using path-style buckets");
        S3Client::from_conf(
            aws_sdk_s3::config::Builder::from(&shared_config)
                .force_path_style(true)
                .build(),
        )
    } else {
        S3Client::new(&shared_config)
    };

    let lookup = S3MetadataClient::new(s3_client);
    run(service_fn(|event| function_handler(event, &lookup))).await
}
