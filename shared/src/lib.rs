//! Cross-cutting pieces used by the lambda: the shared `AppState`, env configuration,
//! tracing setup, the photo pipeline and share texts.

use aws_sdk_dynamodb::Client as DynamoClient;

pub mod config;
pub mod logging;
pub mod photos;
pub mod sharing;

pub use config::Config;

/// Built once per cold start and shared by every invocation.
pub struct AppState {
    pub dynamo_client: DynamoClient,
    pub config: Config,
}

impl AppState {
    pub async fn from_env() -> Self {
        let config = Config::from_env();
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;

        tracing::info!(
            "⚙️ AppState ready: table={}, test_mode={}, day_offset={}, open_all_doors={}",
            config.table_name,
            config.test_mode.enabled,
            config.test_mode.day_offset,
            config.open_all_doors,
        );

        Self {
            dynamo_client: DynamoClient::new(&aws_config),
            config,
        }
    }
}
