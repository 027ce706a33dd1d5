use aws_config::BehaviorVersion;
use aws_config::environment::{
    credentials::EnvironmentVariableCredentialsProvider, region::EnvironmentVariableRegionProvider,
};
use aws_config::meta::region::ProvideRegion;
use aws_credential_types::Credentials;
use aws_sdk_dynamodb::config::{ProvideCredentials, Region};
use color_eyre::eyre::{Result, eyre};

use crate::config::Config;

/// Region assumed for a local endpoint when none is configured.
const LOCAL_REGION: &str = "localhost";

/// Builds a DynamoDB client from the environment.
///
/// Region and credentials come from `AWS_*` variables. Against a local
/// endpoint outside production both fall back to static placeholders, which
/// is all DynamoDB Local needs.
pub async fn new_client(config: &Config) -> Result<aws_sdk_dynamodb::Client> {
    let local = config.uses_local_endpoint();

    let region = match EnvironmentVariableRegionProvider::new().region().await {
        Some(region) => region,
        None if local => Region::new(LOCAL_REGION),
        None => return Err(eyre!("AWS region not set. Use AWS_REGION or AWS_DEFAULT_REGION.")),
    };

    let env_credentials = EnvironmentVariableCredentialsProvider::new();
    let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region);
    let found = env_credentials.provide_credentials().await;
    loader = match found {
        Ok(_) => loader.credentials_provider(env_credentials),
        Err(_) if local => {
            tracing::debug!("Using static credentials for local endpoint");
            loader.credentials_provider(Credentials::new(
                "local",
                "local",
                None,
                None,
                "stockmate-local",
            ))
        }
        Err(err) => return Err(eyre!("AWS credentials not found in environment: {err}")),
    };

    if let Some(url) = config.endpoint_url.as_deref() {
        loader = loader.endpoint_url(url);
    }

    let sdk_config = loader.load().await;
    Ok(aws_sdk_dynamodb::Client::new(&sdk_config))
}
