use std::time::SystemTime;

use async_trait::async_trait;
use aws_config::profile::ProfileFileCredentialsProvider;
use aws_config::BehaviorVersion;
use aws_credential_types::provider::error::CredentialsError;
use aws_sdk_sts::error::DisplayErrorContext;
use aws_sdk_sts::primitives::DateTime as SdkDateTime;
use aws_types::region::Region;
use aws_types::SdkConfig;
use chrono::{DateTime, Utc};
use tracing::debug;

use neotk_schema::credentials::Credentials;

use crate::assume_role::{AssumeRequest, TokenService};
use crate::error::{Error, Result};

/// SDK configuration signed by the profile's shared-file credentials.
///
/// Access keys exported into the environment by a previous assume are ignored,
/// so running inside an assumed shell does not chain sessions.
pub async fn profile_config(profile: &str, region: &str) -> SdkConfig {
    let credentials = ProfileFileCredentialsProvider::builder()
        .profile_name(profile)
        .build();

    aws_config::defaults(BehaviorVersion::latest())
        .profile_name(profile)
        .region(Region::new(region.to_string()))
        .credentials_provider(credentials)
        .load()
        .await
}

/// SDK configuration from the default provider chain.
pub async fn default_config(region: &str) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await
}

/// SDK configuration signed by freshly assumed credentials.
pub async fn assumed_config(credentials: &Credentials, region: &str) -> SdkConfig {
    let credentials = aws_credential_types::Credentials::new(
        credentials.access_key_id(),
        credentials.secret_access_key(),
        Some(credentials.session_token().to_string()),
        Some(SystemTime::from(credentials.expiration())),
        "neotk",
    );

    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .credentials_provider(credentials)
        .load()
        .await
}

pub fn to_chrono(dt: &SdkDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())
}

/// Maps an SDK failure to a broker error.
///
/// Credential resolution happens lazily inside the request, so a missing or
/// broken profile surfaces as a dispatch failure whose source chain holds the
/// `CredentialsError`.
fn provider_error<E: std::error::Error + 'static>(e: E) -> Error {
    let message = DisplayErrorContext(&e).to_string();
    if caused_by_credentials(&e) {
        Error::CredentialsMissing(message)
    } else {
        Error::ProviderRejected(message)
    }
}

fn caused_by_credentials(e: &(dyn std::error::Error + 'static)) -> bool {
    let mut source = Some(e);
    while let Some(err) = source {
        if err.is::<CredentialsError>() {
            return true;
        }
        source = err.source();
    }
    false
}

pub struct AwsSdkTokenService {
    sts: aws_sdk_sts::Client,
    iam: aws_sdk_iam::Client,
}

impl AwsSdkTokenService {
    pub async fn load(profile: &str, region: &str) -> AwsSdkTokenService {
        debug!("profile:{}, region:{}", profile, region);
        AwsSdkTokenService::from(profile_config(profile, region).await)
    }
}

impl From<SdkConfig> for AwsSdkTokenService {
    fn from(config: SdkConfig) -> Self {
        AwsSdkTokenService {
            sts: aws_sdk_sts::Client::new(&config),
            iam: aws_sdk_iam::Client::new(&config),
        }
    }
}

#[async_trait]
impl TokenService for AwsSdkTokenService {
    async fn caller_arn(&self) -> Result<String> {
        let output = self
            .sts
            .get_caller_identity()
            .send()
            .await
            .map_err(provider_error)?;
        Ok(output.arn().unwrap_or_default().to_string())
    }

    async fn mfa_serials(&self, username: &str) -> Result<Vec<String>> {
        let output = self
            .iam
            .list_mfa_devices()
            .user_name(username)
            .send()
            .await
            .map_err(provider_error)?;

        Ok(output
            .mfa_devices()
            .iter()
            .map(|d| d.serial_number().to_string())
            .collect())
    }

    async fn assume_role(&self, request: &AssumeRequest) -> Result<Credentials> {
        let output = self
            .sts
            .assume_role()
            .role_arn(request.role_arn())
            .role_session_name(request.session_name())
            .duration_seconds(request.duration_seconds())
            .serial_number(request.mfa_serial())
            .token_code(request.mfa_token())
            .send()
            .await
            .map_err(provider_error)?;

        let creds = output.credentials.ok_or_else(|| {
            Error::ProviderRejected("assume-role didn't return a credential".to_string())
        })?;
        let expiration = to_chrono(&creds.expiration).ok_or_else(|| {
            Error::ProviderRejected("assume-role returned an invalid expiration".to_string())
        })?;

        Ok(Credentials {
            access_key_id: creds.access_key_id,
            secret_access_key: creds.secret_access_key,
            session_token: creds.session_token,
            expiration,
        })
    }
}
