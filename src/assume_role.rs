use async_trait::async_trait;
use uuid::Uuid;

use neotk_schema::credentials::Credentials;

use crate::accounts::role_arn;
use crate::duration::ParseError;
use crate::error::Result;

pub mod aws_sdk;

pub mod defaults {
    pub const DURATION: &str = "1h";
    pub const SECRETS_DURATION_SECONDS: i64 = 900;
    /// Upper bound the provider accepts for a role session name.
    pub const SESSION_NAME_MAX_LEN: usize = 64;
}

/// A single assume-role call, fully resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssumeRequest {
    account_id: String,
    role_name: String,
    session_name: String,
    duration_seconds: i32,
    mfa_serial: String,
    mfa_token: String,
}

impl AssumeRequest {
    pub fn new(
        account_id: &str,
        role_name: &str,
        session_name: &str,
        duration_seconds: i64,
        mfa_serial: &str,
        mfa_token: &str,
    ) -> Result<AssumeRequest> {
        let duration_seconds = provider_duration(duration_seconds)?;

        Ok(AssumeRequest {
            account_id: account_id.to_string(),
            role_name: role_name.to_string(),
            session_name: session_name.to_string(),
            duration_seconds,
            mfa_serial: mfa_serial.to_string(),
            mfa_token: mfa_token.to_string(),
        })
    }

    pub fn role_arn(&self) -> String {
        role_arn(&self.account_id, &self.role_name)
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn role_name(&self) -> &str {
        &self.role_name
    }

    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    pub fn duration_seconds(&self) -> i32 {
        self.duration_seconds
    }

    pub fn mfa_serial(&self) -> &str {
        &self.mfa_serial
    }

    pub fn mfa_token(&self) -> &str {
        &self.mfa_token
    }
}

/// Narrows a parsed duration to the positive 32-bit field the provider takes.
pub fn provider_duration(seconds: i64) -> std::result::Result<i32, ParseError> {
    i32::try_from(seconds)
        .ok()
        .filter(|d| *d > 0)
        .ok_or(ParseError::OutOfRange(seconds))
}

/// `<username>_assume_<uuid>`, cut to the provider's session name limit.
pub fn generate_session_name(username: &str) -> String {
    format!("{}_assume_{}", username, Uuid::new_v4())
        .chars()
        .take(defaults::SESSION_NAME_MAX_LEN)
        .collect()
}

/// The three provider calls the broker makes, in the order it makes them.
#[async_trait]
pub trait TokenService {
    /// ARN of the identity behind the standing credentials, empty if unknown.
    async fn caller_arn(&self) -> Result<String>;

    /// Serial numbers of the user's MFA devices, in provider order.
    async fn mfa_serials(&self, username: &str) -> Result<Vec<String>>;

    async fn assume_role(&self, request: &AssumeRequest) -> Result<Credentials>;
}

#[async_trait]
impl<T: TokenService + Sync + ?Sized> TokenService for &T {
    async fn caller_arn(&self) -> Result<String> {
        (**self).caller_arn().await
    }

    async fn mfa_serials(&self, username: &str) -> Result<Vec<String>> {
        (**self).mfa_serials(username).await
    }

    async fn assume_role(&self, request: &AssumeRequest) -> Result<Credentials> {
        (**self).assume_role(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn builds_role_arn() {
        let r = AssumeRequest::new("1111", "Admin", "me", 3600, "serial", "123456").unwrap();
        assert_eq!(r.role_arn(), "arn:aws:iam::1111:role/Admin");
        assert_eq!(r.duration_seconds(), 3600);
    }

    #[test]
    fn rejects_non_positive_duration() {
        let r = AssumeRequest::new("1111", "Admin", "me", -3600, "serial", "123456");
        assert!(matches!(r, Err(Error::Parse(ParseError::OutOfRange(-3600)))));

        let r = AssumeRequest::new("1111", "Admin", "me", 0, "serial", "123456");
        assert!(r.is_err());
    }

    #[test]
    fn rejects_duration_beyond_provider_field() {
        let r = AssumeRequest::new("1111", "Admin", "me", i64::from(i32::MAX) + 1, "s", "t");
        assert!(r.is_err());
    }

    #[test]
    fn generated_session_names_fit_the_limit() {
        let short = generate_session_name("alice");
        assert!(short.starts_with("alice_assume_"));
        assert!(short.len() <= defaults::SESSION_NAME_MAX_LEN);

        let long = generate_session_name(&"x".repeat(80));
        assert_eq!(long.chars().count(), defaults::SESSION_NAME_MAX_LEN);
    }

    #[test]
    fn generated_session_names_are_unique() {
        assert_ne!(generate_session_name("bob"), generate_session_name("bob"));
    }
}
