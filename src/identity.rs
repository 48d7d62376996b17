use tracing::debug;

use crate::assume_role::TokenService;
use crate::error::{IdentityError, Result};

/// The calling user and the MFA device they must answer for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub mfa_serial: String,
}

/// Trailing path segment of an identity ARN, e.g. `alice` for
/// `arn:aws:iam::123456789012:user/team/alice`.
pub fn username_from_arn(arn: &str) -> &str {
    arn.rsplit('/').next().unwrap_or_default()
}

/// Looks up the caller, then their MFA devices.
///
/// When several devices are registered the first one returned by the provider
/// wins; that order is provider-defined.
pub async fn resolve_identity<T: TokenService + ?Sized>(service: &T) -> Result<Identity> {
    let arn = service.caller_arn().await?;
    let username = username_from_arn(&arn);
    if username.is_empty() {
        return Err(IdentityError::EmptyIdentity.into());
    }
    debug!("getting identity for {}", username);

    let mfa_serial = service
        .mfa_serials(username)
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| IdentityError::NoMfaDevice {
            username: username.to_string(),
        })?;

    Ok(Identity {
        username: username.to_string(),
        mfa_serial,
    })
}
