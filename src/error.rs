use std::fmt;

use thiserror::Error;

use crate::duration::ParseError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("error getting identity")]
    EmptyIdentity,

    #[error("no MFA device registered for {username}, check that MFA is enabled")]
    NoMfaDevice { username: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("You must provide ACCOUNT and ROLE to continue")]
    MissingArguments,

    #[error("no MFA code entered")]
    MissingMfaToken,

    #[error("failed to read MFA code: {0}")]
    MfaInput(String),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("{0}. Missing credentials, configure them first (aws configure)")]
    CredentialsMissing(String),

    #[error("provider error: {0}")]
    ProviderRejected(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    MissingArguments,
    MissingMfaToken,
    Parse,
    EmptyIdentity,
    NoMfaDevice,
    CredentialsMissing,
    ProviderRejected,
}

impl Error {
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::MissingArguments => FailureKind::MissingArguments,
            Error::MissingMfaToken | Error::MfaInput(_) => FailureKind::MissingMfaToken,
            Error::Parse(_) => FailureKind::Parse,
            Error::Identity(IdentityError::EmptyIdentity) => FailureKind::EmptyIdentity,
            Error::Identity(IdentityError::NoMfaDevice { .. }) => FailureKind::NoMfaDevice,
            Error::CredentialsMissing(_) => FailureKind::CredentialsMissing,
            Error::ProviderRejected(_) => FailureKind::ProviderRejected,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::MissingArguments => "missing-arguments",
            FailureKind::MissingMfaToken => "missing-mfa-token",
            FailureKind::Parse => "parse",
            FailureKind::EmptyIdentity => "empty-identity",
            FailureKind::NoMfaDevice => "no-mfa-device",
            FailureKind::CredentialsMissing => "credentials-missing",
            FailureKind::ProviderRejected => "provider-rejected",
        };
        f.write_str(s)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
