use std::io;

use async_trait::async_trait;

use crate::accounts::select::prompt_line;

#[async_trait]
pub trait ReadMfaToken {
    async fn read_mfa_token(&self, mfa_serial: &str) -> anyhow::Result<String>;
}

#[async_trait]
impl<R: ReadMfaToken + Sync + ?Sized> ReadMfaToken for &R {
    async fn read_mfa_token(&self, mfa_serial: &str) -> anyhow::Result<String> {
        (**self).read_mfa_token(mfa_serial).await
    }
}

/// Prompts on stderr and reads the code from stdin.
pub struct StdinMfaTokenReader;

#[async_trait]
impl ReadMfaToken for StdinMfaTokenReader {
    async fn read_mfa_token(&self, mfa_serial: &str) -> anyhow::Result<String> {
        let label = format!("Enter MFA code for {}", mfa_serial);
        let code = prompt_line(&label, io::stdin().lock(), io::stderr())?;
        Ok(code)
    }
}

pub struct StaticMfaTokenReader {
    token: String,
}

impl<S: Into<String>> From<S> for StaticMfaTokenReader {
    fn from(s: S) -> Self {
        StaticMfaTokenReader { token: s.into() }
    }
}

#[async_trait]
impl ReadMfaToken for StaticMfaTokenReader {
    async fn read_mfa_token(&self, _mfa_serial: &str) -> anyhow::Result<String> {
        Ok(self.token.clone())
    }
}

pub enum MfaReader {
    Stdin(StdinMfaTokenReader),
    Static(StaticMfaTokenReader),
}

impl MfaReader {
    pub fn from_token(token: Option<&str>) -> MfaReader {
        match token {
            Some(token) => MfaReader::Static(StaticMfaTokenReader::from(token)),
            None => MfaReader::Stdin(StdinMfaTokenReader),
        }
    }
}

#[async_trait]
impl ReadMfaToken for MfaReader {
    async fn read_mfa_token(&self, mfa_serial: &str) -> anyhow::Result<String> {
        use MfaReader::*;
        match self {
            Stdin(r) => r.read_mfa_token(mfa_serial).await,
            Static(r) => r.read_mfa_token(mfa_serial).await,
        }
    }
}
