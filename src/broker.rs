use std::fmt;

use tracing::{debug, info};

use neotk_schema::accounts::AccountTable;
use neotk_schema::credentials::Credentials;

use crate::accounts::{self, Target};
use crate::assume_role::{generate_session_name, provider_duration, AssumeRequest, TokenService};
use crate::duration::parse_seconds;
use crate::error::{Error, FailureKind, Result};
use crate::identity::resolve_identity;
use crate::mfa::ReadMfaToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerState {
    Start,
    Resolving,
    IdentityLookup,
    Assuming,
    Success,
    Failed(FailureKind),
}

impl fmt::Display for BrokerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrokerState::Start => f.write_str("start"),
            BrokerState::Resolving => f.write_str("resolving"),
            BrokerState::IdentityLookup => f.write_str("identity-lookup"),
            BrokerState::Assuming => f.write_str("assuming"),
            BrokerState::Success => f.write_str("success"),
            BrokerState::Failed(kind) => write!(f, "failed({})", kind),
        }
    }
}

/// Everything that can be decided before talking to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub target: Target,
    pub duration_seconds: i64,
    pub session_name: String,
}

/// One-shot role assumption: resolve, look up identity, assume.
///
/// Nothing is retried. A rejected MFA code has to be re-entered by invoking
/// the broker again.
pub struct Broker<'a> {
    accounts: &'a AccountTable,
    local_username: String,
    state: BrokerState,
}

impl<'a> Broker<'a> {
    pub fn new(accounts: &'a AccountTable) -> Self {
        Self {
            accounts,
            local_username: whoami::username(),
            state: BrokerState::Start,
        }
    }

    /// Overrides the name used for generated session names.
    pub fn with_local_username<S: Into<String>>(mut self, username: S) -> Self {
        self.local_username = username.into();
        self
    }

    pub fn state(&self) -> BrokerState {
        self.state
    }

    fn transition(&mut self, next: BrokerState) {
        debug!("broker: {} -> {}", self.state, next);
        self.state = next;
    }

    fn fail(&mut self, e: Error) -> Error {
        debug!("broker failed: {}", e);
        self.transition(BrokerState::Failed(e.kind()));
        e
    }

    pub fn plan(
        &mut self,
        account: &str,
        role: &str,
        duration: &str,
        session_name: Option<&str>,
    ) -> Result<Plan> {
        self.transition(BrokerState::Resolving);
        if account.is_empty() || role.is_empty() {
            return Err(self.fail(Error::MissingArguments));
        }

        let target = accounts::resolve(self.accounts, account, role);
        let duration_seconds = parse_seconds(duration)
            .and_then(|d| provider_duration(d).map(i64::from))
            .map_err(|e| self.fail(e.into()))?;

        // An explicit session name is passed through even if the provider will reject it.
        let session_name = session_name
            .map(|s| s.to_string())
            .unwrap_or_else(|| generate_session_name(&self.local_username));

        debug!(
            "account_id:{}, role_name:{}, duration:{}s, session:{}",
            target.account_id, target.role_name, duration_seconds, session_name
        );
        Ok(Plan {
            target,
            duration_seconds,
            session_name,
        })
    }

    /// Looks up the caller and their MFA device, reads the MFA code, then
    /// assumes the planned role, in that order.
    pub async fn assume<T, R>(
        &mut self,
        plan: &Plan,
        service: &T,
        mfa_reader: &R,
    ) -> Result<Credentials>
    where
        T: TokenService + ?Sized,
        R: ReadMfaToken + ?Sized,
    {
        match self.try_assume(plan, service, mfa_reader).await {
            Ok(credentials) => {
                self.transition(BrokerState::Success);
                Ok(credentials)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    async fn try_assume<T, R>(
        &mut self,
        plan: &Plan,
        service: &T,
        mfa_reader: &R,
    ) -> Result<Credentials>
    where
        T: TokenService + ?Sized,
        R: ReadMfaToken + ?Sized,
    {
        self.transition(BrokerState::IdentityLookup);
        let identity = resolve_identity(service).await?;
        debug!("mfa serial for {}: {}", identity.username, identity.mfa_serial);

        let token = mfa_reader
            .read_mfa_token(&identity.mfa_serial)
            .await
            .map_err(|e| Error::MfaInput(format!("{:#}", e)))?;
        if token.is_empty() {
            return Err(Error::MissingMfaToken);
        }

        let request = AssumeRequest::new(
            &plan.target.account_id,
            &plan.target.role_name,
            &plan.session_name,
            plan.duration_seconds,
            &identity.mfa_serial,
            &token,
        )?;

        self.transition(BrokerState::Assuming);
        info!("assuming {}", request.role_arn());
        service.assume_role(&request).await
    }
}
