use neotk_schema::credentials::Credentials;

pub mod federation;
pub mod list;
pub mod shell;

pub struct HandleCredentialsRequest<'a> {
    pub account: &'a str,
    pub duration_seconds: i64,
    pub credentials: &'a Credentials,
}

pub trait HandleCredentials {
    fn handle_credentials(self, request: HandleCredentialsRequest) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable<'a> {
    pub name: &'a str,
    pub value: Option<&'a str>,
}

/// Variable assignments meant for the caller's shell, not for this process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverlay<'a> {
    variables: Vec<Variable<'a>>,
}

impl<'a> EnvOverlay<'a> {
    pub fn set(mut self, name: &'a str, value: &'a str) -> Self {
        self.variables.push(Variable {
            name,
            value: Some(value),
        });
        self
    }

    pub fn unset(mut self, name: &'a str) -> Self {
        self.variables.push(Variable { name, value: None });
        self
    }

    pub fn variables(&self) -> &[Variable<'a>] {
        &self.variables
    }
}

impl<'a> From<&HandleCredentialsRequest<'a>> for EnvOverlay<'a> {
    fn from(request: &HandleCredentialsRequest<'a>) -> Self {
        EnvOverlay::default()
            // for AWS SDK, aws-cli
            .set("AWS_ACCESS_KEY_ID", request.credentials.access_key_id())
            .set("AWS_SECRET_ACCESS_KEY", request.credentials.secret_access_key())
            .set("AWS_SESSION_TOKEN", request.credentials.session_token())
            // older tools prefer this over AWS_SESSION_TOKEN, so a stale one must go
            .unset("AWS_SECURITY_TOKEN")
            // for terraform workspaces
            .set("TF_VAR_env", request.account)
    }
}
