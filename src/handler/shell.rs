use std::borrow::Cow;
use std::io::{self, Write};

use neotk_schema::credentials::Credentials;

use crate::handler::{EnvOverlay, HandleCredentials, HandleCredentialsRequest, Variable};

/// Prints `export` statements to `out`, for `eval $(neotk assume ...)`.
///
/// Anything that is not meant to be evaluated goes to `diag`.
pub struct ShellExportHandler<O, D> {
    out: O,
    diag: D,
}

impl ShellExportHandler<io::Stdout, io::Stderr> {
    pub fn stdio() -> Self {
        ShellExportHandler::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, D: Write> ShellExportHandler<O, D> {
    pub fn new(out: O, diag: D) -> Self {
        ShellExportHandler { out, diag }
    }
}

impl<O: Write, D: Write> HandleCredentials for ShellExportHandler<O, D> {
    fn handle_credentials(mut self, request: HandleCredentialsRequest) -> anyhow::Result<()> {
        let overlay = EnvOverlay::from(&request);
        self.out.write_all(render_exports(&overlay).as_bytes())?;
        self.out.flush()?;

        writeln!(
            self.diag,
            "{}",
            expiration_notice(request.credentials, request.duration_seconds)
        )?;
        Ok(())
    }
}

pub fn render_exports(overlay: &EnvOverlay) -> String {
    overlay
        .variables()
        .iter()
        .map(|Variable { name, value }| match value {
            Some(value) => format!("export {}={}\n", name, shell_quote(value)),
            None => format!("unset {}\n", name),
        })
        .collect()
}

/// Single-quotes `value` unless every character is safe to leave bare.
pub fn shell_quote(value: &str) -> Cow<'_, str> {
    let bare = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./:=+@%,".contains(c));
    if bare {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(format!("'{}'", value.replace('\'', "'\\''")))
    }
}

pub fn expiration_notice(credentials: &Credentials, duration_seconds: i64) -> String {
    format!(
        "# Session expires: {} ({} seconds)",
        credentials.expiration().to_rfc3339(),
        duration_seconds
    )
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn credentials() -> Credentials {
        Credentials {
            access_key_id: "AKIAEXAMPLE".to_string(),
            secret_access_key: "secret".to_string(),
            session_token: "token".to_string(),
            expiration: Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    #[test]
    fn exports_credentials_and_account() {
        let credentials = credentials();
        let mut out = Vec::new();
        let mut diag = Vec::new();
        ShellExportHandler::new(&mut out, &mut diag)
            .handle_credentials(HandleCredentialsRequest {
                account: "sit",
                duration_seconds: 3600,
                credentials: &credentials,
            })
            .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "export AWS_ACCESS_KEY_ID=AKIAEXAMPLE\n\
             export AWS_SECRET_ACCESS_KEY=secret\n\
             export AWS_SESSION_TOKEN=token\n\
             unset AWS_SECURITY_TOKEN\n\
             export TF_VAR_env=sit\n"
        );
        assert_eq!(
            String::from_utf8(diag).unwrap(),
            "# Session expires: 2030-01-02T03:04:05+00:00 (3600 seconds)\n"
        );
    }

    #[test]
    fn renders_unset_for_cleared_variables() {
        let overlay = EnvOverlay::default()
            .unset("AWS_PROFILE")
            .set("AWS_REGION", "eu-west-1");
        assert_eq!(
            render_exports(&overlay),
            "unset AWS_PROFILE\nexport AWS_REGION=eu-west-1\n"
        );
    }

    #[test]
    fn quotes_values_the_shell_would_interpret() {
        assert_eq!(shell_quote("sit"), "sit");
        assert_eq!(shell_quote("FwoGZX/abc+def=="), "FwoGZX/abc+def==");
        assert_eq!(shell_quote("a;b"), "'a;b'");
        assert_eq!(shell_quote("$HOME"), "'$HOME'");
        assert_eq!(shell_quote("dev env"), "'dev env'");
        assert_eq!(shell_quote("it's"), "'it'\\''s'");
        assert_eq!(shell_quote(""), "''");
    }

    #[test]
    fn exported_account_is_quoted() {
        let credentials = credentials();
        let request = HandleCredentialsRequest {
            account: "sit; rm -rf ~",
            duration_seconds: 3600,
            credentials: &credentials,
        };
        let rendered = render_exports(&EnvOverlay::from(&request));
        assert!(rendered.contains("export TF_VAR_env='sit; rm -rf ~'\n"));
    }
}
