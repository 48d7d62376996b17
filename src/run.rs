use std::io::Write;

use tracing::debug;

use neotk_schema::accounts::AccountTable;

use crate::accounts::load::LoadAccounts;
use crate::accounts::select::SelectAlias;
use crate::app::AssumeArgs;
use crate::assume_role::TokenService;
use crate::broker::Broker;
use crate::handler::federation::switch_role_url;
use crate::handler::list::render_accounts;
use crate::handler::{HandleCredentials, HandleCredentialsRequest};
use crate::mfa::ReadMfaToken;

/// The `assume` command: load the table, pick a target, then either print a
/// switch-role URL to `out` or assume the role and hand the credentials over.
pub struct AssumeRun<L, S, T, R, H, W> {
    loader: L,
    selector: S,
    service: T,
    mfa_reader: R,
    handler: H,
    out: W,
}

impl<L, S, T, R, H, W> AssumeRun<L, S, T, R, H, W>
where
    L: LoadAccounts,
    S: SelectAlias,
    T: TokenService,
    R: ReadMfaToken,
    H: HandleCredentials,
    W: Write,
{
    pub fn new(loader: L, selector: S, service: T, mfa_reader: R, handler: H, out: W) -> Self {
        Self {
            loader,
            selector,
            service,
            mfa_reader,
            handler,
            out,
        }
    }

    pub async fn run(mut self, args: AssumeArgs) -> anyhow::Result<()> {
        let accounts = self.loader.load_accounts().await?;

        if args.list_all {
            eprint!("{}", render_accounts(&accounts, None));
            return Ok(());
        }
        if args.list_only {
            eprint!("{}", render_accounts(&accounts, args.account.as_deref()));
            return Ok(());
        }

        let account = match args.account {
            Some(account) => account,
            None => self.select_account(&accounts)?.unwrap_or_default(),
        };
        let role = match args.role {
            Some(role) => role,
            None if account.is_empty() => String::new(),
            None => self.select_role(&accounts, &account)?.unwrap_or_default(),
        };

        let mut broker = Broker::new(&accounts);
        let plan = broker.plan(
            &account,
            &role,
            &args.duration,
            args.session_name.as_deref(),
        )?;

        if args.url {
            writeln!(self.out, "{}", switch_role_url(&plan.target)?)?;
            return Ok(());
        }

        eprintln!("# Assuming {}", plan.target.role_arn());
        let credentials = broker
            .assume(&plan, &self.service, &self.mfa_reader)
            .await?;
        debug!("credentials expire at {}", credentials.expiration());

        self.handler.handle_credentials(HandleCredentialsRequest {
            account: &plan.target.account,
            duration_seconds: plan.duration_seconds,
            credentials: &credentials,
        })
    }

    fn select_account(&self, accounts: &AccountTable) -> anyhow::Result<Option<String>> {
        let aliases: Vec<&str> = accounts.aliases().collect();
        self.selector.select_alias("Account", &aliases)
    }

    fn select_role(&self, accounts: &AccountTable, account: &str) -> anyhow::Result<Option<String>> {
        let roles: Vec<&str> = accounts
            .get(account)
            .map(|a| a.roles().map(|(alias, _)| alias).collect())
            .unwrap_or_default();
        self.selector.select_alias("Role", &roles)
    }
}
