use std::io;

use anyhow::Context;
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use tracing::debug;

use crate::accounts::load::LoadAccounts;
use crate::accounts::select::{InteractiveSelector, SelectAlias};
use crate::assume_role::aws_sdk::{assumed_config, default_config, AwsSdkTokenService};
use crate::assume_role::defaults;
use crate::broker::Broker;
use crate::handler::shell::ShellExportHandler;
use crate::kubecfg::fetch_kubecfg;
use crate::mfa::MfaReader;
use crate::run::AssumeRun;
use crate::secrets::list_secrets;
use crate::settings::Settings;

#[derive(Debug, Parser)]
#[command(
    name = "neotk",
    version,
    about = "Assume roles across AWS accounts with MFA"
)]
pub struct Cli {
    #[arg(short = 'v', long, global = true, action = ArgAction::Count, help = "Increase verbosity (-v info, -vv debug)")]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Print temporary credentials for ACCOUNT and ROLE as shell exports")]
    Assume(AssumeArgs),
    #[command(about = "List secrets, optionally under an assumed role")]
    ListSecrets(ListSecretsArgs),
    #[command(about = "Fetch the kubeconfig entry of a configured cluster")]
    Kubecfg(KubecfgArgs),
    #[command(about = "Generate shell completion scripts")]
    Completions(CompletionsArgs),
}

/// ACCOUNT and ROLE may be aliases from the account table, or a literal
/// account id and role name.
///
///     eval $(neotk assume sit poweruser) && aws s3 ls
///     eval $(neotk assume 123456789012 NeoDevopsPoweruser -t 123456)
#[derive(Debug, Args)]
pub struct AssumeArgs {
    #[arg(env = "NEOTK_ASSUME_ACCOUNT")]
    pub account: Option<String>,

    #[arg(env = "NEOTK_ASSUME_ROLE")]
    pub role: Option<String>,

    #[arg(short, long, env = "NEOTK_ASSUME_DURATION", default_value = defaults::DURATION, help = "Duration in seconds or with units (d, h, m, s)")]
    pub duration: String,

    #[arg(short, long, help = "MFA token")]
    pub token: Option<String>,

    #[arg(short, long, env = "NEOTK_ASSUME_SESSION", help = "Desired session name")]
    pub session_name: Option<String>,

    #[arg(long, help = "Print a console switch-role URL instead of environment variables")]
    pub url: bool,

    #[arg(short, long, help = "List the roles of ACCOUNT, or every account")]
    pub list_only: bool,

    #[arg(short = 'a', long, help = "List every account and role")]
    pub list_all: bool,
}

#[derive(Debug, Args)]
pub struct ListSecretsArgs {
    #[arg(requires = "role")]
    pub account: Option<String>,

    pub role: Option<String>,

    #[arg(short, long, help = "MFA token")]
    pub token: Option<String>,
}

#[derive(Debug, Args)]
pub struct KubecfgArgs {
    pub account: String,

    pub cluster: Option<String>,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    pub shell: clap_complete::Shell,
}

fn select(label: &str, candidates: Vec<&str>) -> anyhow::Result<Option<String>> {
    InteractiveSelector.select_alias(label, &candidates)
}

impl Cli {
    pub async fn execute(self) -> anyhow::Result<()> {
        let settings = Settings::from_env();
        debug!("settings: {:?}", settings);

        match self.command {
            Commands::Assume(args) => assume(args, &settings).await,
            Commands::ListSecrets(args) => secrets(args, &settings).await,
            Commands::Kubecfg(args) => kubecfg(args, &settings).await,
            Commands::Completions(args) => {
                clap_complete::generate(
                    args.shell,
                    &mut Cli::command(),
                    "neotk",
                    &mut io::stdout(),
                );
                Ok(())
            }
        }
    }
}

async fn assume(args: AssumeArgs, settings: &Settings) -> anyhow::Result<()> {
    let service = AwsSdkTokenService::load(&settings.profile, &settings.region).await;
    let mfa_reader = MfaReader::from_token(args.token.as_deref());

    AssumeRun::new(
        settings.accounts_loader(),
        InteractiveSelector,
        service,
        mfa_reader,
        ShellExportHandler::stdio(),
        io::stdout(),
    )
    .run(args)
    .await
}

async fn secrets(args: ListSecretsArgs, settings: &Settings) -> anyhow::Result<()> {
    let config = match (args.account, args.role) {
        (Some(account), Some(role)) => {
            let accounts = settings.accounts_loader().load_accounts().await?;
            if accounts.get(&account).is_none() {
                anyhow::bail!("missing account {} in the account table", account);
            }

            let mut broker = Broker::new(&accounts);
            let duration = defaults::SECRETS_DURATION_SECONDS.to_string();
            let plan = broker.plan(&account, &role, &duration, None)?;
            eprintln!("# Assuming {}", plan.target.role_arn());

            let service = AwsSdkTokenService::load(&settings.profile, &settings.region).await;
            let mfa_reader = MfaReader::from_token(args.token.as_deref());
            let credentials = broker.assume(&plan, &service, &mfa_reader).await?;
            assumed_config(&credentials, &settings.region).await
        }
        _ => {
            eprintln!("# Using the current account and role");
            default_config(&settings.region).await
        }
    };

    for secret in list_secrets(&config).await? {
        println!("{}", secret);
    }
    Ok(())
}

async fn kubecfg(args: KubecfgArgs, settings: &Settings) -> anyhow::Result<()> {
    let accounts = settings.accounts_loader().load_accounts().await?;
    let account = accounts.get(&args.account).with_context(|| {
        format!(
            "unknown account {}, expected one of: {}",
            args.account,
            accounts.aliases().collect::<Vec<_>>().join(", ")
        )
    })?;

    let cluster_name = match args.cluster {
        Some(cluster) => cluster,
        None => select("Cluster", account.cluster_names().collect())?
            .context("no cluster selected")?,
    };
    let cluster = account
        .cluster(&cluster_name)
        .with_context(|| format!("unknown cluster {} for {}", cluster_name, args.account))?;

    fetch_kubecfg(cluster)
}
