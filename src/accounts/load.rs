use async_trait::async_trait;

use neotk_schema::accounts::AccountTable;

pub mod file;

#[async_trait]
pub trait LoadAccounts {
    async fn load_accounts(&self) -> anyhow::Result<AccountTable>;
}
