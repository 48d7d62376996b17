use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use neotk_schema::accounts::AccountTable;

use crate::accounts::load::LoadAccounts;

/// Loads the account table from a TOML file.
#[derive(Debug, Clone)]
pub struct FileAccountsLoader {
    path: PathBuf,
    required: bool,
}

impl FileAccountsLoader {
    /// A missing file at `path` is an error.
    pub fn required<P: AsRef<Path>>(path: P) -> FileAccountsLoader {
        FileAccountsLoader {
            path: path.as_ref().to_path_buf(),
            required: true,
        }
    }

    /// A missing file at `path` yields an empty table.
    pub fn optional<P: AsRef<Path>>(path: P) -> FileAccountsLoader {
        FileAccountsLoader {
            path: path.as_ref().to_path_buf(),
            required: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LoadAccounts for FileAccountsLoader {
    async fn load_accounts(&self) -> anyhow::Result<AccountTable> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound && !self.required => {
                debug!("no account table at {}", self.path.display());
                return Ok(AccountTable::default());
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("failed to read account table {}", self.path.display())
                })
            }
        };

        let table = AccountTable::from_toml(&content)
            .with_context(|| format!("failed to load account table {}", self.path.display()))?;
        debug!(
            "loaded {} accounts from {}",
            table.accounts.len(),
            self.path.display()
        );
        Ok(table)
    }
}
