use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("invalid account table: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("account alias must not be empty or contain whitespace: {0:?}")]
    InvalidAlias(String),

    #[error("account_id of {alias} must be numeric, got {account_id:?}")]
    InvalidAccountId { alias: String, account_id: String },

    #[error("role {role:?} of account {alias} must map to a non-empty role name")]
    InvalidRole { alias: String, role: String },

    #[error("cluster {cluster:?} of account {alias} has an empty field")]
    InvalidCluster { alias: String, cluster: String },
}

/// Static table of known accounts, keyed by alias.
///
/// Aliases are unique by construction: the TOML parser rejects duplicate keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountTable {
    #[serde(default)]
    pub accounts: BTreeMap<String, AccountConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountConfig {
    pub account_id: Option<String>,

    #[serde(default)]
    pub roles: BTreeMap<String, String>,

    #[serde(default)]
    pub clusters: BTreeMap<String, ClusterConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClusterConfig {
    Eks(EksCluster),
    Kops(KopsCluster),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EksCluster {
    pub cluster: String,
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KopsCluster {
    pub cluster: String,
    pub bucket: String,
}

impl ClusterConfig {
    pub fn cluster(&self) -> &str {
        match self {
            ClusterConfig::Eks(c) => &c.cluster,
            ClusterConfig::Kops(c) => &c.cluster,
        }
    }
}

impl AccountConfig {
    /// The configured account id, or `alias` when none is set.
    pub fn account_id_or<'a>(&'a self, alias: &'a str) -> &'a str {
        self.account_id.as_deref().unwrap_or(alias)
    }

    pub fn role_name(&self, role: &str) -> Option<&str> {
        self.roles.get(role).map(|s| s.as_str())
    }

    pub fn cluster(&self, name: &str) -> Option<&ClusterConfig> {
        self.clusters.get(name)
    }

    pub fn roles(&self) -> impl Iterator<Item = (&str, &str)> {
        self.roles.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn cluster_names(&self) -> impl Iterator<Item = &str> {
        self.clusters.keys().map(|k| k.as_str())
    }
}

impl AccountTable {
    pub fn from_toml(s: &str) -> Result<AccountTable, SchemaError> {
        let table: AccountTable = toml::from_str(s)?;
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        for (alias, account) in &self.accounts {
            if alias.is_empty() || alias.chars().any(char::is_whitespace) {
                return Err(SchemaError::InvalidAlias(alias.clone()));
            }

            if let Some(account_id) = account.account_id.as_deref() {
                if account_id.is_empty() || !account_id.chars().all(|c| c.is_ascii_digit()) {
                    return Err(SchemaError::InvalidAccountId {
                        alias: alias.clone(),
                        account_id: account_id.to_string(),
                    });
                }
            }

            for (role, role_name) in &account.roles {
                if role.is_empty() || role_name.trim().is_empty() {
                    return Err(SchemaError::InvalidRole {
                        alias: alias.clone(),
                        role: role.clone(),
                    });
                }
            }

            for (name, cluster) in &account.clusters {
                let other = match cluster {
                    ClusterConfig::Eks(c) => &c.alias,
                    ClusterConfig::Kops(c) => &c.bucket,
                };
                if name.is_empty() || cluster.cluster().is_empty() || other.is_empty() {
                    return Err(SchemaError::InvalidCluster {
                        alias: alias.clone(),
                        cluster: name.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn get(&self, alias: &str) -> Option<&AccountConfig> {
        self.accounts.get(alias)
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.accounts.keys().map(|k| k.as_str())
    }

    pub fn accounts(&self) -> impl Iterator<Item = (&str, &AccountConfig)> {
        self.accounts.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"
[accounts.sit]
account_id = "111111111111"

[accounts.sit.roles]
poweruser = "NeoDevopsPoweruser"
readonly = "NeoReadOnly"

[accounts.sit.clusters.main]
cluster = "sit-eks"
alias = "sit"

[accounts.sit.clusters.legacy]
cluster = "legacy.k8s.local"
bucket = "sit-kops-state"

[accounts.sandbox]
"#;

    #[test]
    fn parses_typed_table() {
        let table = AccountTable::from_toml(TABLE).unwrap();
        let sit = table.get("sit").unwrap();
        assert_eq!(sit.account_id_or("sit"), "111111111111");
        assert_eq!(sit.role_name("poweruser"), Some("NeoDevopsPoweruser"));
        assert!(matches!(sit.cluster("main"), Some(ClusterConfig::Eks(_))));
        assert!(matches!(sit.cluster("legacy"), Some(ClusterConfig::Kops(_))));
        assert_eq!(table.aliases().collect::<Vec<_>>(), vec!["sandbox", "sit"]);
    }

    #[test]
    fn account_id_defaults_to_alias() {
        let table = AccountTable::from_toml(TABLE).unwrap();
        let sandbox = table.get("sandbox").unwrap();
        assert_eq!(sandbox.account_id_or("sandbox"), "sandbox");
        assert_eq!(sandbox.roles().count(), 0);
    }

    #[test]
    fn rejects_unknown_fields() {
        let r = AccountTable::from_toml("[accounts.sit]\naccount = \"1\"\n");
        assert!(matches!(r, Err(SchemaError::Toml(_))));
    }

    #[test]
    fn rejects_non_numeric_account_id() {
        let r = AccountTable::from_toml("[accounts.sit]\naccount_id = \"abc\"\n");
        assert!(matches!(r, Err(SchemaError::InvalidAccountId { .. })));
    }

    #[test]
    fn rejects_empty_role_name() {
        let r = AccountTable::from_toml("[accounts.sit.roles]\npoweruser = \" \"\n");
        assert!(matches!(r, Err(SchemaError::InvalidRole { .. })));
    }

    #[test]
    fn rejects_duplicate_aliases() {
        let r = AccountTable::from_toml("[accounts.sit]\n[accounts.sit]\n");
        assert!(r.is_err());
    }

    #[test]
    fn rejects_cluster_without_alias_or_bucket() {
        let r = AccountTable::from_toml("[accounts.sit.clusters.main]\ncluster = \"x\"\n");
        assert!(r.is_err());
    }
}
