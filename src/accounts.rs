use neotk_schema::accounts::AccountTable;

pub mod load;
pub mod select;

/// Account and role after alias resolution, together with the tokens the
/// caller typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub account: String,
    pub role: String,
    pub account_id: String,
    pub role_name: String,
}

impl Target {
    pub fn role_arn(&self) -> String {
        role_arn(&self.account_id, &self.role_name)
    }
}

pub fn role_arn(account_id: &str, role_name: &str) -> String {
    format!("arn:aws:iam::{}:role/{}", account_id, role_name)
}

/// Resolves account and role tokens against the account table.
///
/// Unknown tokens pass through unchanged; validation is left to the provider.
pub fn resolve(accounts: &AccountTable, account: &str, role: &str) -> Target {
    let (account_id, role_name) = match accounts.get(account) {
        Some(config) => (
            config.account_id_or(account),
            config.role_name(role).unwrap_or(role),
        ),
        None => (account, role),
    };

    Target {
        account: account.to_string(),
        role: role.to_string(),
        account_id: account_id.to_string(),
        role_name: role_name.to_string(),
    }
}
