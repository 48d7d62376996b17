use std::fmt::Write;

use neotk_schema::accounts::AccountTable;

/// Lists accounts and their role aliases, optionally only `account`.
pub fn render_accounts(accounts: &AccountTable, account: Option<&str>) -> String {
    let mut s = String::new();
    for (alias, config) in accounts.accounts() {
        if account.is_some_and(|a| a != alias) {
            continue;
        }

        let _ = writeln!(s, "Account: {} ({})", alias, config.account_id_or(alias));
        for (role, role_name) in config.roles() {
            let _ = writeln!(s, "  Role: {} ({})", role, role_name);
        }
    }
    s
}
