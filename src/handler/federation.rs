use reqwest::Url;

use crate::accounts::Target;

mod endpoints {
    pub const SWITCH_ROLE: &str = "https://signin.aws.amazon.com/switchrole";
}

/// Console link that switches the signed-in user into `target`.
///
/// Needs no credentials: the console asks for MFA itself.
pub fn switch_role_url(target: &Target) -> anyhow::Result<Url> {
    let query = [
        ("account", target.account_id.clone()),
        ("roleName", target.role_name.clone()),
        ("displayName", format!("{} - {}", target.account, target.role)),
    ];

    let url = Url::parse_with_params(endpoints::SWITCH_ROLE, query)?;
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_account_role_and_label() {
        let target = Target {
            account: "sit".to_string(),
            role: "poweruser".to_string(),
            account_id: "1111".to_string(),
            role_name: "NeoDevopsPoweruser".to_string(),
        };

        let url = switch_role_url(&target).unwrap();
        assert_eq!(url.host_str(), Some("signin.aws.amazon.com"));
        assert_eq!(url.path(), "/switchrole");

        let pairs = url.query_pairs().into_owned().collect::<Vec<_>>();
        assert_eq!(
            pairs,
            vec![
                ("account".to_string(), "1111".to_string()),
                ("roleName".to_string(), "NeoDevopsPoweruser".to_string()),
                ("displayName".to_string(), "sit - poweruser".to_string()),
            ]
        );
    }
}
