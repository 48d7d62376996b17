use std::fmt;

use anyhow::Context;
use aws_sdk_secretsmanager::types::SecretListEntry;
use aws_types::SdkConfig;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::assume_role::aws_sdk::to_chrono;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretSummary {
    pub last_accessed: Option<DateTime<Utc>>,
    pub name: String,
    pub description: Option<String>,
}

impl From<&SecretListEntry> for SecretSummary {
    fn from(entry: &SecretListEntry) -> Self {
        SecretSummary {
            last_accessed: entry.last_accessed_date().and_then(to_chrono),
            name: entry.name().unwrap_or_default().to_string(),
            description: entry.description().map(|s| s.to_string()),
        }
    }
}

impl fmt::Display for SecretSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.last_accessed {
            Some(dt) => write!(f, "{}", dt.to_rfc3339())?,
            None => f.write_str("-")?,
        }
        write!(
            f,
            ", {}, {}",
            self.name,
            self.description
                .as_deref()
                .unwrap_or("No description available")
        )
    }
}

/// Walks every page of the secrets listing.
pub async fn list_secrets(config: &SdkConfig) -> anyhow::Result<Vec<SecretSummary>> {
    let client = aws_sdk_secretsmanager::Client::new(config);
    let mut pages = client.list_secrets().into_paginator().send();

    let mut secrets = Vec::new();
    let mut page_count = 0;
    while let Some(page) = pages.next().await {
        let page = page.context("failed to list secrets")?;
        page_count += 1;
        secrets.extend(page.secret_list().iter().map(SecretSummary::from));
    }

    debug!("listed {} secrets over {} pages", secrets.len(), page_count);
    Ok(secrets)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn formats_like_a_csv_row() {
        let s = SecretSummary {
            last_accessed: Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()),
            name: "db/password".to_string(),
            description: Some("primary database".to_string()),
        };
        assert_eq!(
            s.to_string(),
            "2024-05-01T00:00:00+00:00, db/password, primary database"
        );
    }

    #[test]
    fn fills_in_missing_fields() {
        let s = SecretSummary {
            last_accessed: None,
            name: "api/key".to_string(),
            description: None,
        };
        assert_eq!(s.to_string(), "-, api/key, No description available");
    }

    #[test]
    fn converts_sdk_entries() {
        let entry = SecretListEntry::builder()
            .name("api/key")
            .description("external api")
            .build();
        let s = SecretSummary::from(&entry);
        assert_eq!(s.name, "api/key");
        assert_eq!(s.description.as_deref(), Some("external api"));
        assert_eq!(s.last_accessed, None);
    }
}
