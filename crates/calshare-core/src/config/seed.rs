//! Startup data for the in-memory backend.

use serde::{Deserialize, Serialize};

/// Accounts created when the server starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Accounts to register.
    #[serde(default)]
    pub accounts: Vec<SeedAccount>,
    /// URI of the calendar created for every seeded account.
    #[serde(default = "default_calendar_uri")]
    pub default_calendar: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            accounts: Vec::new(),
            default_calendar: default_calendar_uri(),
        }
    }
}

/// One seeded account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedAccount {
    /// User id; the principal is `{principal_prefix}/{id}`.
    pub id: String,
    /// Mail address, used to resolve `mailto:` sharee hrefs.
    pub email: String,
    /// Display name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Argon2 PHC string of the account password.
    pub password_hash: String,
}

fn default_calendar_uri() -> String {
    "personal".to_string()
}
