//! Principal directory: accounts, mail addresses, and sharee href lookup.

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use calshare_core::AppResult;
use calshare_core::config::DavConfig;
use calshare_core::error::AppError;
use calshare_core::traits::PrincipalBackend;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// User id, the last segment of the principal URI.
    pub id: String,
    /// Mail address.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Argon2 PHC string.
    pub password_hash: String,
}

/// In-memory account directory.
#[derive(Debug)]
pub struct Directory {
    /// User id → account.
    accounts: DashMap<String, Account>,
    /// Lowercased mail address → user id.
    emails: DashMap<String, String>,
    principal_prefix: String,
}

impl Directory {
    /// Creates an empty directory.
    pub fn new(config: &DavConfig) -> Self {
        Self {
            accounts: DashMap::new(),
            emails: DashMap::new(),
            principal_prefix: config.principal_prefix.trim_matches('/').to_string(),
        }
    }

    /// Registers an account. Ids and mail addresses must be unique.
    pub fn insert(&self, account: Account) -> AppResult<()> {
        let email = account.email.to_lowercase();
        if self.accounts.contains_key(&account.id) {
            return Err(AppError::conflict(format!(
                "Account '{}' already exists",
                account.id
            )));
        }
        if self.emails.contains_key(&email) {
            return Err(AppError::conflict(format!(
                "Mail address '{}' is already registered",
                account.email
            )));
        }

        debug!(user_id = %account.id, "Registered account");
        self.emails.insert(email, account.id.clone());
        self.accounts.insert(account.id.clone(), account);
        Ok(())
    }

    /// Account by user id.
    pub fn get(&self, user_id: &str) -> Option<Account> {
        self.accounts.get(user_id).map(|a| a.value().clone())
    }

    /// User id registered for a mail address (case-insensitive).
    pub fn user_for_email(&self, email: &str) -> Option<String> {
        self.emails
            .get(&email.to_lowercase())
            .map(|id| id.value().clone())
    }

    /// Number of accounts.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the directory has no accounts.
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn principal_of(&self, user_id: &str) -> String {
        format!("{}/{}", self.principal_prefix, user_id)
    }

    /// User id of a principal URI under this directory's prefix.
    fn user_of_principal<'a>(&self, principal: &'a str) -> Option<&'a str> {
        principal
            .trim_start_matches('/')
            .trim_end_matches('/')
            .strip_prefix(self.principal_prefix.as_str())?
            .strip_prefix('/')
            .filter(|user| !user.is_empty() && !user.contains('/'))
    }
}

#[async_trait]
impl PrincipalBackend for Directory {
    async fn find_by_uri(&self, uri: &str) -> AppResult<Option<String>> {
        let user_id = if let Some(address) = uri.strip_prefix("mailto:") {
            self.user_for_email(address)
        } else if let Some(principal) = uri.strip_prefix("principal:") {
            self.user_of_principal(principal)
                .filter(|user| self.accounts.contains_key(*user))
                .map(String::from)
        } else {
            None
        };

        Ok(user_id.map(|user| self.principal_of(&user)))
    }
}
