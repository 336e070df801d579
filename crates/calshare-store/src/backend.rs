//! Wiring of the in-memory collaborators and startup seeding.

use std::sync::Arc;

use tracing::info;

use calshare_core::AppResult;
use calshare_core::config::{DavConfig, SeedConfig};

use crate::calendars::MemoryStore;
use crate::directory::{Account, Directory};
use crate::objects::MemoryQueryEngine;

/// The directory, calendar store, and query engine sharing one state.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    /// Accounts and sharee href lookup.
    pub directory: Arc<Directory>,
    /// Calendars and share grants.
    pub store: Arc<MemoryStore>,
    /// Calendar objects and search.
    pub engine: Arc<MemoryQueryEngine>,
    config: DavConfig,
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new(config: &DavConfig) -> Self {
        let directory = Arc::new(Directory::new(config));
        let store = Arc::new(MemoryStore::new(directory.clone()));
        let engine = Arc::new(MemoryQueryEngine::new(config, store.clone()));
        Self {
            directory,
            store,
            engine,
            config: config.clone(),
        }
    }

    /// Creates a backend holding the seeded accounts, each with one
    /// calendar named `seed.default_calendar`.
    pub fn seeded(config: &DavConfig, seed: &SeedConfig) -> AppResult<Self> {
        let backend = Self::new(config);
        for account in &seed.accounts {
            let display_name = account
                .display_name
                .clone()
                .unwrap_or_else(|| account.id.clone());
            backend.directory.insert(Account {
                id: account.id.clone(),
                email: account.email.clone(),
                display_name: display_name.clone(),
                password_hash: account.password_hash.clone(),
            })?;
            backend.store.create_calendar(
                &backend.config.principal_for(&account.id),
                &seed.default_calendar,
                &display_name,
                &["VEVENT", "VTODO"],
            )?;
        }

        info!(accounts = seed.accounts.len(), "Seeded in-memory backend");
        Ok(backend)
    }
}
