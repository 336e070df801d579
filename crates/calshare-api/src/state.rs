//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use calshare_auth::{
    AclChecker, AclResolver, CsrfTokenManager, ExtensionAuthContext, PasswordHasher, SessionStore,
};
use calshare_core::AppResult;
use calshare_core::config::AppConfig;
use calshare_core::traits::{CalendarBackend, NodeResolver};
use calshare_dav::{
    AclDiscoveryPlugin, CalendarTreeResolver, CollectionComposer, DavHandler, DavNamespaces,
    SearchReportPlugin, SharingPlugin,
};
use calshare_store::MemoryBackend;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Backend ──────────────────────────────────────────────
    /// In-memory directory, calendars, and objects
    pub backend: MemoryBackend,

    // ── Auth ─────────────────────────────────────────────────
    /// Password hasher (Argon2)
    pub password_hasher: Arc<PasswordHasher>,
    /// Browser sessions
    pub sessions: Arc<SessionStore>,
    /// CSRF tokens bound to sessions
    pub csrf: Arc<CsrfTokenManager>,

    // ── DAV ──────────────────────────────────────────────────
    /// Plugin chain answering DAV requests
    pub dav: Arc<DavHandler>,
}

impl AppState {
    /// Wires the DAV plugin chain over `backend`.
    pub fn new(config: AppConfig, backend: MemoryBackend) -> AppResult<Self> {
        let dav_config = &config.dav;

        let calendars: Arc<dyn CalendarBackend> = backend.store.clone();
        let composer = CollectionComposer::new(dav_config, calendars);
        let resolver: Arc<dyn NodeResolver> = Arc::new(CalendarTreeResolver::new(
            dav_config,
            composer,
            backend.directory.clone(),
        ));

        let auth = Arc::new(ExtensionAuthContext::new(dav_config));
        let sessions = Arc::new(SessionStore::new(&config.auth)?);
        let csrf = Arc::new(CsrfTokenManager::new(&config.auth, sessions.clone()));

        let mut sharing =
            SharingPlugin::new(dav_config, resolver.clone(), auth.clone(), csrf.clone())?;
        if dav_config.acl_enabled {
            let checker = AclChecker::new(AclResolver::new(dav_config), backend.store.clone());
            sharing = sharing.with_acl(Arc::new(checker));
        } else {
            tracing::warn!("ACL subsystem disabled: every caller may edit sharees");
        }

        let search = SearchReportPlugin::new(
            dav_config,
            resolver.clone(),
            auth.clone(),
            backend.engine.clone(),
        );
        let acl_discovery =
            AclDiscoveryPlugin::new(DavNamespaces::from(&dav_config.namespaces), resolver, auth);

        let dav = DavHandler::new(dav_config.namespaces.dav.clone())
            .with_plugin(Arc::new(sharing))
            .with_plugin(Arc::new(search))
            .with_plugin(Arc::new(acl_discovery));

        tracing::info!(handler = ?dav, "DAV plugin chain ready");

        Ok(Self {
            sessions,
            config: Arc::new(config),
            backend,
            password_hasher: Arc::new(PasswordHasher::new()),
            csrf,
            dav: Arc::new(dav),
        })
    }
}
