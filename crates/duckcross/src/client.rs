//! `DuckcrossClient` builder and facade.
//!
//! This is the entry point for embedding the client core. It ties the
//! layers together the way the dashboard uses them: one shared backend
//! (and therefore one cookie jar), the session manager as the sole
//! owner of the credential, and the profile/cache stores consuming what
//! the session derives.

use std::path::PathBuf;

use duckcross_api::{
    LineId, Profile, ProfilePatch, Station, StationId, UserId,
    WeeklySchedule,
};
use duckcross_cache::{
    CacheConfig, FetchOutcome, StationCache, StationSnapshot,
};
use duckcross_http::Backend;
#[cfg(feature = "reqwest-backend")]
use duckcross_http::ReqwestBackend;
use duckcross_profile::ProfileStore;
use duckcross_session::{
    AuthHeader, CredentialStore, SessionManager, SessionState,
};
#[cfg(feature = "reqwest-backend")]
use duckcross_session::FileCredentialStore;

use crate::DuckcrossError;

/// The production API host.
pub const DEFAULT_BASE_URL: &str = "https://api.duckcross.com";

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for a production [`DuckcrossClient`].
///
/// # Example
///
/// ```rust,no_run
/// use duckcross::DuckcrossClient;
///
/// # async fn run() -> Result<(), duckcross::DuckcrossError> {
/// let mut client = DuckcrossClient::builder().build()?;
/// if !client.restore().await {
///     client.login("a@b.com", "secret1").await?;
/// }
/// client.start_auto_refresh();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DuckcrossClientBuilder {
    base_url: String,
    credential_path: Option<PathBuf>,
    cache_config: CacheConfig,
}

impl DuckcrossClientBuilder {
    /// Creates a builder with production defaults.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credential_path: None,
            cache_config: CacheConfig::default(),
        }
    }

    /// Points the client at a different API host (staging, local).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides where the credential file lives.
    pub fn credential_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credential_path = Some(path.into());
        self
    }

    /// Overrides the cache timing (cooldown, refresh interval).
    pub fn cache_config(mut self, config: CacheConfig) -> Self {
        self.cache_config = config;
        self
    }

    /// Builds the client with the real HTTP backend and the file-backed
    /// credential store.
    #[cfg(feature = "reqwest-backend")]
    pub fn build(
        self,
    ) -> Result<
        DuckcrossClient<ReqwestBackend, FileCredentialStore>,
        DuckcrossError,
    > {
        let backend = ReqwestBackend::new(&self.base_url)?;
        let store = match self.credential_path {
            Some(path) => FileCredentialStore::new(path),
            None => FileCredentialStore::with_default_path(),
        };
        Ok(DuckcrossClient::assemble(backend, store, self.cache_config))
    }
}

impl Default for DuckcrossClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// DuckcrossClient
// ---------------------------------------------------------------------------

/// The assembled client core: session + profile + station cache over
/// one shared backend.
///
/// Data flows the one direction the design allows: the session manager
/// produces an [`AuthHeader`], and every profile call derives it fresh
/// at call time — so a refresh that rotated the token mid-session is
/// picked up by the very next request, and nothing above the session
/// layer ever touches the raw credential.
pub struct DuckcrossClient<B, S>
where
    B: Backend + Clone,
    S: CredentialStore,
{
    session: SessionManager<B, S>,
    profile: ProfileStore<B>,
    cache: StationCache<B>,
}

#[cfg(feature = "reqwest-backend")]
impl DuckcrossClient<ReqwestBackend, FileCredentialStore> {
    /// Creates a builder for the production wiring.
    pub fn builder() -> DuckcrossClientBuilder {
        DuckcrossClientBuilder::new()
    }
}

impl<B, S> DuckcrossClient<B, S>
where
    B: Backend + Clone,
    S: CredentialStore,
{
    /// Assembles a client over an injected backend and credential
    /// store, with default cache timing. This is the constructor tests
    /// and embedders with their own transport use.
    pub fn with_backend(backend: B, store: S) -> Self {
        Self::assemble(backend, store, CacheConfig::default())
    }

    pub(crate) fn assemble(
        backend: B,
        store: S,
        cache_config: CacheConfig,
    ) -> Self {
        Self {
            session: SessionManager::new(backend.clone(), store),
            profile: ProfileStore::new(backend.clone()),
            cache: StationCache::with_config(backend, cache_config),
        }
    }

    // -- Session ----------------------------------------------------------

    /// Logs in with email/password. See
    /// [`SessionManager::login`](duckcross_session::SessionManager::login).
    pub async fn login(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<(), DuckcrossError> {
        self.session.login(email, password).await?;
        Ok(())
    }

    /// Restores a persisted session and, when it validates, loads the
    /// profile behind it. Returns whether the session is authenticated.
    ///
    /// A profile-load failure after a successful restore is absorbed
    /// (logged); the profile can be re-fetched explicitly with
    /// [`load_profile`](Self::load_profile).
    pub async fn restore(&mut self) -> bool {
        let authenticated = self.session.restore_from_storage().await;
        if authenticated {
            let auth = self.session.authorization_header();
            if let Err(e) = self.profile.load(&auth).await {
                tracing::warn!(
                    error = %e,
                    "profile load after restore failed"
                );
            }
        }
        authenticated
    }

    /// Logs out and forgets the profile — the next account on this
    /// machine starts clean.
    pub async fn logout(&mut self) -> Result<(), DuckcrossError> {
        self.session.logout().await?;
        self.profile.clear();
        Ok(())
    }

    /// Forces a session refresh. Returns whether the session ended up
    /// authenticated.
    pub async fn refresh_session(&mut self) -> bool {
        self.session.refresh().await
    }

    /// Current session state.
    pub fn session_state(&self) -> SessionState {
        self.session.state()
    }

    /// `true` iff the session is authenticated.
    pub fn authenticated(&self) -> bool {
        self.session.authenticated()
    }

    /// The logged-in user's id, if known.
    pub fn user_id(&self) -> Option<UserId> {
        self.session.user_id()
    }

    /// The derived authorization header (for embedders making their own
    /// authorized calls).
    pub fn authorization_header(&self) -> AuthHeader {
        self.session.authorization_header()
    }

    // -- Profile ----------------------------------------------------------

    /// Loads (or reloads) the profile.
    pub async fn load_profile(&mut self) -> Result<(), DuckcrossError> {
        let auth = self.session.authorization_header();
        self.profile.load(&auth).await?;
        Ok(())
    }

    /// Saves a partial profile update (non-optimistic primitive).
    pub async fn save_profile(
        &mut self,
        patch: ProfilePatch,
    ) -> Result<(), DuckcrossError> {
        let auth = self.session.authorization_header();
        self.profile.save(&auth, patch).await?;
        Ok(())
    }

    /// Optimistically toggles a favorite station.
    pub async fn toggle_favorite_station(
        &mut self,
        id: StationId,
    ) -> Result<(), DuckcrossError> {
        let auth = self.session.authorization_header();
        self.profile.toggle_favorite_station(&auth, id).await?;
        Ok(())
    }

    /// Optimistically toggles a favorite line.
    pub async fn toggle_favorite_line(
        &mut self,
        id: LineId,
    ) -> Result<(), DuckcrossError> {
        let auth = self.session.authorization_header();
        self.profile.toggle_favorite_line(&auth, id).await?;
        Ok(())
    }

    /// Optimistically sets or clears the notification schedule.
    pub async fn set_notification_schedule(
        &mut self,
        schedule: Option<WeeklySchedule>,
    ) -> Result<(), DuckcrossError> {
        let auth = self.session.authorization_header();
        self.profile
            .set_notification_schedule(&auth, schedule)
            .await?;
        Ok(())
    }

    /// Optimistically sets the onboarding flag.
    pub async fn set_needs_welcome(
        &mut self,
        needs_welcome: bool,
    ) -> Result<(), DuckcrossError> {
        let auth = self.session.authorization_header();
        self.profile
            .set_needs_welcome(&auth, needs_welcome)
            .await?;
        Ok(())
    }

    /// The loaded profile, if any.
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.profile()
    }

    /// Whether the onboarding welcome flow should run.
    pub fn needs_welcome(&self) -> bool {
        self.profile.needs_welcome()
    }

    // -- Station data -----------------------------------------------------

    /// Fetches station data on demand, subject to the cooldown. See
    /// [`StationCache::get_data`](duckcross_cache::StationCache::get_data).
    pub async fn refresh_station_data(
        &self,
    ) -> Result<FetchOutcome, DuckcrossError> {
        Ok(self.cache.get_data().await?)
    }

    /// Copy of the current station snapshot.
    pub fn station_snapshot(&self) -> StationSnapshot {
        self.cache.snapshot()
    }

    /// The stations from the last successful fetch.
    pub fn stations(&self) -> Vec<Station> {
        self.cache.stations()
    }

    /// Starts the background station-data refresh loop (idempotent).
    pub fn start_auto_refresh(&mut self) {
        self.cache.start_auto_refresh();
    }

    /// Stops the background refresh loop.
    pub fn stop_auto_refresh(&mut self) {
        self.cache.stop_auto_refresh();
    }

    // -- Layer access -----------------------------------------------------

    /// The underlying session manager (read-only).
    pub fn session(&self) -> &SessionManager<B, S> {
        &self.session
    }

    /// The underlying station cache (read-only).
    pub fn station_cache(&self) -> &StationCache<B> {
        &self.cache
    }
}
