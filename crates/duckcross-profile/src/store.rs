//! The profile store: load, save, and optimistic mutation.

use duckcross_api::{LineId, Profile, ProfilePatch, StationId, WeeklySchedule};
use duckcross_http::{ApiRequest, Backend};
use duckcross_session::AuthHeader;

use crate::ProfileError;

// ---------------------------------------------------------------------------
// ProfileSlot
// ---------------------------------------------------------------------------

/// Presence of the profile, as a three-valued state.
///
/// `Unknown` and `Absent` are deliberately distinct: `Unknown` means
/// "we haven't asked", `Absent` means "we asked and the backend said
/// 404 — this account has no profile yet". Conflating them would make
/// the onboarding shell re-fetch forever or, worse, offer onboarding to
/// a user whose profile simply hasn't loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ProfileSlot {
    /// Never loaded in this process.
    #[default]
    Unknown,
    /// The backend answered 404: no profile exists yet.
    Absent,
    /// The last server-confirmed profile (or a speculative local
    /// mutation of it awaiting confirmation).
    Loaded(Profile),
}

impl ProfileSlot {
    /// The profile, if loaded.
    pub fn profile(&self) -> Option<&Profile> {
        match self {
            Self::Loaded(profile) => Some(profile),
            _ => None,
        }
    }

    /// `true` once a load has completed, whether or not a profile
    /// exists.
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

// ---------------------------------------------------------------------------
// Speculation
// ---------------------------------------------------------------------------

/// A pending optimistic mutation: the snapshot to restore if the
/// backend rejects it.
///
/// Captured *before* the speculative write is applied, and restored
/// verbatim on rollback. Restoring the snapshot (rather than undoing
/// the mutation) is what keeps a concurrently-queued second mutation
/// from being clobbered: whatever state the failed write was built on
/// comes back exactly.
struct Speculation {
    snapshot: Profile,
}

// ---------------------------------------------------------------------------
// ProfileStore
// ---------------------------------------------------------------------------

/// Holds the current profile and reconciles mutations with the backend.
///
/// ## Mutation discipline
///
/// All five mutation entry points route through one engine:
///
/// ```text
/// capture snapshot → apply locally (visible now) → PUT /profile
///        │                                            │
///        │                              ok: replace with server profile
///        └──────────── error: restore snapshot ←──────┘
/// ```
///
/// Invariant: after any failed mutation, local state is bit-for-bit the
/// last server-confirmed profile — there is no partial rollback.
///
/// Like the session manager, this is a single-owner store (`&mut self`
/// mutators); state transitions apply in completion order of the
/// underlying requests.
pub struct ProfileStore<B: Backend> {
    backend: B,
    slot: ProfileSlot,
}

impl<B: Backend> ProfileStore<B> {
    /// Creates a store with nothing loaded.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            slot: ProfileSlot::Unknown,
        }
    }

    /// Current slot state.
    pub fn slot(&self) -> &ProfileSlot {
        &self.slot
    }

    /// The profile, if loaded.
    pub fn profile(&self) -> Option<&Profile> {
        self.slot.profile()
    }

    /// Whether the onboarding welcome flow should run. `false` when no
    /// profile is loaded.
    pub fn needs_welcome(&self) -> bool {
        self.profile().is_some_and(|p| p.needs_welcome)
    }

    /// Forgets everything. Called on logout — the next account on this
    /// machine must not see the previous user's preferences.
    pub fn clear(&mut self) {
        self.slot = ProfileSlot::Unknown;
    }

    /// Fetches the profile and replaces the slot with the result.
    ///
    /// A 404 is not an error: it settles the slot to
    /// [`ProfileSlot::Absent`]. Any other non-2xx (or transport/decode
    /// failure) is [`ProfileError::LoadFailed`] and leaves the slot
    /// untouched.
    pub async fn load(
        &mut self,
        auth: &AuthHeader,
    ) -> Result<(), ProfileError> {
        let request = ApiRequest::get("/profile")
            .authorization(auth.clone().into_value());
        let response = self
            .backend
            .execute(request)
            .await
            .map_err(|e| ProfileError::LoadFailed(e.to_string()))?;

        if response.status == 404 {
            tracing::debug!("no profile yet");
            self.slot = ProfileSlot::Absent;
            return Ok(());
        }
        if !response.is_success() {
            return Err(ProfileError::LoadFailed(format!(
                "status {}",
                response.status
            )));
        }

        let profile: Profile = response
            .json()
            .map_err(|e| ProfileError::LoadFailed(e.to_string()))?;
        tracing::debug!(profile_id = %profile.id, "profile loaded");
        self.slot = ProfileSlot::Loaded(profile);
        Ok(())
    }

    /// Sends a partial update and replaces local state with the server's
    /// authoritative response.
    ///
    /// This is the one non-optimistic primitive: nothing changes locally
    /// until the server confirms. On failure the prior state stays in
    /// place and [`ProfileError::SaveFailed`] is returned.
    pub async fn save(
        &mut self,
        auth: &AuthHeader,
        patch: ProfilePatch,
    ) -> Result<(), ProfileError> {
        let confirmed = self.put_patch(auth, &patch).await?;
        self.slot = ProfileSlot::Loaded(confirmed);
        Ok(())
    }

    /// Flips whether `id` is a favorite station. Optimistic.
    pub async fn toggle_favorite_station(
        &mut self,
        auth: &AuthHeader,
        id: StationId,
    ) -> Result<(), ProfileError> {
        self.mutate(auth, |profile| {
            let favorited = if profile.favorite_stations.remove(&id) {
                false
            } else {
                profile.favorite_stations.insert(id.clone());
                true
            };
            tracing::debug!(station = %id, favorited, "favorite station toggled");
            ProfilePatch {
                favorite_stations: Some(profile.favorite_stations.clone()),
                ..ProfilePatch::default()
            }
        })
        .await
    }

    /// Flips whether `id` is a favorite line. Optimistic.
    pub async fn toggle_favorite_line(
        &mut self,
        auth: &AuthHeader,
        id: LineId,
    ) -> Result<(), ProfileError> {
        self.mutate(auth, |profile| {
            let favorited = if profile.favorite_lines.remove(&id) {
                false
            } else {
                profile.favorite_lines.insert(id.clone());
                true
            };
            tracing::debug!(line = %id, favorited, "favorite line toggled");
            ProfilePatch {
                favorite_lines: Some(profile.favorite_lines.clone()),
                ..ProfilePatch::default()
            }
        })
        .await
    }

    /// Sets or clears the notification schedule. Optimistic.
    pub async fn set_notification_schedule(
        &mut self,
        auth: &AuthHeader,
        schedule: Option<WeeklySchedule>,
    ) -> Result<(), ProfileError> {
        self.mutate(auth, |profile| {
            profile.notification_schedule = schedule.clone();
            ProfilePatch {
                notification_schedule: Some(schedule),
                ..ProfilePatch::default()
            }
        })
        .await
    }

    /// Sets the onboarding flag. Optimistic.
    pub async fn set_needs_welcome(
        &mut self,
        auth: &AuthHeader,
        needs_welcome: bool,
    ) -> Result<(), ProfileError> {
        self.mutate(auth, |profile| {
            profile.needs_welcome = needs_welcome;
            ProfilePatch {
                needs_welcome: Some(needs_welcome),
                ..ProfilePatch::default()
            }
        })
        .await
    }

    // -- Speculate / confirm / rollback engine ----------------------------

    /// Runs one optimistic mutation: snapshot, apply locally, persist,
    /// then confirm with the server's profile or roll back to the
    /// snapshot.
    ///
    /// With no profile loaded this is a no-op — there is nothing to
    /// mutate, and the matching screens aren't reachable before a load.
    async fn mutate<F>(
        &mut self,
        auth: &AuthHeader,
        apply: F,
    ) -> Result<(), ProfileError>
    where
        F: FnOnce(&mut Profile) -> ProfilePatch,
    {
        let ProfileSlot::Loaded(profile) = &mut self.slot else {
            tracing::debug!("mutation ignored: no profile loaded");
            return Ok(());
        };

        let speculation = Speculation {
            snapshot: profile.clone(),
        };
        // The optimistic write: visible to readers from here on.
        let patch = apply(profile);

        match self.put_patch(auth, &patch).await {
            Ok(confirmed) => {
                self.confirm(confirmed);
                Ok(())
            }
            Err(e) => {
                self.rollback(speculation);
                Err(e)
            }
        }
    }

    fn confirm(&mut self, confirmed: Profile) {
        self.slot = ProfileSlot::Loaded(confirmed);
    }

    fn rollback(&mut self, speculation: Speculation) {
        tracing::debug!("mutation rejected; restoring snapshot");
        self.slot = ProfileSlot::Loaded(speculation.snapshot);
    }

    /// `PUT /profile` with a partial body; returns the server's full
    /// updated profile.
    async fn put_patch(
        &self,
        auth: &AuthHeader,
        patch: &ProfilePatch,
    ) -> Result<Profile, ProfileError> {
        let body = serde_json::to_value(patch)
            .map_err(|e| ProfileError::SaveFailed(e.to_string()))?;
        let request = ApiRequest::put("/profile")
            .authorization(auth.clone().into_value())
            .json(body);

        let response = self
            .backend
            .execute(request)
            .await
            .map_err(|e| ProfileError::SaveFailed(e.to_string()))?;

        if !response.is_success() {
            return Err(ProfileError::SaveFailed(format!(
                "status {}",
                response.status
            )));
        }
        response
            .json()
            .map_err(|e| ProfileError::SaveFailed(e.to_string()))
    }
}

// =========================================================================
// Tests
// =========================================================================
