//! Error types for the profile layer.

/// Errors that can occur loading or saving the profile.
///
/// Both are surfaced to the caller (the UI renders the reason), and
/// neither corrupts store state: a failed load leaves the slot as it
/// was, a failed save rolls local state back to the last known-good
/// profile.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// `GET /profile` failed with anything other than a 404.
    #[error("profile load failed: {0}")]
    LoadFailed(String),

    /// `PUT /profile` failed; local state was rolled back.
    #[error("profile save failed: {0}")]
    SaveFailed(String),
}
