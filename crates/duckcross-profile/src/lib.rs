//! Optimistic profile store for the Duckcross client.
//!
//! Holds the user's profile and preferences (favorite stations/lines,
//! notification schedule, onboarding flag) and reconciles local
//! mutations with the backend:
//!
//! - Mutations apply **locally first** — the UI sees the flip before the
//!   network confirms it.
//! - Every mutation then persists through the single `PUT /profile`
//!   path; the server's response is authoritative and replaces local
//!   state wholesale.
//! - On failure, the store rolls back to the exact snapshot captured
//!   before the speculative write — never a recomputed inverse.
//!
//! # Key types
//!
//! - [`ProfileStore`] — the store itself
//! - [`ProfileSlot`] — three-valued presence: never loaded / known
//!   absent / loaded
//! - [`ProfileError`] — load/save failures, surfaced to the caller

mod error;
mod store;

pub use error::ProfileError;
pub use store::{ProfileSlot, ProfileStore};
