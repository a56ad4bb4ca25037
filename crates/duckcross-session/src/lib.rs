//! Session lifecycle for the Duckcross client.
//!
//! This crate owns authentication state end to end:
//!
//! 1. **Lifecycle** — the five-state session machine ([`SessionState`])
//!    driven by [`SessionManager`]: login, logout, refresh, restore.
//! 2. **Persistence** — the credential survives a full process restart
//!    through a [`CredentialStore`] (file-backed by default).
//! 3. **Derivation** — everything above this crate sees only an
//!    [`AuthHeader`], never the raw credential.
//!
//! It also carries the onboarding-flow machine ([`AuthFlow`]) the auth
//! screens drive — pure client state with no network involvement.
//!
//! # How it fits in the stack
//!
//! ```text
//! Profile store (above)  ← derives request auth from AuthHeader
//!     ↕
//! Session layer (this crate)  ← owns the credential and its lifecycle
//!     ↕
//! HTTP layer (below)  ← provides the Backend seam and the cookie jar
//! ```

mod error;
mod flow;
mod manager;
mod session;
mod store;

pub use error::AuthError;
pub use flow::{AuthFlow, AuthPanel, WelcomeStage};
pub use manager::SessionManager;
pub use session::{AuthHeader, SessionState};
pub use store::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, StoreError,
    StoredCredential,
};
