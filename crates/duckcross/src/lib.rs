//! # Duckcross
//!
//! Client-side session and data synchronization core for the Duckcross
//! transit-status dashboard.
//!
//! Duckcross keeps a user's session alive across process restarts,
//! gates access to protected views at the edge, reconciles
//! locally-mutated preferences with the backend under unreliable
//! network conditions, and maintains a rate-limited, periodically
//! refreshed cache of live station status.
//!
//! ## Layers
//!
//! ```text
//! duckcross            ← this crate: unified error + assembled client
//! ├── duckcross-session   session lifecycle + credential persistence
//! ├── duckcross-profile   optimistic preference store
//! ├── duckcross-cache     rate-limited polling cache
//! ├── duckcross-gate      edge admission check
//! ├── duckcross-http      backend seam (reqwest / mock)
//! └── duckcross-api       /v1 wire types
//! ```
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use duckcross::prelude::*;
//!
//! # async fn run() -> Result<(), DuckcrossError> {
//! let mut client = DuckcrossClient::builder().build()?;
//!
//! // Pick up a persisted session, or log in fresh.
//! if !client.restore().await {
//!     client.login("a@b.com", "secret1").await?;
//!     client.load_profile().await?;
//! }
//!
//! // Live station data: one immediate fetch, then every 60 s.
//! client.start_auto_refresh();
//! # Ok(())
//! # }
//! ```

mod client;
mod error;

pub use client::{
    DuckcrossClient, DuckcrossClientBuilder, DEFAULT_BASE_URL,
};
pub use error::DuckcrossError;

/// One-stop imports for embedders.
pub mod prelude {
    pub use crate::{
        DuckcrossClient, DuckcrossClientBuilder, DuckcrossError,
    };
    pub use duckcross_api::{
        LineId, Profile, ProfilePatch, Station, StationId, StationStatus,
        UserId, WeeklySchedule,
    };
    pub use duckcross_cache::{
        CacheConfig, DataError, FetchOutcome, StationSnapshot,
    };
    pub use duckcross_gate::{
        AccessGate, GateConfig, GateDecision, GateRequest,
    };
    pub use duckcross_http::Backend;
    pub use duckcross_session::{
        AuthFlow, AuthHeader, AuthPanel, SessionState, WelcomeStage,
    };
}
