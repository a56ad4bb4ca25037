//! Wire types for the Duckcross backend contract.
//!
//! This crate defines every JSON shape that travels between the client
//! and the `/v1` API: identity newtypes, the station-status feed, the
//! user profile, and the auth request/response payloads.
//!
//! # Architecture
//!
//! The api layer is pure data. It doesn't know how requests are made or
//! where state is stored — it only pins down the contract so that the
//! session, profile, and cache layers all agree on field names and
//! shapes. The backend is the source of truth for these types; the serde
//! attributes here exist to match its JSON exactly.
//!
//! ```text
//! HTTP (bytes) → api (typed contract) → stores (stateful layers)
//! ```

mod types;

pub use types::{
    API_PREFIX, LineId, LoginRequest, LoginResponse, Profile, ProfilePatch,
    RefreshResponse, Station, StationId, StationStatus, UserId,
    WeeklySchedule,
};
