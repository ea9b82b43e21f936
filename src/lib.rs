//! Workspace placeholder crate.
//!
//! This crate exists to expose feature flags that map to the individual
//! workspace crates (`core-auth`, `core-runtime`, `provider-google-drive`).
//! Sync frameworks can depend on `harmony-drive-workspace` and enable the
//! provider they need without wiring each crate individually.

#[cfg(feature = "core")]
pub use core_auth;
#[cfg(feature = "core")]
pub use core_runtime;
#[cfg(feature = "google-drive")]
pub use provider_google_drive;
