//! pwasync-lib: declarative reconciliation of Firefox web-app deployments.
//!
//! A manifest names the applications that should exist. Each run makes the
//! launchers, site directories, profiles and runtime registry match it:
//! - `manifest`: the desired-state document
//! - `desktop`: launcher files, the observed state
//! - `registry`: the runtime's profile and site identities
//! - `profile` / `site`: per-application directories
//! - `store`: the interfaces the engine works through
//! - `sync`: the reconciliation engine

pub mod consts;
pub mod desktop;
pub mod ident;
pub mod manifest;
pub mod platform;
pub mod profile;
pub mod registry;
pub mod resolve;
pub mod site;
pub mod store;
pub mod sync;
pub mod util;
