//! Desktop launcher entries.
//!
//! Launchers are the join key between human-facing application names and
//! the registry: each one carries its site id in a custom field, and the set
//! of launchers on disk is the set of deployed applications.

mod entry;
mod scan;
mod store;

pub use entry::{DesktopEntry, entry_file_name, resolve_icon, slug};
pub use scan::{DeployedApp, parse_entry};
pub use store::{DesktopDir, EntryError};
