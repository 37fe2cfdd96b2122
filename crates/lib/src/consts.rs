//! Fixed names shared between the stores and the browser runtime.

use std::time::Duration;

/// Runtime data directory under the XDG data home, owned by the browser runtime.
pub const RUNTIME_DIR: &str = "firefoxpwa";
pub const REGISTRY_FILENAME: &str = "config.json";
pub const SITES_DIR: &str = "sites";
pub const PROFILES_DIR: &str = "profiles";
pub const APPLICATIONS_DIR: &str = "applications";

/// Every launcher we own ends with this suffix; anything else in the
/// applications directory is left alone.
pub const DESKTOP_SUFFIX: &str = "-fpwa.desktop";
pub const SITE_FIELD: &str = "X-FirefoxPWA-Site";
pub const WM_CLASS_PREFIX: &str = "FFPWA-";
pub const LAUNCH_COMMAND: &str = "firefoxpwa site launch";
pub const DEFAULT_CATEGORIES: &[&str] = &["Network", "WebBrowser"];

pub const WEB_MANIFEST_FILENAME: &str = "manifest.json";
pub const SITE_ICON_FILENAME: &str = "icon.png";

pub const PREFS_FILENAME: &str = "user.js";
pub const POLICIES_DIR: &str = "distribution";
pub const POLICIES_FILENAME: &str = "policies.json";

pub const URL_RESOLVE_TIMEOUT: Duration = Duration::from_secs(3);
pub const URL_RESOLVE_MAX_REDIRECTS: usize = 10;
pub const RESOLVE_USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 10)";
pub const PROFILE_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:130.0) Gecko/20100101 Firefox/130.0";
