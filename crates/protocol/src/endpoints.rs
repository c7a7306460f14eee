//! Fixed endpoint paths, relative to the controller base address.

/// Exchanges credentials for a session cookie.
pub const LOGIN_PATH: &str = "/api/login";

/// Invalidates the current session cookie.
pub const LOGOUT_PATH: &str = "/api/auth/logout";

/// Site used when none is configured.
pub const DEFAULT_SITE: &str = "default";

/// Returns the site-scoped station manager path, e.g. `/api/s/default/cmd/stamgr`.
pub fn station_manager_path(site: &str) -> String {
	format!("/api/s/{site}/cmd/stamgr")
}
