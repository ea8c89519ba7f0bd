//! Mapping between logical portal paths and the paths the browser shows.
//!
//! A portal page such as the admin user list has one logical path, `/users`.
//! On `admin.example.com` that is also the browser path. On the main host the
//! same page lives under `/admin/users`.

use crate::portal::Portal;

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const SETUP_PATH: &str = "/setup";
pub const VERIFICATION_PENDING_PATH: &str = "/verification-pending";

/// How the active portal is expressed in the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Addressing {
    /// The hostname names the portal; paths are bare.
    Hostname,
    /// The main host serves the portal under its path prefix.
    Prefix,
}

/// Portal and addressing in effect for one location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortalContext {
    /// Portal resolved from the hostname.
    pub subdomain: Portal,
    /// Portal whose pages are being addressed.
    pub portal: Portal,
    /// Whether paths carry the portal prefix.
    pub addressing: Addressing,
}

impl PortalContext {
    #[must_use]
    pub const fn new(subdomain: Portal, portal: Portal, addressing: Addressing) -> Self {
        Self {
            subdomain,
            portal,
            addressing,
        }
    }

    /// Derive the context for a browser path served from `subdomain`.
    #[must_use]
    pub fn detect(subdomain: Portal, path: &str) -> Self {
        if subdomain != Portal::Main {
            return Self::new(subdomain, subdomain, Addressing::Hostname);
        }
        match prefix_portal(path) {
            Some(portal) => Self::new(subdomain, portal, Addressing::Prefix),
            None => Self::new(subdomain, Portal::Main, Addressing::Hostname),
        }
    }

    /// Browser path for a logical path in this context.
    #[must_use]
    pub fn scoped(&self, logical: &str) -> String {
        scoped_path(self.portal, self.addressing, logical)
    }

    /// Logical path for a browser path in this context.
    #[must_use]
    pub fn logical(&self, path: &str) -> String {
        let path = normalize_path(path);
        if self.addressing == Addressing::Hostname {
            return path;
        }
        match self.portal.prefix() {
            Some(prefix) => match path.strip_prefix(prefix) {
                Some("") => "/".to_string(),
                Some(rest) if rest.starts_with('/') => rest.to_string(),
                _ => path,
            },
            None => path,
        }
    }

    #[must_use]
    pub fn login_path(&self) -> String {
        self.scoped(LOGIN_PATH)
    }

    #[must_use]
    pub fn dashboard_path(&self) -> String {
        self.scoped(DASHBOARD_PATH)
    }

    #[must_use]
    pub fn setup_path(&self) -> String {
        self.scoped(SETUP_PATH)
    }

    #[must_use]
    pub fn verification_pending_path(&self) -> String {
        self.scoped(VERIFICATION_PENDING_PATH)
    }
}

/// Portal named by a path prefix, matched on whole segments.
#[must_use]
pub fn prefix_portal(path: &str) -> Option<Portal> {
    [Portal::Admin, Portal::Volunteer]
        .into_iter()
        .find(|portal| portal.prefix().is_some_and(|prefix| has_segment_prefix(path, prefix)))
}

/// Browser path for `logical` under the given portal and addressing.
#[must_use]
pub fn scoped_path(portal: Portal, addressing: Addressing, logical: &str) -> String {
    let logical = normalize_path(logical);
    match (addressing, portal.prefix()) {
        (Addressing::Prefix, Some(prefix)) if logical == "/" => prefix.to_string(),
        (Addressing::Prefix, Some(prefix)) => format!("{prefix}{logical}"),
        _ => logical,
    }
}

/// Leading slash, no trailing slash (except for the root).
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn has_segment_prefix(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("/admin", Some(Portal::Admin))]
    #[test_case("/admin/users", Some(Portal::Admin))]
    #[test_case("/volunteer/home", Some(Portal::Volunteer))]
    #[test_case("/administrator", None)]
    #[test_case("/volunteers", None)]
    #[test_case("/about", None)]
    #[test_case("/", None)]
    fn test_prefix_portal(path: &str, expected: Option<Portal>) {
        assert_eq!(prefix_portal(path), expected);
    }

    #[test]
    fn test_hostname_addressing_keeps_paths_bare() {
        let context = PortalContext::detect(Portal::Admin, "/users");
        assert_eq!(context.addressing, Addressing::Hostname);
        assert_eq!(context.scoped("/users"), "/users");
        assert_eq!(context.login_path(), "/login");
        assert_eq!(context.logical("/users"), "/users");
    }

    #[test]
    fn test_prefix_addressing_on_main_host() {
        let context = PortalContext::detect(Portal::Main, "/volunteer/tasks");
        assert_eq!(context.portal, Portal::Volunteer);
        assert_eq!(context.subdomain, Portal::Main);
        assert_eq!(context.addressing, Addressing::Prefix);
        assert_eq!(context.login_path(), "/volunteer/login");
        assert_eq!(context.dashboard_path(), "/volunteer/dashboard");
        assert_eq!(context.scoped("/"), "/volunteer");
        assert_eq!(context.logical("/volunteer/tasks"), "/tasks");
        assert_eq!(context.logical("/volunteer"), "/");
    }

    #[test]
    fn test_admin_subdomain_ignores_path_prefixes() {
        // an /admin path on the admin host is just a logical path
        let context = PortalContext::detect(Portal::Admin, "/admin/users");
        assert_eq!(context.addressing, Addressing::Hostname);
        assert_eq!(context.logical("/admin/users"), "/admin/users");
    }

    #[test]
    fn test_main_public_paths() {
        let context = PortalContext::detect(Portal::Main, "/about");
        assert_eq!(context.portal, Portal::Main);
        assert_eq!(context.login_path(), "/login");
        assert_eq!(context.setup_path(), "/setup");
    }

    #[test_case("", "/")]
    #[test_case("/", "/")]
    #[test_case("users", "/users")]
    #[test_case("/users/", "/users")]
    #[test_case(" /reports/12 ", "/reports/12")]
    fn test_normalize_path(input: &str, expected: &str) {
        assert_eq!(normalize_path(input), expected);
    }

    #[test]
    fn test_scoped_path_round_trips_through_logical() {
        for portal in [Portal::Admin, Portal::Volunteer] {
            let context = PortalContext::new(Portal::Main, portal, Addressing::Prefix);
            for logical in ["/", "/login", "/reports/7"] {
                assert_eq!(context.logical(&context.scoped(logical)), logical);
            }
        }
    }
}
