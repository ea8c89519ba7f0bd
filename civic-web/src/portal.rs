//! Portal identity resolution.
//!
//! The three audiences share one bundle. Which portal a document belongs to is
//! decided once per page load from the hostname it was served from.

use std::fmt;
use strum::EnumIter;

/// Audience-specific experience served by this bundle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumIter)]
pub enum Portal {
    /// Public site: reports, community pages and citizen accounts.
    #[default]
    Main,
    /// Administration console.
    Admin,
    /// Volunteer task board.
    Volunteer,
}

impl Portal {
    /// Tag written to `data-portal` and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Admin => "admin",
            Self::Volunteer => "volunteer",
        }
    }

    /// Path prefix used when the portal is reached from the main hostname.
    #[must_use]
    pub const fn prefix(self) -> Option<&'static str> {
        match self {
            Self::Main => None,
            Self::Admin => Some("/admin"),
            Self::Volunteer => Some("/volunteer"),
        }
    }
}

impl fmt::Display for Portal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the portal for a hostname.
///
/// Total over all inputs: anything unrecognised, including malformed
/// hostnames, belongs to [`Portal::Main`].
#[must_use]
pub fn resolve_portal(hostname: &str) -> Portal {
    let host = normalize_host(hostname);
    if host == "localhost" || host == "127.0.0.1" {
        return Portal::Main;
    }

    let labels: Vec<&str> = host.split('.').collect();
    if host.contains("localhost") {
        return if labels.len() > 1 {
            portal_for_label(labels[0])
        } else {
            Portal::Main
        };
    }

    if labels.len() > 2 {
        portal_for_label(labels[0])
    } else {
        Portal::Main
    }
}

fn portal_for_label(label: &str) -> Portal {
    match label {
        "admin" => Portal::Admin,
        "volunteer" => Portal::Volunteer,
        // app and www are aliases of the public site
        _ => Portal::Main,
    }
}

/// Lowercase, drop a `:port` suffix and a trailing root dot.
fn normalize_host(hostname: &str) -> String {
    let trimmed = hostname.trim();
    let without_port = if trimmed.starts_with('[') {
        // bracketed IPv6 literal, never a portal subdomain
        trimmed
    } else {
        trimmed.split(':').next().unwrap_or_default()
    };
    without_port.trim_end_matches('.').to_ascii_lowercase()
}

/// Hostname of the current document, empty outside a browser.
#[must_use]
pub fn browser_hostname() -> String {
    web_sys::window()
        .and_then(|window| window.location().hostname().ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;
    use test_case::test_case;

    #[test_case("localhost", Portal::Main; "bare localhost")]
    #[test_case("127.0.0.1", Portal::Main; "loopback")]
    #[test_case("admin.localhost", Portal::Admin; "admin on localhost")]
    #[test_case("volunteer.localhost", Portal::Volunteer; "volunteer on localhost")]
    #[test_case("app.localhost", Portal::Main; "app alias on localhost")]
    #[test_case("www.localhost", Portal::Main; "www alias on localhost")]
    #[test_case("staff.localhost", Portal::Main; "unknown label on localhost")]
    #[test_case("example.com", Portal::Main; "two label domain")]
    #[test_case("admin.com", Portal::Main; "two labels starting with admin")]
    #[test_case("admin.example.com", Portal::Admin; "admin subdomain")]
    #[test_case("volunteer.example.com", Portal::Volunteer; "volunteer subdomain")]
    #[test_case("www.example.com", Portal::Main; "www subdomain")]
    #[test_case("app.example.com", Portal::Main; "app subdomain")]
    #[test_case("reports.example.com", Portal::Main; "unexpected subdomain")]
    #[test_case("admin.city.example.gov", Portal::Admin; "deep domain")]
    fn test_resolve_portal(hostname: &str, expected: Portal) {
        assert_eq!(resolve_portal(hostname), expected);
    }

    #[test_case("ADMIN.Example.COM", Portal::Admin; "mixed case")]
    #[test_case("admin.localhost:5173", Portal::Admin; "dev server port")]
    #[test_case("volunteer.example.com.", Portal::Volunteer; "trailing root dot")]
    #[test_case("  admin.example.com  ", Portal::Admin; "surrounding whitespace")]
    fn test_resolve_portal_normalizes_host(hostname: &str, expected: Portal) {
        assert_eq!(resolve_portal(hostname), expected);
    }

    #[test_case(""; "empty")]
    #[test_case("."; "single dot")]
    #[test_case("...."; "only dots")]
    #[test_case(".admin.example.com"; "leading dot")]
    #[test_case("[::1]:8080"; "ipv6 literal")]
    #[test_case("localhost."; "localhost with root dot")]
    #[test_case("😀.example.com"; "non ascii label")]
    fn test_resolve_portal_malformed_defaults_to_main(hostname: &str) {
        assert_eq!(resolve_portal(hostname), Portal::Main);
    }

    #[test]
    fn test_resolve_portal_is_deterministic() {
        for host in ["admin.example.com", "volunteer.localhost", "x.y.z", ""] {
            assert_eq!(resolve_portal(host), resolve_portal(host));
        }
    }

    #[test]
    fn test_only_scoped_portals_have_prefixes() {
        let prefixed: Vec<Portal> = Portal::iter()
            .filter(|portal| portal.prefix().is_some())
            .collect();
        assert_eq!(prefixed, vec![Portal::Admin, Portal::Volunteer]);
        assert_eq!(Portal::Admin.prefix(), Some("/admin"));
        assert_eq!(Portal::Volunteer.to_string(), "volunteer");
    }
}
