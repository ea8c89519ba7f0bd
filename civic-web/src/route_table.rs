//! Declarative route tables for the three portals.
//!
//! Each portal has one canonical list of routes keyed by logical path. The
//! admin and volunteer lists are registered bare on their own hostnames and
//! again under `/admin` and `/volunteer` on the main hostname, so both
//! addressing schemes always share the same pages and requirements.

use civic_shared::models::Role;
use strum::EnumIter;

use crate::access_gate::RouteRequirement;
use crate::portal::Portal;
use crate::scoped_path::{
    Addressing, DASHBOARD_PATH, LOGIN_PATH, PortalContext, SETUP_PATH, VERIFICATION_PENDING_PATH,
    normalize_path, prefix_portal,
};

/// Every page the bundle can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Page {
    Home,
    About,
    Contact,
    Terms,
    Privacy,
    Community,
    ReportIssue,
    ReportDetail,
    TrackReport,
    Login,
    Register,
    VerifyEmail,
    Setup,
    UserDashboard,
    MyReports,
    Profile,
    AdminDashboard,
    AdminReports,
    AdminReportDetail,
    AdminUsers,
    AdminVolunteers,
    Administrators,
    AdminSettings,
    VolunteerHome,
    VolunteerDashboard,
    VolunteerTasks,
    VolunteerTaskDetail,
    VerificationPending,
    VolunteerProfile,
}

impl Page {
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::About => "About",
            Self::Contact => "Contact",
            Self::Terms => "Terms of Service",
            Self::Privacy => "Privacy Policy",
            Self::Community => "Community",
            Self::ReportIssue => "Report an Issue",
            Self::ReportDetail | Self::AdminReportDetail => "Report",
            Self::TrackReport => "Track a Report",
            Self::Login => "Sign In",
            Self::Register => "Create Account",
            Self::VerifyEmail => "Verify Email",
            Self::Setup => "System Setup",
            Self::UserDashboard | Self::AdminDashboard | Self::VolunteerDashboard => "Dashboard",
            Self::MyReports => "My Reports",
            Self::Profile | Self::VolunteerProfile => "Profile",
            Self::AdminReports => "Reports",
            Self::AdminUsers => "Users",
            Self::AdminVolunteers => "Volunteers",
            Self::Administrators => "Administrators",
            Self::AdminSettings => "Settings",
            Self::VolunteerHome => "Home",
            Self::VolunteerTasks => "Tasks",
            Self::VolunteerTaskDetail => "Task",
            Self::VerificationPending => "Verification Pending",
        }
    }
}

/// Chrome wrapped around a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    Public,
    Account,
    Admin,
    Volunteer,
    /// No navigation chrome: sign-in and setup screens.
    Bare,
}

/// Who may open a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Signed-out visitors only; signed-in visitors go to their dashboard.
    Guest,
    Protected(RouteRequirement),
}

impl Access {
    #[must_use]
    pub const fn requirement(&self) -> Option<&RouteRequirement> {
        match self {
            Self::Protected(requirement) => Some(requirement),
            Self::Public | Self::Guest => None,
        }
    }
}

/// What a route leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTarget {
    /// Render `page` inside `layout`.
    Page { page: Page, layout: LayoutKind },
    /// Redirect to another logical path of the same portal.
    Redirect(&'static str),
}

/// One canonical route: logical path, target and access rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDef {
    /// Logical path; `:name` segments capture parameters.
    pub path: &'static str,
    pub target: RouteTarget,
    pub access: Access,
    /// Shown in the portal's navigation bar.
    pub in_nav: bool,
}

impl RouteDef {
    const fn page(path: &'static str, page: Page, layout: LayoutKind, access: Access) -> Self {
        Self {
            path,
            target: RouteTarget::Page { page, layout },
            access,
            in_nav: false,
        }
    }

    const fn redirect(path: &'static str, to: &'static str) -> Self {
        Self {
            path,
            target: RouteTarget::Redirect(to),
            access: Access::Public,
            in_nav: false,
        }
    }

    const fn nav(mut self) -> Self {
        self.in_nav = true;
        self
    }
}

const ADMINS: RouteRequirement = RouteRequirement::admin(&[]);
const SUPER_ADMINS: RouteRequirement = RouteRequirement::admin(&[Role::SuperAdmin]);
const VERIFIED_VOLUNTEERS: RouteRequirement = RouteRequirement::verified_volunteer();
const VOLUNTEERS: RouteRequirement = RouteRequirement::roles(&[Role::Volunteer]);

/// Public pages of the main site.
pub const MAIN_PUBLIC_ROUTES: &[RouteDef] = &[
    RouteDef::page("/", Page::Home, LayoutKind::Public, Access::Public).nav(),
    RouteDef::page("/about", Page::About, LayoutKind::Public, Access::Public).nav(),
    RouteDef::page("/contact", Page::Contact, LayoutKind::Public, Access::Public).nav(),
    RouteDef::page("/terms", Page::Terms, LayoutKind::Public, Access::Public),
    RouteDef::page("/privacy", Page::Privacy, LayoutKind::Public, Access::Public),
    RouteDef::page("/community", Page::Community, LayoutKind::Public, Access::Public).nav(),
    RouteDef::page("/report", Page::ReportIssue, LayoutKind::Public, Access::Public).nav(),
    RouteDef::page("/reports/:id", Page::ReportDetail, LayoutKind::Public, Access::Public),
    RouteDef::page("/track", Page::TrackReport, LayoutKind::Public, Access::Public),
    RouteDef::page(LOGIN_PATH, Page::Login, LayoutKind::Bare, Access::Guest),
    RouteDef::page("/register", Page::Register, LayoutKind::Bare, Access::Guest),
    RouteDef::page("/verify-email", Page::VerifyEmail, LayoutKind::Bare, Access::Public),
];

/// Pages for signed-in citizens on the main site.
pub const MAIN_ACCOUNT_ROUTES: &[RouteDef] = &[
    RouteDef::page(
        DASHBOARD_PATH,
        Page::UserDashboard,
        LayoutKind::Account,
        Access::Protected(RouteRequirement::AUTHENTICATED),
    )
    .nav(),
    RouteDef::page(
        "/my-reports",
        Page::MyReports,
        LayoutKind::Account,
        Access::Protected(RouteRequirement::AUTHENTICATED),
    )
    .nav(),
    RouteDef::page(
        "/profile",
        Page::Profile,
        LayoutKind::Account,
        Access::Protected(RouteRequirement::AUTHENTICATED),
    ),
];

/// The admin portal, by logical path.
pub const ADMIN_ROUTES: &[RouteDef] = &[
    RouteDef::redirect("/", DASHBOARD_PATH),
    RouteDef::page(LOGIN_PATH, Page::Login, LayoutKind::Bare, Access::Guest),
    RouteDef::page(SETUP_PATH, Page::Setup, LayoutKind::Bare, Access::Public),
    RouteDef::page(
        DASHBOARD_PATH,
        Page::AdminDashboard,
        LayoutKind::Admin,
        Access::Protected(ADMINS),
    )
    .nav(),
    RouteDef::page("/reports", Page::AdminReports, LayoutKind::Admin, Access::Protected(ADMINS))
        .nav(),
    RouteDef::page(
        "/reports/:id",
        Page::AdminReportDetail,
        LayoutKind::Admin,
        Access::Protected(ADMINS),
    ),
    RouteDef::page("/users", Page::AdminUsers, LayoutKind::Admin, Access::Protected(ADMINS)).nav(),
    RouteDef::page(
        "/volunteers",
        Page::AdminVolunteers,
        LayoutKind::Admin,
        Access::Protected(ADMINS),
    )
    .nav(),
    RouteDef::page(
        "/administrators",
        Page::Administrators,
        LayoutKind::Admin,
        Access::Protected(SUPER_ADMINS),
    ),
    RouteDef::page(
        "/settings",
        Page::AdminSettings,
        LayoutKind::Admin,
        Access::Protected(ADMINS),
    )
    .nav(),
];

/// The volunteer portal, by logical path.
pub const VOLUNTEER_ROUTES: &[RouteDef] = &[
    RouteDef::redirect("/", DASHBOARD_PATH),
    RouteDef::page(LOGIN_PATH, Page::Login, LayoutKind::Bare, Access::Guest),
    RouteDef::page("/register", Page::Register, LayoutKind::Bare, Access::Guest),
    RouteDef::page(SETUP_PATH, Page::Setup, LayoutKind::Bare, Access::Public),
    RouteDef::page(
        "/home",
        Page::VolunteerHome,
        LayoutKind::Volunteer,
        Access::Protected(VERIFIED_VOLUNTEERS),
    ),
    RouteDef::page(
        DASHBOARD_PATH,
        Page::VolunteerDashboard,
        LayoutKind::Volunteer,
        Access::Protected(VERIFIED_VOLUNTEERS),
    )
    .nav(),
    RouteDef::page(
        "/tasks",
        Page::VolunteerTasks,
        LayoutKind::Volunteer,
        Access::Protected(VERIFIED_VOLUNTEERS),
    )
    .nav(),
    RouteDef::page(
        "/tasks/:id",
        Page::VolunteerTaskDetail,
        LayoutKind::Volunteer,
        Access::Protected(VERIFIED_VOLUNTEERS),
    ),
    RouteDef::page(
        VERIFICATION_PENDING_PATH,
        Page::VerificationPending,
        LayoutKind::Volunteer,
        Access::Protected(VOLUNTEERS),
    ),
    RouteDef::page(
        "/profile",
        Page::VolunteerProfile,
        LayoutKind::Volunteer,
        Access::Protected(VOLUNTEERS),
    )
    .nav(),
];

/// Canonical route list of a portal.
#[must_use]
pub fn portal_routes(portal: Portal) -> Vec<RouteDef> {
    match portal {
        Portal::Main => [MAIN_PUBLIC_ROUTES, MAIN_ACCOUNT_ROUTES].concat(),
        Portal::Admin => ADMIN_ROUTES.to_vec(),
        Portal::Volunteer => VOLUNTEER_ROUTES.to_vec(),
    }
}

/// A registered route: the browser path pattern and the context it runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub pattern: String,
    pub context: PortalContext,
    pub def: RouteDef,
}

/// Values captured by `:name` segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams(Vec<(String, String)>);

impl RouteParams {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMatch<'a> {
    Found {
        entry: &'a RouteEntry,
        params: RouteParams,
    },
    /// Nothing matched; the catch-all sends the browser here.
    Fallback(String),
}

/// All routes reachable from one hostname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    subdomain: Portal,
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Build the table served from `subdomain`.
    #[must_use]
    pub fn for_portal(subdomain: Portal) -> Self {
        let mut entries = Vec::new();
        match subdomain {
            Portal::Main => {
                register(&mut entries, Portal::Main, Portal::Main, Addressing::Hostname);
                register(&mut entries, Portal::Main, Portal::Admin, Addressing::Prefix);
                register(&mut entries, Portal::Main, Portal::Volunteer, Addressing::Prefix);
            }
            portal => register(&mut entries, portal, portal, Addressing::Hostname),
        }
        Self { subdomain, entries }
    }

    #[must_use]
    pub const fn subdomain(&self) -> Portal {
        self.subdomain
    }

    #[must_use]
    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    /// Match a browser path, falling back to the catch-all redirect.
    #[must_use]
    pub fn resolve(&self, path: &str) -> RouteMatch<'_> {
        let path = normalize_path(path);
        self.entries
            .iter()
            .find_map(|entry| {
                match_pattern(&entry.pattern, &path)
                    .map(|params| RouteMatch::Found { entry, params })
            })
            .unwrap_or_else(|| RouteMatch::Fallback(self.fallback(&path)))
    }

    /// Catch-all target for an unmatched path.
    #[must_use]
    pub fn fallback(&self, path: &str) -> String {
        match self.subdomain {
            Portal::Main => prefix_portal(path).map_or_else(
                || "/".to_string(),
                |portal| PortalContext::new(Portal::Main, portal, Addressing::Prefix).login_path(),
            ),
            _ => LOGIN_PATH.to_string(),
        }
    }

    /// Navigation links of the portal addressed by `context`, as
    /// `(title, browser path)` pairs.
    #[must_use]
    pub fn navigation(&self, context: &PortalContext) -> Vec<(&'static str, String)> {
        self.entries
            .iter()
            .filter(|entry| entry.context == *context && entry.def.in_nav)
            .filter_map(|entry| match entry.def.target {
                RouteTarget::Page { page, .. } => Some((page.title(), entry.pattern.clone())),
                RouteTarget::Redirect(_) => None,
            })
            .collect()
    }
}

fn register(
    entries: &mut Vec<RouteEntry>,
    subdomain: Portal,
    portal: Portal,
    addressing: Addressing,
) {
    let context = PortalContext::new(subdomain, portal, addressing);
    entries.extend(portal_routes(portal).into_iter().map(|def| RouteEntry {
        pattern: context.scoped(def.path),
        context,
        def,
    }));
}

/// Match `path` against a pattern with `:name` placeholders.
fn match_pattern(pattern: &str, path: &str) -> Option<RouteParams> {
    let mut pattern_segments = segments(pattern);
    let mut path_segments = segments(path);
    let mut params = Vec::new();
    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return Some(RouteParams(params)),
            (Some(expected), Some(actual)) => match expected.strip_prefix(':') {
                Some(name) => params.push((name.to_string(), actual.to_string())),
                None if expected == actual => {}
                None => return None,
            },
            _ => return None,
        }
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}
