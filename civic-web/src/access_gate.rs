//! Per-route authorization.
//!
//! Every protected route carries a [`RouteRequirement`]. The gate checks it
//! against the current [`Session`] and produces exactly one outcome.

use civic_shared::models::{Role, VolunteerStatus};

use crate::portal::Portal;
use crate::scoped_path::PortalContext;
use crate::session::Session;

/// Who may open a protected route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRequirement {
    /// Roles admitted; empty admits every authenticated role.
    pub allowed_roles: &'static [Role],
    pub admin_only: bool,
    /// Volunteers must be active. Only enforced on the volunteer hostname.
    pub require_volunteer_verified: bool,
}

impl RouteRequirement {
    /// Any signed-in account.
    pub const AUTHENTICATED: Self = Self::roles(&[]);

    #[must_use]
    pub const fn roles(allowed_roles: &'static [Role]) -> Self {
        Self {
            allowed_roles,
            admin_only: false,
            require_volunteer_verified: false,
        }
    }

    #[must_use]
    pub const fn admin(allowed_roles: &'static [Role]) -> Self {
        Self {
            allowed_roles,
            admin_only: true,
            require_volunteer_verified: false,
        }
    }

    #[must_use]
    pub const fn verified_volunteer() -> Self {
        Self {
            allowed_roles: &[Role::Volunteer],
            admin_only: false,
            require_volunteer_verified: true,
        }
    }
}

/// Where a refused visitor is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRedirect {
    Login,
    Dashboard,
    VerificationPending,
}

impl AccessRedirect {
    /// Browser path of the redirect in `context`.
    #[must_use]
    pub fn target(self, context: &PortalContext) -> String {
        match self {
            Self::Login => context.login_path(),
            Self::Dashboard => context.dashboard_path(),
            Self::VerificationPending => context.verification_pending_path(),
        }
    }
}

/// Outcome of the gate for one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// The session is not known yet; show a neutral placeholder.
    Loading,
    Render,
    Redirect(AccessRedirect),
}

/// Decide whether `session` may open a route guarded by `requirement`.
///
/// `subdomain` is the hostname portal, not the addressed one: the volunteer
/// verification check only applies on the volunteer hostname.
#[must_use]
pub fn evaluate(
    requirement: &RouteRequirement,
    session: &Session,
    subdomain: Portal,
) -> AccessDecision {
    if session.loading {
        return AccessDecision::Loading;
    }
    let Some(user) = session.user.as_ref() else {
        return AccessDecision::Redirect(AccessRedirect::Login);
    };

    if requirement.admin_only && !session.is_admin() {
        return AccessDecision::Redirect(AccessRedirect::Dashboard);
    }
    if !requirement.allowed_roles.is_empty()
        && !requirement.allowed_roles.contains(&user.role())
    {
        return AccessDecision::Redirect(AccessRedirect::Dashboard);
    }
    if requirement.require_volunteer_verified
        && subdomain == Portal::Volunteer
        && let Some(status) = user.volunteer_status()
        && status != VolunteerStatus::Active
    {
        return AccessDecision::Redirect(AccessRedirect::VerificationPending);
    }
    AccessDecision::Render
}

/// Decide access to pages meant for signed-out visitors, such as login.
///
/// Signed-in visitors are sent on to their dashboard.
#[must_use]
pub fn evaluate_guest(session: &Session) -> AccessDecision {
    if session.loading {
        AccessDecision::Loading
    } else if session.is_authenticated() {
        AccessDecision::Redirect(AccessRedirect::Dashboard)
    } else {
        AccessDecision::Render
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use civic_shared::models::{AccountKind, User, UserId};
    use strum::IntoEnumIterator;
    use test_case::test_case;

    const ADMIN_ONLY_ANY_ROLE: RouteRequirement = RouteRequirement::admin(&[]);
    const ADMIN_ONLY_LISTS_USER: RouteRequirement =
        RouteRequirement::admin(&[Role::User, Role::Volunteer]);
    const SUPER_ADMIN_ONLY: RouteRequirement = RouteRequirement::admin(&[Role::SuperAdmin]);
    const VERIFIED: RouteRequirement = RouteRequirement::verified_volunteer();

    fn signed_in(kind: AccountKind) -> Session {
        Session {
            user: Some(User {
                id: Some(UserId::Number(7)),
                email: Some("person@example.com".to_string()),
                name: Some("Person".to_string()),
                kind,
                is_super_admin: matches!(kind, AccountKind::SuperAdmin),
            }),
            loading: false,
        }
    }

    fn volunteer(status: VolunteerStatus) -> Session {
        signed_in(AccountKind::Volunteer { status })
    }

    fn signed_out() -> Session {
        Session {
            user: None,
            loading: false,
        }
    }

    fn requirements() -> Vec<RouteRequirement> {
        vec![
            RouteRequirement::AUTHENTICATED,
            ADMIN_ONLY_ANY_ROLE,
            ADMIN_ONLY_LISTS_USER,
            SUPER_ADMIN_ONLY,
            VERIFIED,
            RouteRequirement::roles(&[Role::User]),
        ]
    }

    #[test]
    fn test_loading_never_renders() {
        let sessions = [
            Session::default(),
            Session {
                user: signed_in(AccountKind::Admin).user,
                loading: true,
            },
            Session {
                user: volunteer(VolunteerStatus::Active).user,
                loading: true,
            },
        ];
        for requirement in requirements() {
            for session in &sessions {
                for subdomain in Portal::iter() {
                    assert_eq!(
                        evaluate(&requirement, session, subdomain),
                        AccessDecision::Loading
                    );
                }
            }
        }
    }

    #[test]
    fn test_signed_out_goes_to_login() {
        for requirement in requirements() {
            assert_eq!(
                evaluate(&requirement, &signed_out(), Portal::Admin),
                AccessDecision::Redirect(AccessRedirect::Login)
            );
        }
    }

    #[test_case(AccountKind::User ; "citizen")]
    #[test_case(AccountKind::Volunteer { status: VolunteerStatus::Active } ; "volunteer")]
    fn test_admin_only_wins_over_allowed_roles(kind: AccountKind) {
        for requirement in [ADMIN_ONLY_ANY_ROLE, ADMIN_ONLY_LISTS_USER] {
            assert_eq!(
                evaluate(&requirement, &signed_in(kind), Portal::Admin),
                AccessDecision::Redirect(AccessRedirect::Dashboard)
            );
        }
    }

    #[test]
    fn test_allowed_roles_filter_admins() {
        assert_eq!(
            evaluate(&SUPER_ADMIN_ONLY, &signed_in(AccountKind::Admin), Portal::Admin),
            AccessDecision::Redirect(AccessRedirect::Dashboard)
        );
        assert_eq!(
            evaluate(&SUPER_ADMIN_ONLY, &signed_in(AccountKind::SuperAdmin), Portal::Admin),
            AccessDecision::Render
        );
    }

    #[test]
    fn test_pending_volunteer_on_volunteer_host_must_verify() {
        assert_eq!(
            evaluate(&VERIFIED, &volunteer(VolunteerStatus::Pending), Portal::Volunteer),
            AccessDecision::Redirect(AccessRedirect::VerificationPending)
        );
    }

    #[test_case(Portal::Main ; "main host")]
    #[test_case(Portal::Admin ; "admin host")]
    fn test_verification_is_not_enforced_off_the_volunteer_host(subdomain: Portal) {
        assert_eq!(
            evaluate(&VERIFIED, &volunteer(VolunteerStatus::Pending), subdomain),
            AccessDecision::Render
        );
    }

    #[test_case(VolunteerStatus::Suspended)]
    #[test_case(VolunteerStatus::Rejected)]
    #[test_case(VolunteerStatus::Unknown)]
    fn test_inactive_volunteers_must_verify(status: VolunteerStatus) {
        assert_eq!(
            evaluate(&VERIFIED, &volunteer(status), Portal::Volunteer),
            AccessDecision::Redirect(AccessRedirect::VerificationPending)
        );
    }

    #[test]
    fn test_active_volunteer_renders() {
        assert_eq!(
            evaluate(&VERIFIED, &volunteer(VolunteerStatus::Active), Portal::Volunteer),
            AccessDecision::Render
        );
    }

    #[test]
    fn test_non_volunteer_hits_role_check_first() {
        assert_eq!(
            evaluate(&VERIFIED, &signed_in(AccountKind::User), Portal::Volunteer),
            AccessDecision::Redirect(AccessRedirect::Dashboard)
        );
    }

    #[test]
    fn test_any_account_passes_authenticated() {
        assert_eq!(
            evaluate(
                &RouteRequirement::AUTHENTICATED,
                &signed_in(AccountKind::User),
                Portal::Main
            ),
            AccessDecision::Render
        );
    }

    #[test]
    fn test_guest_pages() {
        assert_eq!(evaluate_guest(&Session::default()), AccessDecision::Loading);
        assert_eq!(evaluate_guest(&signed_out()), AccessDecision::Render);
        assert_eq!(
            evaluate_guest(&signed_in(AccountKind::Admin)),
            AccessDecision::Redirect(AccessRedirect::Dashboard)
        );
    }

    #[test]
    fn test_redirect_targets_follow_context() {
        let admin_host = PortalContext::detect(Portal::Admin, "/users");
        let prefixed = PortalContext::detect(Portal::Main, "/volunteer/tasks");

        assert_eq!(AccessRedirect::Login.target(&admin_host), "/login");
        assert_eq!(AccessRedirect::Dashboard.target(&prefixed), "/volunteer/dashboard");
        assert_eq!(
            AccessRedirect::VerificationPending.target(&prefixed),
            "/volunteer/verification-pending"
        );
    }
}
