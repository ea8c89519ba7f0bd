//! Per-navigation resolution: setup gate, route table and access gate
//! combined into one outcome.

use std::{cell::Cell, rc::Rc};
use tracing::debug;

use crate::access_gate::{self, AccessDecision};
use crate::route_table::{
    Access, LayoutKind, Page, RouteMatch, RouteParams, RouteTable, RouteTarget,
};
use crate::scoped_path::{PortalContext, normalize_path};
use crate::session::Session;
use crate::setup_gate::SetupDecision;

/// What to show for a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPlan {
    pub page: Page,
    pub layout: LayoutKind,
    pub params: RouteParams,
    pub context: PortalContext,
}

/// Result of resolving one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// A gate is still waiting on the network.
    Loading,
    Render(RenderPlan),
    Redirect(String),
    /// Every rule sends the visitor back where they are.
    NotPermitted,
}

/// Resolve `path` for the hostname `table` was built for.
///
/// `setup` is the setup gate's decision for this path, or `None` while it is
/// still being fetched. The setup gate is decided first; access rules are
/// only consulted once it has passed, so a navigation yields at most one
/// redirect.
#[must_use]
pub fn resolve_navigation(
    table: &RouteTable,
    path: &str,
    setup: Option<&SetupDecision>,
    session: &Session,
) -> NavigationOutcome {
    let path = normalize_path(path);
    let Some(setup) = setup else {
        return NavigationOutcome::Loading;
    };
    if let Some(target) = setup.redirect_target() {
        return redirect_from(&path, target);
    }

    let (entry, params) = match table.resolve(&path) {
        RouteMatch::Found { entry, params } => (entry, params),
        RouteMatch::Fallback(target) => return redirect_from(&path, &target),
    };

    let (page, layout) = match entry.def.target {
        RouteTarget::Page { page, layout } => (page, layout),
        RouteTarget::Redirect(logical) => {
            return redirect_from(&path, &entry.context.scoped(logical));
        }
    };

    let decision = match &entry.def.access {
        Access::Public => AccessDecision::Render,
        Access::Guest => access_gate::evaluate_guest(session),
        Access::Protected(requirement) => {
            access_gate::evaluate(requirement, session, table.subdomain())
        }
    };

    match decision {
        AccessDecision::Loading => NavigationOutcome::Loading,
        AccessDecision::Render => NavigationOutcome::Render(RenderPlan {
            page,
            layout,
            params,
            context: entry.context,
        }),
        AccessDecision::Redirect(redirect) => {
            redirect_from(&path, &redirect.target(&entry.context))
        }
    }
}

fn redirect_from(current: &str, target: &str) -> NavigationOutcome {
    if normalize_path(target) == current {
        debug!(path = %current, "redirect would loop; refusing in place");
        NavigationOutcome::NotPermitted
    } else {
        NavigationOutcome::Redirect(target.to_string())
    }
}

/// Identity of one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationTicket(u64);

/// Counter that invalidates the async work of superseded navigations.
#[derive(Debug, Clone, Default)]
pub struct NavigationEpoch(Rc<Cell<u64>>);

impl NavigationEpoch {
    /// Start a navigation; every earlier ticket stops being current.
    #[must_use]
    pub fn begin(&self) -> NavigationTicket {
        let next = self.0.get() + 1;
        self.0.set(next);
        NavigationTicket(next)
    }

    #[must_use]
    pub fn is_current(&self, ticket: NavigationTicket) -> bool {
        self.0.get() == ticket.0
    }
}

impl PartialEq for NavigationEpoch {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Setup decision fetched for the navigation in progress, keyed by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedSetup(Option<(String, SetupDecision)>);

impl FetchedSetup {
    /// Keep `decision` if `ticket` still names the latest navigation.
    ///
    /// Returns `false`, leaving `self` untouched, for a superseded ticket.
    pub fn settle(
        &mut self,
        epoch: &NavigationEpoch,
        ticket: NavigationTicket,
        path: String,
        decision: SetupDecision,
    ) -> bool {
        if !epoch.is_current(ticket) {
            debug!(%path, "dropping setup decision for a superseded navigation");
            return false;
        }
        self.0 = Some((path, decision));
        true
    }

    #[must_use]
    pub fn for_path(&self, path: &str) -> Option<&SetupDecision> {
        self.0
            .as_ref()
            .filter(|(settled, _)| settled == path)
            .map(|(_, decision)| decision)
    }
}
