//! First-run setup interception.
//!
//! Until an administrator has completed setup, admin and volunteer pages are
//! replaced by a redirect to the setup page. The installation status is
//! cached per tab so most navigations decide without a network round trip.

use civic_shared::models::SystemStatus;
use std::{fmt, rc::Rc, time::Duration};
use tracing::{debug, info, warn};

use crate::api::SystemStatusApi;
use crate::cache::{CacheStore, TtlCache};
use crate::clock::{Clock, with_timeout};
use crate::config::FrontendConfig;
use crate::portal::Portal;
use crate::scoped_path::{PortalContext, SETUP_PATH, normalize_path, prefix_portal};

/// Logical paths that stay reachable while setup is pending.
pub const SETUP_ALLOW_LIST: [&str; 3] = [SETUP_PATH, "/about", "/contact"];

/// How the setup state for a navigation was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupCheck {
    /// Neither the hostname nor the path belongs to a gated portal.
    NotGated,
    /// The path is on the allow-list.
    Exempt,
    Cached { setup_required: bool },
    Fetched { setup_required: bool },
    /// Every status endpoint failed. Treated as "setup required".
    Unknown,
}

/// Result of the setup gate for one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupDecision {
    pub check: SetupCheck,
    /// Browser path to redirect to, if the navigation must not proceed.
    pub redirect: Option<String>,
}

impl SetupDecision {
    const fn pass(check: SetupCheck) -> Self {
        Self {
            check,
            redirect: None,
        }
    }

    fn from_status(check: SetupCheck, setup_required: bool, context: &PortalContext) -> Self {
        Self {
            check,
            redirect: setup_required.then(|| context.setup_path()),
        }
    }

    #[must_use]
    pub fn redirect_target(&self) -> Option<&str> {
        self.redirect.as_deref()
    }
}

/// True when the navigation touches the admin or volunteer portal.
#[must_use]
pub fn is_gated(subdomain: Portal, path: &str) -> bool {
    matches!(subdomain, Portal::Admin | Portal::Volunteer) || prefix_portal(path).is_some()
}

fn is_exempt(context: &PortalContext, path: &str) -> bool {
    let path = normalize_path(path);
    let logical = context.logical(&path);
    path == context.setup_path()
        || SETUP_ALLOW_LIST.contains(&path.as_str())
        || SETUP_ALLOW_LIST.contains(&logical.as_str())
}

/// The setup gate. Runs before any access check.
pub struct SetupGate {
    api: Rc<dyn SystemStatusApi>,
    cache: TtlCache<SystemStatus, Rc<dyn CacheStore>>,
    clock: Rc<dyn Clock>,
    status_paths: Vec<String>,
    timeout: Duration,
}

impl fmt::Debug for SetupGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetupGate")
            .field("cache_key", &self.cache.key())
            .field("status_paths", &self.status_paths)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl SetupGate {
    pub fn new(
        api: Rc<dyn SystemStatusApi>,
        store: Rc<dyn CacheStore>,
        clock: Rc<dyn Clock>,
        config: &FrontendConfig,
    ) -> Self {
        Self {
            api,
            cache: TtlCache::new(store, config.setup_cache_key.clone(), config.setup_cache_ttl),
            clock,
            status_paths: config.status_paths.clone(),
            timeout: config.status_timeout,
        }
    }

    /// Decide without touching the network.
    ///
    /// Returns `None` when the status must be fetched with
    /// [`SetupGate::evaluate`].
    #[must_use]
    pub fn precheck(&self, subdomain: Portal, path: &str) -> Option<SetupDecision> {
        if !is_gated(subdomain, path) {
            return Some(SetupDecision::pass(SetupCheck::NotGated));
        }
        let context = PortalContext::detect(subdomain, path);
        if is_exempt(&context, path) {
            return Some(SetupDecision::pass(SetupCheck::Exempt));
        }
        self.cache.get(self.clock.now_ms()).map(|status| {
            SetupDecision::from_status(
                SetupCheck::Cached {
                    setup_required: status.setup_required,
                },
                status.setup_required,
                &context,
            )
        })
    }

    /// Decide for a navigation, fetching the status when the cache misses.
    ///
    /// Never fails: when no status endpoint answers, the cache is cleared and
    /// the navigation is sent to setup.
    pub async fn evaluate(&self, subdomain: Portal, path: &str) -> SetupDecision {
        if let Some(decision) = self.precheck(subdomain, path) {
            return decision;
        }
        let context = PortalContext::detect(subdomain, path);

        match self.fetch_status().await {
            Some(status) => {
                self.cache.put(&status, self.clock.now_ms());
                if status.setup_required {
                    info!(%path, "setup required; redirecting");
                }
                SetupDecision::from_status(
                    SetupCheck::Fetched {
                        setup_required: status.setup_required,
                    },
                    status.setup_required,
                    &context,
                )
            }
            None => {
                warn!(%path, "setup status unavailable; assuming setup is required");
                self.cache.invalidate();
                SetupDecision::from_status(SetupCheck::Unknown, true, &context)
            }
        }
    }

    async fn fetch_status(&self) -> Option<SystemStatus> {
        for path in &self.status_paths {
            match with_timeout(&*self.clock, self.timeout, self.api.system_status(path)).await {
                Some(Ok(status)) => {
                    debug!(%path, setup_required = status.setup_required, "fetched setup status");
                    return Some(status);
                }
                Some(Err(err)) => warn!(%path, error = %err, "setup status request failed"),
                None => warn!(%path, timeout = ?self.timeout, "setup status request timed out"),
            }
        }
        None
    }
}


#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::testing::FakeStatusApi;
    use super::*;
    use crate::api::ApiError;
    use crate::cache::MemoryStore;
    use crate::clock::testing::ManualClock;
    use test_case::test_case;

    const PRIMARY: &str = "system/status";
    const FALLBACK: &str = "/api/system/status";

    struct Harness {
        gate: SetupGate,
        api: Rc<FakeStatusApi>,
        store: MemoryStore,
        clock: ManualClock,
    }

    fn harness(api: FakeStatusApi) -> Harness {
        let api = Rc::new(api);
        let store = MemoryStore::default();
        let clock = ManualClock::at(1_000_000);
        let gate = SetupGate::new(
            api.clone(),
            Rc::new(store.clone()),
            Rc::new(clock.clone()),
            &FrontendConfig::default(),
        );
        Harness {
            gate,
            api,
            store,
            clock,
        }
    }

    fn seed_cache(harness: &Harness, setup_required: bool, checked_at: i64) {
        let raw = format!(r#"{{"setupRequired":{setup_required},"checkedAt":{checked_at}}}"#);
        harness.store.write("civic.setupStatus", &raw).unwrap();
    }

    #[test_case(Portal::Main, "/" ; "home")]
    #[test_case(Portal::Main, "/reports/new" ; "public page")]
    #[test_case(Portal::Main, "/administrators" ; "lookalike prefix")]
    fn test_ungated_navigation_passes(subdomain: Portal, path: &str) {
        let harness = harness(FakeStatusApi::default());
        assert_eq!(
            harness.gate.precheck(subdomain, path),
            Some(SetupDecision::pass(SetupCheck::NotGated))
        );
    }

    #[test_case(Portal::Admin, "/setup")]
    #[test_case(Portal::Volunteer, "/about")]
    #[test_case(Portal::Admin, "/contact")]
    #[test_case(Portal::Main, "/admin/setup")]
    #[test_case(Portal::Main, "/volunteer/about")]
    fn test_allow_list_passes(subdomain: Portal, path: &str) {
        let harness = harness(FakeStatusApi::default());
        assert_eq!(
            harness.gate.precheck(subdomain, path),
            Some(SetupDecision::pass(SetupCheck::Exempt))
        );
    }

    #[test]
    fn test_is_gated() {
        assert!(is_gated(Portal::Admin, "/"));
        assert!(is_gated(Portal::Volunteer, "/tasks"));
        assert!(is_gated(Portal::Main, "/admin"));
        assert!(is_gated(Portal::Main, "/volunteer/home"));
        assert!(!is_gated(Portal::Main, "/volunteering"));
    }

    #[test]
    fn test_fresh_cache_decides_without_fetch() {
        let harness = harness(FakeStatusApi::default());
        seed_cache(&harness, true, harness.clock.now_ms() - 10_000);

        let decision = harness.gate.precheck(Portal::Admin, "/users").unwrap();

        assert_eq!(decision.check, SetupCheck::Cached { setup_required: true });
        assert_eq!(decision.redirect_target(), Some("/setup"));
        assert!(harness.api.requested.borrow().is_empty());
    }

    #[test]
    fn test_prefixed_redirect_stays_in_portal() {
        let harness = harness(FakeStatusApi::default());
        seed_cache(&harness, true, harness.clock.now_ms());

        let decision = harness.gate.precheck(Portal::Main, "/volunteer/tasks").unwrap();

        assert_eq!(decision.redirect_target(), Some("/volunteer/setup"));
    }

    #[tokio::test]
    async fn test_stale_cache_is_never_used() {
        let harness = harness(FakeStatusApi::answering(PRIMARY, false));
        seed_cache(&harness, true, harness.clock.now_ms() - 300_001);

        assert_eq!(harness.gate.precheck(Portal::Admin, "/users"), None);
        let decision = harness.gate.evaluate(Portal::Admin, "/users").await;

        assert_eq!(decision.check, SetupCheck::Fetched { setup_required: false });
        assert_eq!(decision.redirect, None);
        assert_eq!(*harness.api.requested.borrow(), vec![PRIMARY.to_string()]);
    }

    #[tokio::test]
    async fn test_fetch_writes_cache() {
        let harness = harness(FakeStatusApi::answering(PRIMARY, true));

        let decision = harness.gate.evaluate(Portal::Volunteer, "/home").await;
        harness.clock.advance(Duration::from_secs(60));
        let cached = harness.gate.precheck(Portal::Volunteer, "/tasks").unwrap();

        assert_eq!(decision.redirect_target(), Some("/setup"));
        assert_eq!(cached.check, SetupCheck::Cached { setup_required: true });
        assert_eq!(harness.api.requested.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_fallback_endpoint_is_tried() {
        let harness = harness(FakeStatusApi::answering(FALLBACK, false));

        let decision = harness.gate.evaluate(Portal::Admin, "/reports").await;

        assert_eq!(decision.check, SetupCheck::Fetched { setup_required: false });
        assert_eq!(
            *harness.api.requested.borrow(),
            vec![PRIMARY.to_string(), FALLBACK.to_string()]
        );
    }

    #[tokio::test]
    async fn test_unreachable_status_on_admin_dashboard_redirects_to_setup() {
        let harness = harness(FakeStatusApi::default());
        seed_cache(&harness, false, 0);

        let decision = harness.gate.evaluate(Portal::Admin, "/dashboard").await;

        assert_eq!(decision.check, SetupCheck::Unknown);
        assert_eq!(decision.redirect_target(), Some("/setup"));
        assert_eq!(harness.store.read("civic.setupStatus").unwrap(), None);
    }

    #[tokio::test]
    async fn test_malformed_responses_count_as_failures() {
        let api = FakeStatusApi::default();
        api.replies.borrow_mut().insert(
            PRIMARY.to_string(),
            Err(ApiError::Decode("missing field `system`".to_string())),
        );
        let harness = harness(api);

        let decision = harness.gate.evaluate(Portal::Main, "/admin/users").await;

        assert_eq!(decision.check, SetupCheck::Unknown);
        assert_eq!(decision.redirect_target(), Some("/admin/setup"));
    }

    #[tokio::test]
    async fn test_hanging_endpoints_time_out() {
        let api = FakeStatusApi::answering(PRIMARY, false);
        api.hang.set(true);
        let harness = harness(api);
        harness.clock.expire_timeouts();

        let decision = harness.gate.evaluate(Portal::Volunteer, "/dashboard").await;

        assert_eq!(decision.check, SetupCheck::Unknown);
        assert_eq!(harness.api.requested.borrow().len(), 2);
    }
}
