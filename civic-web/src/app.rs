use crate::api::{ApiError, CivicClient};
use crate::cache::{CacheStore, SessionStorageStore};
use crate::clock::{BrowserClock, Clock};
use crate::config::FrontendConfig;
use crate::containers::portal_router::PortalRouter;
use crate::models::app_state::AppState;
use crate::pages::ErrorPage;
use crate::portal::{Portal, browser_hostname, resolve_portal};
use crate::route_table::RouteTable;
use crate::session::SessionStore;
use crate::setup_gate::SetupGate;
use std::rc::Rc;
use tracing::{error, info};
use wasm_bindgen_futures::spawn_local;
use yew::context::ContextProvider;
use yew::{Html, function_component, html, use_effect_with, use_memo};
use yew_router::prelude::BrowserRouter;
use yewdux::prelude::use_dispatch;

/// Services shared by every component, built once per page load.
#[derive(Clone, Debug)]
pub struct PortalServices {
    pub session: SessionStore,
    pub setup_gate: Rc<SetupGate>,
    pub table: Rc<RouteTable>,
    /// Portal resolved from the hostname.
    pub subdomain: Portal,
}

impl PartialEq for PortalServices {
    fn eq(&self, other: &Self) -> bool {
        self.session == other.session
            && Rc::ptr_eq(&self.setup_gate, &other.setup_gate)
            && Rc::ptr_eq(&self.table, &other.table)
    }
}

/// Wire the API client, session store, setup gate and route table for the
/// current page.
///
/// # Errors
/// Returns [`ApiError::Url`] when the configured API base URL is unusable.
pub fn build_services(config: &FrontendConfig) -> Result<PortalServices, ApiError> {
    let client = Rc::new(CivicClient::from_config(config)?);
    let subdomain = resolve_portal(&browser_hostname());
    let store: Rc<dyn CacheStore> = Rc::new(SessionStorageStore);
    let clock: Rc<dyn Clock> = Rc::new(BrowserClock);

    info!(portal = %subdomain, "starting portal");
    Ok(PortalServices {
        session: SessionStore::new(client.clone()),
        setup_gate: Rc::new(SetupGate::new(client, store, clock, config)),
        table: Rc::new(RouteTable::for_portal(subdomain)),
        subdomain,
    })
}

#[function_component(App)]
pub fn app() -> Html {
    let dispatch = use_dispatch::<AppState>();
    let services = use_memo((), |_| build_services(&FrontendConfig::new()));

    {
        let services = services.clone();
        use_effect_with((), move |_| {
            let subscription = (*services).as_ref().ok().map(|services| {
                let session = services.session.clone();
                let id = session.subscribe(move |snapshot| {
                    let snapshot = snapshot.clone();
                    dispatch.reduce_mut(|state| state.session = snapshot);
                });

                let boot = session.clone();
                spawn_local(async move { boot.check_auth_status().await });
                (session, id)
            });
            move || {
                if let Some((session, id)) = subscription {
                    session.unsubscribe(id);
                }
            }
        });
    }

    match &*services {
        Ok(services) => html! {
            <ContextProvider<PortalServices> context={services.clone()}>
                <BrowserRouter>
                    <PortalRouter />
                </BrowserRouter>
            </ContextProvider<PortalServices>>
        },
        Err(err) => {
            error!(error = %err, "portal failed to start");
            html! {
                <ErrorPage title="Unable to start" message={err.to_string()} />
            }
        }
    }
}
