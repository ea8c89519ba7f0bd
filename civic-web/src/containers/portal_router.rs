use crate::app::PortalServices;
use crate::components::loading::Loading;
use crate::containers::layout::Layout;
use crate::models::app_state::AppState;
use crate::navigation::{FetchedSetup, NavigationEpoch, NavigationOutcome, resolve_navigation};
use crate::pages::{ErrorPage, PageView};
use tracing::debug;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::AnyRoute;
use yew_router::prelude::{Redirect, use_location};
use yewdux::prelude::use_selector;

/// Resolves every navigation through the setup gate, the route table and the
/// access gate, then renders the page or issues the redirect.
#[function_component(PortalRouter)]
pub fn portal_router() -> Html {
    let services = use_context::<PortalServices>();
    let location = use_location();
    let session = use_selector(|state: &AppState| state.session.clone());
    let epoch = use_memo((), |_| NavigationEpoch::default());
    let fetched = use_state(FetchedSetup::default);

    let path = location.map_or_else(|| "/".to_string(), |location| location.path().to_string());

    {
        let services = services.clone();
        let fetched = fetched.clone();
        let epoch = epoch.clone();
        use_effect_with(path.clone(), move |path| {
            let ticket = epoch.begin();
            if let Some(services) = services
                && services.setup_gate.precheck(services.subdomain, path).is_none()
            {
                let path = path.clone();
                fetched.set(FetchedSetup::default());
                spawn_local(async move {
                    let decision = services.setup_gate.evaluate(services.subdomain, &path).await;
                    let mut settled = FetchedSetup::default();
                    if settled.settle(&epoch, ticket, path, decision) {
                        fetched.set(settled);
                    }
                });
            }
            || ()
        });
    }

    let Some(services) = services else {
        return html! { <Loading /> };
    };

    let setup = services
        .setup_gate
        .precheck(services.subdomain, &path)
        .or_else(|| fetched.for_path(&path).cloned());

    match resolve_navigation(&services.table, &path, setup.as_ref(), &session) {
        NavigationOutcome::Loading => html! { <Loading /> },
        NavigationOutcome::Redirect(target) => {
            debug!(from = %path, to = %target, "redirecting");
            html! { <Redirect<AnyRoute> to={AnyRoute::new(target)} /> }
        }
        NavigationOutcome::NotPermitted => html! {
            <ErrorPage
                title="Not permitted"
                message="Your account does not have access to this page."
            />
        },
        NavigationOutcome::Render(plan) => html! {
            <Layout kind={plan.layout} context={plan.context}>
                <PageView page={plan.page} params={plan.params} context={plan.context} />
            </Layout>
        },
    }
}
