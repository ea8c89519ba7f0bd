use crate::app::PortalServices;
use crate::components::loading::Loading;
use crate::scoped_path::PortalContext;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::AnyRoute;
use yew_router::prelude::{Link, use_location};

#[derive(yew::Properties, PartialEq)]
pub struct VerifyEmailPageProps {
    pub context: PortalContext,
}

#[derive(Debug, Clone, PartialEq)]
enum Verification {
    Verifying,
    Verified,
    Failed(String),
}

/// Pull the non-empty `token` parameter out of a query string.
fn token_from_query(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .find(|(key, _)| key == "token")
        .map(|(_, value)| value.into_owned())
        .filter(|token| !token.is_empty())
}

#[function_component(VerifyEmailPage)]
pub fn verify_email_page(props: &VerifyEmailPageProps) -> Html {
    let services = use_context::<PortalServices>();
    let location = use_location();
    let state = use_state(|| Verification::Verifying);
    let token = location.and_then(|location| token_from_query(location.query_str()));

    {
        let state = state.clone();
        use_effect_with(token, move |token| {
            match (token.clone(), services) {
                (Some(token), Some(services)) => spawn_local(async move {
                    match services.session.verify_email(&token).await {
                        Ok(()) => state.set(Verification::Verified),
                        Err(err) => state.set(Verification::Failed(err.to_string())),
                    }
                }),
                (None, _) => state.set(Verification::Failed(
                    "The verification link is missing its token.".to_string(),
                )),
                (Some(_), None) => {}
            }
            || ()
        });
    }

    let body = match &*state {
        Verification::Verifying => html! { <Loading label="Confirming your email" /> },
        Verification::Verified => html! {
            <>
                <p>{"Your email address is confirmed."}</p>
                <Link<AnyRoute> to={AnyRoute::new(props.context.dashboard_path())} classes="btn btn-primary">
                    {"Continue"}
                </Link<AnyRoute>>
            </>
        },
        Verification::Failed(message) => html! {
            <div class="alert alert-error"><span>{message.clone()}</span></div>
        },
    };

    html! {
        <div class="card w-full max-w-md shadow-lg bg-base-100">
            <div class="card-body items-center text-center">
                <h2 class="card-title text-2xl">{"Email verification"}</h2>
                {body}
            </div>
        </div>
    }
}
