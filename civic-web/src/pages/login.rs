use crate::{api::LoginKind, app::PortalServices, scoped_path::PortalContext};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::AnyRoute;
use yew_router::prelude::{Link, use_navigator};

#[derive(yew::Properties, PartialEq)]
pub struct LoginPageProps {
    pub context: PortalContext,
}

#[function_component(LoginPage)]
pub fn login_page(props: &LoginPageProps) -> Html {
    let services = use_context::<PortalServices>();
    let email = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let loading = use_state(|| false);
    let navigator = use_navigator();
    let context = props.context;
    let kind = LoginKind::for_portal(context.portal);

    let onsubmit = {
        let email_handle = email.clone();
        let password_handle = password.clone();
        let error_handle = error.clone();
        let loading_handle = loading.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let Some(services) = services.clone() else {
                return;
            };
            let email_value = (*email_handle).clone();
            let password_value = (*password_handle).clone();
            loading_handle.set(true);
            error_handle.set(None);
            let loading_ref = loading_handle.clone();
            let error_ref = error_handle.clone();
            let navigator_handle = navigator.clone();
            spawn_local(async move {
                match services
                    .session
                    .login(kind, &email_value, &password_value)
                    .await
                {
                    Ok(_) => {
                        if let Some(ref nav) = navigator_handle {
                            nav.push(&AnyRoute::new(context.dashboard_path()));
                        }
                    }
                    Err(err) => error_ref.set(Some(err.to_string())),
                }
                loading_ref.set(false);
            });
        })
    };

    let on_email_change = {
        let email = email.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                email.set(input.value());
            }
        })
    };

    let on_password_change = {
        let password = password.clone();
        Callback::from(move |event: InputEvent| {
            if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                password.set(input.value());
            }
        })
    };

    let is_busy = *loading;
    let disable_submit = (*email).is_empty() || (*password).is_empty() || is_busy;
    let heading = match kind {
        LoginKind::User => "Sign in",
        LoginKind::Admin => "Administrator sign in",
        LoginKind::Volunteer => "Volunteer sign in",
    };

    html! {
        <div class="card w-full max-w-md shadow-lg bg-base-100">
            <form class="card-body" onsubmit={onsubmit}>
                <h2 class="card-title text-2xl">{heading}</h2>
                if let Some(message) = &*error {
                    <div class="alert alert-error">
                        <span>{message.clone()}</span>
                    </div>
                }
                <div class="form-control">
                    <label class="label" for="email">
                        <span class="label-text">{"Email"}</span>
                    </label>
                    <input
                        id="email"
                        class="input input-bordered"
                        type="email"
                        required=true
                        value={(*email).clone()}
                        oninput={on_email_change}
                    />
                </div>
                <div class="form-control">
                    <label class="label" for="password">
                        <span class="label-text">{"Password"}</span>
                    </label>
                    <input
                        id="password"
                        class="input input-bordered"
                        type="password"
                        required=true
                        value={(*password).clone()}
                        oninput={on_password_change}
                    />
                </div>
                <div class="form-control mt-6">
                    <button class="btn btn-primary" type="submit" disabled={disable_submit}>
                        {if is_busy { "Signing in..." } else { "Sign in" }}
                    </button>
                </div>
                if kind.register_path().is_some() {
                    <p class="text-sm text-center">
                        {"No account yet? "}
                        <Link<AnyRoute> to={AnyRoute::new(context.scoped("/register"))} classes="link">
                            {"Create one"}
                        </Link<AnyRoute>>
                    </p>
                }
            </form>
        </div>
    }
}
