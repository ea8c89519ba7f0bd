use crate::api::LoginKind;
use crate::app::PortalServices;
use crate::containers::registration_validation::{Field, RegistrationInput, validate_registration};
use crate::scoped_path::PortalContext;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::AnyRoute;
use yew_router::prelude::{Link, use_navigator};

#[derive(yew::Properties, PartialEq)]
pub struct RegisterPageProps {
    pub context: PortalContext,
}

fn field_input(
    form: &UseStateHandle<RegistrationInput>,
    assign: fn(&mut RegistrationInput, String),
) -> Callback<InputEvent> {
    let form = form.clone();
    Callback::from(move |event: InputEvent| {
        if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
            let mut next = (*form).clone();
            assign(&mut next, input.value());
            form.set(next);
        }
    })
}

#[function_component(RegisterPage)]
pub fn register_page(props: &RegisterPageProps) -> Html {
    let services = use_context::<PortalServices>();
    let form = use_state(RegistrationInput::default);
    let field_error = use_state(|| None::<(Field, String)>);
    let submit_error = use_state(|| None::<String>);
    let loading = use_state(|| false);
    let navigator = use_navigator();
    let context = props.context;
    let kind = LoginKind::for_portal(context.portal);

    let onsubmit = {
        let form = form.clone();
        let field_error = field_error.clone();
        let submit_error = submit_error.clone();
        let loading = loading.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            submit_error.set(None);
            let request = match validate_registration(&form) {
                Ok(request) => request,
                Err((field, err)) => {
                    field_error.set(Some((field, err.to_string())));
                    return;
                }
            };
            field_error.set(None);
            let Some(services) = services.clone() else {
                return;
            };
            loading.set(true);
            let loading = loading.clone();
            let submit_error = submit_error.clone();
            let navigator = navigator.clone();
            spawn_local(async move {
                match services.session.register(kind, &request).await {
                    Ok(_) => {
                        if let Some(nav) = navigator {
                            nav.push(&AnyRoute::new(context.dashboard_path()));
                        }
                    }
                    Err(err) => submit_error.set(Some(err.to_string())),
                }
                loading.set(false);
            });
        })
    };

    let error_for = |field: Field| -> Html {
        match &*field_error {
            Some((failed, message)) if *failed == field => html! {
                <span class="label-text-alt text-error">{message.clone()}</span>
            },
            _ => html! {},
        }
    };

    let heading = if kind == LoginKind::Volunteer {
        "Become a volunteer"
    } else {
        "Create an account"
    };
    let is_busy = *loading;

    html! {
        <div class="card w-full max-w-md shadow-lg bg-base-100">
            <form class="card-body" onsubmit={onsubmit}>
                <h2 class="card-title text-2xl">{heading}</h2>
                if let Some(message) = &*submit_error {
                    <div class="alert alert-error">
                        <span>{message.clone()}</span>
                    </div>
                }
                <div class="form-control">
                    <label class="label" for="name"><span class="label-text">{"Full name"}</span></label>
                    <input id="name" class="input input-bordered" type="text"
                        value={form.name.clone()}
                        oninput={field_input(&form, |form, value| form.name = value)} />
                    {error_for(Field::Name)}
                </div>
                <div class="form-control">
                    <label class="label" for="email"><span class="label-text">{"Email"}</span></label>
                    <input id="email" class="input input-bordered" type="email"
                        value={form.email.clone()}
                        oninput={field_input(&form, |form, value| form.email = value)} />
                    {error_for(Field::Email)}
                </div>
                <div class="form-control">
                    <label class="label" for="password"><span class="label-text">{"Password"}</span></label>
                    <input id="password" class="input input-bordered" type="password"
                        value={form.password.clone()}
                        oninput={field_input(&form, |form, value| form.password = value)} />
                    {error_for(Field::Password)}
                </div>
                <div class="form-control">
                    <label class="label" for="confirm-password">
                        <span class="label-text">{"Confirm password"}</span>
                    </label>
                    <input id="confirm-password" class="input input-bordered" type="password"
                        value={form.confirm_password.clone()}
                        oninput={field_input(&form, |form, value| form.confirm_password = value)} />
                    {error_for(Field::ConfirmPassword)}
                </div>
                <div class="form-control">
                    <label class="label" for="phone">
                        <span class="label-text">{"Phone (optional)"}</span>
                    </label>
                    <input id="phone" class="input input-bordered" type="tel"
                        value={form.phone.clone()}
                        oninput={field_input(&form, |form, value| form.phone = value)} />
                    {error_for(Field::Phone)}
                </div>
                <div class="form-control mt-6">
                    <button class="btn btn-primary" type="submit" disabled={is_busy}>
                        {if is_busy { "Creating account..." } else { "Create account" }}
                    </button>
                </div>
                <p class="text-sm text-center">
                    {"Already registered? "}
                    <Link<AnyRoute> to={AnyRoute::new(context.login_path())} classes="link">
                        {"Sign in"}
                    </Link<AnyRoute>>
                </p>
            </form>
        </div>
    }
}
