use crate::{
    app::PortalServices,
    components::{header_nav_item::HeaderNavItem, user_dropdown::UserDropdown},
    models::app_state::AppState,
    portal::Portal,
    scoped_path::PortalContext,
};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::AnyRoute;
use yew_router::prelude::{Link, use_location, use_navigator};
use yewdux::prelude::use_selector;

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    pub context: PortalContext,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    let services = use_context::<PortalServices>();
    let navigator = use_navigator();
    let current_path = use_location().map(|location| location.path().to_string());
    let user = use_selector(|state: &AppState| state.session.user.clone());
    let context = props.context;

    let links = services
        .as_ref()
        .map(|services| services.table.navigation(&context))
        .unwrap_or_default();

    let on_logout = {
        let services = services.clone();
        Callback::from(move |()| {
            let Some(services) = services.clone() else {
                return;
            };
            let navigator = navigator.clone();
            spawn_local(async move {
                let next = services.session.logout(&context).await;
                if let Some(navigator) = navigator {
                    navigator.push(&AnyRoute::new(next));
                }
            });
        })
    };

    let brand = match context.portal {
        Portal::Main => "Civic Portal",
        Portal::Admin => "Civic Portal · Admin",
        Portal::Volunteer => "Civic Portal · Volunteers",
    };
    let render_links = || -> Html {
        html! {
            { for links.iter().map(|(title, path)| html! {
                <HeaderNavItem
                    title={*title}
                    path={path.clone()}
                    active={current_path.as_deref() == Some(path.as_str())}
                />
            }) }
        }
    };

    html! {
        <nav class="navbar justify-between bg-base-300">
            <Link<AnyRoute> to={AnyRoute::new(context.scoped("/"))} classes="btn btn-ghost text-lg">
                {brand}
            </Link<AnyRoute>>
            <div class="dropdown dropdown-end sm:hidden">
                <button class="btn btn-soft">
                <i class="fa-solid fa-bars text-lg"></i>
                </button>
                <ul
                tabindex="0"
                class="dropdown-content menu z-[1] bg-base-200 p-6 rounded-box shadow w-56 gap-2"
                >
                { render_links() }
                </ul>
            </div>
            <ul class="hidden menu sm:menu-horizontal">
                { render_links() }
            </ul>
            <div class="flex items-center gap-2">
                {
                    (*user).as_ref().map_or_else(
                        || html! {
                            <Link<AnyRoute>
                                to={AnyRoute::new(context.login_path())}
                                classes="btn btn-primary btn-sm"
                            >
                                {"Sign in"}
                            </Link<AnyRoute>>
                        },
                        |user| html! {
                            <UserDropdown user={user.clone()} {context} on_logout={on_logout.clone()} />
                        },
                    )
                }
            </div>
        </nav>
    }
}
