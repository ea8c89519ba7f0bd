use crate::scoped_path::PortalContext;
use civic_shared::models::User;
use yew::prelude::*;
use yew_router::AnyRoute;
use yew_router::prelude::use_navigator;

#[derive(yew::Properties, PartialEq)]
pub struct UserDropdownProps {
    pub user: User,
    pub context: PortalContext,
    pub on_logout: Callback<()>,
}

#[function_component(UserDropdown)]
pub fn user_dropdown(props: &UserDropdownProps) -> Html {
    let navigator = use_navigator();
    let user = &props.user;

    let dashboard_button = {
        let dashboard = props.context.dashboard_path();
        let onclick = Callback::from(move |event: yew::MouseEvent| {
            event.prevent_default();
            if let Some(navigator) = navigator.as_ref() {
                navigator.push(&AnyRoute::new(dashboard.clone()));
            }
        });
        html! {
            <li><a {onclick}>{"Dashboard"}</a></li>
        }
    };

    let logout_button = {
        let on_logout = props.on_logout.clone();
        let onclick = Callback::from(move |event: yew::MouseEvent| {
            event.prevent_default();
            on_logout.emit(());
        });
        html! {
            <li><a {onclick}>{"Sign out"}</a></li>
        }
    };

    html! {
        <div class="dropdown dropdown-end">
            <div tabindex="0" role="button" class="btn btn-ghost btn-circle mb-1">
                <i class="fa-solid fa-user text-lg"></i>
            </div>
            <ul tabIndex={0} class="dropdown-content z-[1] menu p-2 shadow bg-base-200 rounded-box w-52">
                <li class="px-2 py-1 text-left">
                    <div class="text-sm font-semibold text-base-content">{ user.display_name().to_string() }</div>
                    <div class="text-xs text-base-content/70">{ user.role().to_string() }</div>
                </li>
                <div class="divider my-0"></div>
                {dashboard_button}
                <div class="divider my-0"></div>
                {logout_button}
            </ul>
        </div>
    }
}
