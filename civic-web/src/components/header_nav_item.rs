use yew::{AttrValue, Html, Properties, classes, function_component, html};
use yew_router::AnyRoute;
use yew_router::prelude::Link;

#[derive(Properties, PartialEq, Eq)]
pub struct HeaderNavItemProps {
    pub title: AttrValue,
    /// Browser path the item links to.
    pub path: String,
    #[prop_or_default]
    pub active: bool,
}

#[function_component(HeaderNavItem)]
pub fn header_nav_item(props: &HeaderNavItemProps) -> Html {
    let active_route_class = if props.active { "btn-soft" } else { "" };

    html! {
      <li>
          <Link<AnyRoute>
              to={AnyRoute::new(props.path.clone())}
              classes={classes!("btn", "btn-ghost", "gap-2", active_route_class)}
          >
              {props.title.clone()}
          </Link<AnyRoute>>
      </li>
    }
}
