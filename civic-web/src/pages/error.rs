use yew::{AttrValue, Html, Properties, function_component, html};

#[derive(Properties, PartialEq)]
pub struct ErrorPageProps {
    pub title: AttrValue,
    pub message: AttrValue,
}

/// `ErrorPage` page component
///
/// Shown in place when a navigation cannot be satisfied, for example when
/// every rule would redirect back to the current page.
#[function_component(ErrorPage)]
pub fn error_page(props: &ErrorPageProps) -> Html {
    html! {
        <div class="p-4 space-y-6" role="alert">
            <h1 class="text-2xl font-bold">{ props.title.clone() }</h1>
            <p>{ props.message.clone() }</p>
        </div>
    }
}
