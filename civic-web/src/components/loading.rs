use yew::{AttrValue, Html, Properties, function_component, html};

#[derive(Properties, PartialEq)]
pub struct LoadingProps {
    /// What the portal is waiting on.
    #[prop_or(AttrValue::Static("Checking your session"))]
    pub label: AttrValue,
}

/// Placeholder shown while a gate is waiting on the network.
#[function_component(Loading)]
pub fn loading(props: &LoadingProps) -> Html {
    html! {
        <section class="grid place-items-center min-h-[50vh]" role="status" aria-live="polite">
            <div class="flex items-center gap-3 text-base-content/80">
                <span class="loading loading-ring loading-md text-primary"></span>
                <span class="text-sm">{props.label.clone()}</span>
            </div>
        </section>
    }
}
