use crate::pages::{LoginPage, RegisterPage, VerifyEmailPage};
use crate::route_table::{Page, RouteParams};
use crate::scoped_path::PortalContext;
use yew::{Html, Properties, function_component, html};

#[derive(Properties, PartialEq)]
pub struct PageViewProps {
    pub page: Page,
    pub params: RouteParams,
    pub context: PortalContext,
}

/// Renders the component behind a resolved [`Page`].
///
/// Portal content pages are served by their own bundles; here they get a
/// titled shell carrying the captured route parameters.
#[function_component(PageView)]
pub fn page_view(props: &PageViewProps) -> Html {
    let context = props.context;
    match props.page {
        Page::Login => html! { <LoginPage {context} /> },
        Page::Register => html! { <RegisterPage {context} /> },
        Page::VerifyEmail => html! { <VerifyEmailPage {context} /> },
        page => html! {
            <section class="p-4 space-y-4" data-page={page.title()}>
                <h1 class="text-2xl font-bold">{page.title()}</h1>
                if !props.params.is_empty() {
                    <dl class="grid grid-cols-2 gap-2">
                        { for props.params.pairs().map(|(name, value)| html! {
                            <>
                                <dt class="font-semibold">{name.to_string()}</dt>
                                <dd>{value.to_string()}</dd>
                            </>
                        }) }
                    </dl>
                }
            </section>
        },
    }
}
