use crate::containers::header::Header;
use crate::route_table::LayoutKind;
use crate::scoped_path::PortalContext;
use web_sys::window;
use yew::{Children, Html, Properties, classes, function_component, html, use_effect_with};

#[derive(Properties, PartialEq)]
pub struct LayoutProps {
    pub children: Children,
    pub kind: LayoutKind,
    pub context: PortalContext,
}

#[function_component(Layout)]
pub fn layout(props: &LayoutProps) -> Html {
    // Portal name on the html tag lets the stylesheet theme each audience
    let portal = props.context.portal;
    use_effect_with(portal, |portal| {
        if let Some(html_element) = window()
            .and_then(|window| window.document())
            .and_then(|document| document.document_element())
        {
            html_element
                .set_attribute("data-portal", portal.as_str())
                .unwrap_or_default();
        }
        || {}
    });

    if props.kind == LayoutKind::Bare {
        return html! {
            <main class="min-h-screen flex items-center justify-center bg-base-200">
                {props.children.clone()}
            </main>
        };
    }

    html! {
    <>
        <Header context={props.context} />
        <div class="min-h-screen bg-base-100 flex flex-col">
            <main class={classes!(
                "flex-grow",
                "p-4",
                match props.kind {
                    LayoutKind::Admin | LayoutKind::Volunteer => "container mx-auto",
                    _ => "max-w-4xl mx-auto",
                }
            )}>
                {props.children.clone()}
            </main>
            <footer class="footer footer-center p-4 border-t border-base-300 text-base-content">
                <div>
                    <p>{"Civic Portal · Report it, track it, fix it"}</p>
                </div>
            </footer>
        </div>
    </>
    }
}
