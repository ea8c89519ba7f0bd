//! Civic portal front end: one bundle serving the public, volunteer and
//! admin portals, with setup and access gating in front of every page.

mod access_gate;
mod api;
mod app;
mod cache;
mod clock;
mod components;
mod config;
mod containers;
mod models;
mod navigation;
mod pages;
mod portal;
mod route_table;
mod scoped_path;
mod session;
mod setup_gate;
mod telemetry;

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_test;

use app::App;
use config::FrontendConfig;
use yew::Renderer;
use yew::{Html, function_component, html};
use yewdux::YewduxRoot;

#[function_component(Root)]
fn root() -> Html {
    html! {
        <YewduxRoot>
            <App />
        </YewduxRoot>
    }
}

fn main() {
    telemetry::init(FrontendConfig::new().log_level);

    // Route panics through tracing so they reach the console untruncated
    std::panic::set_hook(Box::new(|info| {
        let payload = info
            .payload()
            .downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| info.payload().downcast_ref::<&str>().copied())
            .unwrap_or("unknown panic");
        match info.location() {
            Some(location) => tracing::error!(
                file = location.file(),
                line = location.line(),
                column = location.column(),
                "panic: {payload}"
            ),
            None => tracing::error!("panic: {payload}"),
        }
    }));

    tracing::info!("starting civic portal");
    Renderer::<Root>::new().render();
}
