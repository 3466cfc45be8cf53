use std::rc::Rc;

use log::info;
use yew::prelude::*;

mod config;
mod journey {
    pub mod dom;
    pub mod hover;
    pub mod registry;
    pub mod render;
    pub mod session;
    pub mod visibility;
}
mod components {
    pub mod learning_journey;
}

use components::learning_journey::LearningJourney;
use journey::registry::StepRegistry;

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub registry: Rc<StepRegistry>,
}

#[function_component]
fn App(props: &AppProps) -> Html {
    html! {
        <main class="portfolio">
            <LearningJourney registry={props.registry.clone()} />
        </main>
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    console_log::init_with_level(config::log_level()).expect("error initializing log");

    // Step content is compiled in, so a bad entry is a build mistake: stop here.
    let registry = StepRegistry::builtin().expect("journey step content is malformed");

    info!("Starting application with {} journey steps", registry.len());
    yew::Renderer::<App>::with_props(AppProps {
        registry: Rc::new(registry),
    })
    .render();
}
