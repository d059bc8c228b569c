use dioxus::logger::tracing::{error, Level};
use dioxus::prelude::*;

use widget_builder::config::{BuilderConfig, Preset};
use widget_builder::visual_editor::BuilderPage;

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[route("/")]
    Home {},
    #[route("/builder/:preset")]
    Builder { preset: String },
}

fn main() {
    if let Err(err) = dioxus::logger::init(Level::INFO) {
        eprintln!("logger already set: {err}");
    }
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        Router::<Route> {}
    }
}

#[component]
fn Home() -> Element {
    rsx! {
        div { style: "font-family: system-ui; padding: 32px;",
            h1 { style: "font-size: 24px; margin-bottom: 16px;", "Page builders" }
            ul {
                for preset in Preset::ALL {
                    li {
                        Link { to: Route::Builder { preset: preset.slug().to_string() }, {preset.title()} }
                    }
                }
            }
        }
    }
}

#[component]
fn Builder(preset: String) -> Element {
    let Some(found) = Preset::from_slug(&preset) else {
        error!(%preset, "unknown builder preset");
        return rsx! {
            p { "No builder named \"{preset}\"" }
            Link { to: Route::Home {}, "Back" }
        };
    };

    rsx! {
        BuilderPage { key: "{preset}", config: BuilderConfig::preset(found) }
    }
}
