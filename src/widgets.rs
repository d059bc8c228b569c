//! The UI widget library rendered inside the canvas.
//!
//! Widgets are a pure projection: a kind, a named style variant and a few
//! literal text fields go in, a [`WidgetView`] comes out. Nothing here holds
//! state or calls back into the registry.

use dioxus::prelude::*;
use serde::{Deserialize, Serialize};

use crate::registry::{TraitValues, WidgetKind};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidgetView {
    Button { variant: String, text: String },
    Alert { variant: String, title: String, description: String },
    Badge { variant: String, text: String },
    Container,
    Image { src: String, alt: String },
}

fn field(values: &TraitValues, name: &str) -> String {
    values.get(name).cloned().unwrap_or_default()
}

/// Maps the current trait values of an instance to the widget it shows.
///
/// Values are forwarded untouched, including variants that are no longer
/// part of the declared option set.
pub fn project(kind: WidgetKind, values: &TraitValues) -> WidgetView {
    match kind {
        WidgetKind::Button => WidgetView::Button {
            variant: field(values, "variant"),
            text: field(values, "buttonText"),
        },
        WidgetKind::Alert => WidgetView::Alert {
            variant: field(values, "variant"),
            title: field(values, "alertTitle"),
            description: field(values, "alertDescription"),
        },
        WidgetKind::Badge => WidgetView::Badge {
            variant: field(values, "variant"),
            text: field(values, "badgeText"),
        },
        WidgetKind::Container => WidgetView::Container,
        WidgetKind::Image => WidgetView::Image {
            src: field(values, "src"),
            alt: field(values, "alt"),
        },
    }
}

const BUTTON_BASE: &str = "inline-flex items-center justify-center rounded-md text-sm font-medium h-10 px-4 py-2";
const BADGE_BASE: &str = "inline-flex items-center rounded-full border px-2.5 py-0.5 text-xs font-semibold";
const ALERT_BASE: &str = "relative w-full rounded-lg border p-4";

fn button_class(variant: &str) -> String {
    let variant_class = match variant {
        "default" => "bg-primary text-primary-foreground",
        "destructive" => "bg-destructive text-destructive-foreground",
        "outline" => "border border-input bg-background",
        "secondary" => "bg-secondary text-secondary-foreground",
        "ghost" => "hover:bg-accent hover:text-accent-foreground",
        "link" => "text-primary underline-offset-4 hover:underline",
        _ => "",
    };
    format!("{BUTTON_BASE} {variant_class}")
}

fn badge_class(variant: &str) -> String {
    let variant_class = match variant {
        "default" => "border-transparent bg-primary text-primary-foreground",
        "secondary" => "border-transparent bg-secondary text-secondary-foreground",
        "destructive" => "border-transparent bg-destructive text-destructive-foreground",
        "outline" => "text-foreground",
        _ => "",
    };
    format!("{BADGE_BASE} {variant_class}")
}

fn alert_class(variant: &str) -> String {
    let variant_class = match variant {
        "default" => "bg-background text-foreground",
        "destructive" => "border-destructive/50 text-destructive",
        _ => "",
    };
    format!("{ALERT_BASE} {variant_class}")
}

#[component]
pub fn Widget(view: WidgetView) -> Element {
    match view {
        WidgetView::Button { variant, text } => rsx! {
            button { class: button_class(&variant), "{text}" }
        },
        WidgetView::Alert { variant, title, description } => rsx! {
            div { class: alert_class(&variant), role: "alert",
                h5 { class: "mb-1 font-medium leading-none tracking-tight", "{title}" }
                div { class: "text-sm", "{description}" }
            }
        },
        WidgetView::Badge { variant, text } => rsx! {
            div { class: badge_class(&variant), "{text}" }
        },
        WidgetView::Container => rsx! {},
        WidgetView::Image { src, alt } => rsx! {
            img { src: "{src}", alt: "{alt}", style: "max-width: 100%;" }
        },
    }
}
