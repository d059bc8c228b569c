use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{TraitValues, WidgetKind};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitOption {
    pub value: String,
    pub name: String,
}

/// How the property panel edits a trait.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TraitKind {
    Text,
    Select { options: Vec<TraitOption> },
}

/// A named, user-editable field of a component kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trait {
    pub name: String,
    pub label: String,
    pub kind: TraitKind,
}

impl Trait {
    pub fn text(name: &str, label: &str) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind: TraitKind::Text,
        }
    }

    pub fn select<'a>(name: &str, label: &str, options: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let options = options
            .into_iter()
            .map(|(value, name)| TraitOption {
                value: value.to_string(),
                name: name.to_string(),
            })
            .collect();
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind: TraitKind::Select { options },
        }
    }

    /// Whether `value` is allowed by the declared option set. Free text
    /// accepts anything.
    pub fn accepts(&self, value: &str) -> bool {
        match &self.kind {
            TraitKind::Text => true,
            TraitKind::Select { options } => options.iter().any(|o| o.value == value),
        }
    }
}

/// Schema, defaults and render strategy of one component kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentTypeDefinition {
    pub kind: String,
    pub traits: Vec<Trait>,
    pub defaults: TraitValues,
    /// Wrapper element style applied around the rendered widget.
    pub style: BTreeMap<String, String>,
    pub droppable: bool,
    pub renderer: Option<WidgetKind>,
}

impl ComponentTypeDefinition {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            traits: Vec::new(),
            defaults: TraitValues::new(),
            style: BTreeMap::new(),
            droppable: false,
            renderer: None,
        }
    }

    pub fn with_trait(mut self, tr: Trait) -> Self {
        self.traits.push(tr);
        self
    }

    pub fn with_default(mut self, name: &str, value: &str) -> Self {
        self.defaults.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_style(mut self, property: &str, value: &str) -> Self {
        self.style.insert(property.to_string(), value.to_string());
        self
    }

    pub fn droppable(mut self) -> Self {
        self.droppable = true;
        self
    }

    pub fn render_with(mut self, renderer: WidgetKind) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn trait_named(&self, name: &str) -> Option<&Trait> {
        self.traits.iter().find(|t| t.name == name)
    }

    pub fn declares(&self, name: &str) -> bool {
        self.trait_named(name).is_some()
    }
}

const BUTTON_VARIANTS: [(&str, &str); 6] = [
    ("default", "Default"),
    ("destructive", "Destructive"),
    ("outline", "Outline"),
    ("secondary", "Secondary"),
    ("ghost", "Ghost"),
    ("link", "Link"),
];

const ALERT_VARIANTS: [(&str, &str); 2] = [("default", "Default"), ("destructive", "Destructive")];

const BADGE_VARIANTS: [(&str, &str); 4] = [
    ("default", "Default"),
    ("secondary", "Secondary"),
    ("destructive", "Destructive"),
    ("outline", "Outline"),
];

/// The stock definition for a widget kind.
pub fn builtin(kind: WidgetKind) -> ComponentTypeDefinition {
    match kind {
        WidgetKind::Button => ComponentTypeDefinition::new(kind.kind_name())
            .with_trait(Trait::text("buttonText", "Text"))
            .with_trait(Trait::select("variant", "Variant", BUTTON_VARIANTS))
            .with_default("buttonText", "Click me")
            .with_default("variant", "default")
            .with_style("display", "inline-block")
            .with_style("padding", "10px")
            .render_with(kind),
        WidgetKind::Alert => ComponentTypeDefinition::new(kind.kind_name())
            .with_trait(Trait::select("variant", "Variant", ALERT_VARIANTS))
            .with_trait(Trait::text("alertTitle", "Title"))
            .with_trait(Trait::text("alertDescription", "Description"))
            .with_default("variant", "default")
            .with_default("alertTitle", "Heads up!")
            .with_default("alertDescription", "You can add components to the canvas.")
            .with_style("padding", "10px")
            .render_with(kind),
        WidgetKind::Badge => ComponentTypeDefinition::new(kind.kind_name())
            .with_trait(Trait::select("variant", "Variant", BADGE_VARIANTS))
            .with_trait(Trait::text("badgeText", "Text"))
            .with_default("variant", "default")
            .with_default("badgeText", "Badge")
            .with_style("padding", "10px")
            .with_style("display", "inline-block")
            .render_with(kind),
        WidgetKind::Container => ComponentTypeDefinition::new(kind.kind_name())
            .with_style("min-height", "50px")
            .with_style("border", "1px solid #ddd")
            .with_style("padding", "10px")
            .droppable()
            .render_with(kind),
        WidgetKind::Image => ComponentTypeDefinition::new(kind.kind_name())
            .with_trait(Trait::text("src", "Source"))
            .with_trait(Trait::text("alt", "Alt text"))
            .with_default("src", "")
            .with_default("alt", "Image")
            .render_with(kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_accepts_declared_values_only() {
        let variant = Trait::select("variant", "Variant", BADGE_VARIANTS);
        assert!(variant.accepts("outline"));
        assert!(!variant.accepts("ghost"));
        assert!(Trait::text("badgeText", "Text").accepts("anything"));
    }

    #[test]
    fn every_builtin_has_a_renderer_and_defaults_for_its_traits() {
        for kind in WidgetKind::ALL {
            let def = builtin(kind);
            assert_eq!(def.renderer, Some(kind));
            for tr in &def.traits {
                assert!(def.defaults.contains_key(&tr.name), "{} lacks {}", def.kind, tr.name);
            }
        }
    }
}
