//! Component type registry.
//!
//! Bridges the canvas component model to the widget library: every kind
//! declares its editable traits and defaults, and the registry keeps one
//! render target per live instance in a side table keyed by instance id.

mod definition;
mod lifecycle;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub use definition::{builtin, ComponentTypeDefinition, Trait, TraitKind, TraitOption};
pub use lifecycle::{RenderTarget, WidgetKind, WidgetLifecycle};

use crate::error::{BuilderError, BuilderResult};

/// Current trait values of an instance, keyed by trait name.
pub type TraitValues = BTreeMap<String, String>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One placement of a component kind in the document.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentInstance {
    pub id: InstanceId,
    pub kind: String,
    pub values: TraitValues,
    pub styles: BTreeMap<String, String>,
}

impl ComponentInstance {
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Wrapper style as an inline `style` attribute.
    pub fn style_attr(&self) -> String {
        self.styles
            .iter()
            .map(|(k, v)| format!("{}: {};", k, v))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Default)]
pub struct Registry {
    definitions: HashMap<String, ComponentTypeDefinition>,
    order: Vec<String>,
    instances: BTreeMap<InstanceId, ComponentInstance>,
    targets: HashMap<InstanceId, RenderTarget>,
    next_id: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a kind, replacing any earlier definition of the same kind.
    ///
    /// Existing instances keep their values even when the new definition
    /// narrows an option set.
    pub fn register(&mut self, definition: ComponentTypeDefinition) -> BuilderResult<()> {
        if definition.renderer.is_none() {
            warn!(kind = %definition.kind, "rejecting component kind without renderer");
            return Err(BuilderError::MissingRenderer(definition.kind));
        }
        for (i, tr) in definition.traits.iter().enumerate() {
            if definition.traits[..i].iter().any(|t| t.name == tr.name) {
                return Err(BuilderError::DuplicateTrait {
                    kind: definition.kind.clone(),
                    name: tr.name.clone(),
                });
            }
        }

        let kind = definition.kind.clone();
        if self.definitions.insert(kind.clone(), definition).is_some() {
            info!(%kind, "replaced component kind");
        } else {
            debug!(%kind, "registered component kind");
            self.order.push(kind);
        }
        Ok(())
    }

    pub fn definition(&self, kind: &str) -> Option<&ComponentTypeDefinition> {
        self.definitions.get(kind)
    }

    pub fn is_registered(&self, kind: &str) -> bool {
        self.definitions.contains_key(kind)
    }

    /// Registered kinds in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Creates an instance holding exactly the kind's defaults.
    pub fn instantiate(&mut self, kind: &str) -> BuilderResult<InstanceId> {
        self.restore(kind, TraitValues::new(), BTreeMap::new())
    }

    /// Creates an instance with saved values laid over the kind's defaults.
    pub fn restore(
        &mut self,
        kind: &str,
        values: TraitValues,
        styles: BTreeMap<String, String>,
    ) -> BuilderResult<InstanceId> {
        let def = self
            .definitions
            .get(kind)
            .ok_or_else(|| BuilderError::UnknownKind(kind.to_string()))?;

        let mut instance_values = def.defaults.clone();
        instance_values.extend(values);
        let mut instance_styles = def.style.clone();
        instance_styles.extend(styles);

        let id = InstanceId(self.next_id);
        self.next_id += 1;
        self.instances.insert(
            id,
            ComponentInstance {
                id,
                kind: kind.to_string(),
                values: instance_values,
                styles: instance_styles,
            },
        );
        Ok(id)
    }

    pub fn instance(&self, id: InstanceId) -> Option<&ComponentInstance> {
        self.instances.get(&id)
    }

    pub fn instances(&self) -> impl Iterator<Item = &ComponentInstance> {
        self.instances.values()
    }

    /// Property change from the editor: stores the value of a declared
    /// trait, then lets [`Registry::on_trait_changed`] re-render. Names the
    /// kind does not declare are dropped.
    pub fn set_property(&mut self, id: InstanceId, name: &str, value: impl Into<String>) -> bool {
        let Some(instance) = self.instances.get_mut(&id) else {
            debug!(%id, name, "property change for unknown instance ignored");
            return false;
        };
        if !self
            .definitions
            .get(&instance.kind)
            .is_some_and(|def| def.declares(name))
        {
            debug!(%id, name, "undeclared property ignored");
            return false;
        }
        instance.values.insert(name.to_string(), value.into());
        self.on_trait_changed(id, name)
    }

    /// Re-renders `id` when `name` is one of its kind's declared traits.
    /// Returns whether a render happened.
    pub fn on_trait_changed(&mut self, id: InstanceId, name: &str) -> bool {
        let declared = self
            .instances
            .get(&id)
            .and_then(|instance| self.definitions.get(&instance.kind))
            .is_some_and(|def| def.declares(name));
        if !declared {
            return false;
        }
        self.render(id).is_some()
    }

    /// Renders the instance into its target, creating the target on first
    /// use and updating it in place afterwards.
    pub fn render(&mut self, id: InstanceId) -> Option<&RenderTarget> {
        let instance = self.instances.get(&id)?;
        let Some(renderer) = self
            .definitions
            .get(&instance.kind)
            .and_then(|def| def.renderer)
        else {
            warn!(%id, kind = %instance.kind, "no renderer for instance, widget not shown");
            return None;
        };

        let target = match self.targets.entry(id) {
            std::collections::hash_map::Entry::Occupied(entry) => {
                let target = entry.into_mut();
                renderer.update(target, &instance.values);
                target
            }
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(renderer.mount(id, &instance.values))
            }
        };
        Some(&*target)
    }

    pub fn target(&self, id: InstanceId) -> Option<&RenderTarget> {
        self.targets.get(&id)
    }

    pub fn live_targets(&self) -> usize {
        self.targets.len()
    }

    /// Releases the instance's render target. Returns `false` when there
    /// was nothing left to release.
    pub fn dispose(&mut self, id: InstanceId) -> bool {
        let Some(target) = self.targets.remove(&id) else {
            return false;
        };
        let renderer = self
            .instances
            .get(&id)
            .and_then(|instance| self.definitions.get(&instance.kind))
            .and_then(|def| def.renderer);
        match renderer {
            Some(renderer) => renderer.unmount(target),
            None => debug!(%id, "dropping target of unregistered kind"),
        }
        true
    }

    /// Disposes the instance and forgets it.
    pub fn remove(&mut self, id: InstanceId) -> Option<ComponentInstance> {
        self.dispose(id);
        self.instances.remove(&id)
    }

    /// Releases every live target. Used on editor teardown.
    pub fn dispose_all(&mut self) -> usize {
        let ids: Vec<InstanceId> = self.targets.keys().copied().collect();
        ids.into_iter().filter(|id| self.dispose(*id)).count()
    }

    /// Forgets every instance after releasing their targets.
    pub fn clear_instances(&mut self) {
        self.dispose_all();
        self.instances.clear();
    }

    /// Select traits whose current value is outside the declared options.
    /// Such values are shown as they are, never reset.
    pub fn stale_traits(&self, id: InstanceId) -> Vec<&str> {
        let Some(instance) = self.instances.get(&id) else {
            return Vec::new();
        };
        let Some(def) = self.definitions.get(&instance.kind) else {
            return Vec::new();
        };
        def.traits
            .iter()
            .filter(|tr| {
                instance
                    .value(&tr.name)
                    .is_some_and(|value| !tr.accepts(value))
            })
            .map(|tr| tr.name.as_str())
            .collect()
    }

    /// Updates a style property of the instance's wrapper. An empty value
    /// removes the property.
    pub fn set_style(&mut self, id: InstanceId, property: &str, value: String) -> bool {
        let Some(instance) = self.instances.get_mut(&id) else {
            return false;
        };
        if value.is_empty() {
            instance.styles.remove(property);
        } else {
            instance.styles.insert(property.to_string(), value);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::WidgetView;
    use pretty_assertions::assert_eq;

    fn registry_with(kinds: &[WidgetKind]) -> Registry {
        let mut registry = Registry::new();
        for kind in kinds {
            registry.register(builtin(*kind)).unwrap();
        }
        registry
    }

    fn renders(registry: &Registry, id: InstanceId) -> u32 {
        registry.target(id).map_or(0, |t| t.renders)
    }

    #[test]
    fn instantiate_starts_from_declared_defaults() {
        let mut registry = registry_with(&WidgetKind::ALL);
        for kind in WidgetKind::ALL {
            let id = registry.instantiate(kind.kind_name()).unwrap();
            let def = registry.definition(kind.kind_name()).unwrap();
            assert_eq!(registry.instance(id).unwrap().values, def.defaults);
        }
    }

    #[test]
    fn register_rejects_missing_renderer() {
        let mut registry = Registry::new();
        let def = ComponentTypeDefinition::new("react-card").with_trait(Trait::text("title", "Title"));
        let err = registry.register(def).unwrap_err();
        assert!(matches!(err, BuilderError::MissingRenderer(kind) if kind == "react-card"));
        assert!(!registry.is_registered("react-card"));
        assert!(registry.instantiate("react-card").is_err());
    }

    #[test]
    fn register_rejects_duplicate_trait_names() {
        let mut registry = Registry::new();
        let def = ComponentTypeDefinition::new("react-pill")
            .with_trait(Trait::text("text", "Text"))
            .with_trait(Trait::text("text", "Again"))
            .render_with(WidgetKind::Badge);
        assert!(matches!(
            registry.register(def),
            Err(BuilderError::DuplicateTrait { .. })
        ));
    }

    #[test]
    fn reregistering_overwrites_without_duplicating_kind() {
        let mut registry = registry_with(&[WidgetKind::Button]);
        let replacement = builtin(WidgetKind::Button).with_default("buttonText", "Go");
        registry.register(replacement).unwrap();

        assert_eq!(registry.kinds().collect::<Vec<_>>(), vec!["react-button"]);
        let id = registry.instantiate("react-button").unwrap();
        assert_eq!(registry.instance(id).unwrap().value("buttonText"), Some("Go"));
    }

    #[test]
    fn render_twice_keeps_one_target() {
        let mut registry = registry_with(&[WidgetKind::Button]);
        let id = registry.instantiate("react-button").unwrap();

        let first = registry.render(id).unwrap().mount_id.clone();
        let second = registry.render(id).unwrap().mount_id.clone();

        assert_eq!(first, second);
        assert_eq!(registry.live_targets(), 1);
        assert_eq!(renders(&registry, id), 2);
    }

    #[test]
    fn dispose_twice_is_a_no_op() {
        let mut registry = registry_with(&[WidgetKind::Alert]);
        let id = registry.instantiate("react-alert").unwrap();
        registry.render(id);

        assert!(registry.dispose(id));
        assert_eq!(registry.live_targets(), 0);
        assert!(!registry.dispose(id));
        assert_eq!(registry.live_targets(), 0);
    }

    #[test]
    fn unrelated_property_does_not_render() {
        let mut registry = registry_with(&[WidgetKind::Badge]);
        let id = registry.instantiate("react-badge").unwrap();
        registry.render(id);
        let before = renders(&registry, id);

        assert!(!registry.set_property(id, "unrelatedField", "x"));
        assert!(!registry.on_trait_changed(id, "unrelatedField"));
        assert_eq!(renders(&registry, id), before);
        assert_eq!(registry.instance(id).unwrap().value("unrelatedField"), None);
    }

    #[test]
    fn badge_text_edit_rerenders_with_same_variant() {
        let mut registry = registry_with(&[WidgetKind::Badge]);
        let id = registry.instantiate("react-badge").unwrap();

        let view = registry.render(id).unwrap().view.clone();
        assert_eq!(
            view,
            WidgetView::Badge {
                variant: "default".into(),
                text: "Badge".into()
            }
        );

        assert!(registry.set_property(id, "badgeText", "Shipped"));
        assert_eq!(
            registry.target(id).unwrap().view,
            WidgetView::Badge {
                variant: "default".into(),
                text: "Shipped".into()
            }
        );
        assert_eq!(registry.live_targets(), 1);
    }

    #[test]
    fn narrowed_options_leave_stale_value_in_place() {
        let mut registry = registry_with(&[WidgetKind::Button]);
        let id = registry.instantiate("react-button").unwrap();
        registry.set_property(id, "variant", "ghost");

        let mut narrowed = builtin(WidgetKind::Button);
        narrowed.traits[1] = Trait::select("variant", "Variant", [("default", "Default")]);
        registry.register(narrowed).unwrap();

        assert_eq!(registry.instance(id).unwrap().value("variant"), Some("ghost"));
        assert_eq!(registry.stale_traits(id), vec!["variant"]);
        let view = registry.render(id).unwrap().view.clone();
        assert!(matches!(view, WidgetView::Button { variant, .. } if variant == "ghost"));
    }

    #[test]
    fn callbacks_on_removed_instance_do_nothing() {
        let mut registry = registry_with(&[WidgetKind::Button]);
        let id = registry.instantiate("react-button").unwrap();
        registry.render(id);
        registry.remove(id);

        assert!(registry.render(id).is_none());
        assert!(!registry.set_property(id, "buttonText", "late"));
        assert!(!registry.dispose(id));
        assert_eq!(registry.live_targets(), 0);
    }

    #[test]
    fn dispose_all_releases_every_target() {
        let mut registry = registry_with(&[WidgetKind::Button, WidgetKind::Badge]);
        let a = registry.instantiate("react-button").unwrap();
        let b = registry.instantiate("react-badge").unwrap();
        let c = registry.instantiate("react-badge").unwrap();
        registry.render(a);
        registry.render(b);

        assert_eq!(registry.dispose_all(), 2);
        assert_eq!(registry.live_targets(), 0);
        assert!(registry.instance(c).is_some());
    }

    #[test]
    fn styles_start_from_definition_and_empty_value_removes() {
        let mut registry = registry_with(&[WidgetKind::Container]);
        let id = registry.instantiate("container").unwrap();
        assert_eq!(
            registry.instance(id).unwrap().style_attr(),
            "border: 1px solid #ddd; min-height: 50px; padding: 10px;"
        );

        registry.set_style(id, "padding", String::new());
        registry.set_style(id, "color", "red".into());
        assert_eq!(
            registry.instance(id).unwrap().style_attr(),
            "border: 1px solid #ddd; color: red; min-height: 50px;"
        );
    }
}
