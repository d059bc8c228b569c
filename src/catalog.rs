//! Palette of insertable blocks.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{BuilderError, BuilderResult};
use crate::registry::{InstanceId, Registry};

/// Reference from a block to a registered component kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRef {
    #[serde(rename = "type")]
    pub kind: String,
    /// Wrapper style laid over the kind's own style.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, String>,
    /// Markup inserted as the first child of a droppable instance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<String>,
}

impl ComponentRef {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            style: BTreeMap::new(),
            components: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockContent {
    Markup(String),
    Component(ComponentRef),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockCatalogEntry {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub content: BlockContent,
    /// Select the inserted node right away.
    #[serde(default)]
    pub select: bool,
    /// Open the node's editor right after insertion.
    #[serde(default)]
    pub activate: bool,
}

impl BlockCatalogEntry {
    pub fn markup(id: &str, label: &str, markup: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            category: None,
            content: BlockContent::Markup(markup.to_string()),
            select: false,
            activate: false,
        }
    }

    pub fn component(id: &str, label: &str, component: ComponentRef) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            category: None,
            content: BlockContent::Component(component),
            select: false,
            activate: false,
        }
    }

    pub fn in_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn selected_on_insert(mut self) -> Self {
        self.select = true;
        self.activate = true;
        self
    }

    /// Component kind this block instantiates, if any.
    pub fn kind(&self) -> Option<&str> {
        match &self.content {
            BlockContent::Markup(_) => None,
            BlockContent::Component(component) => Some(&component.kind),
        }
    }

    /// Turns the block into something the canvas can hold. Markup comes
    /// back verbatim; a component reference goes through the registry.
    pub fn resolve(&self, registry: &mut Registry) -> BuilderResult<Resolved> {
        match &self.content {
            BlockContent::Markup(markup) => Ok(Resolved::Markup(markup.clone())),
            BlockContent::Component(component) => {
                let id = registry.instantiate(&component.kind)?;
                for (property, value) in &component.style {
                    registry.set_style(id, property, value.clone());
                }
                debug!(block = %self.id, %id, "instantiated block");
                Ok(Resolved::Instance {
                    id,
                    inner: component.components.clone(),
                })
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolved {
    /// Plain markup without editable traits.
    Markup(String),
    Instance { id: InstanceId, inner: Option<String> },
}

/// Entries sharing a category, as the palette shows them.
#[derive(Debug, PartialEq)]
pub struct BlockGroup<'a> {
    pub category: Option<&'a str>,
    pub entries: Vec<&'a BlockCatalogEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockCatalog {
    entries: Vec<BlockCatalogEntry>,
}

impl BlockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry. An entry with a known id replaces the old one in place.
    pub fn add(&mut self, entry: BlockCatalogEntry) {
        match self.entries.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn get(&self, id: &str) -> Option<&BlockCatalogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn entries(&self) -> &[BlockCatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries grouped by category. Groups appear in the order their first
    /// entry was declared; entries keep insertion order within a group.
    pub fn list(&self) -> Vec<BlockGroup<'_>> {
        let mut groups: Vec<BlockGroup<'_>> = Vec::new();
        for entry in &self.entries {
            let category = entry.category.as_deref();
            match groups.iter_mut().find(|g| g.category == category) {
                Some(group) => group.entries.push(entry),
                None => groups.push(BlockGroup {
                    category,
                    entries: vec![entry],
                }),
            }
        }
        groups
    }

    /// Whether the palette may offer the entry. Blocks pointing at a kind
    /// nobody registered stay hidden.
    pub fn insertable(entry: &BlockCatalogEntry, registry: &Registry) -> bool {
        match entry.kind() {
            None => true,
            Some(kind) => {
                let ok = registry.is_registered(kind);
                if !ok {
                    warn!(block = %entry.id, %kind, "block refers to unregistered kind");
                }
                ok
            }
        }
    }

    pub fn resolve(&self, id: &str, registry: &mut Registry) -> BuilderResult<Resolved> {
        self.get(id)
            .ok_or_else(|| BuilderError::UnknownBlock(id.to_string()))?
            .resolve(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{builtin, WidgetKind};
    use pretty_assertions::assert_eq;

    fn two_entry_catalog() -> BlockCatalog {
        let mut catalog = BlockCatalog::new();
        catalog.add(BlockCatalogEntry::markup(
            "text",
            "Text",
            r#"<div data-gjs-type="text">Insert your text here</div>"#,
        ));
        catalog.add(
            BlockCatalogEntry::component("react-button-block", "React Button", ComponentRef::new("react-button"))
                .in_category("React Components"),
        );
        catalog
    }

    #[test]
    fn list_keeps_declared_order() {
        let catalog = two_entry_catalog();
        let ids: Vec<&str> = catalog
            .list()
            .iter()
            .flat_map(|g| g.entries.iter().map(|e| e.id.as_str()))
            .collect();
        assert_eq!(ids, vec!["text", "react-button-block"]);
    }

    #[test]
    fn list_groups_by_first_declaration() {
        let mut catalog = BlockCatalog::new();
        catalog.add(BlockCatalogEntry::markup("a", "A", "<a/>").in_category("Layout"));
        catalog.add(BlockCatalogEntry::markup("b", "B", "<b/>").in_category("Basic"));
        catalog.add(BlockCatalogEntry::markup("c", "C", "<c/>").in_category("Layout"));

        let groups = catalog.list();
        let shape: Vec<(Option<&str>, Vec<&str>)> = groups
            .iter()
            .map(|g| (g.category, g.entries.iter().map(|e| e.id.as_str()).collect()))
            .collect();
        assert_eq!(
            shape,
            vec![(Some("Layout"), vec!["a", "c"]), (Some("Basic"), vec!["b"])]
        );
    }

    #[test]
    fn resolve_markup_is_plain_and_component_is_editable() {
        let catalog = two_entry_catalog();
        let mut registry = Registry::new();
        registry.register(builtin(WidgetKind::Button)).unwrap();

        let text = catalog.resolve("text", &mut registry).unwrap();
        assert!(matches!(text, Resolved::Markup(ref m) if m.contains("Insert your text here")));
        assert_eq!(registry.instances().count(), 0);

        let Resolved::Instance { id, .. } = catalog.resolve("react-button-block", &mut registry).unwrap() else {
            panic!("expected an instance");
        };
        let instance = registry.instance(id).unwrap();
        let def = registry.definition(&instance.kind).unwrap();
        assert!(!def.traits.is_empty());
        assert_eq!(instance.value("buttonText"), Some("Click me"));
    }

    #[test]
    fn readding_an_id_replaces_in_place() {
        let mut catalog = two_entry_catalog();
        catalog.add(BlockCatalogEntry::markup("text", "Paragraph", "<p>x</p>"));
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entries()[0].label, "Paragraph");
    }

    #[test]
    fn unregistered_kind_is_not_insertable() {
        let catalog = two_entry_catalog();
        let registry = Registry::new();
        assert!(BlockCatalog::insertable(&catalog.entries()[0], &registry));
        assert!(!BlockCatalog::insertable(&catalog.entries()[1], &registry));
        let mut registry = registry;
        assert!(matches!(
            catalog.resolve("react-button-block", &mut registry),
            Err(BuilderError::UnknownKind(_))
        ));
    }

    #[test]
    fn content_parses_from_editor_style_json() {
        let json = r#"[
            {"id": "text", "label": "Text", "content": "<div>Insert your text here</div>"},
            {"id": "section", "label": "Section", "category": "Layout",
             "content": {"type": "container", "style": {"padding": "2rem"}, "components": "<h1>Title</h1>"}}
        ]"#;
        let entries: Vec<BlockCatalogEntry> = serde_json::from_str(json).unwrap();
        assert!(matches!(entries[0].content, BlockContent::Markup(_)));
        assert_eq!(entries[1].kind(), Some("container"));
    }
}
