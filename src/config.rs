// Builder configuration
//
// A page is described by one `BuilderConfig`. The four stock pages are
// presets; a config can also be loaded from JSON.

use serde::{Deserialize, Serialize};

use crate::catalog::{BlockCatalogEntry, ComponentRef};
use crate::error::BuilderResult;
use crate::registry::WidgetKind;
use crate::styles::{default_sectors, StyleSector};

pub const DEFAULT_STORAGE_KEY: &str = "gjs-nextjs-project";

const ICON_FONT: &str = "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.0.0/css/all.min.css";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Browser local storage.
    Local,
    /// Nothing is persisted.
    None,
}

/// Where the host keeps the project. The key is opaque to the builder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(rename = "type")]
    pub kind: StorageKind,
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            kind: StorageKind::Local,
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Pass the hosting page's external style sheets to the canvas.
    #[serde(default)]
    pub inherit_document_styles: bool,
    /// Extra sheets appended after the inherited ones.
    #[serde(default)]
    pub styles: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyleManagerConfig {
    pub append_to: String,
    pub sectors: Vec<StyleSector>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuilderConfig {
    pub container_id: String,
    pub blocks_append_to: String,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub canvas: CanvasConfig,
    /// Element id of the layers panel, when shown.
    #[serde(default)]
    pub layer_manager: Option<String>,
    #[serde(default)]
    pub style_manager: Option<StyleManagerConfig>,
    /// Style sheets added to the hosting page's head before the canvas
    /// styles are collected.
    #[serde(default)]
    pub head_links: Vec<String>,
    /// Widget kinds registered with the editor.
    #[serde(default)]
    pub components: Vec<WidgetKind>,
    #[serde(default)]
    pub blocks: Vec<BlockCatalogEntry>,
}

impl BuilderConfig {
    pub fn from_json(json: &str) -> BuilderResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> BuilderResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn preset(preset: Preset) -> Self {
        let mut config = Self {
            container_id: "gjs".to_string(),
            blocks_append_to: "blocks".to_string(),
            storage: StorageConfig::default(),
            canvas: CanvasConfig::default(),
            layer_manager: None,
            style_manager: None,
            head_links: Vec::new(),
            components: vec![WidgetKind::Image],
            blocks: stock_blocks(),
        };

        match preset {
            Preset::Basic => {}
            Preset::Button => {
                config.components.push(WidgetKind::Button);
                config.blocks.push(widget_block(WidgetKind::Button, "React Button"));
            }
            Preset::Widgets => {
                config.canvas.inherit_document_styles = true;
                config.add_widgets();
            }
            Preset::Studio => {
                config.canvas.inherit_document_styles = true;
                config.head_links.push(ICON_FONT.to_string());
                config.layer_manager = Some("layers-container".to_string());
                config.style_manager = Some(StyleManagerConfig {
                    append_to: "styles-container".to_string(),
                    sectors: default_sectors(),
                });
                config.components.push(WidgetKind::Container);
                config.blocks[0] = section_block();
                config.blocks.push(
                    BlockCatalogEntry::component("container", "Container", ComponentRef::new("container"))
                        .in_category("Layout"),
                );
                config.add_widgets();
            }
        }
        config
    }

    fn add_widgets(&mut self) {
        for (kind, label) in [
            (WidgetKind::Button, "React Button"),
            (WidgetKind::Alert, "React Alert"),
            (WidgetKind::Badge, "React Badge"),
        ] {
            self.components.push(kind);
            self.blocks.push(widget_block(kind, label));
        }
    }
}

fn stock_blocks() -> Vec<BlockCatalogEntry> {
    vec![
        BlockCatalogEntry::markup(
            "section",
            "Section",
            "<section><h1>This is a simple title</h1><div>This is just a Lorem text...</div></section>",
        ),
        BlockCatalogEntry::markup("text", "Text", r#"<div data-gjs-type="text">Insert your text here</div>"#),
        BlockCatalogEntry::component("image", "Image", ComponentRef::new("image")).selected_on_insert(),
    ]
}

fn section_block() -> BlockCatalogEntry {
    let mut section = ComponentRef::new("container");
    section.style.insert("padding".into(), "2rem".into());
    section.style.insert("min-height".into(), "100px".into());
    section.style.insert("border".into(), "2px dashed #ccc".into());
    section.components = Some("<h1>This is a simple title</h1><div>This is just a Lorem text...</div>".into());
    BlockCatalogEntry::component("section", "Section", section)
}

fn widget_block(kind: WidgetKind, label: &str) -> BlockCatalogEntry {
    BlockCatalogEntry::component(&format!("{}-block", kind.kind_name()), label, ComponentRef::new(kind.kind_name()))
        .in_category("React Components")
}

/// The stock builder pages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    /// Stock blocks only.
    Basic,
    /// Stock blocks and a button widget.
    Button,
    /// Button, alert and badge widgets on a canvas styled like the page.
    Widgets,
    /// Widgets plus layout blocks, layers and the style manager.
    Studio,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Basic, Preset::Button, Preset::Widgets, Preset::Studio];

    pub fn slug(self) -> &'static str {
        match self {
            Preset::Basic => "basic",
            Preset::Button => "button",
            Preset::Widgets => "widgets",
            Preset::Studio => "studio",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.slug() == slug)
    }

    pub fn title(self) -> &'static str {
        match self {
            Preset::Basic => "Basic blocks",
            Preset::Button => "Button widget",
            Preset::Widgets => "Widget kit",
            Preset::Studio => "Studio",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BlockContent;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_block_kind_is_registered_by_its_preset() {
        for preset in Preset::ALL {
            let config = BuilderConfig::preset(preset);
            for block in &config.blocks {
                if let Some(kind) = block.kind() {
                    assert!(
                        config.components.iter().any(|k| k.kind_name() == kind),
                        "{} preset misses {kind}",
                        preset.slug()
                    );
                }
            }
        }
    }

    #[test]
    fn studio_swaps_section_for_a_droppable_container() {
        let studio = BuilderConfig::preset(Preset::Studio);
        assert_eq!(studio.blocks[0].kind(), Some("container"));
        assert!(studio.style_manager.is_some());
        assert_eq!(studio.head_links, vec![ICON_FONT.to_string()]);

        let basic = BuilderConfig::preset(Preset::Basic);
        assert!(matches!(basic.blocks[0].content, BlockContent::Markup(_)));
        assert!(!basic.canvas.inherit_document_styles);
    }

    #[test]
    fn json_round_trip_keeps_config() {
        let config = BuilderConfig::preset(Preset::Widgets);
        let parsed = BuilderConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_json_takes_defaults() {
        let config = BuilderConfig::from_json(r#"{"container_id": "editor", "blocks_append_to": "palette"}"#).unwrap();
        assert_eq!(config.storage.key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.storage.kind, StorageKind::Local);
        assert!(config.blocks.is_empty());
    }

    #[test]
    fn slugs_map_back_to_presets() {
        for preset in Preset::ALL {
            assert_eq!(Preset::from_slug(preset.slug()), Some(preset));
        }
        assert_eq!(Preset::from_slug("builder5"), None);
    }
}
