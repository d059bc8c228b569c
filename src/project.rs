//! Saved form of the canvas document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::canvas::{Canvas, NodeContent, NodeId};
use crate::error::BuilderResult;
use crate::registry::{Registry, TraitValues};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SavedContent {
    Markup {
        html: String,
    },
    Component {
        kind: String,
        values: TraitValues,
        #[serde(default)]
        styles: BTreeMap<String, String>,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedNode {
    #[serde(flatten)]
    pub content: SavedContent,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SavedNode>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub nodes: Vec<SavedNode>,
}

impl ProjectSnapshot {
    pub fn capture(canvas: &Canvas, registry: &Registry) -> Self {
        Self {
            nodes: canvas
                .roots()
                .iter()
                .filter_map(|&id| capture_node(canvas, registry, id))
                .collect(),
        }
    }

    pub fn from_json(json: &str) -> BuilderResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> BuilderResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Rebuilds the saved nodes on the canvas. Components whose kind is no
    /// longer registered, and nodes that no longer fit under their parent,
    /// are skipped together with their children.
    pub fn restore(&self, canvas: &mut Canvas, registry: &mut Registry) -> BuilderResult<usize> {
        let mut restored = 0;
        for node in &self.nodes {
            restored += restore_node(node, None, canvas, registry)?;
        }
        Ok(restored)
    }
}

fn capture_node(canvas: &Canvas, registry: &Registry, id: NodeId) -> Option<SavedNode> {
    let node = canvas.node(id)?;
    let content = match &node.content {
        NodeContent::Markup(html) => SavedContent::Markup { html: html.clone() },
        NodeContent::Component(instance) => {
            let instance = registry.instance(*instance)?;
            SavedContent::Component {
                kind: instance.kind.clone(),
                values: instance.values.clone(),
                styles: instance.styles.clone(),
            }
        }
    };
    Some(SavedNode {
        content,
        children: node
            .children
            .iter()
            .filter_map(|&child| capture_node(canvas, registry, child))
            .collect(),
    })
}

fn restore_node(
    node: &SavedNode,
    parent: Option<NodeId>,
    canvas: &mut Canvas,
    registry: &mut Registry,
) -> BuilderResult<usize> {
    let id = match &node.content {
        SavedContent::Markup { html } => match canvas.insert(NodeContent::Markup(html.clone()), false, parent) {
            Ok(id) => id,
            Err(err) => {
                warn!(%err, "saved markup no longer fits its parent, skipping");
                return Ok(0);
            }
        },
        SavedContent::Component { kind, values, styles } => {
            let Some(droppable) = registry.definition(kind).map(|def| def.droppable) else {
                warn!(%kind, "saved component kind is not registered, skipping");
                return Ok(0);
            };
            let instance = registry.restore(kind, values.clone(), styles.clone())?;
            match canvas.insert(NodeContent::Component(instance), droppable, parent) {
                Ok(id) => {
                    registry.render(instance);
                    id
                }
                Err(err) => {
                    warn!(%kind, %err, "saved component no longer fits its parent, skipping");
                    registry.remove(instance);
                    return Ok(0);
                }
            }
        }
    };

    let mut restored = 1;
    for child in &node.children {
        restored += restore_node(child, Some(id), canvas, registry)?;
    }
    Ok(restored)
}
