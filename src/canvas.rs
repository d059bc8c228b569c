//! Document tree shown on the canvas.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{BuilderError, BuilderResult};
use crate::registry::InstanceId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

#[derive(Clone, Debug, PartialEq)]
pub enum NodeContent {
    /// Literal markup, inserted verbatim and not trait-editable.
    Markup(String),
    Component(InstanceId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct CanvasNode {
    pub id: NodeId,
    pub content: NodeContent,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub droppable: bool,
}

#[derive(Debug, Default)]
pub struct Canvas {
    nodes: HashMap<NodeId, CanvasNode>,
    roots: Vec<NodeId>,
    next_id: u64,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&CanvasNode> {
        self.nodes.get(&id)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Appends a node at the root or as the last child of a droppable node.
    pub fn insert(&mut self, content: NodeContent, droppable: bool, parent: Option<NodeId>) -> BuilderResult<NodeId> {
        if let Some(parent_id) = parent {
            let parent_node = self
                .nodes
                .get(&parent_id)
                .ok_or(BuilderError::UnknownNode(parent_id.0))?;
            if !parent_node.droppable {
                return Err(BuilderError::NotDroppable(parent_id.0));
            }
        }

        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            CanvasNode {
                id,
                content,
                parent,
                children: Vec::new(),
                droppable,
            },
        );
        match parent.and_then(|p| self.nodes.get_mut(&p)) {
            Some(parent_node) => parent_node.children.push(id),
            None => self.roots.push(id),
        }
        Ok(id)
    }

    /// Detaches `id` with its whole subtree. Contents come back depth first,
    /// parents before children.
    pub fn remove(&mut self, id: NodeId) -> BuilderResult<Vec<NodeContent>> {
        let parent = self.nodes.get(&id).ok_or(BuilderError::UnknownNode(id.0))?.parent;
        match parent.and_then(|p| self.nodes.get_mut(&p)) {
            Some(parent_node) => parent_node.children.retain(|&child| child != id),
            None => self.roots.retain(|&root| root != id),
        }

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                stack.extend(node.children.iter().rev());
                removed.push(node.content);
            }
        }
        Ok(removed)
    }

    /// Finds the node holding a component instance.
    pub fn node_of(&self, instance: InstanceId) -> Option<NodeId> {
        self.nodes
            .values()
            .find(|node| node.content == NodeContent::Component(instance))
            .map(|node| node.id)
    }

    /// Every node with its depth, in document order.
    pub fn tree(&self) -> Vec<(usize, &CanvasNode)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(usize, NodeId)> = self.roots.iter().rev().map(|&id| (0, id)).collect();
        while let Some((depth, id)) = stack.pop() {
            if let Some(node) = self.nodes.get(&id) {
                stack.extend(node.children.iter().rev().map(|&child| (depth + 1, child)));
                out.push((depth, node));
            }
        }
        out
    }

    pub fn clear(&mut self) -> Vec<NodeContent> {
        self.roots.clear();
        self.nodes.drain().map(|(_, node)| node.content).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn markup(text: &str) -> NodeContent {
        NodeContent::Markup(text.to_string())
    }

    #[test]
    fn children_only_go_into_droppable_nodes() {
        let mut canvas = Canvas::new();
        let container = canvas.insert(NodeContent::Component(InstanceId(0)), true, None).unwrap();
        let text = canvas.insert(markup("<p>hi</p>"), false, Some(container)).unwrap();

        assert_eq!(canvas.node(container).unwrap().children, vec![text]);
        assert!(matches!(
            canvas.insert(markup("<p>no</p>"), false, Some(text)),
            Err(BuilderError::NotDroppable(_))
        ));
        assert!(matches!(
            canvas.insert(markup("<p>no</p>"), false, Some(NodeId(99))),
            Err(BuilderError::UnknownNode(99))
        ));
    }

    #[test]
    fn remove_returns_subtree_parent_first() {
        let mut canvas = Canvas::new();
        let outer = canvas.insert(NodeContent::Component(InstanceId(1)), true, None).unwrap();
        let inner = canvas.insert(NodeContent::Component(InstanceId(2)), true, Some(outer)).unwrap();
        canvas.insert(NodeContent::Component(InstanceId(3)), false, Some(inner)).unwrap();
        canvas.insert(markup("<hr>"), false, Some(outer)).unwrap();
        let keep = canvas.insert(markup("<p>keep</p>"), false, None).unwrap();

        let removed = canvas.remove(outer).unwrap();
        assert_eq!(
            removed,
            vec![
                NodeContent::Component(InstanceId(1)),
                NodeContent::Component(InstanceId(2)),
                NodeContent::Component(InstanceId(3)),
                markup("<hr>"),
            ]
        );
        assert_eq!(canvas.roots(), &[keep]);
        assert_eq!(canvas.len(), 1);
    }

    #[test]
    fn tree_walks_in_document_order_with_depth() {
        let mut canvas = Canvas::new();
        let a = canvas.insert(NodeContent::Component(InstanceId(0)), true, None).unwrap();
        let b = canvas.insert(markup("b"), false, Some(a)).unwrap();
        let c = canvas.insert(markup("c"), false, None).unwrap();

        let walked: Vec<(usize, NodeId)> = canvas.tree().into_iter().map(|(d, n)| (d, n.id)).collect();
        assert_eq!(walked, vec![(0, a), (1, b), (0, c)]);
        assert_eq!(canvas.node_of(InstanceId(0)), Some(a));
    }
}
