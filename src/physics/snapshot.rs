use eframe::egui::Vec2;

use crate::graph::NodeKind;

#[derive(Clone, Debug, PartialEq)]
pub struct NodePosition {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    pub position: Vec2,
    pub pinned: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinkPosition {
    pub source_id: String,
    pub target_id: String,
    pub source: Vec2,
    pub target: Vec2,
}

/// Positions of every node and link at one instant, in content space.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub alpha: f32,
    pub nodes: Vec<NodePosition>,
    pub links: Vec<LinkPosition>,
}

impl Snapshot {
    pub(super) fn empty(alpha: f32) -> Self {
        Self {
            alpha,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&NodePosition> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// The node whose disc of `radius` contains `point`, nearest first.
    pub fn node_at(&self, point: Vec2, radius: f32) -> Option<&NodePosition> {
        self.nodes
            .iter()
            .map(|node| (node, (node.position - point).length()))
            .filter(|(_node, distance)| *distance <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(node, _distance)| node)
    }
}
