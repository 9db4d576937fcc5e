mod build;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use build::{attach_bills, bill_node_id, build};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Democrat,
    Republican,
    OtherParty,
    Bill,
}

impl NodeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Democrat => "Democrat",
            Self::Republican => "Republican",
            Self::OtherParty => "Other party",
            Self::Bill => "Bill",
        }
    }

    pub fn is_legislator(self) -> bool {
        !matches!(self, Self::Bill)
    }
}

/// Static descriptive attributes for an id, as supplied by the data layer.
#[derive(Clone, Debug, PartialEq)]
pub struct RegistryEntry {
    pub label: String,
    pub kind: NodeKind,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub label: String,
    /// Co-sponsorship count relative to the focal member. Zero for the focal
    /// node itself and for bills.
    pub weight: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Link {
    pub source: String,
    pub target: String,
    pub strength: Option<f32>,
}

impl Link {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            strength: None,
        }
    }

    pub fn with_strength(mut self, strength: f32) -> Self {
        self.strength = Some(strength);
        self
    }

    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }
}

/// An immutable node/link snapshot produced by the builder.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl Graph {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Checks id uniqueness and that every link endpoint is present.
    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !ids.insert(node.id.as_str()) {
                return Err(Error::DuplicateNode {
                    id: node.id.clone(),
                });
            }
        }

        for link in &self.links {
            for endpoint in [&link.source, &link.target] {
                if !ids.contains(endpoint.as_str()) {
                    return Err(Error::DanglingLink {
                        source_id: link.source.clone(),
                        target_id: link.target.clone(),
                        missing: endpoint.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}
