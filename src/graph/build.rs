use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::congress::Bill;
use crate::error::{Error, Result};

use super::{Graph, Link, Node, NodeKind, RegistryEntry};

/// Builds the focal member's co-sponsorship network.
///
/// Every related id whose count reaches `threshold` (inclusive) becomes a node
/// linked to the focal node. The focal node is appended last and is present no
/// matter how the threshold filters the counts.
pub fn build<I, K>(
    focal: &str,
    counts: I,
    registry: &HashMap<String, RegistryEntry>,
    threshold: f64,
) -> Result<Graph>
where
    I: IntoIterator<Item = (K, u32)>,
    K: AsRef<str>,
{
    if !threshold.is_finite() {
        return Err(Error::InvalidThreshold { value: threshold });
    }

    let focal_entry = registry.get(focal).ok_or_else(|| Error::UnknownId {
        id: focal.to_owned(),
    })?;

    let mut seen = HashSet::new();
    let mut nodes = Vec::new();
    let mut links = Vec::new();
    let mut excluded = 0usize;

    for (id, count) in counts {
        let id = id.as_ref();
        if id == focal {
            continue;
        }
        if !seen.insert(id.to_owned()) {
            return Err(Error::DuplicateNode { id: id.to_owned() });
        }

        let entry = registry
            .get(id)
            .ok_or_else(|| Error::UnknownId { id: id.to_owned() })?;

        if f64::from(count) < threshold {
            excluded += 1;
            continue;
        }

        nodes.push(Node {
            id: id.to_owned(),
            kind: entry.kind,
            label: entry.label.clone(),
            weight: count,
        });
        links.push(Link::new(focal, id));
    }

    nodes.push(Node {
        id: focal.to_owned(),
        kind: focal_entry.kind,
        label: focal_entry.label.clone(),
        weight: 0,
    });

    debug!(
        focal,
        threshold,
        included = nodes.len() - 1,
        excluded,
        "built co-sponsorship graph"
    );

    Ok(Graph { nodes, links })
}

pub fn bill_node_id(number: u32) -> String {
    format!("bill-{number}")
}

/// Adds the bills shared by at least two members already in `graph`, each
/// linked to every participating member that is present.
pub fn attach_bills(mut graph: Graph, bills: &[Bill]) -> Result<Graph> {
    let members = graph
        .nodes
        .iter()
        .filter(|node| node.kind.is_legislator())
        .map(|node| node.id.clone())
        .collect::<HashSet<_>>();

    let mut seen = graph
        .nodes
        .iter()
        .map(|node| node.id.clone())
        .collect::<HashSet<_>>();
    let mut attached = 0usize;

    for bill in bills {
        let mut participants = bill
            .participants()
            .filter(|id| members.contains(*id))
            .collect::<Vec<_>>();
        participants.sort_unstable();
        participants.dedup();
        if participants.len() < 2 {
            continue;
        }

        let id = bill_node_id(bill.number);
        if !seen.insert(id.clone()) {
            return Err(Error::DuplicateNode { id });
        }

        for member in participants {
            graph.links.push(Link::new(id.clone(), member));
        }
        graph.nodes.push(Node {
            id,
            kind: NodeKind::Bill,
            label: bill.label(),
            weight: 0,
        });
        attached += 1;
    }

    debug!(attached, "attached shared bills");
    Ok(graph)
}
