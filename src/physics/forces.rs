use eframe::egui::{Vec2, vec2};
use serde::{Deserialize, Serialize};

use crate::graph::NodeKind;

use super::quadtree::QuadNode;
use super::{SimLink, SimNode};

/// Pairwise push-apart force, approximated with Barnes-Hut.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepulsionForce {
    pub strength: f32,
    pub distance_min: f32,
    pub distance_max: Option<f32>,
    pub theta: f32,
}

impl Default for RepulsionForce {
    fn default() -> Self {
        Self {
            strength: 30.0,
            distance_min: 1.0,
            distance_max: None,
            theta: 0.9,
        }
    }
}

/// Spring toward `distance` along every link.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkForce {
    pub distance: f32,
    /// Overrides the degree-based default stiffness for links that do not
    /// carry their own.
    pub strength: Option<f32>,
    pub iterations: usize,
}

impl Default for LinkForce {
    fn default() -> Self {
        Self {
            distance: 30.0,
            strength: None,
            iterations: 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CenterForce {
    pub x: f32,
    pub y: f32,
    pub strength: f32,
}

impl Default for CenterForce {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            strength: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RadialTarget {
    pub kind: NodeKind,
    pub radius: f32,
    pub strength: f32,
}

/// Pulls nodes toward a ring around `(x, y)`; each kind has its own radius
/// and strength, and kinds without a target are left free.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadialForce {
    pub x: f32,
    pub y: f32,
    pub targets: Vec<RadialTarget>,
}

impl RadialForce {
    pub fn target(&self, kind: NodeKind) -> Option<&RadialTarget> {
        self.targets.iter().find(|target| target.kind == kind)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Force {
    Repulsion(RepulsionForce),
    Link(LinkForce),
    Center(CenterForce),
    Radial(RadialForce),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NamedForce {
    pub name: String,
    #[serde(flatten)]
    pub force: Force,
}

/// Forces in application order. Names are unique; inserting an existing name
/// replaces that force in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForceSet {
    forces: Vec<NamedForce>,
}

impl Default for ForceSet {
    fn default() -> Self {
        Self::empty()
            .with("link", Force::Link(LinkForce::default()))
            .with("repulsion", Force::Repulsion(RepulsionForce::default()))
            .with("center", Force::Center(CenterForce::default()))
    }
}

impl ForceSet {
    pub fn empty() -> Self {
        Self { forces: Vec::new() }
    }

    /// Default forces plus a ring that bills orbit on while legislators stay
    /// free.
    pub fn bill_orbit(radius: f32) -> Self {
        Self::default().with(
            "radial",
            Force::Radial(RadialForce {
                x: 0.0,
                y: 0.0,
                targets: vec![RadialTarget {
                    kind: NodeKind::Bill,
                    radius,
                    strength: 0.8,
                }],
            }),
        )
    }

    pub fn with(mut self, name: impl Into<String>, force: Force) -> Self {
        self.insert(name, force);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, force: Force) {
        let name = name.into();
        match self.forces.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.force = force,
            None => self.forces.push(NamedForce { name, force }),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Force> {
        let index = self.forces.iter().position(|entry| entry.name == name)?;
        Some(self.forces.remove(index).force)
    }

    pub fn get(&self, name: &str) -> Option<&Force> {
        self.forces
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.force)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedForce> {
        self.forces.iter()
    }

    pub fn len(&self) -> usize {
        self.forces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }

    /// Where the first center force pulls the graph, if any.
    pub fn center(&self) -> Vec2 {
        self.forces
            .iter()
            .find_map(|entry| match &entry.force {
                Force::Center(center) => Some(vec2(center.x, center.y)),
                _ => None,
            })
            .unwrap_or(Vec2::ZERO)
    }
}

/// Deterministic unit vector for separating coincident points.
pub(super) fn fallback_direction(a: usize, b: usize) -> Vec2 {
    let angle = ((a as f32) * 0.618_034 + (b as f32) * 0.414_214 + 0.11) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

impl Force {
    pub(super) fn apply(
        &self,
        alpha: f32,
        nodes: &mut [SimNode],
        links: &[SimLink],
        positions: &mut Vec<Vec2>,
    ) {
        match self {
            Self::Repulsion(force) => apply_repulsion(force, alpha, nodes, positions),
            Self::Link(force) => apply_links(force, alpha, nodes, links),
            Self::Center(force) => apply_center(force, nodes),
            Self::Radial(force) => apply_radial(force, alpha, nodes),
        }
    }
}

fn apply_repulsion(force: &RepulsionForce, alpha: f32, nodes: &mut [SimNode], positions: &mut Vec<Vec2>) {
    if nodes.len() < 2 || force.strength == 0.0 {
        return;
    }

    positions.clear();
    positions.extend(nodes.iter().map(|node| node.position));

    let Some(tree) = QuadNode::build(positions) else {
        return;
    };

    let params = RepulsionParams {
        scale: force.strength * alpha,
        distance_min_sq: force.distance_min * force.distance_min,
        distance_max_sq: force
            .distance_max
            .map_or(f32::INFINITY, |distance| distance * distance),
        theta: force.theta,
    };

    for (index, node) in nodes.iter_mut().enumerate() {
        let mut push = Vec2::ZERO;
        accumulate_repulsion(&tree, index, positions, params, &mut push);
        node.velocity += push;
    }
}

#[derive(Clone, Copy)]
struct RepulsionParams {
    scale: f32,
    distance_min_sq: f32,
    distance_max_sq: f32,
    theta: f32,
}

fn accumulate_repulsion(
    cell: &QuadNode,
    index: usize,
    positions: &[Vec2],
    params: RepulsionParams,
    push: &mut Vec2,
) {
    if cell.mass <= 0.0 {
        return;
    }

    let point = positions[index];

    if cell.is_leaf() {
        for &other in &cell.indices {
            if other == index {
                continue;
            }
            let mut delta = point - positions[other];
            let mut distance_sq = delta.length_sq();
            if distance_sq >= params.distance_max_sq {
                continue;
            }
            if distance_sq <= f32::EPSILON {
                delta = fallback_direction(index, other) * params.distance_min_sq.sqrt().max(1e-3);
                distance_sq = delta.length_sq();
            }
            *push += delta * (params.scale / distance_sq.max(params.distance_min_sq));
        }
        return;
    }

    let delta = point - cell.center_of_mass;
    let distance_sq = delta.length_sq();
    let far_enough = !cell.bounds.contains(point)
        && cell.bounds.side_length() * cell.bounds.side_length() < params.theta * params.theta * distance_sq;

    if far_enough {
        if distance_sq < params.distance_max_sq {
            *push += delta * (params.scale * cell.mass / distance_sq.max(params.distance_min_sq));
        }
        return;
    }

    for child in cell.children.iter().flatten() {
        accumulate_repulsion(child, index, positions, params, push);
    }
}

fn apply_links(force: &LinkForce, alpha: f32, nodes: &mut [SimNode], links: &[SimLink]) {
    for _ in 0..force.iterations.max(1) {
        for link in links {
            let (source, target) = (link.source, link.target);
            if source == target {
                continue;
            }

            let mut delta = (nodes[target].position + nodes[target].velocity)
                - (nodes[source].position + nodes[source].velocity);
            let mut distance = delta.length();
            if distance <= f32::EPSILON {
                delta = fallback_direction(source, target) * 1e-3;
                distance = delta.length();
            }

            let strength = link.strength.or(force.strength).unwrap_or(link.default_strength);
            let correction = delta * ((distance - force.distance) / distance * alpha * strength);

            nodes[target].velocity -= correction * link.bias;
            nodes[source].velocity += correction * (1.0 - link.bias);
        }
    }
}

fn apply_center(force: &CenterForce, nodes: &mut [SimNode]) {
    if nodes.is_empty() {
        return;
    }

    let centroid = nodes
        .iter()
        .fold(Vec2::ZERO, |sum, node| sum + node.position)
        / nodes.len() as f32;
    let shift = (vec2(force.x, force.y) - centroid) * force.strength;
    if shift.length_sq() <= f32::EPSILON * f32::EPSILON {
        return;
    }

    for node in nodes.iter_mut().filter(|node| node.pin.is_none()) {
        node.position += shift;
    }
}

fn apply_radial(force: &RadialForce, alpha: f32, nodes: &mut [SimNode]) {
    let center = vec2(force.x, force.y);
    for (index, node) in nodes.iter_mut().enumerate() {
        let Some(target) = force.target(node.node.kind) else {
            continue;
        };
        if target.strength == 0.0 {
            continue;
        }

        let mut delta = node.position - center;
        let mut radius = delta.length();
        if radius <= f32::EPSILON {
            delta = fallback_direction(index, 0) * 1e-3;
            radius = delta.length();
        }
        node.velocity += delta * ((target.radius - radius) * target.strength * alpha / radius);
    }
}
