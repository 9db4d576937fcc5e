//! Force-directed layout engine.
//!
//! [`ForceSimulation`] owns the kinematic table (position, velocity, pin) for
//! every node of the currently bound graph. Rebinding diffs the new graph
//! against that table by node id, so nodes that persist keep their state.
//! The engine has no clock of its own: a caller drives it with [`step`] until
//! [`is_settled`] reports true, and resumes after a bind, pin or unpin.
//!
//! [`step`]: ForceSimulation::step
//! [`is_settled`]: ForceSimulation::is_settled

mod config;
mod forces;
mod quadtree;
mod snapshot;

use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};
use tracing::{debug, error, trace, warn};

use crate::error::{Error, Result};
use crate::graph::{Graph, Node};
use crate::util::stable_pair;

pub use config::{RebindPolicy, SimulationConfig};
pub use forces::{
    CenterForce, Force, ForceSet, LinkForce, NamedForce, RadialForce, RadialTarget, RepulsionForce,
};
pub use snapshot::{LinkPosition, NodePosition, Snapshot};

/// Result of a call whose precondition may not hold, such as pinning a node
/// that a rebind already removed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Ignored,
}

impl Outcome {
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}

/// A bound node together with its kinematic state.
#[derive(Clone, Debug)]
pub struct SimNode {
    node: Node,
    position: Vec2,
    velocity: Vec2,
    pin: Option<Vec2>,
}

impl SimNode {
    fn entering(node: Node, position: Vec2) -> Self {
        Self {
            node,
            position,
            velocity: Vec2::ZERO,
            pin: None,
        }
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn id(&self) -> &str {
        &self.node.id
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn pin(&self) -> Option<Vec2> {
        self.pin
    }

    pub fn is_pinned(&self) -> bool {
        self.pin.is_some()
    }

    fn is_finite(&self) -> bool {
        self.position.x.is_finite()
            && self.position.y.is_finite()
            && self.velocity.x.is_finite()
            && self.velocity.y.is_finite()
    }
}

/// A link resolved to node indices, with its degree-derived defaults.
#[derive(Clone, Debug)]
pub(crate) struct SimLink {
    source: usize,
    target: usize,
    strength: Option<f32>,
    default_strength: f32,
    /// Share of the correction taken by the target; the better connected
    /// endpoint moves less.
    bias: f32,
}

pub struct ForceSimulation {
    config: SimulationConfig,
    forces: ForceSet,
    nodes: Vec<SimNode>,
    links: Vec<SimLink>,
    index_by_id: HashMap<String, usize>,
    bound: Option<Graph>,
    alpha: f32,
    alpha_target: f32,
    halted: bool,
    positions_scratch: Vec<Vec2>,
}

impl Default for ForceSimulation {
    fn default() -> Self {
        Self::new(SimulationConfig::default(), ForceSet::default())
    }
}

impl ForceSimulation {
    pub fn new(config: SimulationConfig, forces: ForceSet) -> Self {
        Self {
            config,
            forces,
            nodes: Vec::new(),
            links: Vec::new(),
            index_by_id: HashMap::new(),
            bound: None,
            alpha: 0.0,
            alpha_target: 0.0,
            halted: false,
            positions_scratch: Vec::new(),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn forces(&self) -> &ForceSet {
        &self.forces
    }

    /// Replaces the force set. Forces run in the set's order on every step.
    pub fn configure_forces(&mut self, forces: ForceSet) {
        debug!(count = forces.len(), "configured forces");
        self.forces = forces;
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    pub fn is_settled(&self) -> bool {
        self.alpha < self.config.alpha_min
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub fn node(&self, id: &str) -> Option<&SimNode> {
        self.index_by_id.get(id).map(|&index| &self.nodes[index])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_by_id.contains_key(id)
    }

    fn seed_position(&self, id: &str) -> Vec2 {
        let (jx, jy) = stable_pair(id);
        self.forces.center() + vec2(jx, jy) * self.config.initial_spread
    }

    /// Merges `graph` into the kinematic table.
    ///
    /// The graph is validated before anything changes, so a failed bind leaves
    /// the previous layout untouched.
    pub fn bind(&mut self, graph: &Graph) -> Result<Snapshot> {
        graph.validate()?;

        let unchanged = self.bound.as_ref() == Some(graph);

        let mut prior = self
            .nodes
            .drain(..)
            .map(|sim_node| (sim_node.node.id.clone(), sim_node))
            .collect::<HashMap<_, _>>();

        let mut next = Vec::with_capacity(graph.nodes.len());
        let mut entered = 0usize;
        for node in &graph.nodes {
            match prior.remove(&node.id) {
                Some(mut existing) => {
                    existing.node = node.clone();
                    if !existing.is_finite() {
                        existing.position = self.seed_position(&node.id);
                        existing.velocity = Vec2::ZERO;
                    }
                    next.push(existing);
                }
                None => {
                    entered += 1;
                    next.push(SimNode::entering(node.clone(), self.seed_position(&node.id)));
                }
            }
        }
        let exited = prior.len();
        let persisted = next.len() - entered;

        self.index_by_id = next
            .iter()
            .enumerate()
            .map(|(index, sim_node)| (sim_node.node.id.clone(), index))
            .collect();
        self.nodes = next;
        self.links = self.resolve_links(graph);
        self.bound = Some(graph.clone());
        self.halted = false;

        let reheat = match self.config.rebind_policy {
            RebindPolicy::Always => true,
            RebindPolicy::SkipUnchanged => !unchanged,
        };
        if reheat {
            self.reheat(self.config.bind_alpha);
        }

        debug!(entered, persisted, exited, links = self.links.len(), reheat, "bound graph");
        Ok(self.snapshot())
    }

    fn resolve_links(&self, graph: &Graph) -> Vec<SimLink> {
        let mut degree = vec![0u32; self.nodes.len()];
        let mut resolved = Vec::with_capacity(graph.links.len());
        for link in &graph.links {
            // Endpoints were checked by `validate`.
            let (Some(&source), Some(&target)) = (
                self.index_by_id.get(&link.source),
                self.index_by_id.get(&link.target),
            ) else {
                continue;
            };
            degree[source] += 1;
            degree[target] += 1;
            resolved.push((source, target, link.strength));
        }

        resolved
            .into_iter()
            .map(|(source, target, strength)| {
                let source_degree = degree[source].max(1) as f32;
                let target_degree = degree[target].max(1) as f32;
                SimLink {
                    source,
                    target,
                    strength,
                    default_strength: 1.0 / source_degree.min(target_degree),
                    bias: source_degree / (source_degree + target_degree),
                }
            })
            .collect()
    }

    /// Advances the layout by one tick.
    ///
    /// The tick is a fixed unit of time: velocities are in content units per
    /// tick, and callers pace the layout by how often they call `step`.
    ///
    /// Pinned nodes are clamped to their pin with zero velocity; every other
    /// node integrates its damped velocity. A non-finite position halts the
    /// engine until the next successful [`bind`](Self::bind).
    pub fn step(&mut self) -> Result<Snapshot> {
        if self.halted {
            return Err(Error::Halted);
        }
        if self.nodes.is_empty() {
            return Ok(Snapshot::empty(self.alpha));
        }

        let was_settled = self.is_settled();
        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;

        for entry in self.forces.iter() {
            entry.force.apply(
                self.alpha,
                &mut self.nodes,
                &self.links,
                &mut self.positions_scratch,
            );
        }

        let damping = self.config.velocity_damping;
        for sim_node in &mut self.nodes {
            match sim_node.pin {
                Some(pin) => {
                    sim_node.position = pin;
                    sim_node.velocity = Vec2::ZERO;
                }
                None => {
                    sim_node.velocity *= damping;
                    sim_node.position += sim_node.velocity;
                }
            }
        }

        if let Some(bad) = self.nodes.iter().find(|sim_node| !sim_node.is_finite()) {
            let id = bad.node.id.clone();
            error!(id = %id, alpha = self.alpha, "non-finite position; halting simulation");
            self.halted = true;
            return Err(Error::NonFinitePosition { id });
        }

        if !was_settled && self.is_settled() {
            trace!(alpha = self.alpha, "simulation settled");
        }

        Ok(self.snapshot())
    }

    /// Sets alpha so the layout visibly moves again.
    pub fn reheat(&mut self, alpha: f32) {
        if !alpha.is_finite() {
            warn!(alpha, "ignored non-finite reheat");
            return;
        }
        self.alpha = alpha.max(0.0);
        trace!(alpha = self.alpha, "reheated");
    }

    /// Alpha decays toward this value instead of zero; held above zero while
    /// the user is dragging.
    pub fn set_alpha_target(&mut self, target: f32) {
        if target.is_finite() {
            self.alpha_target = target.max(0.0);
        }
    }

    pub fn pin(&mut self, id: &str, x: f32, y: f32) -> Outcome {
        if !x.is_finite() || !y.is_finite() {
            warn!(id, x, y, "ignored non-finite pin");
            return Outcome::Ignored;
        }
        let Some(&index) = self.index_by_id.get(id) else {
            return Outcome::Ignored;
        };
        self.nodes[index].pin = Some(vec2(x, y));
        Outcome::Applied
    }

    /// Clears the pin and reheats to the configured reheat alpha.
    pub fn unpin(&mut self, id: &str) -> Outcome {
        let Some(&index) = self.index_by_id.get(id) else {
            return Outcome::Ignored;
        };
        self.nodes[index].pin = None;
        self.reheat(self.config.reheat_alpha);
        Outcome::Applied
    }

    pub fn snapshot(&self) -> Snapshot {
        let nodes = self
            .nodes
            .iter()
            .map(|sim_node| NodePosition {
                id: sim_node.node.id.clone(),
                kind: sim_node.node.kind,
                label: sim_node.node.label.clone(),
                position: sim_node.position,
                pinned: sim_node.pin.is_some(),
            })
            .collect();

        let links = self
            .links
            .iter()
            .map(|link| {
                let source = &self.nodes[link.source];
                let target = &self.nodes[link.target];
                LinkPosition {
                    source_id: source.node.id.clone(),
                    target_id: target.node.id.clone(),
                    source: source.position,
                    target: target.position,
                }
            })
            .collect();

        Snapshot {
            alpha: self.alpha,
            nodes,
            links,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Link, NodeKind};

    fn node(id: &str) -> Node {
        Node {
            id: id.to_owned(),
            kind: NodeKind::Democrat,
            label: id.to_owned(),
            weight: 1,
        }
    }

    fn pair() -> Graph {
        Graph {
            nodes: vec![node("a"), node("b")],
            links: vec![Link::new("a", "b")],
        }
    }

    #[test]
    fn step_before_bind_is_an_empty_snapshot() {
        let mut simulation = ForceSimulation::default();
        let snapshot = simulation.step().unwrap();
        assert!(snapshot.is_empty());
        assert!(simulation.is_settled());
    }

    #[test]
    fn entering_nodes_start_still() {
        let mut simulation = ForceSimulation::default();
        simulation.bind(&pair()).unwrap();
        for sim_node in simulation.nodes() {
            assert_eq!(sim_node.velocity(), Vec2::ZERO);
            assert!(sim_node.position().length() <= simulation.config().initial_spread * 1.5);
        }
    }

    #[test]
    fn failed_bind_leaves_previous_state() {
        let mut simulation = ForceSimulation::default();
        simulation.bind(&pair()).unwrap();
        simulation.step().unwrap();
        let before = simulation.node("a").unwrap().position();

        let mut broken = pair();
        broken.links.push(Link::new("a", "missing"));
        assert!(matches!(simulation.bind(&broken), Err(Error::DanglingLink { .. })));
        assert_eq!(simulation.len(), 2);
        assert_eq!(simulation.node("a").unwrap().position(), before);
    }

    #[test]
    fn link_defaults_follow_degree() {
        let graph = Graph {
            nodes: vec![node("hub"), node("x"), node("y")],
            links: vec![Link::new("hub", "x"), Link::new("hub", "y")],
        };
        let mut simulation = ForceSimulation::default();
        simulation.bind(&graph).unwrap();
        for link in &simulation.links {
            assert_eq!(link.default_strength, 1.0);
            assert!((link.bias - 2.0 / 3.0).abs() < 1e-6);
        }
    }

    #[test]
    fn pinned_node_sits_on_its_pin_after_a_step() {
        let mut simulation = ForceSimulation::default();
        simulation.bind(&pair()).unwrap();
        assert!(simulation.pin("a", 40.0, -12.0).is_applied());
        simulation.step().unwrap();
        let pinned = simulation.node("a").unwrap();
        assert_eq!(pinned.position(), vec2(40.0, -12.0));
        assert_eq!(pinned.velocity(), Vec2::ZERO);
    }

    #[test]
    fn non_finite_state_halts_until_rebind() {
        let mut simulation = ForceSimulation::default();
        simulation.bind(&pair()).unwrap();
        simulation.nodes[0].velocity = vec2(f32::NAN, 0.0);

        assert!(matches!(simulation.step(), Err(Error::NonFinitePosition { .. })));
        assert!(matches!(simulation.step(), Err(Error::Halted)));

        simulation.bind(&pair()).unwrap();
        assert!(!simulation.is_halted());
        assert!(simulation.step().is_ok());
    }
}
