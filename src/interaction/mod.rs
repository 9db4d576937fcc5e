//! Pointer gestures to engine calls.
//!
//! The controller is independent of any windowing toolkit: the rendering side
//! feeds it [`PointerEvent`]s in viewport coordinates and it answers with
//! `pin`/`unpin`/`reheat` calls on the engine, pan/zoom changes to its own
//! [`Viewport`], and focus/selection callbacks on an [`InteractionSink`].

mod viewport;

use std::collections::HashSet;

use eframe::egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::graph::Node;
use crate::physics::{ForceSimulation, Outcome};

pub use viewport::{ViewTransform, Viewport};

/// What happens to a dragged node when the pointer is released.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragMode {
    /// The node stays where it was dropped until clicked.
    #[default]
    Sticky,
    /// The node is released and carries its momentum.
    Release,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub mode: DragMode,
    /// Alpha the layout is held at while a drag is active.
    pub drag_alpha_target: f32,
    /// Pointer travel, in screen pixels, below which a press counts as a click.
    pub click_tolerance: f32,
    pub zoom_sensitivity: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

impl InteractionConfig {
    /// Whether the zoom limits form a usable range.
    pub fn has_valid_zoom_limits(&self) -> bool {
        viewport::valid_zoom_range(self.min_zoom, self.max_zoom)
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            mode: DragMode::Sticky,
            drag_alpha_target: 0.3,
            click_tolerance: 3.0,
            zoom_sensitivity: 0.0018,
            min_zoom: 0.1,
            max_zoom: 10.0,
        }
    }
}

/// Normalized pointer input, in viewport coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerEvent {
    /// Button pressed; `node` is the node under the pointer, if any.
    Down { node: Option<String>, position: Pos2 },
    Move { position: Pos2 },
    Up { position: Pos2 },
    Enter { node: String },
    Leave { node: String },
    Wheel { position: Pos2, delta: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodePhase {
    Idle,
    Dragging,
    Fixed,
}

/// Receives the focus and selection semantics of pointer input, typically
/// to drive a detail panel.
pub trait InteractionSink {
    fn node_focused(&mut self, _node: &Node) {}
    fn node_unfocused(&mut self, _id: &str) {}
    fn node_selected(&mut self, _node: &Node) {}
}

impl InteractionSink for () {}

#[derive(Clone, Debug)]
struct DragGesture {
    id: String,
    origin: Vec2,
    pointer_start: Pos2,
    moved: bool,
    was_fixed: bool,
}

#[derive(Clone, Copy, Debug)]
struct PanGesture {
    pointer_start: Pos2,
    translate_start: Vec2,
}

pub struct InteractionController {
    config: InteractionConfig,
    viewport: Viewport,
    fixed: HashSet<String>,
    drag: Option<DragGesture>,
    pan: Option<PanGesture>,
    focused: Option<String>,
}

impl InteractionController {
    /// Unusable zoom limits are replaced by the defaults.
    pub fn new(mut config: InteractionConfig, viewport: Viewport) -> Self {
        if !config.has_valid_zoom_limits() {
            let defaults = InteractionConfig::default();
            warn!(
                min_zoom = config.min_zoom,
                max_zoom = config.max_zoom,
                "invalid zoom limits; using defaults"
            );
            config.min_zoom = defaults.min_zoom;
            config.max_zoom = defaults.max_zoom;
        }
        Self {
            config,
            viewport,
            fixed: HashSet::new(),
            drag: None,
            pan: None,
            focused: None,
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn set_mode(&mut self, mode: DragMode) {
        self.config.mode = mode;
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport.resize(width, height);
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }

    pub fn phase(&self, id: &str) -> NodePhase {
        if self.drag.as_ref().is_some_and(|drag| drag.id == id) {
            NodePhase::Dragging
        } else if self.fixed.contains(id) {
            NodePhase::Fixed
        } else {
            NodePhase::Idle
        }
    }

    /// Where the node being dragged stood when the drag began.
    pub fn drag_origin(&self) -> Option<Vec2> {
        self.drag.as_ref().map(|drag| drag.origin)
    }

    pub fn handle(
        &mut self,
        event: PointerEvent,
        engine: &mut ForceSimulation,
        sink: &mut impl InteractionSink,
    ) -> Outcome {
        match event {
            PointerEvent::Down {
                node: Some(id),
                position,
            } => self.begin_drag(id, position, engine, sink),
            PointerEvent::Down {
                node: None,
                position,
            } => {
                self.pan = Some(PanGesture {
                    pointer_start: position,
                    translate_start: self.viewport.transform.translate,
                });
                Outcome::Applied
            }
            PointerEvent::Move { position } => self.pointer_moved(position, engine),
            PointerEvent::Up { .. } => {
                if self.drag.is_some() {
                    self.end_drag(engine, sink)
                } else if self.pan.take().is_some() {
                    Outcome::Applied
                } else {
                    Outcome::Ignored
                }
            }
            PointerEvent::Enter { node } => {
                let Some(sim_node) = engine.node(&node) else {
                    return Outcome::Ignored;
                };
                sink.node_focused(sim_node.node());
                self.focused = Some(node);
                Outcome::Applied
            }
            PointerEvent::Leave { node } => {
                if self.focused.as_deref() != Some(node.as_str()) {
                    return Outcome::Ignored;
                }
                self.focused = None;
                sink.node_unfocused(&node);
                Outcome::Applied
            }
            PointerEvent::Wheel { position, delta } => {
                let zoomed = self.viewport.zoom_at(
                    position,
                    delta,
                    self.config.zoom_sensitivity,
                    self.config.min_zoom,
                    self.config.max_zoom,
                );
                if zoomed {
                    Outcome::Applied
                } else {
                    debug!(delta, "ignored wheel event");
                    Outcome::Ignored
                }
            }
        }
    }

    fn begin_drag(
        &mut self,
        id: String,
        position: Pos2,
        engine: &mut ForceSimulation,
        sink: &mut impl InteractionSink,
    ) -> Outcome {
        let Some(origin) = engine.node(&id).map(|sim_node| sim_node.position()) else {
            debug!(id = %id, "pointer down on unknown node");
            return Outcome::Ignored;
        };

        if let Some(stale) = self.drag.as_ref() {
            warn!(id = %stale.id, "drag started while another was active; ending it");
            self.end_drag(engine, sink);
        }
        self.pan = None;

        engine.set_alpha_target(self.config.drag_alpha_target);
        engine.reheat(engine.alpha().max(engine.config().reheat_alpha));
        engine.pin(&id, origin.x, origin.y);

        let was_fixed = self.fixed.remove(&id);
        self.drag = Some(DragGesture {
            id,
            origin,
            pointer_start: position,
            moved: false,
            was_fixed,
        });
        Outcome::Applied
    }

    fn pointer_moved(&mut self, position: Pos2, engine: &mut ForceSimulation) -> Outcome {
        if let Some(drag) = self.drag.as_mut() {
            if !drag.moved && (position - drag.pointer_start).length() > self.config.click_tolerance {
                drag.moved = true;
            }
            if !drag.moved {
                return Outcome::Applied;
            }

            let content = self
                .viewport
                .screen_to_content(self.viewport.clamp_screen(position));
            let outcome = engine.pin(&drag.id, content.x, content.y);
            if outcome == Outcome::Ignored {
                debug!(id = %drag.id, "dragged node left the graph");
                self.drag = None;
                engine.set_alpha_target(0.0);
            }
            return outcome;
        }

        if let Some(pan) = self.pan {
            self.viewport
                .pan_to(pan.translate_start + (position - pan.pointer_start));
            return Outcome::Applied;
        }

        Outcome::Ignored
    }

    fn end_drag(&mut self, engine: &mut ForceSimulation, sink: &mut impl InteractionSink) -> Outcome {
        let Some(drag) = self.drag.take() else {
            return Outcome::Ignored;
        };
        engine.set_alpha_target(0.0);

        if !drag.moved {
            if let Some(sim_node) = engine.node(&drag.id) {
                sink.node_selected(sim_node.node());
            }
            // A click releases a fixed node and leaves a free one free.
            debug!(id = %drag.id, was_fixed = drag.was_fixed, "node clicked");
            return engine.unpin(&drag.id);
        }

        match self.config.mode {
            DragMode::Sticky => {
                if engine.node(&drag.id).is_some_and(|sim_node| sim_node.is_pinned()) {
                    self.fixed.insert(drag.id);
                    Outcome::Applied
                } else {
                    Outcome::Ignored
                }
            }
            DragMode::Release => engine.unpin(&drag.id),
        }
    }

    /// Releases a fixed node without a pointer gesture.
    pub fn release(&mut self, id: &str, engine: &mut ForceSimulation) -> Outcome {
        if !self.fixed.remove(id) {
            return Outcome::Ignored;
        }
        engine.unpin(id)
    }

    /// Forgets interaction state for nodes the last bind removed.
    pub fn sync(&mut self, engine: &mut ForceSimulation) {
        self.fixed.retain(|id| engine.node(id).is_some_and(|sim_node| sim_node.is_pinned()));

        if self.drag.as_ref().is_some_and(|drag| !engine.contains(&drag.id)) {
            self.drag = None;
            engine.set_alpha_target(0.0);
        }
        if self.focused.as_deref().is_some_and(|id| !engine.contains(id)) {
            self.focused = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;
    use crate::graph::{Graph, Link, NodeKind};

    fn engine() -> ForceSimulation {
        let node = |id: &str| Node {
            id: id.to_owned(),
            kind: NodeKind::Republican,
            label: id.to_owned(),
            weight: 3,
        };
        let mut engine = ForceSimulation::default();
        engine
            .bind(&Graph {
                nodes: vec![node("a"), node("b")],
                links: vec![Link::new("a", "b")],
            })
            .unwrap();
        engine
    }

    #[test]
    fn press_without_motion_does_not_move_the_pin() {
        let mut engine = engine();
        let mut controller = InteractionController::new(InteractionConfig::default(), Viewport::new(400.0, 400.0));
        let origin = engine.node("a").unwrap().position();

        controller.handle(
            PointerEvent::Down {
                node: Some("a".to_owned()),
                position: pos2(10.0, 10.0),
            },
            &mut engine,
            &mut (),
        );
        controller.handle(PointerEvent::Move { position: pos2(11.0, 11.0) }, &mut engine, &mut ());

        assert_eq!(engine.node("a").unwrap().pin(), Some(origin));
        assert_eq!(controller.drag_origin(), Some(origin));
        assert_eq!(controller.phase("a"), NodePhase::Dragging);
    }

    #[test]
    fn background_drag_pans_without_touching_nodes() {
        let mut engine = engine();
        let before = engine.snapshot();
        let mut controller = InteractionController::new(InteractionConfig::default(), Viewport::new(400.0, 400.0));

        controller.handle(PointerEvent::Down { node: None, position: pos2(100.0, 100.0) }, &mut engine, &mut ());
        controller.handle(PointerEvent::Move { position: pos2(130.0, 90.0) }, &mut engine, &mut ());
        controller.handle(PointerEvent::Up { position: pos2(130.0, 90.0) }, &mut engine, &mut ());

        assert_eq!(controller.viewport().transform.translate, Vec2::new(30.0, -10.0));
        assert_eq!(engine.snapshot(), before);
        assert!(!controller.is_panning());
    }

    #[test]
    fn inverted_zoom_limits_fall_back_to_defaults() {
        let mut engine = engine();
        let config = InteractionConfig {
            min_zoom: 5.0,
            max_zoom: 2.0,
            ..InteractionConfig::default()
        };
        let mut controller = InteractionController::new(config, Viewport::new(400.0, 400.0));
        assert_eq!(controller.config().min_zoom, InteractionConfig::default().min_zoom);

        let outcome = controller.handle(PointerEvent::Wheel { position: pos2(50.0, 50.0), delta: 40.0 }, &mut engine, &mut ());
        assert_eq!(outcome, Outcome::Applied);
        assert!(controller.viewport().transform.scale > 1.0);

        let outcome = controller.handle(PointerEvent::Wheel { position: pos2(50.0, 50.0), delta: f32::NAN }, &mut engine, &mut ());
        assert_eq!(outcome, Outcome::Ignored);
        assert!(controller.viewport().transform.scale.is_finite());
    }

    #[test]
    fn leave_for_a_node_that_is_not_focused_is_ignored() {
        let mut engine = engine();
        let mut controller = InteractionController::new(InteractionConfig::default(), Viewport::new(400.0, 400.0));
        let outcome = controller.handle(PointerEvent::Leave { node: "a".to_owned() }, &mut engine, &mut ());
        assert_eq!(outcome, Outcome::Ignored);
    }
}
