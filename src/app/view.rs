use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui, Vec2, vec2};
use tracing::error;

use crate::graph::NodeKind;
use crate::interaction::{NodePhase, PointerEvent, Viewport};
use crate::physics::Snapshot;

use super::render_utils::{blend_color, draw_background, kind_color, node_radius};
use super::ViewModel;

const HIT_SLOP: f32 = 2.0;

fn screen_radius(radius: f32, scale: f32) -> f32 {
    (radius * scale.powf(0.6)).clamp(2.5, 40.0)
}

fn to_screen(rect: Rect, viewport: &Viewport, content: Vec2) -> Pos2 {
    rect.min + viewport.content_to_screen(content).to_vec2()
}

impl ViewModel {
    fn max_weight(&self) -> u32 {
        self.engine
            .nodes()
            .iter()
            .map(|sim_node| sim_node.node().weight)
            .max()
            .unwrap_or(0)
    }

    fn radius_of(&self, id: &str, kind: NodeKind, max_weight: u32) -> f32 {
        let weight = self
            .engine
            .node(id)
            .map(|sim_node| sim_node.node().weight)
            .unwrap_or(0);
        node_radius(kind, weight, max_weight, id == self.focal)
    }

    /// The node drawn under `local`, a point relative to the canvas corner.
    fn node_under(&self, snapshot: &Snapshot, local: Pos2, max_weight: u32) -> Option<String> {
        let viewport = self.controller.viewport();
        snapshot
            .nodes
            .iter()
            .filter_map(|node| {
                let center = viewport.content_to_screen(node.position);
                let radius = screen_radius(
                    self.radius_of(&node.id, node.kind, max_weight),
                    viewport.transform.scale,
                );
                let distance = center.distance(local);
                (distance <= radius + HIT_SLOP).then_some((node, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(node, _distance)| node.id.clone())
    }

    fn dispatch(&mut self, event: PointerEvent) {
        self.controller
            .handle(event, &mut self.engine, &mut self.details);
    }

    fn handle_pointer(&mut self, ui: &Ui, rect: Rect, response: &egui::Response, snapshot: &Snapshot) {
        let (pointer, moved, pressed, released, scroll) = ui.input(|input| {
            (
                input.pointer.interact_pos().or_else(|| input.pointer.hover_pos()),
                input.pointer.delta() != Vec2::ZERO,
                input.pointer.primary_pressed(),
                input.pointer.primary_released(),
                input.raw_scroll_delta.y,
            )
        });
        let local = pointer.map(|pointer| (pointer - rect.min).to_pos2());
        let max_weight = self.max_weight();

        if !self.controller.is_dragging() {
            let hovered = if response.hovered() {
                local.and_then(|local| self.node_under(snapshot, local, max_weight))
            } else {
                None
            };
            if hovered != self.hovered {
                if let Some(previous) = self.hovered.take() {
                    self.dispatch(PointerEvent::Leave { node: previous });
                }
                if let Some(next) = hovered.clone() {
                    self.dispatch(PointerEvent::Enter { node: next });
                }
                self.hovered = hovered;
            }
        }

        let gesture_active = self.controller.is_dragging() || self.controller.is_panning();

        if pressed
            && response.hovered()
            && let Some(position) = local
        {
            self.dispatch(PointerEvent::Down {
                node: self.hovered.clone(),
                position,
            });
        } else if moved
            && gesture_active
            && let Some(position) = local
        {
            self.dispatch(PointerEvent::Move { position });
        }

        if released && gesture_active {
            let position = local.unwrap_or_else(|| (rect.center() - rect.min).to_pos2());
            self.dispatch(PointerEvent::Up { position });
        }

        if response.hovered() && scroll.abs() > f32::EPSILON {
            let position = local.unwrap_or_else(|| (rect.center() - rect.min).to_pos2());
            self.dispatch(PointerEvent::Wheel {
                position,
                delta: scroll,
            });
        }

        if self.controller.is_dragging() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::Grabbing);
        } else if self.hovered.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }
    }

    pub(super) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        if self.controller.viewport().size != rect.size() {
            self.controller.resize(rect.width(), rect.height());
        }

        if !self.engine.is_settled()
            && !self.engine.is_halted()
            && let Err(step_error) = self.engine.step()
        {
            error!(%step_error, "layout step failed");
            self.graph_error = Some(step_error.to_string());
            return;
        }

        let snapshot = self.engine.snapshot();
        self.handle_pointer(ui, rect, &response, &snapshot);

        let snapshot = self.engine.snapshot();
        let viewport = *self.controller.viewport();
        let max_weight = self.max_weight();
        draw_background(&painter, rect, viewport.transform);

        if snapshot.is_empty() {
            ui.label("No members to show.");
            return;
        }

        let highlight = self
            .hovered
            .as_deref()
            .or_else(|| self.details.selected.as_ref().map(|node| node.id.as_str()));
        let zoom_sqrt = viewport.transform.scale.sqrt();

        for link in &snapshot.links {
            let start = to_screen(rect, &viewport, link.source);
            let end = to_screen(rect, &viewport, link.target);
            let touches_highlight = highlight
                .is_some_and(|id| link.source_id == id || link.target_id == id);
            let (width, color) = if touches_highlight {
                ((2.0 * zoom_sqrt).clamp(1.2, 4.0), Color32::from_rgb(241, 146, 94))
            } else {
                (
                    (1.0 * zoom_sqrt).clamp(0.6, 2.6),
                    Color32::from_rgba_unmultiplied(110, 116, 126, 150),
                )
            };
            painter.line_segment([start, end], Stroke::new(width, color));
        }

        // Bills underneath, the focal member on top.
        let mut order = (0..snapshot.nodes.len()).collect::<Vec<_>>();
        order.sort_by_key(|&index| {
            let node = &snapshot.nodes[index];
            (node.id == self.focal, node.kind.is_legislator())
        });

        for index in order {
            let node = &snapshot.nodes[index];
            let position = to_screen(rect, &viewport, node.position);
            let radius = screen_radius(
                self.radius_of(&node.id, node.kind, max_weight),
                viewport.transform.scale,
            );
            let is_hovered = self.hovered.as_deref() == Some(node.id.as_str());
            let is_focal = node.id == self.focal;

            let base = kind_color(node.kind);
            let color = if is_hovered {
                blend_color(base, Color32::WHITE, 0.35)
            } else {
                base
            };
            painter.circle_filled(position, radius, color);

            let ring = match self.controller.phase(&node.id) {
                NodePhase::Fixed | NodePhase::Dragging => {
                    Stroke::new(2.0, Color32::from_rgb(245, 206, 93))
                }
                NodePhase::Idle => Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190)),
            };
            painter.circle_stroke(position, radius, ring);

            let should_draw_label =
                is_hovered || is_focal || node.pinned || viewport.transform.scale > 1.6;
            if should_draw_label {
                painter.text(
                    position + vec2(radius + 5.0, 0.0),
                    Align2::LEFT_CENTER,
                    node.label.as_str(),
                    FontId::proportional(12.0),
                    Color32::from_gray(238),
                );
            }
        }

        if !self.engine.is_settled() || self.controller.is_dragging() || self.controller.is_panning() {
            ui.ctx().request_repaint();
        }
    }
}
