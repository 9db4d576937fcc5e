use eframe::egui::{self, Ui};

use crate::interaction::{DragMode, NodePhase};

use super::ViewModel;

const SEARCH_RESULTS: usize = 12;

impl ViewModel {
    pub(super) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Focal member")
            .on_hover_text("Fuzzy search by name, party, state or district.");
        ui.text_edit_singleline(&mut self.search);

        let mut picked = None;
        egui::ScrollArea::vertical()
            .id_salt("member_search_scroll")
            .max_height(240.0)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for member in self.roster.search(&self.search, SEARCH_RESULTS) {
                    let key = member.key();
                    let is_focal = key == self.focal;
                    if ui
                        .selectable_label(is_focal, member.display_label())
                        .clicked()
                    {
                        picked = Some(key);
                    }
                }
            });
        if let Some(id) = picked {
            self.set_focal(id);
        }

        ui.separator();

        let max_count = self.roster.max_count(&self.focal).max(1);
        let threshold_response = ui
            .add(
                egui::Slider::new(&mut self.threshold, 0.0..=f64::from(max_count))
                    .step_by(1.0)
                    .text("min shared bills"),
            )
            .on_hover_text("Members co-sponsoring at least this many bills with the focal member are shown.");
        if threshold_response.changed() {
            self.graph_dirty = true;
        }

        let mut include_bills = self.include_bills;
        if ui
            .checkbox(&mut include_bills, "Show shared bills")
            .on_hover_text("Add bills sponsored or co-sponsored by two or more members in view.")
            .changed()
        {
            self.set_include_bills(include_bills);
        }

        let mut sticky = self.controller.config().mode == DragMode::Sticky;
        if ui
            .checkbox(&mut sticky, "Keep dragged nodes fixed")
            .on_hover_text("Dropped nodes stay put until clicked.")
            .changed()
        {
            self.controller
                .set_mode(if sticky { DragMode::Sticky } else { DragMode::Release });
        }

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            if ui.button("Reheat layout").clicked() {
                self.engine.reheat(self.layout.simulation.bind_alpha);
            }

            let fixed = self
                .engine
                .nodes()
                .iter()
                .filter(|sim_node| self.controller.phase(sim_node.id()) == NodePhase::Fixed)
                .map(|sim_node| sim_node.id().to_owned())
                .collect::<Vec<_>>();
            if ui
                .add_enabled(!fixed.is_empty(), egui::Button::new("Release fixed nodes"))
                .clicked()
            {
                for id in &fixed {
                    self.controller.release(id, &mut self.engine);
                }
            }
        });

        ui.add_space(8.0);
        ui.small("Drag a node to move it, click it to release it. Drag the background to pan, scroll to zoom.");
    }
}
