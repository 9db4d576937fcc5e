use eframe::egui::{RichText, Ui};

use crate::graph::{Node, bill_node_id};
use crate::interaction::NodePhase;

use super::ViewModel;

impl ViewModel {
    pub(super) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Details");
        ui.add_space(6.0);

        // Hover wins over the last click so the panel follows the pointer.
        let Some(node) = self
            .details
            .focused
            .clone()
            .or_else(|| self.details.selected.clone())
        else {
            ui.label("Hover or click a node in the graph.");
            return;
        };

        ui.label(RichText::new(node.label.as_str()).strong());
        ui.small(format!("{} · id {}", node.kind.label(), node.id));
        ui.add_space(6.0);

        if node.kind.is_legislator() {
            self.draw_member_details(ui, &node);
        } else {
            self.draw_bill_details(ui, &node);
        }

        ui.separator();
        let phase = match self.controller.phase(&node.id) {
            NodePhase::Idle => "free",
            NodePhase::Dragging => "dragging",
            NodePhase::Fixed => "fixed (click to release)",
        };
        ui.label(format!("Layout: {phase}"));
        if !self.engine.contains(&node.id) {
            ui.label("Not in the current graph.");
        }
    }

    fn draw_member_details(&mut self, ui: &mut Ui, node: &Node) {
        let Some(member) = self.roster.member(&node.id) else {
            return;
        };

        ui.label(format!("State: {}", member.state));
        if !member.districts.is_empty() {
            ui.label(format!("Districts: {}", member.districts.join(", ")));
        }
        ui.label(format!("Total co-sponsorships: {}", member.total_cosponsorships()));

        if node.id == self.focal {
            ui.label("Focal member");
            return;
        }

        let shared = self
            .roster
            .member(&self.focal)
            .and_then(|focal| focal.counts.get(&node.id).copied())
            .unwrap_or(node.weight);
        ui.label(format!("Bills shared with focal member: {shared}"));

        let id = node.id.clone();
        if ui.button("Make focal member").clicked() {
            self.set_focal(id);
        }
    }

    fn draw_bill_details(&self, ui: &mut Ui, node: &Node) {
        let Some(bill) = self
            .roster
            .bills()
            .iter()
            .find(|bill| bill_node_id(bill.number) == node.id)
        else {
            return;
        };

        if let Some(policy_area) = &bill.policy_area {
            ui.label(format!("Policy area: {policy_area}"));
        }

        let name = |id: &str| {
            self.roster
                .member(id)
                .map(|member| member.name.clone())
                .unwrap_or_else(|| id.to_owned())
        };
        let sponsors = bill.sponsors.iter().map(|id| name(id)).collect::<Vec<_>>();
        ui.label(format!("Sponsors: {}", sponsors.join(", ")));
        ui.label(format!("Co-sponsors: {}", bill.cosponsors.len()));
    }
}
