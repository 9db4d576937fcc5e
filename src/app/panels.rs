use eframe::egui::{self, Align, Context, Layout};
use tracing::{debug, warn};

use crate::congress::Roster;
use crate::interaction::{InteractionController, Viewport};
use crate::physics::ForceSimulation;

use super::{AppOptions, DetailSink, ViewModel};

impl ViewModel {
    pub(super) fn new(roster: Roster, options: &AppOptions) -> Self {
        let focal = options
            .focal
            .clone()
            .filter(|id| roster.member(id).is_some())
            .or_else(|| roster.most_connected().map(|member| member.key()))
            .unwrap_or_default();
        if let Some(requested) = &options.focal
            && *requested != focal
        {
            warn!(requested = %requested, fallback = %focal, "unknown focal member");
        }

        let layout = options.layout.clone();
        let engine = ForceSimulation::new(
            layout.simulation.clone(),
            layout.forces_for(options.include_bills),
        );
        let controller = InteractionController::new(layout.interaction.clone(), Viewport::centered(800.0, 600.0));

        Self {
            roster,
            layout,
            focal,
            threshold: options.threshold,
            include_bills: options.include_bills,
            engine,
            controller,
            details: DetailSink::default(),
            search: String::new(),
            hovered: None,
            graph_dirty: true,
            graph_error: None,
        }
    }

    /// Rebuilds the focal network and binds it, keeping the layout of members
    /// that stay in view.
    pub(super) fn rebuild_graph(&mut self) {
        self.graph_dirty = false;

        let result = self
            .roster
            .focal_graph(&self.focal, self.threshold, self.include_bills)
            .and_then(|graph| self.engine.bind(&graph));

        match result {
            Ok(snapshot) => {
                debug!(focal = %self.focal, nodes = snapshot.nodes.len(), links = snapshot.links.len(), "rebound graph");
                self.graph_error = None;
            }
            Err(error) => {
                warn!(focal = %self.focal, %error, "could not rebuild graph");
                self.graph_error = Some(error.to_string());
            }
        }

        self.controller.sync(&mut self.engine);
        if self
            .hovered
            .as_deref()
            .is_some_and(|id| !self.engine.contains(id))
        {
            self.hovered = None;
        }
        if let Some(node) = &self.details.focused
            && !self.engine.contains(&node.id)
        {
            self.details.focused = None;
        }
    }

    pub(super) fn set_focal(&mut self, id: String) {
        if self.focal == id {
            return;
        }
        self.focal = id;
        self.graph_dirty = true;
    }

    pub(super) fn set_include_bills(&mut self, include_bills: bool) {
        self.include_bills = include_bills;
        self.engine
            .configure_forces(self.layout.forces_for(include_bills));
        self.graph_dirty = true;
    }

    pub(super) fn show(&mut self, ctx: &Context) {
        if self.graph_dirty {
            self.rebuild_graph();
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("cosponsor-graph");
                    ui.separator();
                    let focal_label = self
                        .roster
                        .member(&self.focal)
                        .map(|member| member.display_label())
                        .unwrap_or_else(|| self.focal.clone());
                    ui.label(format!("focal: {focal_label}"));
                    ui.label(format!("members loaded: {}", self.roster.len()));
                    ui.label(format!("nodes: {}", self.engine.len()));
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let status = if self.engine.is_halted() {
                            "halted".to_owned()
                        } else if self.engine.is_settled() {
                            "settled".to_owned()
                        } else {
                            format!("alpha {:.3}", self.engine.alpha())
                        };
                        ui.label(status);
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| match &self.graph_error {
            Some(error) => {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("No graph to show");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                });
            }
            None => self.draw_graph(ui),
        });
    }
}
