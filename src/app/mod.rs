use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use tracing::{info, warn};

use crate::config::LayoutConfig;
use crate::congress::{Roster, load_dataset};
use crate::graph::Node;
use crate::interaction::{InteractionController, InteractionSink};
use crate::physics::ForceSimulation;

mod controls;
mod details;
mod panels;
mod render_utils;
mod view;

/// Startup choices, usually from the command line.
#[derive(Clone, Debug)]
pub struct AppOptions {
    pub data_path: PathBuf,
    pub focal: Option<String>,
    pub threshold: f64,
    pub include_bills: bool,
    pub layout: LayoutConfig,
}

pub struct CosponsorApp {
    options: AppOptions,
    state: AppState,
}

enum AppState {
    Loading { rx: Receiver<Result<Roster, String>> },
    Ready(Box<ViewModel>),
    Error(String),
}

/// Focus and selection reported by the interaction controller, shown in the
/// details panel.
#[derive(Default)]
struct DetailSink {
    focused: Option<Node>,
    selected: Option<Node>,
}

impl InteractionSink for DetailSink {
    fn node_focused(&mut self, node: &Node) {
        self.focused = Some(node.clone());
    }

    fn node_unfocused(&mut self, id: &str) {
        if self.focused.as_ref().is_some_and(|node| node.id == id) {
            self.focused = None;
        }
    }

    fn node_selected(&mut self, node: &Node) {
        self.selected = Some(node.clone());
    }
}

struct ViewModel {
    roster: Roster,
    layout: LayoutConfig,
    focal: String,
    threshold: f64,
    include_bills: bool,
    engine: ForceSimulation,
    controller: InteractionController,
    details: DetailSink,
    search: String,
    hovered: Option<String>,
    graph_dirty: bool,
    graph_error: Option<String>,
}

impl CosponsorApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, options: AppOptions) -> Self {
        let state = Self::start_load(&options);
        Self { options, state }
    }

    fn start_load(options: &AppOptions) -> AppState {
        let (tx, rx) = mpsc::channel();
        let path = options.data_path.clone();

        thread::spawn(move || {
            let result = load_dataset(&path)
                .map(Roster::new)
                .map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        AppState::Loading { rx }
    }
}

impl eframe::App for CosponsorApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(roster)) => {
                        info!(members = roster.len(), bills = roster.bills().len(), "loaded data file");
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(roster, &self.options))));
                    }
                    Ok(Err(error)) => {
                        warn!(%error, "failed to load data file");
                        transition = Some(AppState::Error(error));
                    }
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading co-sponsorship data...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint();
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load co-sponsorship data");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(&self.options));
                    }
                });
            }
            AppState::Ready(model) => model.show(ctx),
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}
