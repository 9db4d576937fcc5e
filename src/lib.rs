//! Legislative co-sponsorship network explorer.
//!
//! [`graph::build`] turns per-member co-sponsorship counts into a node/link
//! graph around a focal member, [`physics::ForceSimulation`] lays that graph
//! out with a force-directed simulation that survives rebinding, and
//! [`interaction::InteractionController`] maps pointer gestures onto pin and
//! reheat calls. The [`app`] module hosts all three in an egui window.

pub mod app;
pub mod config;
pub mod congress;
pub mod error;
pub mod graph;
pub mod interaction;
pub mod physics;
pub mod util;

pub use error::{Error, ErrorKind, Result};
