//! UI widgets (egui)

pub mod viewport;
