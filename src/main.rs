use emuview::cli::Args;
use emuview::config::{self, ViewportConfig};
use emuview::core::sizing::Size;
use emuview::shell::{self, Shell};
use emuview::widgets::viewport::{self, ViewportWidgets};

use clap::Parser;
use eframe::egui;
use log::{error, info, warn};
use std::path::PathBuf;
use std::time::Instant;

/// Demo host: side panel plays the embedding tool, central panel is the viewport
struct EmuviewApp {
    shell: Shell,
    widgets: ViewportWidgets,
    show_events: bool,
    config: ViewportConfig,
    config_path: PathBuf,
}

impl EmuviewApp {
    fn new(shell: Shell, config: ViewportConfig, config_path: PathBuf) -> Self {
        Self {
            shell,
            widgets: ViewportWidgets::new(),
            show_events: true,
            config,
            config_path,
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.heading("Viewport");
        ui.separator();

        let props = self.shell.container.props().clone();
        let mut emulate = props.is_device_emulation_enabled;
        let mut inspect = props.is_inspect_enabled;
        let mut padding = props.padding;
        let mut width = props.width;
        let mut height = props.height;
        let mut loading = props.loading_percent;

        ui.checkbox(&mut emulate, "Device emulation");
        ui.checkbox(&mut inspect, "Inspect mode");
        ui.add(egui::Slider::new(&mut padding, 0.0..=100.0).text("Padding"));
        ui.horizontal(|ui| {
            ui.label("Size");
            ui.add(egui::DragValue::new(&mut width).range(0.0..=8192.0));
            ui.label("×");
            ui.add(egui::DragValue::new(&mut height).range(0.0..=8192.0));
        });
        ui.add(egui::Slider::new(&mut loading, 0.0..=1.0).text("Loading"));

        let changed = emulate != props.is_device_emulation_enabled
            || inspect != props.is_inspect_enabled
            || padding != props.padding
            || width != props.width
            || height != props.height
            || loading != props.loading_percent;
        if changed {
            self.shell.update_props(|p| {
                p.is_device_emulation_enabled = emulate;
                p.is_inspect_enabled = inspect;
                p.padding = padding;
                p.width = width;
                p.height = height;
                p.loading_percent = loading;
            });
        }

        if ui.button("Reset size").clicked() {
            self.shell.request_reset();
        }

        ui.separator();
        let state = self.shell.container.state();
        ui.label(format!("Mode: {:?}", self.shell.container.mode()));
        ui.label(format!("Resizable: {}", state.resizable));
        if let Some(m) = self.shell.container.measured() {
            ui.label(format!("Box: {:.0} × {:.0}", m.width, m.height));
        }

        ui.separator();
        ui.checkbox(&mut self.show_events, "Show events");
        if self.show_events {
            egui::ScrollArea::vertical().stick_to_bottom(true).show(ui, |ui| {
                for event in self.shell.recent_events() {
                    let line = serde_json::to_string(event).unwrap_or_else(|e| e.to_string());
                    ui.monospace(line);
                }
            });
        }
    }
}

impl eframe::App for EmuviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        egui::SidePanel::left("viewport_controls")
            .resizable(true)
            .default_width(260.0)
            .show(ctx, |ui| self.controls(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let measured = viewport::render(ui, &mut self.shell.container, &mut self.widgets);
                // The central panel is the hosting frame; its size changes drive the resize signal
                self.shell.observe_window(measured, now);
            });

        if let Some(wait) = self.shell.update(now) {
            ctx.request_repaint_after(wait);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.shell.container.unmount();
        self.config.remember(self.shell.container.props());
        match self.config.save(&self.config_path) {
            Ok(()) => info!("Saved config to {}", self.config_path.display()),
            Err(e) => warn!("{:#}", e),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let path_config = config::PathConfig::from_env_and_cli(args.config_dir.clone());
    if let Err(e) = config::ensure_dirs(&path_config) {
        eprintln!("Warning: Failed to create application directories: {}", e);
    }

    let log_path = args.log_file.as_ref().map(|p| {
        p.clone()
            .unwrap_or_else(|| config::config_file("emuview.log", &path_config))
    });
    shell::init_logger(args.verbosity, log_path.as_deref())?;

    info!("emuview starting...");
    log::debug!("Command-line args: {:?}", args);

    let config_path = config::config_file(config::CONFIG_FILE, &path_config);
    let mut cfg = ViewportConfig::load(&config_path).unwrap_or_else(|e| {
        warn!("{:#}; using defaults", e);
        ViewportConfig::default()
    });
    args.apply(&mut cfg);

    let mut shell = Shell::new(&cfg);
    let frame = match &args.frame {
        Some(path) => match shell::load_frame(path, 1) {
            Ok(frame) => frame,
            Err(e) => {
                error!("{:#}", e);
                shell::test_pattern(cfg.width.max(1.0) as u32, cfg.height.max(1.0) as u32, 1)
            }
        },
        None => shell::test_pattern(cfg.width.max(1.0) as u32, cfg.height.max(1.0) as u32, 1),
    };
    shell.update_props(|p| p.frame = Some(frame));

    let initial = Size::new(cfg.width + 320.0, cfg.height + 80.0);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([initial.width, initial.height])
            .with_title("emuview"),
        ..Default::default()
    };

    eframe::run_native(
        "emuview",
        options,
        Box::new(move |_cc| Ok(Box::new(EmuviewApp::new(shell, cfg, config_path)))),
    )?;
    Ok(())
}
