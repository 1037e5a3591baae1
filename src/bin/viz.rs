use eframe::egui;
use egui_plot::{HLine, Line, Plot, PlotPoints};

use hyperpod_sim::sim::{MissionOutcome, MissionSequencer};
use hyperpod_sim::telemetry::TelemetryRecord;
use hyperpod_sim::vehicle::{presets, MissionConfig};

fn main() -> eframe::Result {
    let mut config = presets::reference();
    config.sample_every = 1;
    config.sensor.seed = Some(42);

    let mut rows = Vec::new();
    let outcome = match MissionSequencer::from_config(&config).and_then(|mut seq| seq.run_mission(&mut rows)) {
        Ok(outcome) => outcome,
        Err(e) => {
            hyperpod_sim::error!("{e}");
            std::process::exit(1);
        }
    };

    let app = MissionViz { rows, config, outcome };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 700.0]),
        ..Default::default()
    };
    eframe::run_native("Maglev Pod Mission", options, Box::new(|_| Ok(Box::new(app))))
}

struct MissionViz {
    rows: Vec<TelemetryRecord>,
    config: MissionConfig,
    outcome: MissionOutcome,
}

impl eframe::App for MissionViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading(format!("Mission: {}", self.config.name));
            let top = self.rows.iter().map(|r| r.speed_kmh).fold(0.0_f64, f64::max);
            ui.label(format!(
                "Status: {}  |  Top speed: {:.1} km/h  |  Target gap: {:.1} mm  |  Duration: {:.1} s",
                self.outcome.status,
                top,
                self.config.levitation.target_gap,
                self.outcome.final_time,
            ));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;

            ui.horizontal(|ui| {
                // Speed vs Time
                ui.vertical(|ui| {
                    ui.label("Speed (km/h)");
                    let points: PlotPoints = self.rows.iter().map(|r| [r.time, r.speed_kmh]).collect();
                    Plot::new("speed")
                        .width(half_w)
                        .height(available.y - 24.0)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Speed", points));
                        });
                });

                // Gap vs Time
                ui.vertical(|ui| {
                    ui.label("Air gap (mm)");
                    let points: PlotPoints = self.rows.iter().map(|r| [r.time, r.gap_mm]).collect();
                    let target = self.config.levitation.target_gap;
                    Plot::new("gap")
                        .width(half_w)
                        .height(available.y - 24.0)
                        .x_axis_label("Time (s)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Gap", points));
                            plot_ui.hline(HLine::new("Target", target));
                        });
                });
            });
        });
    }
}
