use std::path::PathBuf;
use std::process;

use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cea_analyzer::analysis::{
    build_sensitivity_grids, by_pressure, compute_system, ConicalContour, ContourGenerator,
    ContourRequest, GradientView, NozzleContour, Quantity, SensitivityGrid, SystemAssumptions,
    SystemResult,
};
use cea_analyzer::config;
use cea_analyzer::types::CaseTable;
use cea_analyzer::worker;

fn main() -> eframe::Result {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("usage: cea-viz <report.out>");
        process::exit(2);
    };
    let app = match CeaViz::load(path) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("CEA Analyzer", options, Box::new(|_| Ok(Box::new(app))))
}

struct CeaViz {
    title: String,
    report: PathBuf,
    table: CaseTable,
    system: SystemResult,
    grids: SensitivityGrid,
    contour: NozzleContour,
    quantity: Quantity,
}

impl CeaViz {
    fn load(report: PathBuf) -> cea_analyzer::Result<Self> {
        let cfg = config::load()?;
        let table = worker::spawn_parse(&report).wait(|_| {})?;
        let system = compute_system(&table)?;
        let grids = build_sensitivity_grids(&table, &cfg);

        let request = ContourRequest::from_system(&system, &SystemAssumptions::default());
        let contour = ConicalContour::default().contour(&request);

        Ok(Self {
            title: cfg.pdf_report_title,
            report,
            table,
            system,
            grids,
            contour,
            quantity: Quantity::IspSeconds,
        })
    }
}

/// Blue (low) to red (high).
fn heat_colour(v: f64, lo: f64, hi: f64) -> egui::Color32 {
    let t = if hi > lo { ((v - lo) / (hi - lo)).clamp(0.0, 1.0) } else { 0.5 };
    egui::Color32::from_rgb((255.0 * t) as u8, 64, (255.0 * (1.0 - t)) as u8)
}

impl eframe::App for CeaViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading(format!("{}: {}", self.title, self.report.display()));
            ui.label(format!(
                "{}  |  Cases: {}  |  At: {:.6} m²  |  Ae/At: {:.2}",
                self.system.headline(),
                self.table.len(),
                self.system.throat_area,
                self.system.expansion_ratio(),
            ));
            ui.label(self.system.recommendation());
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;
            let half_h = available.y / 2.0 - 24.0;

            ui.horizontal(|ui| {
                // Performance curves, one per Pc
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        for q in Quantity::ALL {
                            ui.selectable_value(&mut self.quantity, q, q.title());
                        }
                    });
                    let series = by_pressure(&self.table, self.quantity);
                    Plot::new("performance")
                        .width(half_w)
                        .height(half_h)
                        .legend(Legend::default())
                        .x_axis_label("O/F")
                        .y_axis_label(self.quantity.axis_label())
                        .show(ui, |plot_ui| {
                            for s in series {
                                let label = s.label();
                                plot_ui.line(Line::new(label.clone(), s.points.clone()));
                                plot_ui.points(Points::new(label, s.points).radius(3.0));
                            }
                        });
                });

                // Thrust vs Altitude
                ui.vertical(|ui| {
                    ui.label("Thrust vs Altitude");
                    let points: PlotPoints = self.system.sweep().map(|(h, f)| [h, f]).collect();
                    Plot::new("thrust")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Altitude (m)")
                        .y_axis_label("Thrust (N)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Thrust", points));
                        });
                });
            });

            ui.horizontal(|ui| {
                // dIsp/d(O/F)
                ui.vertical(|ui| {
                    ui.label(format!(
                        "dIsp/d(O/F)  ({})",
                        self.grids.interpolation.name()
                    ));
                    let range = self.grids.d_isp_d_of.finite_range();
                    Plot::new("sensitivity")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label(if self.grids.is_grid() { "O/F" } else { "axis" })
                        .show(ui, |plot_ui| match &self.grids.d_isp_d_of {
                            GradientView::Grid { pcs, ofs, values } => {
                                let (lo, hi) = range.unwrap_or((0.0, 0.0));
                                for (i, pc) in pcs.iter().enumerate() {
                                    for (j, of) in ofs.iter().enumerate() {
                                        let v = values[(i, j)];
                                        if !v.is_finite() {
                                            continue;
                                        }
                                        plot_ui.points(
                                            Points::new(format!("{v:.3}"), vec![[*of, *pc]])
                                                .radius(8.0)
                                                .color(heat_colour(v, lo, hi)),
                                        );
                                    }
                                }
                            }
                            GradientView::Line { axis, values } => {
                                let points: Vec<[f64; 2]> = axis
                                    .iter()
                                    .zip(values)
                                    .map(|(&x, &v)| [x, v])
                                    .collect();
                                plot_ui.line(Line::new("dIsp/d(O/F)", points));
                            }
                        });
                });

                // Nozzle contour
                ui.vertical(|ui| {
                    ui.label(format!(
                        "Nozzle Contour (conical, r_t = {:.4} m)",
                        self.system.throat_radius()
                    ));
                    Plot::new("contour")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("x (m)")
                        .data_aspect(1.0)
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Wall", self.contour.upper.clone()));
                            plot_ui.line(Line::new("Wall (mirror)", self.contour.lower.clone()));
                        });
                });
            });
        });
    }
}
