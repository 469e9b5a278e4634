use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cea_analyzer::analysis::{
    build_sensitivity_grids, compute_system_resolving, CaseFilter, GradientView, Range,
    SensitivityGrid, SystemResult,
};
use cea_analyzer::config::{self, Config};
use cea_analyzer::io::{csv, json};
use cea_analyzer::types::CaseTable;
use cea_analyzer::worker;

#[derive(Parser, Debug)]
#[command(name = "cea-analyzer")]
#[command(about = "Reduce NASA-CEA rocket reports and size a nozzle around the best case")]
#[command(version)]
struct Args {
    /// CEA output file (.out / .txt)
    report: PathBuf,

    /// Settings file (default: ~/.cea_analyzer_config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Expansion ratio Ae/At to use when the best case has none
    #[arg(long)]
    expansion_ratio: Option<f64>,

    // ── Filters (inclusive) ─────────────────────────────────────
    #[arg(long)]
    of_min: Option<f64>,
    #[arg(long)]
    of_max: Option<f64>,
    #[arg(long)]
    pc_min: Option<f64>,
    #[arg(long)]
    pc_max: Option<f64>,
    #[arg(long)]
    isp_min: Option<f64>,
    #[arg(long)]
    isp_max: Option<f64>,

    // ── Export ──────────────────────────────────────────────────
    /// Write the (filtered) case table as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the system summary as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

impl Args {
    fn filter(&self) -> CaseFilter {
        CaseFilter {
            of: Range::new(self.of_min, self.of_max),
            pc: Range::new(self.pc_min, self.pc_max),
            isp_s: Range::new(self.isp_min, self.isp_max),
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> cea_analyzer::Result<()> {
    let cfg = match &args.config {
        Some(path) => config::load_or_default(path)?,
        None => config::load()?,
    };

    // -----------------------------------------------------------------------
    // Parse on a worker, report progress here
    // -----------------------------------------------------------------------
    let full = worker::spawn_parse(&args.report).wait(|p| tracing::debug!(progress = p, "parsing"))?;
    if full.is_empty() {
        println!("No complete CASE blocks found in {}", args.report.display());
        return Ok(());
    }

    let filter = args.filter();
    let mut table = filter.apply(&full);
    if table.is_empty() {
        println!("No cases left after filtering ({} parsed)", full.len());
        return Ok(());
    }

    // -----------------------------------------------------------------------
    // Size the system, resolving a missing expansion ratio once
    // -----------------------------------------------------------------------
    let system = compute_system_resolving(&mut table, args.expansion_ratio)?;
    let grids = build_sensitivity_grids(&table, &cfg);

    print_report(args, &cfg, &full, &table, &system, &grids);

    // -----------------------------------------------------------------------
    // Exports
    // -----------------------------------------------------------------------
    if let Some(path) = &args.csv {
        csv::write_case_table_file(path, &table)?;
        println!("Exported: {}", path.display());
    }
    if let Some(path) = &args.json {
        let summary = json::Summary::new(&cfg.pdf_report_title, &table, &system);
        json::write_summary_file(path, &summary)?;
        println!("Exported: {}", path.display());
    }

    Ok(())
}

fn print_report(
    args: &Args,
    cfg: &Config,
    full: &CaseTable,
    table: &CaseTable,
    system: &SystemResult,
    grids: &SensitivityGrid,
) {
    let rule = "  ──────────────────────────────────────────────────────────────────";

    println!();
    println!("====================================================================");
    println!("  {} — {}", cfg.pdf_report_title, args.report.display());
    println!("====================================================================");
    println!();

    println!("  Cases ({} of {} parsed)", table.len(), full.len());
    println!("{rule}");
    println!(
        "  {:>6}  {:>8}  {:>7}  {:>6}  {:>8}  {:>8}  {:>9}  {:>8}",
        "O/F", "Pc(bar)", "Pt/Pc", "Ae/At", "Tc(K)", "dH", "Isp(m/s)", "Isp(s)"
    );
    for r in table {
        println!(
            "  {:>6.3}  {:>8.2}  {:>7.4}  {:>6.2}  {:>8.1}  {:>8.1}  {:>9.1}  {:>8.2}",
            r.of,
            r.pc,
            r.pressure_ratio,
            r.expansion_ratio.unwrap_or(f64::NAN),
            r.t_chamber,
            r.delta_h,
            r.isp_ms,
            r.isp_s
        );
    }
    println!();

    println!("  Summary");
    println!("{rule}");
    println!("  {}", system.headline());
    println!();

    println!("  Nozzle & System");
    println!("{rule}");
    println!(
        "  At:            {:>12.6} m^2   Ae:           {:>12.6} m^2",
        system.throat_area, system.exit_area
    );
    println!(
        "  Expansion:     {:>12.2}       Throat r:     {:>12.4} m",
        system.expansion_ratio(),
        system.throat_radius()
    );
    println!(
        "  Mass flow:     {:>12.3} kg/s  Burn time:    {:>12.1} s",
        system.mass_flow, system.burn_time
    );
    println!(
        "  Delta-v:       {:>12.0} m/s   Throat Mach:  {:>12.3}",
        system.delta_v, system.throat_mach
    );
    println!();

    println!("  Thrust vs Altitude");
    println!("{rule}");
    println!("  {:>9}  {:>12}  {:>9}", "alt (m)", "thrust (N)", "Isp (s)");
    for ((h, f), isp) in system.sweep().zip(&system.effective_isp) {
        println!("  {:>9.0}  {:>12.1}  {:>9.1}", h, f, isp);
    }
    println!();

    println!(
        "  Optimization (degree = {}, interpolation = {})",
        cfg.regression_degree,
        grids.interpolation.name()
    );
    println!("{rule}");
    print_view("dIsp/d(O/F)", &grids.d_isp_d_of);
    print_view("dIsp/dPc", &grids.d_isp_d_pc);

    println!("  Recommendation");
    println!("{rule}");
    println!("  {}", system.recommendation());
    println!("====================================================================");
    println!();
}

fn print_view(name: &str, view: &GradientView) {
    match view {
        GradientView::Grid { pcs, ofs, values } => {
            print!("  {name:<13}");
            for of in ofs {
                print!("  {:>8.3}", of);
            }
            println!();
            for (i, pc) in pcs.iter().enumerate() {
                print!("  {:>9.2} bar", pc);
                for j in 0..ofs.len() {
                    print!("  {:>8.3}", values[(i, j)]);
                }
                println!();
            }
        }
        GradientView::Line { axis, values } => {
            println!("  {name} (1-D)");
            for (x, v) in axis.iter().zip(values) {
                println!("  {:>9.3}  {:>9.3}", x, v);
            }
        }
    }
    println!();
}
