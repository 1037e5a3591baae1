use std::error::Error;
use std::process::ExitCode;

use hyperpod_sim::io::{write_summary_file, write_telemetry_file, MissionSummary};
use hyperpod_sim::sim::MissionSequencer;
use hyperpod_sim::telemetry::{TelemetryRecord, TelemetrySink};
use hyperpod_sim::vehicle::{presets, MissionConfig};
use hyperpod_sim::{error, info, warn, MaglevError, MaglevResult, MissionStatus};

/// Console pacing when neither the config nor the command line sets one.
const DEFAULT_PACING_MS: u64 = 50;

#[derive(Debug, Default)]
struct Args {
    config: Option<String>,
    seed: Option<u64>,
    csv: Option<String>,
    summary: Option<String>,
    pacing_ms: Option<u64>,
}

fn parse_args() -> MaglevResult<Args> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(flag) = it.next() {
        let mut value = || {
            it.next()
                .ok_or_else(|| MaglevError::Config(format!("{flag} expects a value")))
        };
        match flag.as_str() {
            "--config" => args.config = Some(value()?),
            "--csv" => args.csv = Some(value()?),
            "--summary" => args.summary = Some(value()?),
            "--seed" => {
                let v = value()?;
                args.seed = Some(v.parse().map_err(|_| MaglevError::Config(format!("bad seed {v:?}")))?);
            }
            "--pacing-ms" => {
                let v = value()?;
                args.pacing_ms =
                    Some(v.parse().map_err(|_| MaglevError::Config(format!("bad pacing {v:?}")))?);
            }
            other => return Err(MaglevError::Config(format!("unknown argument {other:?}"))),
        }
    }
    Ok(args)
}

/// Prints sampled rows as a table and keeps them for the file writers.
#[derive(Default)]
struct ConsoleTable {
    rows: Vec<TelemetryRecord>,
}

impl TelemetrySink for ConsoleTable {
    fn record(&mut self, r: &TelemetryRecord) -> MaglevResult<()> {
        println!(
            "  {:<10.1} | {:<15.2} | {:<15.2} | {:<10}",
            r.time, r.speed_kmh, r.gap_mm, r.status
        );
        self.rows.push(*r);
        Ok(())
    }
}

/// Command line wins over the config file; the console default applies only
/// when neither sets a value.
fn resolve_pacing(cli: Option<u64>, config: Option<u64>) -> u64 {
    cli.or(config).unwrap_or(DEFAULT_PACING_MS)
}

fn print_header(config: &MissionConfig) {
    let lev = &config.levitation;
    let prop = &config.propulsion;
    println!();
    println!("====================================================================");
    println!("  MAGLEV POD MISSION — {}", config.name);
    println!("====================================================================");
    println!();
    println!("  Pod Parameters");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Target gap:    {:>8.1} mm    Max gap:      {:>8.1} mm",
        lev.target_gap, lev.max_gap
    );
    println!(
        "  PID gains:     kp={:.2} ki={:.2} kd={:.2}   Lift factor: {:.2}",
        lev.kp, lev.ki, lev.kd, lev.lift_factor
    );
    println!(
        "  Max thrust:    {:>8.0} N     Mass:         {:>8.0} kg",
        prop.max_thrust, prop.mass
    );
    println!(
        "  Drag coeff:    {:>8.3}       Sensor noise: {:>8.2} mm",
        prop.drag_coeff, config.sensor.noise_amplitude
    );
    println!(
        "  Timestep:      {:>8.2} s     Duration:     {:>8.1} s",
        config.dt,
        config.duration()
    );
    println!();
    println!("  Flight Profile");
    println!("  ──────────────────────────────────────────────────────────────────");
    for p in &config.phases {
        let friction = p.friction.map(|f| format!("   friction x{f:.2}/tick")).unwrap_or_default();
        println!("  {:<11} from t={:>5.1}s   throttle {:+.2}{}", p.phase, p.starts_at, p.throttle, friction);
    }
    println!();
    println!("  Telemetry (Ctrl-C aborts)");
    println!("  {}", "─".repeat(60));
    println!("  {:<10} | {:<15} | {:<15} | {:<10}", "TIME (s)", "SPEED (km/h)", "GAP (mm)", "STATUS");
    println!("  {}", "─".repeat(60));
}

async fn run() -> Result<MissionStatus, Box<dyn Error>> {
    let args = parse_args()?;
    let mut config = match &args.config {
        Some(path) => MissionConfig::from_file(path)?,
        None => presets::reference(),
    };
    if let Some(seed) = args.seed {
        config.sensor.seed = Some(seed);
    }
    config.realtime_pacing_ms = Some(resolve_pacing(args.pacing_ms, config.realtime_pacing_ms));

    let mut seq = MissionSequencer::from_config(&config)?;
    print_header(&config);

    let abort = seq.abort_handle();
    let mut mission = tokio::task::spawn_blocking(move || {
        let mut table = ConsoleTable::default();
        let outcome = seq.run_mission(&mut table);
        (table, outcome)
    });

    let joined = tokio::select! {
        joined = &mut mission => joined,
        Ok(()) = tokio::signal::ctrl_c() => {
            warn!("[SYS] Emergency shutdown requested");
            abort.cancel();
            mission.await
        }
    };
    let (table, outcome) = joined?;
    let outcome = outcome?;

    println!("  {}", "─".repeat(60));
    match outcome.status {
        MissionStatus::Complete => println!("  MISSION COMPLETE. POD STOPPED."),
        status => println!("  MISSION {status} at t={:.1}s. POD STOPPED.", outcome.final_time),
    }
    println!(
        "  Ticks: {}   Final speed: {:.2} km/h   Final gap: {:.2} mm",
        outcome.ticks_run, outcome.final_speed_kmh, outcome.final_gap_mm
    );
    println!("====================================================================");
    println!();

    if let Some(path) = &args.csv {
        write_telemetry_file(path, &table.rows)?;
        info!("[SYS] Telemetry written to {path}");
    }
    if let Some(path) = &args.summary {
        let summary =
            MissionSummary::from_telemetry(&config.name, config.levitation.target_gap, &outcome, &table.rows);
        write_summary_file(path, &summary)?;
        info!("[SYS] Summary written to {path}");
    }
    Ok(outcome.status)
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(MissionStatus::Complete) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(2),
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pacing_precedence() {
        assert_eq!(resolve_pacing(None, None), DEFAULT_PACING_MS);
        assert_eq!(resolve_pacing(None, Some(0)), 0);
        assert_eq!(resolve_pacing(None, Some(20)), 20);
        assert_eq!(resolve_pacing(Some(0), Some(20)), 0);
        assert_eq!(resolve_pacing(Some(5), None), 5);
    }
}
