use clap::{Parser, Subcommand, ValueEnum};
use hz_core::units::{k, kpa, to_kg_per_m3, to_kpa};
use hz_eos::{CriticalConstants, HelmholtzEos, IdealPart, VanDerWaals};
use hz_solve::{
    HelmholtzSolver, Phase, Request, SolverConfig, SweepDefinition, SweepType, saturation_curve,
};
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Eos(#[from] hz_eos::EosError),

    #[error(transparent)]
    Solve(#[from] hz_solve::SolveError),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "hz-cli")]
#[command(about = "Helmholtz fluid density and saturation solver", long_about = None)]
struct Cli {
    /// YAML file with fluid constants and solver settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum PhaseArg {
    Liquid,
    Vapor,
}

impl From<PhaseArg> for Phase {
    fn from(p: PhaseArg) -> Self {
        match p {
            PhaseArg::Liquid => Phase::Liquid,
            PhaseArg::Vapor => Phase::Vapor,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Density on one phase branch at given pressure and temperature
    Density {
        #[arg(long, value_enum, default_value = "liquid")]
        phase: PhaseArg,
        /// Pressure in kPa
        #[arg(long)]
        pressure: f64,
        /// Temperature in K
        #[arg(long)]
        temperature: f64,
        /// Also print sensitivities dδ/dp and dδ/dτ
        #[arg(long)]
        gradient: bool,
    },
    /// Coexisting densities and vapor pressure at a temperature
    Saturation {
        /// Temperature in K
        #[arg(long)]
        temperature: f64,
    },
    /// Saturation curve over a temperature range
    Curve {
        /// Start temperature in K
        #[arg(long)]
        from: f64,
        /// End temperature in K
        #[arg(long)]
        to: f64,
        #[arg(long, default_value_t = 10)]
        points: usize,
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

/// Contents of the `--config` file. Every field is optional.
#[derive(serde::Deserialize, Default)]
#[serde(default)]
struct CliConfig {
    critical: Option<CriticalConstants>,
    ideal: Option<IdealPart>,
    solver: SolverConfig,
}

fn load_config(path: Option<&Path>) -> CliResult<CliConfig> {
    let Some(path) = path else {
        return Ok(CliConfig::default());
    };
    let content = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}

fn build_solver(cfg: CliConfig) -> CliResult<HelmholtzSolver<VanDerWaals>> {
    let constants = cfg.critical.unwrap_or_else(CriticalConstants::water);
    let eos = VanDerWaals::new(constants, cfg.ideal.unwrap_or_default())?;
    tracing::debug!(model = eos.name(), ?constants, "solver ready");
    Ok(HelmholtzSolver::new(eos, cfg.solver)?)
}

fn main() -> CliResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let solver = build_solver(load_config(cli.config.as_deref())?)?;

    match cli.command {
        Commands::Density {
            phase,
            pressure,
            temperature,
            gradient,
        } => cmd_density(&solver, phase.into(), pressure, temperature, gradient),
        Commands::Saturation { temperature } => cmd_saturation(&solver, temperature),
        Commands::Curve {
            from,
            to,
            points,
            json,
        } => cmd_curve(&solver, from, to, points, json),
    }
}

fn cmd_density(
    solver: &HelmholtzSolver<VanDerWaals>,
    phase: Phase,
    pressure: f64,
    temperature: f64,
    gradient: bool,
) -> CliResult<()> {
    let rho = match phase {
        Phase::Liquid => solver.liquid_density(kpa(pressure), k(temperature))?,
        Phase::Vapor => solver.vapor_density(kpa(pressure), k(temperature))?,
    };
    println!(
        "{} density at {:.3} kPa, {:.3} K: {:.6} kg/m³",
        phase,
        pressure,
        temperature,
        to_kg_per_m3(rho)
    );

    if gradient {
        let tau = solver.eos().constants().tau(temperature);
        let sol = solver.delta_phase(phase, pressure, tau, Request::Gradient);
        if let Some([d_p, d_t]) = sol.grad {
            println!("  dδ/dp = {:.6e} 1/kPa", d_p);
            println!("  dδ/dτ = {:.6e}", d_t);
        }
    }
    Ok(())
}

fn cmd_saturation(solver: &HelmholtzSolver<VanDerWaals>, temperature: f64) -> CliResult<()> {
    let t = k(temperature);
    let (rho_l, rho_v) = solver.saturation_densities(t)?;
    let p = solver.saturation_pressure(t)?;
    println!("Saturation at {:.3} K", temperature);
    println!("  pressure:       {:.6} kPa", to_kpa(p));
    println!("  liquid density: {:.6} kg/m³", to_kg_per_m3(rho_l));
    println!("  vapor density:  {:.6} kg/m³", to_kg_per_m3(rho_v));
    Ok(())
}

fn cmd_curve(
    solver: &HelmholtzSolver<VanDerWaals>,
    from: f64,
    to: f64,
    points: usize,
    json: bool,
) -> CliResult<()> {
    let temps = SweepDefinition::new(from, to, points, SweepType::Linear)?.generate_points();
    let curve = saturation_curve(solver, &temps)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&curve)?);
        return Ok(());
    }

    println!(
        "{:>12} {:>14} {:>14} {:>14}",
        "T [K]", "p [kPa]", "rho_l", "rho_v"
    );
    for pt in &curve {
        println!(
            "{:>12.3} {:>14.6} {:>14.6} {:>14.6}",
            pt.temperature_k, pt.pressure_kpa, pt.rho_liq, pt.rho_vap
        );
    }
    let counts = solver.memo().stats().snapshot();
    tracing::info!(hits = counts.hits, misses = counts.misses, "memo traffic");
    Ok(())
}
