use clap::{Parser, Subcommand};
use expmodel_core::config::DisplayConfig;
use expmodel_core::export::{write_curve_csv, write_curve_csv_file};
use expmodel_core::*;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod menu;

#[derive(Parser)]
#[command(name = "expcalc")]
#[command(about = "Radioactive decay and Newton's law of cooling calculators", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Show the formula and intermediate steps
    #[arg(long, global = true)]
    explain: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive calculator menu (default)
    Menu,

    /// Solve a radioactive decay problem, N(t) = N0 * e^(-kt)
    Decay {
        #[command(subcommand)]
        op: DecayCommand,
    },

    /// Solve a Newton's law of cooling problem, T(t) = Ta + (T0 - Ta) * e^(-kt)
    Cooling {
        #[command(subcommand)]
        op: CoolingCommand,
    },

    /// Sample a model curve and write it as CSV
    Curve {
        #[command(subcommand)]
        model: CurveCommand,
    },
}

#[derive(Subcommand)]
enum DecayCommand {
    /// Final quantity N(t) from N0, k and t
    FinalQuantity {
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        n0: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        k: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        t: f64,
    },

    /// Initial quantity N0 from N(t), k and t
    InitialQuantity {
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        nf: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        k: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        t: f64,
    },

    /// Elapsed time t from N0, N(t) and k
    Time {
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        n0: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        nf: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        k: f64,
    },

    /// Decay constant k from N0, N(t) and t
    Constant {
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        n0: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        nf: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        t: f64,
    },

    /// Half-life T_half from k
    HalfLife {
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        k: f64,
    },

    /// Decay constant k from the half-life
    ConstantFromHalfLife {
        #[arg(long = "half-life", allow_negative_numbers = true, value_parser = finite)]
        half_life: f64,
    },
}

#[derive(Subcommand)]
enum CoolingCommand {
    /// Final temperature T(t) from Ta, T0, k and t
    FinalTemperature {
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        ta: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        t0: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        k: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        t: f64,
    },

    /// Initial temperature T0 from Ta, T(t), k and t
    InitialTemperature {
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        ta: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        tf: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        k: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        t: f64,
    },

    /// Ambient temperature Ta from T(t), T0, k and t
    AmbientTemperature {
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        tf: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        t0: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        k: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        t: f64,
    },

    /// Elapsed time t from Ta, T0, T(t) and k
    Time {
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        ta: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        t0: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        tf: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        k: f64,
    },

    /// Cooling constant k from Ta, T0, T(t) and t
    Constant {
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        ta: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        t0: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        tf: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        t: f64,
    },
}

#[derive(Subcommand)]
enum CurveCommand {
    /// Decay curve over [0, horizon_factor * t], highlighting t
    Decay {
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        n0: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        k: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        t: f64,

        /// Number of samples (defaults to the configured count)
        #[arg(long)]
        samples: Option<usize>,

        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Cooling curve over [0, horizon], highlighting t
    Cooling {
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        ta: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        t0: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        k: f64,
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        t: f64,

        /// End of the time axis (defaults to horizon_factor * t)
        #[arg(long, allow_negative_numbers = true, value_parser = finite)]
        horizon: Option<f64>,

        /// Number of samples (defaults to the configured count)
        #[arg(long)]
        samples: Option<usize>,

        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Numeric flags take finite numbers only, like the menu prompts
fn finite(text: &str) -> std::result::Result<f64, InputFormatError> {
    parse_value(text, "this flag")
}

fn main() -> ExitCode {
    // Initialize logging
    expmodel_core::logging::init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let output = Output {
        json: cli.json,
        explain: cli.explain,
        display: &config.display,
    };

    match cli.command {
        Some(Commands::Decay { op }) => {
            let (operation, knowns) = decay_query(op);
            output.solve(operation, &knowns)
        }
        Some(Commands::Cooling { op }) => {
            let (operation, knowns) = cooling_query(op);
            output.solve(operation, &knowns)
        }
        Some(Commands::Curve { model }) => cmd_curve(model, &config, cli.json),
        Some(Commands::Menu) | None => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            menu::Menu::new(stdin.lock(), stdout.lock(), config.display.clone()).run()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn decay_query(op: DecayCommand) -> (Operation, Knowns) {
    use Variable::*;
    let (operation, knowns) = match op {
        DecayCommand::FinalQuantity { n0, k, t } => (
            DecayOperation::FinalQuantity,
            Knowns::new()
                .with(InitialQuantity, n0)
                .with(DecayConstant, k)
                .with(ElapsedTime, t),
        ),
        DecayCommand::InitialQuantity { nf, k, t } => (
            DecayOperation::InitialQuantity,
            Knowns::new()
                .with(FinalQuantity, nf)
                .with(DecayConstant, k)
                .with(ElapsedTime, t),
        ),
        DecayCommand::Time { n0, nf, k } => (
            DecayOperation::ElapsedTime,
            Knowns::new()
                .with(InitialQuantity, n0)
                .with(FinalQuantity, nf)
                .with(DecayConstant, k),
        ),
        DecayCommand::Constant { n0, nf, t } => (
            DecayOperation::DecayConstant,
            Knowns::new()
                .with(InitialQuantity, n0)
                .with(FinalQuantity, nf)
                .with(ElapsedTime, t),
        ),
        DecayCommand::HalfLife { k } => (
            DecayOperation::HalfLife,
            Knowns::new().with(DecayConstant, k),
        ),
        DecayCommand::ConstantFromHalfLife { half_life } => (
            DecayOperation::DecayConstantFromHalfLife,
            Knowns::new().with(HalfLife, half_life),
        ),
    };
    (operation.into(), knowns)
}

fn cooling_query(op: CoolingCommand) -> (Operation, Knowns) {
    use Variable::*;
    let (operation, knowns) = match op {
        CoolingCommand::FinalTemperature { ta, t0, k, t } => (
            CoolingOperation::FinalTemperature,
            Knowns::new()
                .with(AmbientTemperature, ta)
                .with(InitialTemperature, t0)
                .with(CoolingConstant, k)
                .with(ElapsedTime, t),
        ),
        CoolingCommand::InitialTemperature { ta, tf, k, t } => (
            CoolingOperation::InitialTemperature,
            Knowns::new()
                .with(AmbientTemperature, ta)
                .with(FinalTemperature, tf)
                .with(CoolingConstant, k)
                .with(ElapsedTime, t),
        ),
        CoolingCommand::AmbientTemperature { tf, t0, k, t } => (
            CoolingOperation::AmbientTemperature,
            Knowns::new()
                .with(FinalTemperature, tf)
                .with(InitialTemperature, t0)
                .with(CoolingConstant, k)
                .with(ElapsedTime, t),
        ),
        CoolingCommand::Time { ta, t0, tf, k } => (
            CoolingOperation::ElapsedTime,
            Knowns::new()
                .with(AmbientTemperature, ta)
                .with(InitialTemperature, t0)
                .with(FinalTemperature, tf)
                .with(CoolingConstant, k),
        ),
        CoolingCommand::Constant { ta, t0, tf, t } => (
            CoolingOperation::CoolingConstant,
            Knowns::new()
                .with(AmbientTemperature, ta)
                .with(InitialTemperature, t0)
                .with(FinalTemperature, tf)
                .with(ElapsedTime, t),
        ),
    };
    (operation.into(), knowns)
}

/// How one-shot results are rendered
struct Output<'a> {
    json: bool,
    explain: bool,
    display: &'a DisplayConfig,
}

impl Output<'_> {
    /// Solve and print; domain errors are reported and exit with status 1
    fn solve(&self, operation: Operation, knowns: &Knowns) -> Result<ExitCode> {
        match operation.solve(knowns) {
            Ok(solution) => {
                if self.json {
                    self.print_json(operation, knowns, &solution)?;
                } else {
                    self.print_text(operation, knowns, &solution);
                }
                Ok(ExitCode::SUCCESS)
            }
            Err(Error::Domain(err)) => {
                tracing::debug!("Rejected {:?}: {}", operation, err);
                if self.json {
                    let report = serde_json::json!({
                        "error": err.to_string(),
                        "field": err.field,
                    });
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    eprintln!("Error: {}", err);
                }
                Ok(ExitCode::FAILURE)
            }
            Err(e) => Err(e),
        }
    }

    fn print_text(&self, operation: Operation, knowns: &Knowns, solution: &Solution) {
        if self.explain {
            println!("Formula: {}", operation.formula());
            for line in explain_steps(operation, knowns, self.display) {
                println!("{}", line);
            }
            println!();
        }
        println!("Result: {}", solution.format(self.display));
    }

    fn print_json(&self, operation: Operation, knowns: &Knowns, solution: &Solution) -> Result<()> {
        let mut report = serde_json::to_value(solution)?;
        if self.explain {
            report["formula"] = operation.formula().into();
            if let Some(steps) = breakdown_json(operation, knowns)? {
                report["breakdown"] = steps;
            }
        }
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }
}

/// Step-by-step lines for the forward evaluations
fn explain_steps(operation: Operation, knowns: &Knowns, display: &DisplayConfig) -> Vec<String> {
    use Variable::*;
    let places = display.value_decimals;
    let rate_places = display.rate_decimals;

    let lookup = |v| knowns.get(v).ok();
    match operation {
        Operation::Decay(DecayOperation::FinalQuantity) => {
            let (Some(n0), Some(k), Some(t)) =
                (lookup(InitialQuantity), lookup(DecayConstant), lookup(ElapsedTime))
            else {
                return Vec::new();
            };
            let steps = decay::breakdown(n0, k, t);
            vec![
                format!(
                    "Step 1: exponent -k*t = -({:.*}) * {:.*} = {:.*}",
                    rate_places, k, places, t, places, steps.exponent
                ),
                format!(
                    "Step 2: decay factor e^({:.*}) = {:.*}",
                    places, steps.exponent, rate_places, steps.decay_factor
                ),
                format!(
                    "Step 3: N(t) = {:.*} * {:.*} = {:.*}",
                    places, n0, rate_places, steps.decay_factor, places, steps.final_quantity
                ),
            ]
        }
        Operation::Cooling(CoolingOperation::FinalTemperature) => {
            let (Some(ta), Some(t0), Some(k), Some(t)) = (
                lookup(AmbientTemperature),
                lookup(InitialTemperature),
                lookup(CoolingConstant),
                lookup(ElapsedTime),
            ) else {
                return Vec::new();
            };
            let steps = cooling::breakdown(ta, t0, k, t);
            vec![
                format!(
                    "Step 1: initial difference T0 - Ta = {:.*} - {:.*} = {:.*}",
                    places, t0, places, ta, places, steps.initial_difference
                ),
                format!(
                    "Step 2: exponent -k*t = -({:.*}) * {:.*} = {:.*}",
                    rate_places, k, places, t, places, steps.exponent
                ),
                format!(
                    "Step 3: decay factor e^({:.*}) = {:.*}",
                    places, steps.exponent, rate_places, steps.decay_factor
                ),
                format!(
                    "Step 4: T(t) = {:.*} + {:.*} * {:.*} = {:.*}",
                    places,
                    ta,
                    places,
                    steps.initial_difference,
                    rate_places,
                    steps.decay_factor,
                    places,
                    steps.final_temperature
                ),
            ]
        }
        _ => Vec::new(),
    }
}

fn breakdown_json(operation: Operation, knowns: &Knowns) -> Result<Option<serde_json::Value>> {
    use Variable::*;
    let value = match operation {
        Operation::Decay(DecayOperation::FinalQuantity) => serde_json::to_value(decay::breakdown(
            knowns.get(InitialQuantity)?,
            knowns.get(DecayConstant)?,
            knowns.get(ElapsedTime)?,
        ))?,
        Operation::Cooling(CoolingOperation::FinalTemperature) => {
            serde_json::to_value(cooling::breakdown(
                knowns.get(AmbientTemperature)?,
                knowns.get(InitialTemperature)?,
                knowns.get(CoolingConstant)?,
                knowns.get(ElapsedTime)?,
            ))?
        }
        _ => return Ok(None),
    };
    Ok(Some(value))
}

fn cmd_curve(model: CurveCommand, config: &Config, json: bool) -> Result<ExitCode> {
    let factor = config.curve.horizon_factor;
    let (curve, highlight_at, output) = match model {
        CurveCommand::Decay {
            n0,
            k,
            t,
            samples,
            output,
        } => {
            let samples = samples.unwrap_or(config.curve.samples);
            (Curve::decay_over(n0, k, t, factor, samples), t, output)
        }
        CurveCommand::Cooling {
            ta,
            t0,
            k,
            t,
            horizon,
            samples,
            output,
        } => {
            let samples = samples.unwrap_or(config.curve.samples);
            let horizon = horizon.unwrap_or(t * factor);
            (Curve::cooling(ta, t0, k, horizon, samples), t, output)
        }
    };

    let curve = match curve {
        Ok(curve) => curve,
        Err(err) => {
            eprintln!("Error: cannot plot the curve: {}", err);
            return Ok(ExitCode::FAILURE);
        }
    };

    match output {
        Some(path) => write_to_file(&curve, highlight_at, &path, json)?,
        None => {
            write_curve_csv(&curve, highlight_at, io::stdout().lock())?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn write_to_file(curve: &Curve, highlight_at: f64, path: &Path, json: bool) -> Result<()> {
    let count = write_curve_csv_file(curve, highlight_at, path)?;
    if json {
        let report = serde_json::json!({
            "samples": count,
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("✓ Wrote {} samples", count);
        println!("  CSV: {}", path.display());
    }
    Ok(())
}
