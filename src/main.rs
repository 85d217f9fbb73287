use std::process::ExitCode;

use clap::{Args as ClapArgs, Parser, Subcommand};
use num::complex::Complex64;
use sca::{
    evals, parse_root, parse_roots, phase, phased, zpk, LocusOptions, RootLocus, TransferFunction,
};

/// Tolerance below which imaginary coefficients are treated as rounding noise
const REAL_TOLERANCE: f64 = 1e-9;

/// Zero-pole-gain description of the open loop
#[derive(ClapArgs, Debug)]
struct System {
    /// Zeros, comma separated (e.g. `0,-1+2j,-1-2j`)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    zeros: Vec<String>,

    /// Poles, comma separated
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    poles: Vec<String>,

    /// Gain, real or complex
    #[arg(long, default_value = "1", allow_hyphen_values = true)]
    gain: String,

    /// Precision of the root finder
    #[arg(long, default_value_t = 1e-12)]
    precision: f64,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the transfer function, its coefficients, poles, zeros and DC gain
    Tf {
        #[command(flatten)]
        system: System,
    },
    /// Evaluate the transfer function at a complex frequency
    Eval {
        #[command(flatten)]
        system: System,

        /// Point to evaluate at (e.g. `0+1j`)
        #[arg(long, allow_hyphen_values = true)]
        at: String,
    },
    /// Closed-loop root locus of `1 + k G(s)`
    Locus {
        #[command(flatten)]
        system: System,

        #[arg(long, default_value_t = 1e-2)]
        min_gain: f64,

        #[arg(long, default_value_t = 1e3)]
        max_gain: f64,

        /// Number of logarithmically spaced gains
        #[arg(long, default_value_t = 32)]
        steps: usize,

        /// Seed of the root finder's perturbation
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

/// Zero-pole-gain transfer function toolkit
#[derive(Parser, Debug)]
#[command(version, about, long_about=None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

fn build(system: &System) -> sca::Result<TransferFunction<Complex64>> {
    let zeros = parse_roots(&system.zeros, "zeros")?;
    let poles = parse_roots(&system.poles, "poles")?;
    let gain = parse_root(&system.gain, "gain", None)?;

    log::debug!("zeros {zeros:?}, poles {poles:?}, gain {gain}");

    zpk(&zeros, &poles, gain)
}

fn format_roots(roots: &[Complex64]) -> String {
    roots
        .iter()
        .map(|r| format!("{:.6}{:+.6}j", r.re, r.im))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_tf(system: &System) -> sca::Result<()> {
    let g = build(system)?;

    match g.clone().into_real(REAL_TOLERANCE) {
        Ok(real) => {
            println!("{real}\n");
            println!("num: {:?}", real.num());
            println!("den: {:?}", real.den());
            println!("dc gain: {}", real.dcgain());
        }
        Err(e) => {
            log::info!("keeping complex coefficients: {e}");
            println!("{g}\n");
            println!("num: {:?}", g.num());
            println!("den: {:?}", g.den());
            println!("dc gain: {}", g.dcgain());
        }
    }

    println!("poles: [{}]", format_roots(&g.poles(system.precision)));
    println!("zeros: [{}]", format_roots(&g.zeros(system.precision)));

    Ok(())
}

fn print_eval(system: &System, at: &str) -> sca::Result<()> {
    let g = build(system)?;
    let s = parse_root(at, "at", None)?;
    let value = evals(&g, s);

    println!("G({s}) = {value}");
    println!("|G| = {}", value.norm());
    println!("phase = {} rad ({} deg)", phase(value), phased(value));

    Ok(())
}

fn print_locus(system: &System, options: &LocusOptions<f64>) -> sca::Result<()> {
    let g = build(system)?.into_real(REAL_TOLERANCE)?;
    let mut locus = RootLocus::from_transfer_function(&g)?;

    locus.calculate_all(options)?;

    for (gain, &step) in locus.get_gains() {
        let roots = locus.roots_at(step).unwrap_or_default();
        println!("k = {:<12.6e} [{}]", gain.0, format_roots(roots));
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    let result = match &args.command {
        Command::Tf { system } => print_tf(system),
        Command::Eval { system, at } => print_eval(system, at),
        Command::Locus {
            system,
            min_gain,
            max_gain,
            steps,
            seed,
        } => print_locus(
            system,
            &LocusOptions {
                precision: system.precision,
                min_gain: *min_gain,
                max_gain: *max_gain,
                steps: *steps,
                seed: *seed,
            },
        ),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
