//! netsketch - build and compare stochastic Petri net sketches
//!
//! Reads a file of one-line net fragments, prints the resulting net and
//! optionally compares it with another sketch.
//!
//! # Usage
//!
//! ```bash
//! netsketch model.pns --accepting
//! NETSKETCH_LOG=debug netsketch model.pns --compare expected.pns
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::info;
use petri_sketch::{
    compare::{self, CompareConfig},
    error::Result,
    net::{Marking, StochasticNet},
    Session,
};

/// Stochastic Petri net sketch tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the fragment file, one fragment per line
    #[arg(value_name = "FRAGMENT_FILE")]
    fragment_file: PathBuf,

    /// Net label (defaults to the file stem)
    #[arg(short, long)]
    label: Option<String>,

    /// Derive and print initial and final markings
    #[arg(short, long)]
    accepting: bool,

    /// Fragment file of a net to compare against
    #[arg(short, long, value_name = "OTHER_FILE")]
    compare: Option<PathBuf>,

    /// Absolute tolerance for transition weights when comparing
    #[arg(long, default_value_t = 1e-4)]
    tolerance: f64,
}

fn main() -> Result<ExitCode> {
    if std::env::var("NETSKETCH_LOG").is_ok() {
        let env = env_logger::Env::new()
            .filter("NETSKETCH_LOG")
            .write_style("NETSKETCH_LOG_STYLE");
        env_logger::init_from_env(env);
    }

    let args = Args::parse();

    let label = args
        .label
        .clone()
        .unwrap_or_else(|| file_label(&args.fragment_file));
    let session = load(&args.fragment_file, label)?;
    println!("{}", session.net());

    if args.accepting {
        let accepting = session.accepting_net();
        println!(
            "Initial marking: {}",
            marking_labels(accepting.net(), accepting.initial_marking())
        );
        for marking in accepting.final_markings() {
            println!("Final marking: {}", marking_labels(accepting.net(), marking));
        }
    }

    if let Some(other_path) = &args.compare {
        let other = load(other_path, file_label(other_path))?;
        let config = CompareConfig::new().with_weight_tolerance(args.tolerance);
        let equal = compare::equal_with_dupes_with(
            session.net(),
            other.net(),
            session.identities(),
            other.identities(),
            &config,
        )?;
        if equal {
            println!("equal");
        } else {
            println!("not equal");
            return Ok(ExitCode::FAILURE);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn load(path: &Path, label: String) -> Result<Session> {
    let mut session = Session::new(label);
    session.add_fragment_file(path)?;
    info!(
        "loaded {}: {} places, {} transitions, {} arcs",
        path.display(),
        session.net().place_count(),
        session.net().transition_count(),
        session.net().arc_count()
    );
    Ok(session)
}

fn file_label(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "net".to_string())
}

fn marking_labels(net: &StochasticNet, marking: &Marking) -> String {
    let labels: Vec<&str> = marking
        .places()
        .filter_map(|place| net.place(place).map(|p| p.label.as_str()))
        .collect();
    format!("[{}]", labels.join(", "))
}
