use clap::Parser;
use lute_bonds::prelude::*;
use lute_bonds::samples;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(version, about = "Perceive bonds, orders, and charges for a built-in molecule")]
struct Cli {
    /// Which molecule to run on
    #[arg(value_parser = clap::builder::PossibleValuesParser::new(samples::NAMES))]
    sample: String,
    /// Seed for the relaxation order
    #[arg(short, long, default_value_t = 0)]
    seed: u64,
    /// Skip bonds past an atom's neighbor limit instead of failing
    #[arg(short, long)]
    lenient: bool,
    /// Log the decisions being made
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let Some(mut mol) = samples::by_name(&cli.sample) else {
        eprintln!("unknown sample {:?}", cli.sample);
        std::process::exit(2);
    };
    let config = Config::new().with_seed(cli.seed);
    let report = match perceive_and_assign(&mut mol, cli.lenient, &config) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    let hybrid = hybridizations(&mol, &config);

    println!("atoms:");
    for atom in mol.atoms() {
        let a = &mol[atom];
        println!(
            "  {:>3} {:<4} charge {:>2}  {}",
            atom.index(),
            a.to_string(),
            a.charge,
            hybrid[atom.index()]
        );
    }
    println!("bonds:");
    for bond in mol.bonds() {
        let (a, b) = mol.endpoints(bond);
        println!(
            "  {:>3} {:>3}-{:<3} {:.3} Å  {}{}",
            bond.index(),
            a.index(),
            b.index(),
            mol.bond_length(bond),
            mol[bond],
            if mol[bond].fixed { ", final" } else { "" }
        );
    }
    println!(
        "{} relaxation rounds, {} groups, {} unresolved rings, {} warnings",
        report.rounds, report.groups, report.unresolved_rings, report.diagnostics
    );
}
