//! Box audit example
//!
//! Replays a box audit from a series of ONT listing snapshots. Snapshot N is
//! the listing taken after disconnecting the drop cable of port N; the first
//! file is the listing before any cable was touched.
//!
//! Every detected client is confirmed and every unchanged port is marked
//! vacant, so the output is the ledger a technician would end up with.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example box_audit -- start.txt port1.txt port2.txt
//! cargo run --example box_audit -- --ports 8 --json start.txt port1.txt
//! ```

use std::env;
use std::fs;
use std::path::PathBuf;

use ontkit::audit::{AuditSessionBuilder, Comparison, LogNotifier};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if args.snapshots.len() < 2 {
        eprintln!("Error: need at least two snapshots (before and after port 1)");
        std::process::exit(1);
    }

    let mut session = AuditSessionBuilder::new()
        .port_count(args.ports)
        .build(LogNotifier)?;

    let tables = args
        .snapshots
        .iter()
        .map(fs::read_to_string)
        .collect::<Result<Vec<_>, _>>()?;

    for pair in tables.windows(2) {
        session.set_before_table(pair[0].as_str())?;
        session.set_after_table(pair[1].as_str());

        match session.compare_tables() {
            Ok(Comparison::Difference(port)) => {
                session.mark_confirmed(port)?;
            }
            Ok(Comparison::VacantPort(port)) => {
                session.mark_vacant(port)?;
            }
            Ok(Comparison::NewAuditStarted) => {
                println!("Audit already complete, stopping.");
                break;
            }
            Err(err) => {
                // Already reported through the notifier; keep going.
                eprintln!("Skipping snapshot pair: {}", err);
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&session.view())?);
    } else {
        println!("{}", session.view());
        println!("{}", session.offline_view());
    }

    Ok(())
}

struct Args {
    ports: u32,
    json: bool,
    snapshots: Vec<PathBuf>,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut ports = 16u32;
        let mut json = false;
        let mut snapshots = Vec::new();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--ports" | "-n" => {
                    i += 1;
                    if i < args.len() {
                        ports = args[i].parse().unwrap_or(16);
                    }
                }
                "--json" => {
                    json = true;
                }
                "--help" => {
                    print_help();
                    std::process::exit(0);
                }
                path => {
                    snapshots.push(PathBuf::from(path));
                }
            }
            i += 1;
        }

        Self {
            ports,
            json,
            snapshots,
        }
    }
}

fn print_help() {
    println!("Box audit example");
    println!();
    println!("Usage: box_audit [OPTIONS] SNAPSHOT...");
    println!();
    println!("Options:");
    println!("  -n, --ports <N>    Ports in the box [default: 16]");
    println!("      --json         Print the ledger as JSON");
    println!("      --help         Print help");
}
