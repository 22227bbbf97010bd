//! Command-line wireless interface reporter.
//!
//! With no argument, enumerates every local interface and prints a full
//! labeled report per wireless interface. With an interface name, prints
//! just that interface's wireless protocol name.

use clap::Parser;
use log::debug;

use iwrs::{InterfaceSurvey, QueryError, WirelessInfo};

#[derive(Parser, Debug)]
#[command(name = "iwrs")]
#[command(version)]
#[command(about = "Report wireless interface parameters and statistics")]
struct Args {
    /// Interface to probe; prints its wireless protocol name only
    interface: Option<String>,
}

pub fn run() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let wi = match WirelessInfo::new() {
        Ok(wi) => wi,
        Err(e) => {
            eprintln!("Failed to start: {e}");
            std::process::exit(1);
        }
    };

    match args.interface {
        Some(name) => print_protocol_name(&wi, &name),
        None => print_full_report(&wi),
    }
}

/// One-argument mode: just the protocol name, as a probe.
fn print_protocol_name(wi: &WirelessInfo, name: &str) -> anyhow::Result<()> {
    match wi.protocol_name(name) {
        Ok(protocol) => {
            println!("{protocol}");
            Ok(())
        }
        Err(QueryError::NotWireless) => {
            eprintln!("{name}: no wireless extensions");
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

/// No-argument mode: report every interface, separated by `========`.
fn print_full_report(wi: &WirelessInfo) -> anyhow::Result<()> {
    let surveys = wi.survey_all()?;
    debug!("surveyed {} interfaces", surveys.len());

    for survey in surveys {
        match survey {
            InterfaceSurvey::Wireless(report) => println!("{report}"),
            InterfaceSurvey::NotWireless { name } => {
                println!("interface {name} is not wireless");
            }
        }
        println!("========");
    }
    Ok(())
}
