use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::io::Write;
use std::path::PathBuf;

use wgmesh::config_loader;
use wgmesh::orchestrator::{self, GenerateOptions, ReportFormat};

/// Generate WireGuard server and member configurations from a network description
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the network description YAML file
    #[arg(short, long, default_value = "server.yml")]
    config: PathBuf,

    /// Where to write the server configuration [default: /etc/wireguard/<tunnelInterface>.conf]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Render and print everything without writing the server configuration
    #[arg(long)]
    dry_run: bool,

    /// Format of the printed report
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    format: ReportFormat,

    /// Also print the server firewall script in multi-line form
    #[arg(long)]
    show_firewall: bool,

    /// Do not print the report
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Configuration file: {:?}", args.config);

    let spec = config_loader::load_config(&args.config).wrap_err("Failed to read config")?;

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| spec.default_output_path());

    let options = GenerateOptions {
        output_path,
        dry_run: args.dry_run,
    };
    let generated = orchestrator::generate(&spec, &options)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if args.show_firewall {
        match spec.firewall_plan() {
            Some(plan) => {
                writeln!(out, "Firewall")?;
                writeln!(out, "{}", plan.script())?;
            }
            None => info!("No routes configured; there is no firewall script to show"),
        }
    }

    if !args.quiet {
        orchestrator::write_report(&generated, args.format, &mut out)?;
    }
    out.flush()?;

    info!(
        "Generated configuration for {} members",
        generated.members.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(["wgmesh"]);

        assert_eq!(args.config, PathBuf::from("server.yml"));
        assert_eq!(args.output, None);
        assert_eq!(args.format, ReportFormat::Text);
        assert!(!args.dry_run);
    }

    #[test]
    fn test_cli_overrides() {
        let args = Args::parse_from([
            "wgmesh",
            "--config", "net.yaml",
            "--output", "/tmp/wg1.conf",
            "--dry-run",
            "--format", "json",
            "--show-firewall",
            "-q",
        ]);

        assert_eq!(args.config, PathBuf::from("net.yaml"));
        assert_eq!(args.output, Some(PathBuf::from("/tmp/wg1.conf")));
        assert_eq!(args.format, ReportFormat::Json);
        assert!(args.dry_run);
        assert!(args.show_firewall);
        assert!(args.quiet);
    }
}
