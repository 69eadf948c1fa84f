//! Registry Check CLI
//!
//! Validates the registry document against its schema and probes every
//! installer download link.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use registry_check::{
    CheckConfig, HttpProbe, LinkCheck, LinkOutcome, Pipeline, ReachabilityReport, SchemaReport,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "registry-check")]
#[command(about = "Validate a package-installer registry")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Schema document (overrides config)
    #[arg(long, global = true)]
    schema: Option<PathBuf>,

    /// Registry document (overrides config)
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the registry against its schema
    Schema,

    /// Check that every download link is reachable
    Links {
        /// Skip network checks
        #[arg(long)]
        short: bool,
    },

    /// Run the schema and link checks
    All {
        /// Skip network checks
        #[arg(long)]
        short: bool,
        /// Write a JSON report to this file
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Print the effective configuration
    Config {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut config = CheckConfig::load_from(cli.config.as_deref())?;
    if let Some(schema) = cli.schema {
        config.paths.schema = schema;
    }
    if let Some(registry) = cli.registry {
        config.paths.registry = registry;
    }

    match cli.command {
        Commands::Schema => {
            let report = Pipeline::new(&config).run_schema()?;
            print_schema(&report);
            Ok(report.valid)
        }

        Commands::Links { short } => {
            config.reachability.short |= short;
            let probe = HttpProbe::new(&config.reachability.user_agent)?;
            let report = Pipeline::new(&config).run_reachability(&probe)?;
            print_reachability(&report);
            Ok(report.passed())
        }

        Commands::All { short, report } => {
            config.reachability.short |= short;
            let probe = HttpProbe::new(&config.reachability.user_agent)?;
            let result = Pipeline::new(&config).run(&probe)?;

            print_schema(&result.schema);
            println!();
            print_reachability(&result.reachability);

            if let Some(path) = report {
                let json = serde_json::to_string_pretty(&result)?;
                std::fs::write(&path, json)
                    .with_context(|| format!("writing report to {}", path.display()))?;
                println!("✅ Report written to {:?}", path);
            }

            Ok(result.passed())
        }

        Commands::Config { output } => {
            match output {
                Some(path) => {
                    config
                        .save(&path)
                        .with_context(|| format!("writing config to {}", path))?;
                    println!("✅ Configuration written to {}", path);
                }
                None => print!("{}", config.to_toml()?),
            }
            Ok(true)
        }
    }
}

fn print_schema(report: &SchemaReport) {
    if report.valid {
        println!("✅ Registry conforms to schema");
        return;
    }

    println!("❌ Registry violates schema ({} errors)", report.errors.len());
    for error in &report.errors {
        println!("   └─ {}", error);
    }
}

fn print_reachability(report: &ReachabilityReport) {
    if report.skipped_run {
        println!("⏭️  Link check skipped (short mode)");
        return;
    }

    let failures: Vec<&LinkCheck> = report.failures().collect();
    if failures.is_empty() {
        println!(
            "✅ All {} links reachable ({} architectures without builds)",
            report.passed_count(),
            report.skipped_count()
        );
        return;
    }

    println!("❌ {} broken link(s):", failures.len());
    for link in failures {
        if let LinkOutcome::Failed(reason) = &link.outcome {
            println!("   {} ({}): {}, {}", link.package, link.arch, link.url, reason);
        }
    }
}
