use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

mod cli;
mod config;

use cli::Cli;
use cli::commands::{Commands, OutputFormat};
use config::Config;
use noticeq::RulesPolicy;
use noticeq::simulate::{self, EventKind, Scenario, Simulation};

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("noticeq")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("noticeq.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Simulate {
            scenario,
            format,
            save_pending,
        } => handle_simulate_command(scenario, *format, save_pending.as_deref(), config),
        Commands::CheckConfig => handle_check_config_command(config),
    }
}

fn handle_simulate_command(
    scenario_path: &Path,
    format: OutputFormat,
    save_pending: Option<&Path>,
    config: &Config,
) -> Result<()> {
    info!("Simulating scenario: {}", scenario_path.display());
    let scenario = Scenario::load(scenario_path)
        .context(format!("Failed to load scenario {}", scenario_path.display()))?;
    let policy = RulesPolicy::from_config(&config.policy);
    let simulation = simulate::run(&scenario, policy).context("Simulation failed")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&simulation)?),
        OutputFormat::Text => print_timeline(&simulation),
    }

    if let Some(path) = save_pending {
        let json = serde_json::to_string_pretty(&simulation.pending)?;
        fs::write(path, json).context(format!("Failed to write {}", path.display()))?;
        info!("Saved {} pending notices to {}", simulation.pending.len(), path.display());
        println!("{} {}", "Saved pending:".green(), path.display());
    }
    Ok(())
}

fn print_timeline(simulation: &Simulation) {
    for event in &simulation.timeline {
        let when = format!("{:>7}ms", event.at_ms).dimmed();
        let step = format!("step {:>3}", event.step).dimmed();
        let what = match &event.kind {
            EventKind::Show { notice } => format!(
                "{} {} (priority {})",
                "show".green().bold(),
                notice.kind(),
                notice.priority()
            ),
            EventKind::Hide => "hide".red().to_string(),
            EventKind::Back { handled } => format!("{} handled={}", "back".yellow(), handled),
            EventKind::Pending { kinds } => format!("{} [{}]", "pending".cyan(), kinds.join(", ")),
        };
        println!("{} {} {}", when, step, what);
    }
    if !simulation.pending.is_empty() {
        println!("{} {}", "Still pending:".yellow(), simulation.pending.len());
    }
}

fn handle_check_config_command(config: &Config) -> Result<()> {
    info!("Checking configuration");
    config.validate()?;
    let policy = RulesPolicy::from_config(&config.policy);
    println!("{}", "Configuration OK".green());
    println!("{}", serde_yaml::to_string(config)?);
    println!("{} {}", "Parent kinds with child rules:".cyan(), policy.parent_count());
    Ok(())
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    setup_logging(cli.is_verbose()).context("Failed to setup logging")?;

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    run_application(&cli, &config).context("Application failed")?;

    Ok(())
}
