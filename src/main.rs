//! DNS RTT Plotter - Main CLI Application
//!
//! Aggregates DNS benchmark result files and renders RTT comparison charts.

use clap::Parser;
use dns_rtt_plotter::{
    app::App,
    cli::Cli,
    config::parser::load_config,
    error::{AppError, ErrorReporter, Result},
    PKG_NAME, VERSION,
};
use std::process;

fn main() {
    // Set up better panic handling
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        eprintln!("Please report this issue with the command line that triggered it.");
        process::exit(99);
    }));

    let cli = Cli::parse();

    if cli.should_show_topic_help() {
        println!("{}", cli.display_help());
        return;
    }

    let reporter = ErrorReporter::new(cli.use_colors(), cli.verbose || cli.debug);

    if let Err(e) = run_application(cli) {
        reporter.report_error(&e);
        print_error_suggestions(&e);
        process::exit(e.exit_code());
    }
}

/// Main application logic
fn run_application(cli: Cli) -> Result<()> {
    if cli.debug {
        eprintln!("{} v{}", PKG_NAME, VERSION);
        eprintln!(
            "Built {} (commit {})",
            option_env!("BUILD_TIME").unwrap_or("unknown"),
            option_env!("GIT_COMMIT").unwrap_or("unknown")
        );
        eprintln!("Debug mode enabled");
        eprintln!();
    }

    let config = load_config(cli)?;
    let report = App::new(config).run()?;

    if report.files == 0 {
        return Err(AppError::missing_data("No result files were processed"));
    }

    Ok(())
}

/// Print helpful suggestions for common errors
fn print_error_suggestions(error: &AppError) {
    match error {
        AppError::Config(_) => {
            eprintln!();
            eprintln!("Configuration help:");
            eprintln!("  - Check your .env file format (see --help-topic config)");
            eprintln!("  - --subdir must be a single directory name");
        }
        AppError::MissingData(_) => {
            eprintln!();
            eprintln!("Input help:");
            eprintln!("  - Result files must sit below a directory named like --subdir");
            eprintln!("  - Pass --allow-partial to chart protocols without results as gaps");
        }
        AppError::Validation(_) => {
            eprintln!();
            eprintln!("Input help:");
            eprintln!("  - Every result path needs a test1..test8 component");
            eprintln!("  - With --resolvers, every command line must name one of them");
        }
        _ => {}
    }
}
