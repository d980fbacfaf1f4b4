use colored::Colorize;
use commands::command_argument_builder;
use siteprobe::handlers::{RunArgs, handle_run};
use siteprobe_core::print_banner;
use tracing_subscriber::EnvFilter;

mod commands;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = command_argument_builder().get_matches();
    let args = RunArgs::from_matches(&matches);

    // Show banner unless --quiet flag is set
    if !args.quiet {
        print_banner();
    }

    match handle_run(&args).await {
        Ok(summary) => {
            if !args.quiet {
                eprintln!(
                    "\n{} {} file(s) written to {}, {} skipped",
                    "✓".green(),
                    summary.files.len(),
                    summary.output_dir.display(),
                    summary.failures.len()
                );
            }
        }
        Err(e) => {
            eprintln!("{} {:#}", "✗".red(), e);
            std::process::exit(1);
        }
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
