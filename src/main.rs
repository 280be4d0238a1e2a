//! Runbook - compile declarative runbooks into Ansible artifacts
//!
//! This is the main entry point for the runbook CLI.

mod cli;

use cli::commands::CommandContext;
use cli::{Cli, Commands};
use runbook::config::{Config, LogFormat, LoggingConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Load configuration
    let config = match Config::load(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            let code = e.exit_code();
            eprintln!("ERROR: {}", describe(&anyhow::Error::from(e)));
            std::process::exit(code);
        }
    };

    // Initialize logging based on verbosity and configuration
    init_logging(cli.verbosity(), &config.logging);

    if cli.verbosity() >= 2 {
        eprintln!("{}", runbook::version_info());
    }

    // Create command context
    let mut ctx = CommandContext::new(&cli, config);

    // Execute the appropriate command
    let result = match &cli.command {
        Commands::Generate(args) => args.execute(&mut ctx).await,
        Commands::Run(args) => args.execute(&mut ctx).await,
        Commands::Validate(args) => args.execute(&mut ctx).await,
        Commands::Completions(args) => Ok(args.execute()),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            ctx.output.error(&describe(&err));
            exit_code_for(&err)
        }
    };

    std::process::exit(exit_code);
}

/// Initialize logging based on verbosity level
fn init_logging(verbosity: u8, logging: &LoggingConfig) {
    let filter = match verbosity {
        0 => logging.level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    let registry = tracing_subscriber::registry().with(env_filter);

    match logging.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(verbosity >= 3)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

/// Exit status for a failed command
fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<runbook::error::Error>())
        .map_or(1, runbook::error::Error::exit_code)
}

/// One-line message for an error and the causes it doesn't already mention
fn describe(err: &anyhow::Error) -> String {
    let mut message = err.to_string();
    for cause in err.chain().skip(1) {
        let cause = cause.to_string();
        if !message.contains(&cause) {
            message.push_str(": ");
            message.push_str(&cause);
        }
    }
    message
}
