use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use tokio::runtime::Runtime;

mod cli;

use artifact_publisher::config::{PublishContext, S3Options};
use artifact_publisher::constants::EXIT_CODE_CANCELLED;
use artifact_publisher::credentials::EnvCredentialProvider;
use artifact_publisher::error::PublishError;
use artifact_publisher::publisher::{Publisher, S3Publisher};
use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    initialize_logging(args.verbose)?;

    if args.name.is_some() && args.files.len() > 1 {
        bail!("--name can only be used when publishing a single file");
    }

    let context = PublishContext::new();
    let runtime = Runtime::new().context("Failed to create Tokio runtime")?;

    match runtime.block_on(publish_artifacts(&args, context)) {
        Ok(()) => Ok(()),
        Err(error) if error.is_cancelled() => {
            warn!("Publish session cancelled");
            std::process::exit(EXIT_CODE_CANCELLED);
        }
        Err(error) => Err(error.into()),
    }
}

fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")?;
    Ok(())
}

async fn publish_artifacts(
    args: &Args,
    context: PublishContext,
) -> std::result::Result<(), PublishError> {
    // Ctrl-C cancels the whole session; in-flight uploads abort promptly.
    let signal_context = context.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Cancellation requested, aborting in-flight uploads");
            signal_context.cancel();
        }
    });

    let mut options = S3Options::new(&args.bucket);
    options.acl = args.acl.clone();
    options.storage_class = args.storage_class.clone();
    options.region = args.region.clone();

    let publisher = S3Publisher::new(context, options, &EnvCredentialProvider)?;
    info!(
        "Publishing {} artifact(s) to {}",
        args.files.len(),
        publisher
    );

    for file in &args.files {
        let location = publisher.upload(file, args.name.as_deref()).await?;
        info!("Published {} to {}", file.display(), location);
    }

    Ok(())
}
