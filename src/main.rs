use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use x_media_poster::config::{self, DEFAULT_CONFIG_PATH};
use x_media_poster::platform::x::XClient;
use x_media_poster::poster::{self, PostPlan, PublishOptions};
use x_media_poster::reduced::ReducedInput;

#[derive(Parser, Debug)]
#[command(name = "x-media-poster", version)]
#[command(about = "Post an image set or a video preview to X (Twitter)", long_about = None)]
struct Cli {
    /// Configuration file (JSON, or TOML when the name ends in .toml)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Take the post text from TWEET_TEXT and a single image from IMAGE_PATH;
    /// only the credentials are read from the configuration file
    #[arg(long)]
    from_env: bool,

    /// Look up the account handle for the post URL instead of using "user"
    #[arg(long)]
    resolve_handle: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("✗ {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let rule = "=".repeat(50);
    println!("{rule}");
    println!("X (Twitter) Image/Video Poster");
    println!("{rule}");

    let config = config::load_config(&cli.config)?;

    let plan = if cli.from_env {
        ReducedInput::from_lookup(|key| std::env::var(key).ok())
            .context("Invalid reduced-mode input")?
            .into_plan()
    } else {
        PostPlan::from_config(&config)
    };

    println!("\nPosting to X...");
    println!("{}", "-".repeat(50));

    let client = XClient::authenticate(&config.credentials).context("Error posting tweet")?;
    let options = PublishOptions {
        resolve_handle: cli.resolve_handle,
    };
    poster::publish(&plan, &client, &options)
        .await
        .context("Error posting tweet")?;

    println!("{}", "-".repeat(50));
    println!("\n✓ All done!");
    Ok(())
}
