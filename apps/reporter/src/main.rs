use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{
    config::{load_settings, load_settings_from},
    BinaryAsset, LocationProvider, SensorLocationProvider, StaticPositionSensor, SubmissionInput,
    SubmissionWorkflow, SubmitOutcome,
};
use shared::domain::GeoPosition;
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Parser, Debug)]
#[command(about = "File a grievance report and browse recent reports")]
struct Cli {
    /// TOML file holding upload_endpoint, process_endpoint and feed_endpoint
    /// (defaults to reporter.toml in the working directory).
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a photo with a voice note and/or a written description.
    Submit {
        #[arg(long)]
        image: Option<PathBuf>,
        #[arg(long)]
        audio: Option<PathBuf>,
        #[arg(long, default_value = "")]
        text: String,
        /// Device latitude; without --lat/--lng no position is available.
        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,
    },
    /// Show the most recent reports.
    Feed,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => load_settings_from(path, |key| std::env::var(key).ok()),
        None => load_settings(),
    };
    let config = settings.into_config()?;
    tracing::debug!(?config, "reporter: endpoints resolved");

    match cli.command {
        Command::Feed => {
            let workflow =
                SubmissionWorkflow::new(&config, Arc::new(SensorLocationProvider::unsupported()));
            let renderer = render::spawn_renderer(workflow.subscribe());
            workflow.load_feed().await;
            drop(workflow);
            renderer.await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Submit {
            image,
            audio,
            text,
            lat,
            lng,
        } => {
            let location: Arc<dyn LocationProvider> = match lat.zip(lng) {
                Some((lat, lng)) => Arc::new(SensorLocationProvider::new(Arc::new(
                    StaticPositionSensor::new(Some(GeoPosition::new(lat, lng))),
                ))),
                None => Arc::new(SensorLocationProvider::unsupported()),
            };

            let input = SubmissionInput {
                image: match image {
                    Some(path) => Some(BinaryAsset::from_path(&path).await?),
                    None => None,
                },
                audio: match audio {
                    Some(path) => Some(BinaryAsset::from_path(&path).await?),
                    None => None,
                },
                text_description: text,
            };

            let workflow = SubmissionWorkflow::new(&config, location);
            let renderer = render::spawn_renderer(workflow.subscribe());
            let outcome = workflow.submit(input).await;
            drop(workflow);
            renderer.await?;

            Ok(match outcome {
                SubmitOutcome::Succeeded(_) => ExitCode::SUCCESS,
                SubmitOutcome::Failed(_) | SubmitOutcome::Ignored => ExitCode::FAILURE,
            })
        }
    }
}
