//! TravelPlan CLI
//!
//! Serves the web UI and JSON API, or plans a single trip from the terminal.

#![allow(clippy::print_stdout)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use travelplan::config::TravelPlanConfig;
use travelplan::llm::{GeminiClient, TextGenerator};
use travelplan::models::TripRequest;
use travelplan::planner::ItineraryAssembler;
use travelplan::telemetry::init_logging;
use travelplan::weather::{OpenWeatherClient, WeatherProvider};

/// AI trip planner: weather, culture, flights, hotels and a day-by-day plan
#[derive(Parser)]
#[command(name = "travelplan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to the user config directory, then ./config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web UI and JSON API
    Serve {
        /// Port to listen on (overrides configuration)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Generate an itinerary and print it
    Plan {
        /// Destination city
        #[arg(short, long)]
        destination: String,

        /// Trip length in days
        #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
        days: i32,

        /// Travel month or season
        #[arg(short, long)]
        month: Option<String>,

        /// Free-text travel preferences
        #[arg(short, long)]
        preferences: Option<String>,

        /// Print the document as JSON instead of markdown
        #[arg(long)]
        json: bool,
    },

    /// Show current weather and the short forecast for a place
    Weather {
        /// City name
        #[arg(short, long)]
        location: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = TravelPlanConfig::load_from_path(cli.config)?;
    init_logging(&config.logging, cli.verbose)?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate_api_keys()?;
            let assembler = build_assembler(&config).await?;
            travelplan::web::run(&config.server, Arc::new(assembler)).await?;
        }
        Commands::Plan {
            destination,
            days,
            month,
            preferences,
            json,
        } => {
            let request = TripRequest::new(destination, days)
                .with_month(month)
                .with_preferences(preferences);
            request.validate()?;
            config.validate_api_keys()?;

            let assembler = build_assembler(&config).await?;
            let document = assembler.assemble_itinerary(&request).await?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&document)
                        .context("Failed to serialize itinerary")?
                );
            } else {
                println!("{document}");
            }
        }
        Commands::Weather { location } => {
            config.validate_weather_key()?;
            let client = OpenWeatherClient::new(config.weather.clone())?;
            let snapshot = client.get_weather(&location).await?;
            println!("{snapshot}");
        }
    }

    Ok(())
}

async fn build_assembler(config: &TravelPlanConfig) -> Result<ItineraryAssembler> {
    let weather = OpenWeatherClient::new(config.weather.clone())?;
    let mut generator = GeminiClient::new(config.llm.clone())?;

    if config.llm.auto_select_model {
        let model = generator.select_model().await?;
        generator = generator.with_model(model);
    }
    info!("Using model {}", generator.model());

    Ok(ItineraryAssembler::new(
        Arc::new(weather),
        Arc::new(generator),
        config.planner.clone(),
    ))
}
