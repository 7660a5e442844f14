use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, Select, Text};
use skycast_core::{
    Config, Coordinate, Pipeline, StaticLocationService, fetcher_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather for your location, in the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and location settings.
    Configure,

    /// Resolve the stored location and show the forecast.
    Show {
        /// Also show the daily outlook (one sample per day).
        #[arg(long)]
        daily: bool,

        /// Keep the session open with toggle / refresh actions.
        #[arg(long)]
        interactive: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { daily, interactive } => show(daily, interactive).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Text::new("OpenWeather API key:")
        .with_help_message("Create one at https://home.openweathermap.org/api_keys")
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key.trim().to_string());

    let allow = Confirm::new("Allow skycast to use a stored location?")
        .with_default(true)
        .prompt()
        .context("Failed to read location consent")?;

    let coordinate = if allow {
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_help_message("Decimal degrees, e.g. 50.4501")
            .prompt()
            .context("Failed to read latitude")?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_help_message("Decimal degrees, e.g. 30.5234")
            .prompt()
            .context("Failed to read longitude")?;

        Some(Coordinate { latitude, longitude })
    } else {
        None
    };

    config.set_location(allow, coordinate);
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(daily: bool, interactive: bool) -> anyhow::Result<()> {
    let config = Config::load()?;

    let location = StaticLocationService::from_config(&config);
    let fetcher = fetcher_from_config(&config)?;
    let mut pipeline = Pipeline::new(Box::new(location), fetcher);

    if daily {
        pipeline.toggle_daily_view();
    }

    pipeline.refresh().await;

    if !interactive {
        if let Some(message) = pipeline.state().error_message() {
            anyhow::bail!("{message}");
        }
        render::state(pipeline.state());
        return Ok(());
    }

    render::state(pipeline.state());

    loop {
        let toggle_label = if pipeline.state().show_daily() {
            "Hide daily outlook"
        } else {
            "Show daily outlook"
        };

        let choice = Select::new("Next:", vec![toggle_label, "Refresh", "Quit"])
            .prompt()
            .context("Failed to read action")?;

        match choice {
            "Refresh" => pipeline.refresh().await,
            "Quit" => break,
            _ => {
                pipeline.toggle_daily_view();
            }
        }

        render::state(pipeline.state());
    }

    Ok(())
}
