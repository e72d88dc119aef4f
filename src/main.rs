//! CLI driver for `Meteostorico`
//!
//! Wires command-line arguments into the form controller and runs either the
//! chart pipeline (`fetch`) or the previous-year JSON export (`download`).

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use meteostorico::{
    build_chart_spec, form, validate, FormController, FormFields, GeocodingClient, MeteoConfig,
    SubmitOutcome, WeatherClient,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "meteostorico",
    version,
    about = "Historical daily weather lookup for street addresses"
)]
struct Cli {
    /// Path to an alternative config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Raise the log filter to debug
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch weather for a date range and print the chart option JSON
    Fetch {
        #[command(flatten)]
        address: AddressArgs,

        /// Start of the range, YYYY-MM-DD
        #[arg(long)]
        start_date: String,

        /// End of the range, YYYY-MM-DD
        #[arg(long)]
        end_date: String,

        /// Write the chart option to this file instead of stdout
        #[arg(long)]
        chart_out: Option<PathBuf>,
    },
    /// Export the previous calendar year as weather-<year>.json
    Download {
        #[command(flatten)]
        address: AddressArgs,

        /// Directory for the export file (defaults to the configured one)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// The five address fields of the form
#[derive(Args)]
struct AddressArgs {
    /// Street and house number
    #[arg(long)]
    street: String,

    /// Postal code (5 digits)
    #[arg(long)]
    zip: String,

    /// City or municipality
    #[arg(long)]
    city: String,

    /// Province or region
    #[arg(long)]
    province: String,

    /// Country name
    #[arg(long)]
    country: String,
}

impl AddressArgs {
    fn into_fields(self, start_date: String, end_date: String) -> FormFields {
        FormFields {
            street: self.street,
            zip: self.zip,
            city: self.city,
            province: self.province,
            country: self.country,
            start_date,
            end_date,
        }
    }
}

fn init_tracing(configured_level: &str, verbose: bool) {
    let directive = if verbose { "debug" } else { configured_level };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = MeteoConfig::load_from_path(cli.config.clone())
        .with_context(|| "Failed to load configuration")?;
    init_tracing(&config.logging.level, cli.verbose);

    let geocoding = GeocodingClient::new(&config)?;
    let weather = WeatherClient::new(&config)?;

    match cli.command {
        Command::Fetch {
            address,
            start_date,
            end_date,
            chart_out,
        } => {
            let mut form =
                FormController::with_fields(address.into_fields(start_date, end_date));

            match form.submit(&geocoding, &weather).await? {
                SubmitOutcome::Rejected => {
                    for (field, error) in validate(&form.fields) {
                        eprintln!("error: {field} {error}");
                    }
                    bail!("form validation failed");
                }
                SubmitOutcome::DateRangeError => {
                    bail!("{}", form.date_error().unwrap_or(form::DATE_RANGE_ERROR));
                }
                SubmitOutcome::Fetched => {
                    let series = form
                        .weather_data()
                        .context("weather series missing after a successful fetch")?;
                    let json = serde_json::to_string_pretty(&build_chart_spec(series))?;

                    match chart_out {
                        Some(path) => {
                            std::fs::write(&path, json).with_context(|| {
                                format!("Failed to write chart option to {}", path.display())
                            })?;
                            info!("Wrote chart option to {}", path.display());
                        }
                        None => println!("{json}"),
                    }
                }
            }
        }
        Command::Download { address, out } => {
            let form =
                FormController::with_fields(address.into_fields(String::new(), String::new()));
            let export_dir = out.unwrap_or_else(|| PathBuf::from(&config.export.directory));

            let path = form
                .download_weather_data(&geocoding, &weather, &export_dir)
                .await?;
            println!("{}", path.display());
        }
    }

    Ok(())
}
