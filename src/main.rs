use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use symbol_map::attributes::year_of;
use symbol_map::config::AppConfig;
use symbol_map::controller::SymbolSeriesController;
use symbol_map::surface::MarkerLayer;
use symbol_map::{build, server};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the frame JSON and legend SVG for every year (or one index)
    Render {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
        #[arg(short, long)]
        index: Option<usize>,
    },
    /// Serve the map state over HTTP
    Serve {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Render { config, index } => {
            info!("Rendering map with config: {:?}", config);
            let app_config = AppConfig::load_from_file(config)?;
            let mut controller = build(&app_config, MarkerLayer::new())
                .context("Failed to initialise map")?;

            fs::create_dir_all(&app_config.output.dir)
                .with_context(|| format!("Failed to create output directory: {:?}", app_config.output.dir))?;

            match index {
                Some(i) => {
                    controller.set_index(*i)?;
                    write_frame(&app_config, &controller)?;
                }
                None => {
                    for i in 0..controller.len() {
                        controller.set_index(i)?;
                        write_frame(&app_config, &controller)?;
                    }
                }
            }

            info!("Render complete!");
        }
        Commands::Serve { config } => {
            info!("Serving map with config: {:?}", config);
            let app_config = AppConfig::load_from_file(config)?;
            let controller = build(&app_config, MarkerLayer::new())
                .context("Failed to initialise map")?;

            server::start_server(app_config, controller).await?;
        }
    }

    Ok(())
}

fn write_frame(config: &AppConfig, controller: &SymbolSeriesController<MarkerLayer>) -> Result<()> {
    let year = year_of(controller.attribute());
    let frame_path = config.output.dir.join(format!("frame-{}.json", year));
    let legend_path = config.output.dir.join(format!("legend-{}.svg", year));

    let json = serde_json::to_string_pretty(&controller.frame())?;
    fs::write(&frame_path, json)
        .with_context(|| format!("Failed to write {:?}", frame_path))?;
    fs::write(&legend_path, controller.legend().render_svg())
        .with_context(|| format!("Failed to write {:?}", legend_path))?;

    info!("Wrote {:?} and {:?}", frame_path, legend_path);
    Ok(())
}
