use clap::{Parser, Subcommand};
use picture_order::config::{self, GalleryConfig};
use picture_order::order::{self, OrderStore};
use picture_order::thumbnails::{self, PipelineConfig};
use picture_order::{merge, output, scan};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "picture-order")]
#[command(about = "Curated display order and thumbnails for a picture directory")]
#[command(long_about = "\
Curated display order and thumbnails for a picture directory

The pictures directory decides which pictures exist. The order file decides
where each one goes. Pictures added since the last reorder are appended in
filename order; deleted ones silently disappear.

Layout (defaults):

  public/pictures/             # Source pictures (.jpg .jpeg .png .gif .webp)
  public/pictures/thumbnails/  # Square thumbnails (GIF → PNG)
  data/order.json              # Saved order, positions only

Run 'picture-order gen-config' to generate a documented picture-order.toml.")]
#[command(version)]
struct Cli {
    /// Config file (optional; stock defaults apply when missing)
    #[arg(long, default_value = config::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    /// Log filter used when RUST_LOG is unset (e.g. info, debug)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print pictures in display order
    List {
        /// Print a JSON array instead of the listing
        #[arg(long)]
        json: bool,
    },
    /// Print the saved order file as loaded
    Order,
    /// Save a new display order; listed names get positions 0..N-1
    Reorder {
        /// Filenames in the desired order
        #[arg(required = true)]
        filenames: Vec<String>,
    },
    /// Generate square thumbnails for every picture
    Thumbnails,
    /// Print a stock picture-order.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let load = || config::load_config(&cli.config);

    match cli.command {
        Command::List { json } => {
            let config = load()?;
            let pictures = current_order(&config);
            if json {
                println!("{}", serde_json::to_string_pretty(&pictures)?);
            } else {
                output::print_picture_list(&pictures);
            }
        }
        Command::Order => {
            let config = load()?;
            let record = OrderStore::new(&config.order_file).load();
            output::print_order_record(&record);
        }
        Command::Reorder { filenames } => {
            let config = load()?;
            let current = scan::scan(&config.pictures_dir, &config.urls);
            let record = order::build_order(&current, &filenames)?;
            let saved = OrderStore::new(&config.order_file).save(&record)?;
            let pictures = merge::merge(current, &saved);
            output::print_picture_list(&pictures);
        }
        Command::Thumbnails => {
            let pipeline = PipelineConfig::from_gallery_config(&load()?);
            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_pipeline_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = thumbnails::run(&pipeline, Some(tx));
            printer
                .join()
                .map_err(|_| "output printer thread panicked")?;
            println!("Thumbnails: {}", result?);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Scan, load, merge: the sequence every read shows.
fn current_order(config: &GalleryConfig) -> Vec<picture_order::types::Picture> {
    let current = scan::scan(&config.pictures_dir, &config.urls);
    let saved = OrderStore::new(&config.order_file).load();
    merge::merge(current, &saved)
}

/// Install a stderr subscriber. `RUST_LOG` wins over `--log-level`.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
