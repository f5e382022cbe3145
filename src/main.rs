use std::path::PathBuf;

use amenity_finder::amenities::Category;
use amenity_finder::config::{AppConfig, ResolveMode};
use amenity_finder::location::{Address, Credential};
use amenity_finder::render::{adapter_for, render_ascii_map, MapProvider, MapView};
use amenity_finder::search::{Search, SearchReport};
use amenity_finder::server;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

/// Amenity Finder: nearby hospitals, schools and transport for a U.S. address.
///
/// Examples:
///   amenity search --street "123 Main St" --city "New York" --state NY --zip 10001
///   amenity search ... --radius 2 --provider google --seed 42
///   amenity search ... --mode live --token pk.xxxx
///   amenity serve --port 8080
#[derive(Parser)]
#[command(name = "amenity", version, about, long_about = None)]
struct Cli {
    /// Config file (JSON). Defaults to ~/.amenity-finder/config.json.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Geocode an address and list nearby amenities.
    Search(SearchArgs),
    /// Run the HTTP API.
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, short = 'p', default_value_t = 3000)]
        port: u16,
    },
}

#[derive(clap::Args)]
struct SearchArgs {
    /// Street address, e.g. "123 Main St".
    #[arg(long)]
    street: String,

    #[arg(long)]
    city: String,

    /// State code, e.g. NY.
    #[arg(long)]
    state: String,

    /// ZIP code.
    #[arg(long = "zip")]
    zip_code: String,

    /// Search radius in kilometers.
    #[arg(long, short = 'r')]
    radius: Option<f64>,

    /// Geocoding mode: "live" (Mapbox) or "simulated".
    #[arg(long, value_parser = parse_mode)]
    mode: Option<ResolveMode>,

    /// Provider access token (overrides AMENITY_TOKEN).
    #[arg(long)]
    token: Option<String>,

    /// Map scene format: google, mapbox or maplibre.
    #[arg(long, value_parser = parse_provider)]
    provider: Option<MapProvider>,

    /// Seed the random source for reproducible output.
    #[arg(long)]
    seed: Option<u64>,

    /// Skip the terminal map.
    #[arg(long)]
    no_map: bool,
}

fn parse_mode(s: &str) -> Result<ResolveMode, String> {
    s.parse()
}

fn parse_provider(s: &str) -> Result<MapProvider, String> {
    s.parse()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("amenity_finder=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    match cli.command {
        Command::Search(args) => run_search(&mut config, args).await,
        Command::Serve { host, port } => {
            if let Err(e) = config.validate() {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
            if let Err(e) = server::start(config, &host, port).await {
                eprintln!("Error: Server stopped: {}", e);
                std::process::exit(1);
            }
        }
    }
}

async fn run_search(config: &mut AppConfig, args: SearchArgs) {
    // ── Apply CLI overrides ─────────────────────────────────────

    if let Some(r) = args.radius {
        config.radius_km = r;
    }
    if let Some(m) = args.mode {
        config.mode = m;
    }
    if let Some(t) = args.token {
        config.credential = Credential::new(t);
    }
    if let Some(p) = args.provider {
        config.map_provider = p;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let address = Address::new(args.street, args.city, args.state, args.zip_code);

    // ── Search ──────────────────────────────────────────────────

    let mut rng = match config.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };

    eprintln!("  Searching near {} ...", address);
    let report = Search::from_config(config)
        .run(&address, &mut rng)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        });

    // ── Terminal output ─────────────────────────────────────────

    let view = MapView::from_report(&report);
    if !args.no_map {
        eprint!("{}", render_ascii_map(&view, 61, 25));
    }
    eprint!("{}", render_summary(&report));

    // JSON to stdout
    let output = serde_json::json!({
        "location": report.location,
        "amenities": report.amenities,
        "summary": report.summary,
        "score": report.score,
        "map": adapter_for(config.map_provider).render(&view),
    });
    match serde_json::to_string_pretty(&output) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn render_summary(report: &SearchReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("  \u{1F4CD} {}\n", report.headline()));
    if let Some(ref formatted) = report.location.formatted_address {
        out.push_str(&format!("     {}\n", formatted));
    }
    out.push_str(&format!(
        "     {:.5}, {:.5}\n",
        report.location.lat, report.location.lng
    ));
    for category in Category::ALL {
        out.push_str(&format!(
            "     {:<10} {:>2}\n",
            category.label(),
            report.summary.count(category)
        ));
    }
    out.push_str(&format!("     {}\n", report.summary.caption));
    out.push_str(&format!(
        "     QAP score: {}% ({})\n",
        report.score.percent, report.score.grade
    ));
    out
}
