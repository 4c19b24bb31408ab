use anyhow::{bail, Context as AnyhowContext, Result};
use bitebot_lookup::{
    LookupConfig, NutritionLookup, SearchOutcome, SearchResult, SourceFilter, CONFIG_ENV,
};
use clap::{ArgGroup, Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

mod render;

#[derive(Parser)]
#[command(name = "bitebot")]
#[command(about = "Nutrition lookup over bundled reference data and the product catalog", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// TOML config file
    #[arg(long, global = true, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Reference dataset path (overrides config and BITEBOT_REFERENCE_DATA)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Catalog base URL (overrides config and BITEBOT_CATALOG_URL)
    #[arg(long, global = true)]
    catalog_url: Option<String>,

    /// Catalog request timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search reference foods first, then catalog products
    Search(SearchArgs),

    /// Look up a catalog product by barcode
    Barcode(BarcodeArgs),

    /// Show a reference food by id
    Food(FoodArgs),

    /// Nutrients for a gram amount of a food or product
    Scale(ScaleArgs),
}

#[derive(Args)]
struct SearchArgs {
    /// Food name, e.g. "greek yogurt"
    query: String,

    /// Restrict to one source: usda or off
    #[arg(long, value_parser = parse_source)]
    source: Option<SourceFilter>,

    /// Country for regional catalog results (e.g. "germany", "ch")
    #[arg(long)]
    country: Option<String>,

    /// Maximum results per source
    #[arg(short, long)]
    limit: Option<usize>,

    /// List household portions for reference foods
    #[arg(long)]
    portions: bool,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct BarcodeArgs {
    /// Product barcode (digits only)
    code: String,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct FoodArgs {
    /// Reference food id
    id: u64,

    /// List household portions
    #[arg(long)]
    portions: bool,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
#[command(group(ArgGroup::new("target").required(true).args(["id", "barcode"])))]
struct ScaleArgs {
    /// Reference food id
    #[arg(long)]
    id: Option<u64>,

    /// Catalog product barcode
    #[arg(long)]
    barcode: Option<String>,

    /// Amount eaten, in grams
    #[arg(long)]
    grams: f64,

    /// Output JSON
    #[arg(long)]
    json: bool,
}

fn parse_source(value: &str) -> std::result::Result<SourceFilter, String> {
    value.parse().map_err(|err: bitebot_lookup::LookupError| err.to_string())
}

#[derive(Serialize)]
struct ScaledFood<'a> {
    food: &'a SearchResult,
    serving: &'a bitebot_nutrients::Serving,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<LookupConfig> {
    let mut config =
        LookupConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(path) = &cli.data {
        config.reference_data = path.clone();
    }
    if let Some(url) = &cli.catalog_url {
        config.set_catalog_url(url.as_str());
    }
    if let Some(secs) = cli.timeout_secs {
        config.catalog.timeout_secs = secs;
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn report_warnings(outcome: &SearchOutcome) {
    for warning in outcome.warnings() {
        eprintln!("warning: {warning}");
    }
}

async fn run_search(lookup: &NutritionLookup, args: SearchArgs, default_limit: usize) -> Result<()> {
    let limit = args.limit.unwrap_or(default_limit);
    let outcome = lookup
        .search_all(&args.query, limit, args.source, args.country.as_deref())
        .await
        .context("Search failed")?;

    if args.json {
        return print_json(&outcome);
    }
    report_warnings(&outcome);
    print!("{}", render::render_outcome(&outcome, args.portions));
    Ok(())
}

async fn run_barcode(lookup: &NutritionLookup, args: BarcodeArgs) -> Result<()> {
    let found = lookup
        .lookup_barcode(&args.code)
        .await
        .with_context(|| format!("Barcode lookup for {} failed", args.code))?;
    match found {
        Some(product) if args.json => print_json(&product),
        Some(product) => {
            print!("{}", render::render_food(&product, false));
            Ok(())
        }
        None => {
            println!("No product found for barcode {}", args.code);
            Ok(())
        }
    }
}

fn run_food(lookup: &NutritionLookup, args: FoodArgs) -> Result<()> {
    match lookup.lookup_by_id(args.id)? {
        Some(food) if args.json => print_json(&food),
        Some(food) => {
            print!("{}", render::render_food(&food, args.portions));
            Ok(())
        }
        None => {
            println!("No reference food with id {}", args.id);
            Ok(())
        }
    }
}

async fn run_scale(lookup: &NutritionLookup, args: ScaleArgs) -> Result<()> {
    let (found, label) = match (args.id, &args.barcode) {
        (Some(id), _) => (lookup.lookup_by_id(id)?, format!("reference food with id {id}")),
        (None, Some(code)) => (
            lookup.lookup_barcode(code).await?,
            format!("product for barcode {code}"),
        ),
        (None, None) => bail!("either --id or --barcode is required"),
    };
    let Some(food) = found else {
        println!("No {label}");
        return Ok(());
    };

    let serving = food.serving(args.grams)?;
    if args.json {
        return print_json(&ScaledFood {
            food: &food,
            serving: &serving,
        });
    }
    print!("{}", render::render_serving(&food, &serving));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();

    // Keep stdout clean for JSON consumers
    let json_output = match &cli.command {
        Commands::Search(args) => args.json,
        Commands::Barcode(args) => args.json,
        Commands::Food(args) => args.json,
        Commands::Scale(args) => args.json,
    };
    if json_output {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = resolve_config(&cli)?;
    let lookup = NutritionLookup::from_config(&config)?;

    match cli.command {
        Commands::Search(args) => run_search(&lookup, args, config.default_limit).await?,
        Commands::Barcode(args) => run_barcode(&lookup, args).await?,
        Commands::Food(args) => run_food(&lookup, args)?,
        Commands::Scale(args) => run_scale(&lookup, args).await?,
    }

    Ok(())
}
