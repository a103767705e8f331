// ============================================================================
// larder-db - CLI inspection tool for the Larder grocery database
// ============================================================================
// Usage:
//   larder-db stats                          Show document statistics
//   larder-db lists [--period P] [--list ID] List shopping lists with totals
//   larder-db pantry [--location L]          List pantry items
//   larder-db expiring                       Show the expiring-soon feed
//   larder-db breakdown [--period P]         Category spend breakdown
//   larder-db export --format json           Export both documents as JSON
//   larder-db seed --force                   Rewrite the starter lists
// ============================================================================

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use larder_core::{
    category_breakdown, expiration_status, expiring_feed, list_matches, total_spend,
    ExpirationStatus, FeedPolicy, LarderDb, ListFilter, PantryItem, ShoppingList, SpendFilter,
    SpendPeriod, StorageLocation,
};

/// Larder grocery database inspection tool
#[derive(Parser)]
#[command(name = "larder-db", version, about = "Inspect and manage the Larder grocery database")]
struct Cli {
    /// Path to the database file (default: ~/.larder/larder.redb)
    #[arg(long, global = true)]
    db_path: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show document statistics (lists, items, pantry entries)
    Stats,

    /// List shopping lists with their totals
    Lists {
        /// Time window: this_month, last_month, last_90_days, all_time
        #[arg(long, default_value = "all_time")]
        period: String,

        /// Restrict to a single list id
        #[arg(long)]
        list: Option<String>,
    },

    /// List pantry items with their expiration status
    Pantry {
        /// Filter by storage location: fridge, freezer, pantry
        #[arg(long)]
        location: Option<String>,

        /// Expiring threshold in days for the status column
        #[arg(long, default_value = "2")]
        threshold: i64,
    },

    /// Show the expiring-soon feed (same banding as the home screen)
    Expiring,

    /// Category spend breakdown for a time window
    Breakdown {
        /// Time window: this_month, last_month, last_90_days, all_time
        #[arg(long, default_value = "this_month")]
        period: String,
    },

    /// Export both documents as JSON
    Export {
        /// Output format (currently only json is supported)
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Overwrite the shopping list document with the starter lists
    Seed {
        /// Required; seeding discards the current shopping lists
        #[arg(long)]
        force: bool,
    },
}

fn parse_period(s: &str) -> Result<SpendPeriod> {
    match s.to_lowercase().as_str() {
        "this_month" | "this-month" => Ok(SpendPeriod::ThisMonth),
        "last_month" | "last-month" => Ok(SpendPeriod::LastMonth),
        "last_90_days" | "last-90-days" | "90d" => Ok(SpendPeriod::Last90Days),
        "all_time" | "all-time" | "all" => Ok(SpendPeriod::AllTime),
        _ => anyhow::bail!(
            "Unknown period '{}'. Valid values: this_month, last_month, last_90_days, all_time",
            s
        ),
    }
}

fn parse_location(s: &str) -> Result<StorageLocation> {
    match s.to_lowercase().as_str() {
        "fridge" => Ok(StorageLocation::Fridge),
        "freezer" => Ok(StorageLocation::Freezer),
        "pantry" => Ok(StorageLocation::Pantry),
        _ => anyhow::bail!("Unknown location '{}'. Valid values: fridge, freezer, pantry", s),
    }
}

fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn main() -> Result<()> {
    // Load environment variables from .env file, then set up logging
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let db = LarderDb::open(cli.db_path.as_deref())?;

    match cli.command {
        Commands::Stats => cmd_stats(&db),
        Commands::Lists { period, list } => cmd_lists(&db, &period, list),
        Commands::Pantry { location, threshold } => cmd_pantry(&db, location, threshold),
        Commands::Expiring => cmd_expiring(&db),
        Commands::Breakdown { period } => cmd_breakdown(&db, &period),
        Commands::Export { format } => cmd_export(&db, &format),
        Commands::Seed { force } => cmd_seed(&db, force),
    }
}

fn cmd_stats(db: &LarderDb) -> Result<()> {
    let stats = db.stats()?;

    println!("=== Larder Database Stats ===");
    println!("Database: {}", db.path().display());
    println!();
    println!("Shopping lists: {}", stats.list_count);
    println!("List items:     {}", stats.list_item_count);
    println!("Pantry items:   {}", stats.pantry_item_count);

    Ok(())
}

fn cmd_lists(db: &LarderDb, period: &str, list_id: Option<String>) -> Result<()> {
    let filter = SpendFilter {
        period: parse_period(period)?,
        list: list_id.map(ListFilter::One).unwrap_or(ListFilter::All),
    };
    let lists = db.load_shopping_lists()?;
    let now = Utc::now();

    let shown: Vec<&ShoppingList> = lists
        .iter()
        .filter(|l| list_matches(l, &filter, now))
        .collect();

    if shown.is_empty() {
        println!("No lists found.");
        return Ok(());
    }

    println!(
        "{:<36}  {:<20}  {:<12}  {:<10}  {:>8}  {:>8}",
        "LIST ID", "NAME", "STORE", "CREATED", "BUDGET", "TOTAL"
    );
    println!("{}", "-".repeat(104));

    for list in &shown {
        let store = list
            .store
            .as_ref()
            .map(|s| s.name.as_str())
            .unwrap_or("-");
        println!(
            "{:<36}  {:<20}  {:<12}  {:<10}  {:>8.2}  {:>8.2}",
            list.id,
            list.name.chars().take(20).collect::<String>(),
            store,
            format_date(list.created_at),
            list.budget,
            list.items_total(),
        );
    }

    println!(
        "\nTotal: {} lists, {:.2} spent ({})",
        shown.len(),
        total_spend(&lists, &filter, now),
        filter.period.as_str()
    );
    Ok(())
}

fn cmd_pantry(db: &LarderDb, location: Option<String>, threshold: i64) -> Result<()> {
    let location = location.as_deref().map(parse_location).transpose()?;
    let items = db.load_pantry_items()?;
    let now = Utc::now();

    let shown: Vec<&PantryItem> = items
        .iter()
        .filter(|i| location.map_or(true, |loc| i.storage_location == loc))
        .collect();

    if shown.is_empty() {
        println!("No pantry items found.");
        return Ok(());
    }

    println!(
        "{:<36}  {:<20}  {:<8}  {:<10}  {:<10}  {}",
        "ITEM ID", "NAME", "QTY", "LOCATION", "EXPIRES", "STATUS"
    );
    println!("{}", "-".repeat(100));

    for item in &shown {
        let status = match expiration_status(item, now, threshold) {
            Some(ExpirationStatus::Expired { days }) => format!("expired {}d ago", days),
            Some(ExpirationStatus::Expiring { days }) => format!("expiring in {}d", days),
            None => "-".to_string(),
        };
        println!(
            "{:<36}  {:<20}  {:<8}  {:<10}  {:<10}  {}",
            item.id,
            item.name.chars().take(20).collect::<String>(),
            item.quantity,
            item.storage_location,
            format_date(item.expiration_date),
            status
        );
    }

    println!("\nTotal: {} items", shown.len());
    Ok(())
}

fn cmd_expiring(db: &LarderDb) -> Result<()> {
    let items = db.load_pantry_items()?;
    let feed = expiring_feed(&items, Utc::now(), FeedPolicy::default());

    if feed.is_empty() {
        println!("Nothing expiring soon.");
        return Ok(());
    }

    for entry in &feed {
        println!("{:>4}d  {:<8?}  {}", entry.days_left, entry.status, entry.name);
    }

    println!("\nTotal: {} items", feed.len());
    Ok(())
}

fn cmd_breakdown(db: &LarderDb, period: &str) -> Result<()> {
    let filter = SpendFilter {
        period: parse_period(period)?,
        list: ListFilter::All,
    };
    let lists = db.load_shopping_lists()?;
    let now = Utc::now();

    let breakdown = category_breakdown(&lists, &filter, now);
    if breakdown.is_empty() {
        println!("No spending in this period.");
        return Ok(());
    }

    println!("=== Category Breakdown ({}) ===", filter.period.as_str());
    for entry in &breakdown {
        println!(
            "{:<12}  {:>8.2}  {:>5.1}%",
            entry.category, entry.amount, entry.percentage
        );
    }
    println!("{}", "-".repeat(30));
    println!(
        "{:<12}  {:>8.2}",
        "Total",
        total_spend(&lists, &filter, now)
    );

    Ok(())
}

fn cmd_export(db: &LarderDb, format: &str) -> Result<()> {
    if format != "json" {
        anyhow::bail!("Unsupported format '{}'. Only 'json' is supported.", format);
    }

    let lists = db.load_shopping_lists()?;
    let pantry = db.load_pantry_items()?;
    let stats = db.stats()?;

    let export = serde_json::json!({
        "exported_at": Utc::now().to_rfc3339(),
        "stats": stats,
        "shopping_lists": lists,
        "pantry_items": pantry,
    });

    println!("{}", serde_json::to_string_pretty(&export)?);
    Ok(())
}

fn cmd_seed(db: &LarderDb, force: bool) -> Result<()> {
    if !force {
        anyhow::bail!("Seeding overwrites the current shopping lists; pass --force to confirm.");
    }

    let starter = larder_core::db::seed::starter_lists();
    db.save_shopping_lists(&starter)?;

    println!("Seeded {} starter lists.", starter.len());
    Ok(())
}
