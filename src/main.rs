use color_eyre::Result;
use color_eyre::eyre::eyre;

use stockmate::config::{Config, Environment};
use stockmate::inventory::Inventory;
use stockmate::store::DynamoStore;
use stockmate::{aws, logging};

mod subcommands;

#[derive(clap::Parser)]
#[command(
    name = "stockmate",
    version,
    about = "Inventory management over a DynamoDB table",
    long_about = None
)]
struct Cli {
    /// Increase output verbosity (-v, -vv, etc.)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Endpoint URL for the DynamoDB service
    #[arg(long, global = true, env = "STOCKMATE_ENDPOINT_URL")]
    endpoint_url: Option<String>,

    /// Inventory table name
    #[arg(long, global = true, env = "STOCKMATE_TABLE", default_value = "Inventory")]
    table: String,

    /// development, test or production. Bulk clear/populate are refused in production.
    #[arg(long, global = true, env = "STOCKMATE_ENV", default_value_t = Environment::Production)]
    environment: Environment,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List items by last-updated range and category
    List(subcommands::list::ListArgs),
    /// Search with name, price range, pagination and sort
    Search(subcommands::list::SearchArgs),
    /// Add an item, replacing any item with the same name
    Add(subcommands::items::AddArgs),
    /// Update selected fields of an item
    Edit(subcommands::items::EditArgs),
    /// Show one item
    Get(subcommands::items::IdArgs),
    /// Delete one item
    Delete(subcommands::items::IdArgs),
    /// Delete every item (not in production)
    Clear,
    /// Add synthetic items (not in production)
    Populate(subcommands::bulk::PopulateArgs),
    /// Create the inventory table
    CreateTable(subcommands::create_table::Args),
}

#[tokio::main]
async fn main() -> Result<()> {
    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .map_err(|_| eyre!("failed to install the aws-lc-rs crypto provider"))?;

    color_eyre::install()?;
    let cli = <Cli as clap::Parser>::parse();
    logging::init(cli.verbose);

    let config = Config {
        table_name: cli.table,
        environment: cli.environment,
        endpoint_url: cli.endpoint_url,
    };
    tracing::debug!(table = %config.table_name, environment = %config.environment, "Starting");

    let client = aws::new_client(&config).await?;
    let inventory = Inventory::new(
        DynamoStore::new(client.clone(), config.table_name.clone()),
        config.inventory_options(),
    );
    match cli.command {
        Commands::List(args) => subcommands::list::list(&inventory, args).await,
        Commands::Search(args) => subcommands::list::search(&inventory, args).await,
        Commands::Add(args) => subcommands::items::add(&inventory, args).await,
        Commands::Edit(args) => subcommands::items::edit(&inventory, args).await,
        Commands::Get(args) => subcommands::items::get(&inventory, args).await,
        Commands::Delete(args) => subcommands::items::delete(&inventory, args).await,
        Commands::Clear => subcommands::bulk::clear(&inventory).await,
        Commands::Populate(args) => subcommands::bulk::populate(&inventory, args).await,
        Commands::CreateTable(args) => {
            subcommands::create_table::command(&client, &config.table_name, args).await
        }
    }
}
