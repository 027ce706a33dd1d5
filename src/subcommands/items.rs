use color_eyre::eyre::Result;

use stockmate::inventory::{Inventory, ItemChanges};
use stockmate::store::ItemStore;

use super::print_response;

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,

    /// Non-negative price
    #[arg(long, allow_negative_numbers = true)]
    pub price: String,

    #[arg(long)]
    pub category: String,

    /// Id to use when no item with this name exists yet
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    #[arg(long)]
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub price: Option<String>,

    #[arg(long, value_name = "TIMESTAMP")]
    pub created_dt: Option<String>,

    #[arg(long, value_name = "TIMESTAMP")]
    pub last_updated_dt: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct IdArgs {
    #[arg(long)]
    pub id: String,
}

/// Unparseable prices become NaN so the inventory rejects them with a 400.
fn parse_price(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(f64::NAN)
}

impl From<&EditArgs> for ItemChanges {
    fn from(args: &EditArgs) -> Self {
        ItemChanges {
            name: args.name.clone(),
            category: args.category.clone(),
            price: args.price.as_deref().map(parse_price),
            created_dt: args.created_dt.clone(),
            last_updated_dt: args.last_updated_dt.clone(),
        }
    }
}

pub async fn add<S: ItemStore>(inventory: &Inventory<S>, args: AddArgs) -> Result<()> {
    let response = inventory
        .add_item(
            &args.name,
            parse_price(&args.price),
            &args.category,
            args.id.as_deref(),
        )
        .await;
    print_response(&response)
}

pub async fn edit<S: ItemStore>(inventory: &Inventory<S>, args: EditArgs) -> Result<()> {
    let changes = ItemChanges::from(&args);
    let response = inventory.edit_item(&args.id, &changes).await;
    print_response(&response)
}

pub async fn get<S: ItemStore>(inventory: &Inventory<S>, args: IdArgs) -> Result<()> {
    print_response(&inventory.get_item(&args.id).await)
}

pub async fn delete<S: ItemStore>(inventory: &Inventory<S>, args: IdArgs) -> Result<()> {
    print_response(&inventory.delete_item(&args.id).await)
}
