use color_eyre::eyre::Result;

use stockmate::inventory::Inventory;
use stockmate::store::ItemStore;

use super::print_response;

#[derive(clap::Args, Debug)]
pub struct PopulateArgs {
    /// Number of synthetic items to add
    #[arg(long, default_value_t = 50)]
    pub count: usize,
}

pub async fn clear<S: ItemStore>(inventory: &Inventory<S>) -> Result<()> {
    print_response(&inventory.clear_inventory().await)
}

pub async fn populate<S: ItemStore>(inventory: &Inventory<S>, args: PopulateArgs) -> Result<()> {
    print_response(&inventory.populate_inventory(args.count).await)
}
