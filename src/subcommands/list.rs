use color_eyre::eyre::Result;

use stockmate::inventory::{
    AdditionalInventoryFilters, Inventory, InventoryFilters, ItemFilters, NumberInput, Pagination,
    SortRequest,
};
use stockmate::store::ItemStore;

use super::print_response;

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Earliest last-updated time (YYYY-MM-DD, YYYY-MM-DD HH:MM:SS or RFC 3339)
    #[arg(long, value_name = "DATE")]
    pub from: Option<String>,

    /// Latest last-updated time
    #[arg(long, value_name = "DATE")]
    pub to: Option<String>,

    /// Exact category
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    #[arg(long, value_name = "DATE")]
    pub from: Option<String>,

    #[arg(long, value_name = "DATE")]
    pub to: Option<String>,

    /// Substring of the item name (case-sensitive)
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    /// Inclusive price bounds: --price-range LOW HIGH
    #[arg(long, value_name = "PRICE", num_args = 1.., allow_negative_numbers = true)]
    pub price_range: Vec<String>,

    /// 1-based store page
    #[arg(long, allow_negative_numbers = true)]
    pub page: Option<String>,

    /// Rows read per store page
    #[arg(long, allow_negative_numbers = true)]
    pub limit: Option<String>,

    /// Field to sort the returned page by
    #[arg(long, value_name = "FIELD")]
    pub sort: Option<String>,

    /// asc or desc
    #[arg(long, requires = "sort")]
    pub order: Option<String>,
}

impl From<ListArgs> for InventoryFilters {
    fn from(args: ListArgs) -> Self {
        InventoryFilters {
            dt_from: args.from,
            dt_to: args.to,
            category: args.category,
        }
    }
}

impl From<SearchArgs> for AdditionalInventoryFilters {
    fn from(args: SearchArgs) -> Self {
        let price_range = (!args.price_range.is_empty())
            .then(|| args.price_range.into_iter().map(NumberInput::Text).collect());
        let pagination = (args.page.is_some() || args.limit.is_some()).then(|| Pagination {
            page: args.page.map(NumberInput::Text),
            limit: args.limit.map(NumberInput::Text),
        });
        let sort = args.sort.map(|field| SortRequest {
            field: Some(field),
            order: args.order,
        });
        AdditionalInventoryFilters {
            dt_from: args.from,
            dt_to: args.to,
            filters: Some(ItemFilters {
                name: args.name,
                category: args.category,
                price_range,
            }),
            pagination,
            sort,
        }
    }
}

pub async fn list<S: ItemStore>(inventory: &Inventory<S>, args: ListArgs) -> Result<()> {
    let response = inventory.list_inventory(&args.into()).await;
    print_response(&response)
}

pub async fn search<S: ItemStore>(inventory: &Inventory<S>, args: SearchArgs) -> Result<()> {
    let response = inventory.list_inventory_extended(&args.into()).await;
    print_response(&response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct Cli {
        #[command(flatten)]
        args: SearchArgs,
    }

    #[test]
    fn search_args_map_to_filters() {
        let cli = Cli::try_parse_from([
            "stockmate",
            "--name",
            "Fake",
            "--price-range",
            "10",
            "20",
            "--page",
            "2",
            "--limit",
            "10",
            "--sort",
            "price",
            "--order",
            "desc",
        ])
        .unwrap();
        let filters = AdditionalInventoryFilters::from(cli.args);
        let item_filters = filters.filters.unwrap();
        assert_eq!(item_filters.name.as_deref(), Some("Fake"));
        assert_eq!(
            item_filters.price_range,
            Some(vec![NumberInput::from("10"), NumberInput::from("20")])
        );
        assert_eq!(
            filters.pagination,
            Some(Pagination {
                page: Some(NumberInput::from("2")),
                limit: Some(NumberInput::from("10")),
            })
        );
        assert_eq!(filters.sort.and_then(|sort| sort.order).as_deref(), Some("desc"));
    }

    #[test]
    fn search_without_flags_requests_no_pagination() {
        let cli = Cli::try_parse_from(["stockmate"]).unwrap();
        let filters = AdditionalInventoryFilters::from(cli.args);
        assert!(filters.pagination.is_none());
        assert!(filters.sort.is_none());
        assert_eq!(filters.filters.and_then(|f| f.price_range), None);
    }

    #[test]
    fn negative_page_reaches_validation() {
        let cli = Cli::try_parse_from(["stockmate", "--page", "-1"]).unwrap();
        assert_eq!(cli.args.page.as_deref(), Some("-1"));
    }

    #[test]
    fn order_requires_sort() {
        assert!(Cli::try_parse_from(["stockmate", "--order", "asc"]).is_err());
    }
}
