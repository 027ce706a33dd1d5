use color_eyre::eyre::{Result, eyre};

use stockmate::dynamodb::{Capacity, CreateTableOutcome, CreateTableSpec, create_table};
use stockmate::store::KEY_ATTRIBUTE;

#[derive(clap::Args, Debug)]
pub struct Args {
    /// on-demand, or provisioned READ:WRITE units
    #[arg(long, default_value = "on-demand", value_name = "CAPACITY")]
    pub capacity: String,
}

pub async fn command(client: &aws_sdk_dynamodb::Client, table_name: &str, args: Args) -> Result<()> {
    let capacity =
        Capacity::parse(&args.capacity).map_err(|err| eyre!("Invalid --capacity value: {err}"))?;
    let spec = CreateTableSpec {
        table_name: table_name.trim().to_string(),
        hash_key: KEY_ATTRIBUTE.to_string(),
        capacity,
    };

    match create_table(client, &spec).await.map_err(|err| eyre!(err))? {
        CreateTableOutcome::Created => println!("Created table {}", spec.table_name),
        CreateTableOutcome::AlreadyExists => {
            println!("Table {} already exists", spec.table_name)
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct Cli {
        #[command(flatten)]
        args: Args,
    }

    #[test]
    fn defaults_to_on_demand() {
        let cli = Cli::try_parse_from(["stockmate"]).unwrap();
        assert_eq!(cli.args.capacity, "on-demand");
    }

    #[test]
    fn accepts_provisioned_units() {
        let cli = Cli::try_parse_from(["stockmate", "--capacity", "10:5"]).unwrap();
        assert_eq!(cli.args.capacity, "10:5");
    }
}
