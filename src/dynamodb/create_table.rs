use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::RequestId;
use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ProvisionedThroughput,
    ScalarAttributeType,
};

use super::send_dynamo_request;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    OnDemand,
    Provisioned { read: i64, write: i64 },
}

impl Capacity {
    /// Parses `on-demand` or `READ:WRITE` capacity units.
    pub fn parse(value: &str) -> Result<Self, String> {
        let value = value.trim();
        if value.is_empty() {
            return Err("Capacity is required".to_string());
        }
        match value.to_ascii_lowercase().as_str() {
            "on-demand" | "ondemand" | "pay-per-request" => return Ok(Capacity::OnDemand),
            _ => {}
        }
        let Some((read, write)) = value.split_once(':') else {
            return Err(format!("Unknown capacity: {value}"));
        };
        let read = parse_units(read, "read")?;
        let write = parse_units(write, "write")?;
        Ok(Capacity::Provisioned { read, write })
    }
}

fn parse_units(raw: &str, label: &str) -> Result<i64, String> {
    match raw.trim().parse::<i64>() {
        Ok(units) if units > 0 => Ok(units),
        _ => Err(format!("Invalid {label} capacity: {raw}")),
    }
}

/// A table keyed by a single string hash key.
#[derive(Debug, Clone)]
pub struct CreateTableSpec {
    pub table_name: String,
    pub hash_key: String,
    pub capacity: Capacity,
}

impl CreateTableSpec {
    pub fn validate(&self) -> Result<(), String> {
        if self.table_name.trim().is_empty() {
            return Err("Table name is required".to_string());
        }
        if self.hash_key.trim().is_empty() {
            return Err("Partition key is required".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateTableOutcome {
    Created,
    AlreadyExists,
}

pub async fn create_table(
    client: &Client,
    spec: &CreateTableSpec,
) -> Result<CreateTableOutcome, String> {
    spec.validate()?;

    let attribute_definition = AttributeDefinition::builder()
        .attribute_name(spec.hash_key.clone())
        .attribute_type(ScalarAttributeType::S)
        .build()
        .map_err(|err| err.to_string())?;
    let key_schema = KeySchemaElement::builder()
        .attribute_name(spec.hash_key.clone())
        .key_type(KeyType::Hash)
        .build()
        .map_err(|err| err.to_string())?;

    let mut request = client
        .create_table()
        .table_name(spec.table_name.clone())
        .attribute_definitions(attribute_definition)
        .key_schema(key_schema);

    request = match spec.capacity {
        Capacity::OnDemand => request.billing_mode(BillingMode::PayPerRequest),
        Capacity::Provisioned { read, write } => {
            let throughput = ProvisionedThroughput::builder()
                .read_capacity_units(read)
                .write_capacity_units(write)
                .build()
                .map_err(|err| err.to_string())?;
            request
                .billing_mode(BillingMode::Provisioned)
                .provisioned_throughput(throughput)
        }
    };

    let span = tracing::trace_span!("CreateTable", table = %spec.table_name);
    match send_dynamo_request(span, || request.send(), format_sdk_error).await {
        Ok(_) => Ok(CreateTableOutcome::Created),
        Err(err)
            if matches!(
                err.as_service_error(),
                Some(CreateTableError::ResourceInUseException(_))
            ) =>
        {
            tracing::debug!(table = %spec.table_name, "Table already exists");
            Ok(CreateTableOutcome::AlreadyExists)
        }
        Err(err) => Err(format_sdk_error(&err)),
    }
}

fn format_sdk_error<E>(err: &SdkError<E>) -> String
where
    E: ProvideErrorMetadata + RequestId + std::error::Error + 'static,
{
    if let Some(service_err) = err.as_service_error() {
        let code = service_err.code().unwrap_or("ServiceError");
        let message = service_err.message().unwrap_or("").trim();
        let mut summary = if message.is_empty() {
            code.to_string()
        } else {
            format!("{code}: {message}")
        };
        if let Some(request_id) = service_err.request_id() {
            summary.push_str(&format!(" (request id: {request_id})"));
        }
        return summary;
    }
    DisplayErrorContext(err).to_string()
}

#[cfg(test)]
mod tests {
    use super::{Capacity, CreateTableSpec};

    #[test]
    fn capacity_parse_accepts_modes() {
        assert_eq!(Capacity::parse("on-demand").unwrap(), Capacity::OnDemand);
        assert_eq!(
            Capacity::parse("1:2").unwrap(),
            Capacity::Provisioned { read: 1, write: 2 }
        );
    }

    #[test]
    fn capacity_parse_rejects_bad_units() {
        assert!(Capacity::parse("0:1").unwrap_err().contains("read"));
        assert!(Capacity::parse("1:x").unwrap_err().contains("write"));
        assert!(Capacity::parse("lots").unwrap_err().contains("Unknown capacity"));
    }

    #[test]
    fn table_spec_requires_names() {
        let spec = CreateTableSpec {
            table_name: " ".to_string(),
            hash_key: "id".to_string(),
            capacity: Capacity::OnDemand,
        };
        assert!(spec.validate().unwrap_err().contains("Table name"));
    }
}
