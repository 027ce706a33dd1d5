use std::{collections::HashMap, fmt, str::FromStr};

use aws_sdk_dynamodb::types::AttributeValue;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Number, Value};

#[derive(Debug, PartialEq, Eq)]
pub enum JsonConversionError {
    InvalidNumber { attribute: String, value: String },
    NotAnObject,
    UnsupportedType { attribute: String, attribute_type: &'static str },
    Encode(String),
    Decode(String),
}

impl fmt::Display for JsonConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonConversionError::InvalidNumber { attribute, value } => {
                write!(f, "attribute {attribute} holds an invalid number: {value}")
            }
            JsonConversionError::NotAnObject => {
                write!(f, "an item must encode to a JSON object")
            }
            JsonConversionError::UnsupportedType {
                attribute,
                attribute_type,
            } => write!(f, "attribute {attribute} has unsupported type {attribute_type}"),
            JsonConversionError::Encode(inner) => write!(f, "failed to encode item: {inner}"),
            JsonConversionError::Decode(inner) => write!(f, "failed to decode item: {inner}"),
        }
    }
}

impl std::error::Error for JsonConversionError {}

pub type Result<T> = std::result::Result<T, JsonConversionError>;

pub fn to_item<T: Serialize>(value: &T) -> Result<HashMap<String, AttributeValue>> {
    let json =
        serde_json::to_value(value).map_err(|err| JsonConversionError::Encode(err.to_string()))?;
    let Value::Object(fields) = json else {
        return Err(JsonConversionError::NotAnObject);
    };
    Ok(fields
        .into_iter()
        .map(|(name, value)| {
            let attribute = encode(value);
            (name, attribute)
        })
        .collect())
}

pub fn from_item<T: DeserializeOwned>(item: &HashMap<String, AttributeValue>) -> Result<T> {
    let mut fields = Map::with_capacity(item.len());
    for (name, attribute) in item {
        fields.insert(name.clone(), decode(name, attribute)?);
    }
    serde_json::from_value(Value::Object(fields))
        .map_err(|err| JsonConversionError::Decode(err.to_string()))
}

fn encode(value: Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(flag) => AttributeValue::Bool(flag),
        Value::Number(number) => AttributeValue::N(number.to_string()),
        Value::String(text) => AttributeValue::S(text),
        Value::Array(values) => AttributeValue::L(values.into_iter().map(encode).collect()),
        Value::Object(fields) => AttributeValue::M(
            fields
                .into_iter()
                .map(|(name, value)| (name, encode(value)))
                .collect(),
        ),
    }
}

fn decode(attribute: &str, value: &AttributeValue) -> Result<Value> {
    let unsupported = |attribute_type| JsonConversionError::UnsupportedType {
        attribute: attribute.to_string(),
        attribute_type,
    };
    Ok(match value {
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::Bool(flag) => Value::Bool(*flag),
        AttributeValue::S(text) => Value::String(text.clone()),
        AttributeValue::N(raw) => Value::Number(Number::from_str(raw).map_err(|_| {
            JsonConversionError::InvalidNumber {
                attribute: attribute.to_string(),
                value: raw.clone(),
            }
        })?),
        AttributeValue::L(values) => Value::Array(
            values
                .iter()
                .map(|value| decode(attribute, value))
                .collect::<Result<Vec<_>>>()?,
        ),
        AttributeValue::M(fields) => {
            let mut object = Map::with_capacity(fields.len());
            for (name, value) in fields {
                object.insert(name.clone(), decode(&format!("{attribute}.{name}"), value)?);
            }
            Value::Object(object)
        }
        AttributeValue::B(_) => return Err(unsupported("B")),
        AttributeValue::Bs(_) => return Err(unsupported("BS")),
        AttributeValue::Ns(_) => return Err(unsupported("NS")),
        AttributeValue::Ss(_) => return Err(unsupported("SS")),
        _ => return Err(unsupported("unknown")),
    })
}
