use std::{cmp::Ordering, collections::HashMap};

use aws_sdk_dynamodb::types::AttributeValue;

use super::ast::{Comparator, DynamoExpression, FunctionName, Operand};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Scalar<'a> {
    String(&'a str),
    Number(f64),
}

/// Evaluates `expr` against a single item the way DynamoDB evaluates a
/// `FilterExpression`: missing attributes and type mismatches never match.
pub fn matches(expr: &DynamoExpression, item: &HashMap<String, AttributeValue>) -> bool {
    match expr {
        DynamoExpression::Comparison {
            left,
            operator,
            right,
        } => {
            let (Some(left), Some(right)) = (resolve(left, item), resolve(right, item)) else {
                return false;
            };
            let Some(ordering) = compare(left, right) else {
                return matches!(operator, Comparator::NotEqual);
            };
            match operator {
                Comparator::Equal => ordering == Ordering::Equal,
                Comparator::NotEqual => ordering != Ordering::Equal,
                Comparator::Less => ordering == Ordering::Less,
                Comparator::LessOrEqual => ordering != Ordering::Greater,
                Comparator::Greater => ordering == Ordering::Greater,
                Comparator::GreaterOrEqual => ordering != Ordering::Less,
            }
        }
        DynamoExpression::Between {
            operand,
            lower,
            upper,
        } => {
            let (Some(value), Some(lower), Some(upper)) = (
                resolve(operand, item),
                resolve(lower, item),
                resolve(upper, item),
            ) else {
                return false;
            };
            matches!(
                compare(lower, value),
                Some(Ordering::Less | Ordering::Equal)
            ) && matches!(
                compare(value, upper),
                Some(Ordering::Less | Ordering::Equal)
            )
        }
        DynamoExpression::Function { name, args } => evaluate_function(name, args, item),
        DynamoExpression::And(left, right) => matches(left, item) && matches(right, item),
    }
}

fn evaluate_function(
    name: &FunctionName,
    args: &[Operand],
    item: &HashMap<String, AttributeValue>,
) -> bool {
    match (name, args) {
        (FunctionName::AttributeExists, [Operand::Path(path)]) => item.contains_key(path),
        (FunctionName::Contains, [haystack, needle]) => {
            match (resolve(haystack, item), resolve(needle, item)) {
                (Some(Scalar::String(haystack)), Some(Scalar::String(needle))) => {
                    haystack.contains(needle)
                }
                _ => false,
            }
        }
        (FunctionName::BeginsWith, [value, prefix]) => {
            match (resolve(value, item), resolve(prefix, item)) {
                (Some(Scalar::String(value)), Some(Scalar::String(prefix))) => {
                    value.starts_with(prefix)
                }
                _ => false,
            }
        }
        _ => false,
    }
}

fn resolve<'a>(
    operand: &'a Operand,
    item: &'a HashMap<String, AttributeValue>,
) -> Option<Scalar<'a>> {
    match operand {
        Operand::Path(path) => match item.get(path)? {
            AttributeValue::S(value) => Some(Scalar::String(value)),
            AttributeValue::N(value) => value.parse().ok().map(Scalar::Number),
            _ => None,
        },
        Operand::Value(value) => Some(Scalar::String(value)),
        Operand::Number(value) => Some(Scalar::Number(*value)),
    }
}

fn compare(left: Scalar<'_>, right: Scalar<'_>) -> Option<Ordering> {
    match (left, right) {
        (Scalar::String(left), Scalar::String(right)) => Some(left.cmp(right)),
        (Scalar::Number(left), Scalar::Number(right)) => left.partial_cmp(&right),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> HashMap<String, AttributeValue> {
        HashMap::from([
            ("name".to_string(), AttributeValue::S("Fake Laptop".to_string())),
            ("category".to_string(), AttributeValue::S("Electronics".to_string())),
            ("price".to_string(), AttributeValue::N("120".to_string())),
            (
                "last_updated_dt".to_string(),
                AttributeValue::S("2024-05-01 10:00:00 +08:00".to_string()),
            ),
        ])
    }

    #[test]
    fn equality_on_strings() {
        let expr = DynamoExpression::equals("category", Operand::Value("Electronics".into()));
        assert!(matches(&expr, &item()));
        let expr = DynamoExpression::equals("category", Operand::Value("Books".into()));
        assert!(!matches(&expr, &item()));
    }

    #[test]
    fn between_is_inclusive_for_numbers() {
        let expr =
            DynamoExpression::between("price", Operand::Number(120.0), Operand::Number(120.0));
        assert!(matches(&expr, &item()));
        let expr =
            DynamoExpression::between("price", Operand::Number(1.0), Operand::Number(119.5));
        assert!(!matches(&expr, &item()));
    }

    #[test]
    fn between_compares_timestamps_lexicographically() {
        let expr = DynamoExpression::between(
            "last_updated_dt",
            Operand::Value("2024-05-01 00:00:00 +08:00".into()),
            Operand::Value("2024-05-01 23:59:59 +08:00".into()),
        );
        assert!(matches(&expr, &item()));
    }

    #[test]
    fn contains_is_case_sensitive_substring() {
        let expr = DynamoExpression::contains("name", Operand::Value("Lap".into()));
        assert!(matches(&expr, &item()));
        let expr = DynamoExpression::contains("name", Operand::Value("lap".into()));
        assert!(!matches(&expr, &item()));
    }

    #[test]
    fn missing_attribute_and_type_mismatch_never_match() {
        let expr = DynamoExpression::equals("color", Operand::Value("red".into()));
        assert!(!matches(&expr, &item()));
        let expr = DynamoExpression::equals("price", Operand::Value("120".into()));
        assert!(!matches(&expr, &item()));
    }

    #[test]
    fn comparators_follow_ordering() {
        let cases = [
            (Comparator::Less, 200.0, true),
            (Comparator::LessOrEqual, 120.0, true),
            (Comparator::Greater, 120.0, false),
            (Comparator::GreaterOrEqual, 120.0, true),
            (Comparator::NotEqual, 120.0, false),
        ];
        for (operator, bound, expected) in cases {
            let expr = DynamoExpression::Comparison {
                left: Operand::Path("price".into()),
                operator: operator.clone(),
                right: Operand::Number(bound),
            };
            assert_eq!(matches(&expr, &item()), expected, "{operator:?} {bound}");
        }
    }

    #[test]
    fn functions_and_conjunction() {
        let exists = DynamoExpression::Function {
            name: FunctionName::AttributeExists,
            args: vec![Operand::Path("price".into())],
        };
        let prefix = DynamoExpression::Function {
            name: FunctionName::BeginsWith,
            args: vec![Operand::Path("name".into()), Operand::Value("Fake".into())],
        };
        assert!(matches(&exists.clone().and(prefix), &item()));

        let missing = DynamoExpression::Function {
            name: FunctionName::AttributeExists,
            args: vec![Operand::Path("color".into())],
        };
        assert!(!matches(&exists.and(missing), &item()));
    }
}
