use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;

use crate::expr::{Comparator, DynamoExpression, FunctionName, Operand};

/// Renders a [`DynamoExpression`] into a `FilterExpression` with `#nameN` /
/// `:valN` placeholders.
#[derive(Debug, Default)]
pub struct ScanBuilder {
    filter_expression: Option<String>,
    expression_attribute_names: HashMap<String, String>,
    expression_attribute_values: HashMap<String, AttributeValue>,
}

impl ScanBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_expression(expr: &DynamoExpression) -> Self {
        let mut builder = Self::new();
        builder.set_filter_from_expression(expr);
        builder
    }

    pub fn set_filter_from_expression(&mut self, expr: &DynamoExpression) {
        let mut placeholders = Placeholders {
            names: &mut self.expression_attribute_names,
            values: &mut self.expression_attribute_values,
            name_counter: 0,
            value_counter: 0,
        };
        self.filter_expression = Some(placeholders.expression(expr));
    }

    pub fn filter_expression(&self) -> Option<&String> {
        self.filter_expression.as_ref()
    }

    pub fn expression_attribute_names(&self) -> &HashMap<String, String> {
        &self.expression_attribute_names
    }

    pub fn expression_attribute_values(&self) -> &HashMap<String, AttributeValue> {
        &self.expression_attribute_values
    }
}

struct Placeholders<'a> {
    names: &'a mut HashMap<String, String>,
    values: &'a mut HashMap<String, AttributeValue>,
    name_counter: u32,
    value_counter: u32,
}

impl Placeholders<'_> {
    fn expression(&mut self, expr: &DynamoExpression) -> String {
        match expr {
            DynamoExpression::Comparison {
                left,
                operator,
                right,
            } => {
                let left_str = self.operand(left);
                let op_str = match operator {
                    Comparator::Equal => "=",
                    Comparator::NotEqual => "<>",
                    Comparator::Less => "<",
                    Comparator::LessOrEqual => "<=",
                    Comparator::Greater => ">",
                    Comparator::GreaterOrEqual => ">=",
                };
                let right_str = self.operand(right);
                format!("{} {} {}", left_str, op_str, right_str)
            }
            DynamoExpression::Between {
                operand,
                lower,
                upper,
            } => {
                let operand_str = self.operand(operand);
                let lower_str = self.operand(lower);
                let upper_str = self.operand(upper);
                format!("{} BETWEEN {} AND {}", operand_str, lower_str, upper_str)
            }
            DynamoExpression::Function { name, args } => {
                let func_name = match name {
                    FunctionName::AttributeExists => "attribute_exists",
                    FunctionName::BeginsWith => "begins_with",
                    FunctionName::Contains => "contains",
                };
                let arg_strs: Vec<String> = args.iter().map(|arg| self.operand(arg)).collect();
                format!("{}({})", func_name, arg_strs.join(", "))
            }
            DynamoExpression::And(left, right) => {
                let left_str = self.expression(left);
                let right_str = self.expression(right);
                format!("({}) AND ({})", left_str, right_str)
            }
        }
    }

    fn operand(&mut self, operand: &Operand) -> String {
        match operand {
            Operand::Path(path) => {
                let name_placeholder = format!("#name{}", self.name_counter);
                self.name_counter += 1;
                self.names.insert(name_placeholder.clone(), path.clone());
                name_placeholder
            }
            Operand::Value(val) => self.value(AttributeValue::S(val.clone())),
            Operand::Number(num) => self.value(AttributeValue::N(num.to_string())),
        }
    }

    fn value(&mut self, value: AttributeValue) -> String {
        let value_placeholder = format!(":val{}", self.value_counter);
        self.value_counter += 1;
        self.values.insert(value_placeholder.clone(), value);
        value_placeholder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_conjunction_with_placeholders() {
        let expr = DynamoExpression::between(
            "last_updated_dt",
            Operand::Value("0000-01-01 00:00:00 +08:00".into()),
            Operand::Value("9999-12-31 23:59:59 +08:00".into()),
        )
        .and(DynamoExpression::equals(
            "category",
            Operand::Value("Books".into()),
        ));

        let builder = ScanBuilder::from_expression(&expr);
        assert_eq!(
            builder.filter_expression().map(String::as_str),
            Some("(#name0 BETWEEN :val0 AND :val1) AND (#name1 = :val2)")
        );
        assert_eq!(
            builder.expression_attribute_names().get("#name0"),
            Some(&"last_updated_dt".to_string())
        );
        assert_eq!(
            builder.expression_attribute_values().get(":val2"),
            Some(&AttributeValue::S("Books".to_string()))
        );
    }

    #[test]
    fn renders_functions_and_numbers() {
        let expr = DynamoExpression::contains("name", Operand::Value("Lap".into())).and(
            DynamoExpression::between("price", Operand::Number(1.0), Operand::Number(2.5)),
        );
        let builder = ScanBuilder::from_expression(&expr);
        assert_eq!(
            builder.filter_expression().map(String::as_str),
            Some("(contains(#name0, :val0)) AND (#name1 BETWEEN :val1 AND :val2)")
        );
        assert_eq!(
            builder.expression_attribute_values().get(":val1"),
            Some(&AttributeValue::N("1".to_string()))
        );
        assert_eq!(
            builder.expression_attribute_values().get(":val2"),
            Some(&AttributeValue::N("2.5".to_string()))
        );
    }

    #[test]
    fn empty_builder_has_no_filter() {
        let builder = ScanBuilder::new();
        assert!(builder.filter_expression().is_none());
        assert!(builder.expression_attribute_names().is_empty());
    }
}
