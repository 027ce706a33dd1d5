use std::collections::{BTreeMap, HashMap};

use aws_sdk_dynamodb::types::AttributeValue;

/// `SET` update expression covering exactly the supplied attributes.
///
/// An empty change set still renders (`SET` with no clauses); DynamoDB rejects
/// it when the request is sent.
#[derive(Debug, Default)]
pub struct UpdateBuilder {
    update_expression: String,
    expression_attribute_names: HashMap<String, String>,
    expression_attribute_values: HashMap<String, AttributeValue>,
}

impl UpdateBuilder {
    pub fn from_changes(changes: &HashMap<String, AttributeValue>) -> Self {
        let mut builder = Self::default();
        // Sorted so the rendered expression is stable across runs.
        let ordered: BTreeMap<&String, &AttributeValue> = changes.iter().collect();
        let mut assignments = Vec::with_capacity(ordered.len());
        for (index, (name, value)) in ordered.into_iter().enumerate() {
            let name_placeholder = format!("#name{index}");
            let value_placeholder = format!(":val{index}");
            assignments.push(format!("{name_placeholder} = {value_placeholder}"));
            builder
                .expression_attribute_names
                .insert(name_placeholder, name.clone());
            builder
                .expression_attribute_values
                .insert(value_placeholder, value.clone());
        }
        builder.update_expression = format!("SET {}", assignments.join(", "))
            .trim_end()
            .to_string();
        builder
    }

    pub fn update_expression(&self) -> &str {
        &self.update_expression
    }

    pub fn expression_attribute_names(&self) -> &HashMap<String, String> {
        &self.expression_attribute_names
    }

    pub fn expression_attribute_values(&self) -> &HashMap<String, AttributeValue> {
        &self.expression_attribute_values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_sorted_assignments() {
        let changes = HashMap::from([
            ("price".to_string(), AttributeValue::N("10".to_string())),
            ("name".to_string(), AttributeValue::S("Desk".to_string())),
        ]);
        let builder = UpdateBuilder::from_changes(&changes);
        assert_eq!(builder.update_expression(), "SET #name0 = :val0, #name1 = :val1");
        assert_eq!(
            builder.expression_attribute_names().get("#name0"),
            Some(&"name".to_string())
        );
        assert_eq!(
            builder.expression_attribute_values().get(":val1"),
            Some(&AttributeValue::N("10".to_string()))
        );
    }

    #[test]
    fn empty_changes_render_bare_set() {
        let builder = UpdateBuilder::from_changes(&HashMap::new());
        assert!(builder.expression_attribute_names().is_empty());
        assert_eq!(builder.update_expression(), "SET");
    }
}
