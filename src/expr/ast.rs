/// Filter expression tree rendered into a DynamoDB `FilterExpression` by
/// [`crate::dynamodb::ScanBuilder`] and evaluated directly by the in-memory store.
#[derive(Debug, Clone, PartialEq)]
pub enum DynamoExpression {
    Comparison {
        left: Operand,
        operator: Comparator,
        right: Operand,
    },
    /// Inclusive on both ends, like DynamoDB's `BETWEEN`.
    Between {
        operand: Operand,
        lower: Operand,
        upper: Operand,
    },
    Function {
        name: FunctionName,
        args: Vec<Operand>,
    },
    And(Box<DynamoExpression>, Box<DynamoExpression>),
}

impl DynamoExpression {
    pub fn and(self, other: DynamoExpression) -> DynamoExpression {
        DynamoExpression::And(Box::new(self), Box::new(other))
    }

    pub fn equals(path: &str, value: Operand) -> DynamoExpression {
        DynamoExpression::Comparison {
            left: Operand::Path(path.to_string()),
            operator: Comparator::Equal,
            right: value,
        }
    }

    pub fn between(path: &str, lower: Operand, upper: Operand) -> DynamoExpression {
        DynamoExpression::Between {
            operand: Operand::Path(path.to_string()),
            lower,
            upper,
        }
    }

    pub fn contains(path: &str, value: Operand) -> DynamoExpression {
        DynamoExpression::Function {
            name: FunctionName::Contains,
            args: vec![Operand::Path(path.to_string()), value],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Path(String),
    Value(String),
    Number(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Comparator {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FunctionName {
    AttributeExists,
    BeginsWith,
    Contains,
}
