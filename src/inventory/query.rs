use crate::expr::{DynamoExpression, Operand};

use super::error::InventoryError;
use super::timestamp::{self, Bound, MAX_TIMESTAMP, MIN_TIMESTAMP};
use super::types::{
    AdditionalInventoryFilters, InventoryFilters, InventoryItem, ItemFilters, NumberInput,
    Pagination, SortRequest,
};

pub const DATE_ATTRIBUTE: &str = "last_updated_dt";

#[derive(Debug, Clone, PartialEq)]
pub struct ScanPlan {
    pub filter: DynamoExpression,
    /// `None` when the caller asked for no pagination at all.
    pub pagination: Option<PageRequest>,
    pub sort: Option<SortSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    Category,
    Price,
    CreatedDt,
    LastUpdatedDt,
}

impl SortField {
    pub fn parse(field: &str) -> Option<Self> {
        Some(match field {
            "id" => SortField::Id,
            "name" => SortField::Name,
            "category" => SortField::Category,
            "price" => SortField::Price,
            "created_dt" => SortField::CreatedDt,
            "last_updated_dt" => SortField::LastUpdatedDt,
            _ => return None,
        })
    }

    pub fn compare(self, a: &InventoryItem, b: &InventoryItem) -> std::cmp::Ordering {
        match self {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Name => a.name.cmp(&b.name),
            SortField::Category => a.category.cmp(&b.category),
            SortField::Price => a.price.total_cmp(&b.price),
            SortField::CreatedDt => a.created_dt.cmp(&b.created_dt),
            SortField::LastUpdatedDt => a.last_updated_dt.cmp(&b.last_updated_dt),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Plan for the default listing: date range plus optional exact category.
pub fn default_plan(filters: &InventoryFilters) -> Result<ScanPlan, InventoryError> {
    let mut filter = date_range(filters.dt_from.as_deref(), filters.dt_to.as_deref())?;
    if let Some(category) = non_empty(filters.category.as_deref()) {
        filter = filter.and(DynamoExpression::equals(
            "category",
            Operand::Value(category.to_string()),
        ));
    }
    Ok(ScanPlan {
        filter,
        pagination: None,
        sort: None,
    })
}

/// Plan for the extended listing: date range, name substring, category,
/// price range, pagination and sort.
pub fn extended_plan(filters: &AdditionalInventoryFilters) -> Result<ScanPlan, InventoryError> {
    let mut filter = date_range(filters.dt_from.as_deref(), filters.dt_to.as_deref())?;
    if let Some(item_filters) = &filters.filters {
        for clause in item_clauses(item_filters)? {
            filter = filter.and(clause);
        }
    }
    Ok(ScanPlan {
        filter,
        pagination: filters.pagination.as_ref().map(page_request).transpose()?.flatten(),
        sort: filters.sort.as_ref().map(sort_spec).transpose()?.flatten(),
    })
}

fn date_range(dt_from: Option<&str>, dt_to: Option<&str>) -> Result<DynamoExpression, InventoryError> {
    let from = match non_empty(dt_from) {
        Some(value) => timestamp::parse_bound(value, Bound::Start).map_err(InventoryError::Validation)?,
        None => MIN_TIMESTAMP.to_string(),
    };
    let to = match non_empty(dt_to) {
        Some(value) => timestamp::parse_bound(value, Bound::End).map_err(InventoryError::Validation)?,
        None => MAX_TIMESTAMP.to_string(),
    };
    // Both bounds share the +08:00 rendering, so text order is time order.
    if from > to {
        return Err(InventoryError::validation(format!(
            "dt_from ({from}) is after dt_to ({to})"
        )));
    }
    Ok(DynamoExpression::between(
        DATE_ATTRIBUTE,
        Operand::Value(from),
        Operand::Value(to),
    ))
}

fn item_clauses(filters: &ItemFilters) -> Result<Vec<DynamoExpression>, InventoryError> {
    let mut clauses = Vec::new();
    if let Some(name) = non_empty(filters.name.as_deref()) {
        clauses.push(DynamoExpression::contains(
            "name",
            Operand::Value(name.to_string()),
        ));
    }
    if let Some(category) = non_empty(filters.category.as_deref()) {
        clauses.push(DynamoExpression::equals(
            "category",
            Operand::Value(category.to_string()),
        ));
    }
    if let Some((low, high)) = price_range(filters.price_range.as_deref())? {
        clauses.push(DynamoExpression::between(
            "price",
            Operand::Number(low),
            Operand::Number(high),
        ));
    }
    Ok(clauses)
}

fn price_range(range: Option<&[NumberInput]>) -> Result<Option<(f64, f64)>, InventoryError> {
    let [low, high] = match range {
        None | Some([]) => return Ok(None),
        Some([low, high]) => [low, high],
        Some(other) => {
            return Err(InventoryError::validation(format!(
                "price_range needs exactly two bounds, got {}",
                other.len()
            )));
        }
    };
    let low = price_bound(low)?;
    let high = price_bound(high)?;
    if low > high {
        return Err(InventoryError::validation(format!(
            "price_range lower bound {low} is above upper bound {high}"
        )));
    }
    Ok(Some((low, high)))
}

fn price_bound(input: &NumberInput) -> Result<f64, InventoryError> {
    match input.value() {
        Ok(Some(value)) if value.is_finite() => Ok(value),
        _ => Err(InventoryError::validation(format!(
            "price_range bound {input:?} is not a number"
        ))),
    }
}

fn page_request(pagination: &Pagination) -> Result<Option<PageRequest>, InventoryError> {
    let page = positive_integer("page", pagination.page.as_ref())?;
    let limit = positive_integer("limit", pagination.limit.as_ref())?;
    if page.is_none() && limit.is_none() {
        return Ok(None);
    }
    Ok(Some(PageRequest { page, limit }))
}

fn positive_integer(label: &str, input: Option<&NumberInput>) -> Result<Option<u32>, InventoryError> {
    let Some(input) = input else {
        return Ok(None);
    };
    let value = match input.value() {
        Ok(None) => return Ok(None),
        Ok(Some(value)) => value,
        Err(_) => {
            return Err(InventoryError::validation(format!(
                "pagination {label} is not a number"
            )));
        }
    };
    if value.fract() != 0.0 || value < 1.0 || value > i32::MAX as f64 {
        return Err(InventoryError::validation(format!(
            "pagination {label} must be a whole number of at least 1, got {value}"
        )));
    }
    Ok(Some(value as u32))
}

fn sort_spec(sort: &SortRequest) -> Result<Option<SortSpec>, InventoryError> {
    let Some(field) = non_empty(sort.field.as_deref()) else {
        return Ok(None);
    };
    let field = SortField::parse(field)
        .ok_or_else(|| InventoryError::validation(format!("cannot sort by unknown field {field:?}")))?;
    let order = match non_empty(sort.order.as_deref()) {
        None => SortOrder::Asc,
        Some(order) if order.eq_ignore_ascii_case("asc") => SortOrder::Asc,
        Some(order) if order.eq_ignore_ascii_case("desc") => SortOrder::Desc,
        Some(order) => {
            return Err(InventoryError::validation(format!(
                "sort order must be asc or desc, got {order:?}"
            )));
        }
    };
    Ok(Some(SortSpec { field, order }))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamodb::ScanBuilder;

    fn rendered(plan: &ScanPlan) -> String {
        ScanBuilder::from_expression(&plan.filter)
            .filter_expression()
            .cloned()
            .unwrap_or_default()
    }

    fn extended(filters: ItemFilters) -> AdditionalInventoryFilters {
        AdditionalInventoryFilters {
            filters: Some(filters),
            ..Default::default()
        }
    }

    #[test]
    fn default_plan_always_bounds_dates() {
        let plan = default_plan(&InventoryFilters::default()).unwrap();
        assert_eq!(
            plan.filter,
            DynamoExpression::between(
                DATE_ATTRIBUTE,
                Operand::Value(MIN_TIMESTAMP.into()),
                Operand::Value(MAX_TIMESTAMP.into()),
            )
        );
        assert!(plan.pagination.is_none());
        assert!(plan.sort.is_none());
    }

    #[test]
    fn default_plan_adds_category_when_set() {
        let plan = default_plan(&InventoryFilters {
            category: Some("Books".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(rendered(&plan), "(#name0 BETWEEN :val0 AND :val1) AND (#name1 = :val2)");

        let plan = default_plan(&InventoryFilters {
            category: Some("  ".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(rendered(&plan), "#name0 BETWEEN :val0 AND :val1");
    }

    #[test]
    fn extended_plan_chains_all_clauses() {
        let plan = extended_plan(&extended(ItemFilters {
            name: Some("Lap".into()),
            category: Some("Electronics".into()),
            price_range: Some(vec![NumberInput::from(10.0), NumberInput::from("200")]),
        }))
        .unwrap();
        assert_eq!(
            rendered(&plan),
            "(((#name0 BETWEEN :val0 AND :val1) AND (contains(#name1, :val2))) AND (#name2 = :val3)) AND (#name3 BETWEEN :val4 AND :val5)"
        );
    }

    #[test]
    fn inverted_dates_are_rejected() {
        let err = default_plan(&InventoryFilters {
            dt_from: Some("2024-02-01".into()),
            dt_to: Some("2024-01-01".into()),
            category: None,
        })
        .unwrap_err();
        assert_eq!(err.status(), 400);
    }

    #[test]
    fn same_day_range_is_accepted() {
        let plan = default_plan(&InventoryFilters {
            dt_from: Some("2024-01-01".into()),
            dt_to: Some("2024-01-01".into()),
            category: None,
        })
        .unwrap();
        assert_eq!(
            plan.filter,
            DynamoExpression::between(
                DATE_ATTRIBUTE,
                Operand::Value("2024-01-01 00:00:00 +08:00".into()),
                Operand::Value("2024-01-01 23:59:59 +08:00".into()),
            )
        );
    }

    #[test]
    fn price_range_shapes() {
        let ok = |range: Vec<NumberInput>| {
            extended_plan(&extended(ItemFilters {
                price_range: Some(range),
                ..Default::default()
            }))
        };
        assert!(ok(vec![]).is_ok());
        assert!(ok(vec![NumberInput::from(1.0)]).is_err());
        assert!(ok(vec![1.0.into(), 2.0.into(), 3.0.into()]).is_err());
        assert!(ok(vec![NumberInput::from("cheap"), 2.0.into()]).is_err());
        assert!(ok(vec![NumberInput::from(""), 2.0.into()]).is_err());
        assert!(ok(vec![5.0.into(), 2.0.into()]).is_err());
        assert!(ok(vec![2.0.into(), 2.0.into()]).is_ok());
    }

    #[test]
    fn pagination_parsing() {
        let plan = |page: Option<NumberInput>, limit: Option<NumberInput>| {
            extended_plan(&AdditionalInventoryFilters {
                pagination: Some(Pagination { page, limit }),
                ..Default::default()
            })
        };
        assert_eq!(
            plan(Some("2".into()), Some(10.0.into())).unwrap().pagination,
            Some(PageRequest {
                page: Some(2),
                limit: Some(10)
            })
        );
        assert_eq!(plan(Some("".into()), Some("".into())).unwrap().pagination, None);
        assert_eq!(
            plan(None, Some(5.0.into())).unwrap().pagination,
            Some(PageRequest {
                page: None,
                limit: Some(5)
            })
        );
        assert!(plan(Some(0.0.into()), None).is_err());
        assert!(plan(None, Some("-3".into())).is_err());
        assert!(plan(Some("two".into()), None).is_err());
        assert!(plan(Some(1.5.into()), None).is_err());
    }

    #[test]
    fn sort_parsing() {
        let plan = |field: Option<&str>, order: Option<&str>| {
            extended_plan(&AdditionalInventoryFilters {
                sort: Some(SortRequest {
                    field: field.map(str::to_string),
                    order: order.map(str::to_string),
                }),
                ..Default::default()
            })
        };
        assert_eq!(
            plan(Some("price"), None).unwrap().sort,
            Some(SortSpec {
                field: SortField::Price,
                order: SortOrder::Asc
            })
        );
        assert_eq!(
            plan(Some("name"), Some("DESC")).unwrap().sort.map(|sort| sort.order),
            Some(SortOrder::Desc)
        );
        assert_eq!(plan(Some(""), Some("desc")).unwrap().sort, None);
        assert!(plan(Some("colour"), None).is_err());
        assert!(plan(Some("price"), Some("sideways")).is_err());
    }
}
