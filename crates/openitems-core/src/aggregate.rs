//! Grouping and summing of result set rows.
//!
//! [`aggregate`] folds a sequence of rows into an [`Aggregation`]: one
//! [`AggregateGroup`] per distinct value of the grouping column, in the order
//! the values were first seen. Missing data never fails the fold: rows without
//! a group value land in [`UNKNOWN_GROUP`] and missing or non-numeric sum
//! fields contribute zero.

use crate::value::Row;
use indexmap::{IndexMap, IndexSet};
use rust_decimal::Decimal;

/// Group key used for rows that have no value in the grouping column.
pub const UNKNOWN_GROUP: &str = "Desconhecido";

/// Running totals for one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateGroup {
    /// The group key.
    pub key: String,
    /// Sum of the explicit count column (zero when no count column is used).
    pub count: i64,
    /// Totals per summed column, in the order the columns were requested.
    pub sums: IndexMap<String, Decimal>,
}

impl AggregateGroup {
    fn new<'f>(key: String, fields: impl IntoIterator<Item = &'f str>) -> Self {
        Self {
            key,
            count: 0,
            sums: fields
                .into_iter()
                .map(|f| (f.to_string(), Decimal::ZERO))
                .collect(),
        }
    }

    /// Total for a summed column; zero for columns that were not summed.
    pub fn sum(&self, field: &str) -> Decimal {
        self.sums.get(field).copied().unwrap_or(Decimal::ZERO)
    }
}

/// Groups in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Aggregation {
    groups: IndexMap<String, AggregateGroup>,
}

impl Aggregation {
    /// Look up a group by key.
    pub fn get(&self, key: &str) -> Option<&AggregateGroup> {
        self.groups.get(key)
    }

    /// The first group seen, if any.
    pub fn first(&self) -> Option<&AggregateGroup> {
        self.groups.first().map(|(_, g)| g)
    }

    /// Iterate over groups in emission order.
    pub fn iter(&self) -> impl Iterator<Item = &AggregateGroup> {
        self.groups.values()
    }

    /// Iterate over group keys in emission order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Check if no rows were aggregated.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Sum of counts over all groups.
    pub fn total_count(&self) -> i64 {
        self.groups.values().map(|g| g.count).sum()
    }

    /// Sum of one summed column over all groups.
    pub fn total(&self, field: &str) -> Decimal {
        self.groups.values().map(|g| g.sum(field)).sum()
    }

    fn add_row(
        mut self,
        row: &Row,
        group_by: &str,
        fields: &IndexSet<&str>,
        count_field: Option<&str>,
    ) -> Self {
        let key = row
            .get(group_by)
            .and_then(crate::Value::as_key)
            .unwrap_or_else(|| UNKNOWN_GROUP.to_string());

        let group = self
            .groups
            .entry(key.clone())
            .or_insert_with(|| AggregateGroup::new(key, fields.iter().copied()));

        if let Some(count_field) = count_field {
            group.count += row.get(count_field).map_or(0, crate::Value::as_count);
        }
        for field in fields {
            let addend = row.get(field).map_or(Decimal::ZERO, crate::Value::as_decimal);
            if let Some(total) = group.sums.get_mut(*field) {
                *total += addend;
            }
        }
        self
    }
}

impl<'a> IntoIterator for &'a Aggregation {
    type Item = &'a AggregateGroup;
    type IntoIter = indexmap::map::Values<'a, String, AggregateGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.values()
    }
}

/// Group `rows` by `group_by`, summing `sum_fields` and the optional
/// `count_field`.
///
/// Rows are never counted implicitly: without a `count_field` every group's
/// count stays zero. Repeated entries in `sum_fields` are summed once.
pub fn aggregate<'a, I, S>(
    rows: I,
    group_by: &str,
    sum_fields: &[S],
    count_field: Option<&str>,
) -> Aggregation
where
    I: IntoIterator<Item = &'a Row>,
    S: AsRef<str>,
{
    let fields: IndexSet<&str> = sum_fields.iter().map(AsRef::as_ref).collect();
    rows.into_iter().fold(Aggregation::default(), |acc, row| {
        acc.add_row(row, group_by, &fields, count_field)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;
    use rust_decimal_macros::dec;

    fn payments() -> Vec<Row> {
        vec![
            Row::new().with("TYPE", "PIX").with("AMOUNT", 100).with("QTY", 1),
            Row::new().with("TYPE", "PIX").with("AMOUNT", 50).with("QTY", 2),
            Row::new().with("TYPE", "BOLETO").with("AMOUNT", 200).with("QTY", 4),
        ]
    }

    #[test]
    fn test_groups_in_first_seen_order() {
        let groups = aggregate(&payments(), "TYPE", &["AMOUNT"], None);
        let keys: Vec<_> = groups.keys().collect();
        assert_eq!(keys, ["PIX", "BOLETO"]);
        assert_eq!(groups.get("PIX").unwrap().sum("AMOUNT"), dec!(150));
        assert_eq!(groups.get("BOLETO").unwrap().sum("AMOUNT"), dec!(200));
        assert_eq!(groups.total("AMOUNT"), dec!(350));
    }

    #[test]
    fn test_count_field_is_summed() {
        let groups = aggregate(&payments(), "TYPE", &["AMOUNT"], Some("QTY"));
        assert_eq!(groups.get("PIX").unwrap().count, 3);
        assert_eq!(groups.get("BOLETO").unwrap().count, 4);
        assert_eq!(groups.total_count(), 7);
    }

    #[test]
    fn test_no_implicit_row_count() {
        let groups = aggregate(&payments(), "TYPE", &["AMOUNT"], None);
        assert!(groups.iter().all(|g| g.count == 0));
    }

    #[test]
    fn test_missing_group_column_uses_unknown() {
        let rows = vec![
            Row::new().with("AMOUNT", 10),
            Row::new().with("TYPE", Value::Null).with("AMOUNT", 5),
            Row::new().with("TYPE", "PIX").with("AMOUNT", 1),
        ];
        let groups = aggregate(&rows, "TYPE", &["AMOUNT"], None);
        let keys: Vec<_> = groups.keys().collect();
        assert_eq!(keys, [UNKNOWN_GROUP, "PIX"]);
        assert_eq!(groups.get(UNKNOWN_GROUP).unwrap().sum("AMOUNT"), dec!(15));
    }

    #[test]
    fn test_missing_and_non_numeric_sum_fields_add_zero() {
        let rows = vec![
            Row::new().with("TYPE", "PIX"),
            Row::new().with("TYPE", "PIX").with("AMOUNT", "not a number"),
            Row::new().with("TYPE", "PIX").with("AMOUNT", dec!(2.5)),
        ];
        let groups = aggregate(&rows, "TYPE", &["AMOUNT", "FEE"], None);
        let pix = groups.get("PIX").unwrap();
        assert_eq!(pix.sum("AMOUNT"), dec!(2.5));
        assert_eq!(pix.sum("FEE"), Decimal::ZERO);
        assert_eq!(pix.sums.len(), 2);
    }

    #[test]
    fn test_empty_rows_yield_empty_aggregation() {
        let groups = aggregate(&Vec::<Row>::new(), "TYPE", &["AMOUNT"], Some("QTY"));
        assert!(groups.is_empty());
        assert!(groups.first().is_none());
        assert_eq!(groups.total("AMOUNT"), Decimal::ZERO);
    }

    #[test]
    fn test_numeric_group_keys_use_their_text() {
        let rows = vec![Row::new().with("YEAR", 2024).with("AMOUNT", 1)];
        let groups = aggregate(&rows, "YEAR", &["AMOUNT"], None);
        assert_eq!(groups.first().unwrap().key, "2024");
    }

    #[test]
    fn test_repeated_sum_field_counted_once() {
        let groups = aggregate(&payments(), "TYPE", &["AMOUNT", "AMOUNT"], None);
        assert_eq!(groups.total("AMOUNT"), dec!(350));
    }
}
