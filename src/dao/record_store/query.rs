use std::cmp::Ordering;

use serde_json::Value;

use super::Document;

/// Sort direction for [`OrderBy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Smallest first.
    Asc,
    /// Largest first.
    Desc,
}

/// Ordering on a single persisted field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Field name in the stored document.
    pub field: String,
    /// Sort direction.
    pub direction: Direction,
}

/// Exact-match filter, single-field ordering and limit applied by `RecordStore::list`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    /// `(field, value)` pairs that must all match.
    pub filter: Vec<(String, Value)>,
    /// Optional ordering; insertion order otherwise.
    pub order_by: Option<OrderBy>,
    /// Maximum number of records returned.
    pub limit: Option<usize>,
}

impl ListQuery {
    /// Query returning every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only keep records whose `field` equals `value`.
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter.push((field.into(), value.into()));
        self
    }

    /// Sort results on `field`.
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    /// Return at most `limit` records.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether a document satisfies every filter clause. Missing fields compare as null.
    pub fn matches(&self, document: &Document) -> bool {
        self.filter.iter().all(|(field, expected)| {
            let actual = document.get(field).unwrap_or(&Value::Null);
            compare_values(actual, expected) == Ordering::Equal
        })
    }

    /// Evaluate the query in-process over documents given in storage order.
    ///
    /// Sorting is stable so records sharing a sort key keep their storage order.
    pub fn apply(&self, documents: impl IntoIterator<Item = Document>) -> Vec<Document> {
        let mut selected = documents
            .into_iter()
            .filter(|doc| self.matches(doc))
            .collect::<Vec<_>>();

        if let Some(order) = &self.order_by {
            selected.sort_by(|a, b| {
                let left = a.get(&order.field).unwrap_or(&Value::Null);
                let right = b.get(&order.field).unwrap_or(&Value::Null);
                match order.direction {
                    Direction::Asc => compare_values(left, right),
                    Direction::Desc => compare_values(right, left),
                }
            });
        }

        if let Some(limit) = self.limit {
            selected.truncate(limit);
        }

        selected
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Total order over JSON values: null < bool < number < string < array < object.
pub fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => {
            let a = a.as_f64().unwrap_or(f64::NAN);
            let b = b.as_f64().unwrap_or(f64::NAN);
            a.total_cmp(&b)
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Array(a), Value::Array(b)) => a
            .iter()
            .zip(b.iter())
            .map(|(x, y)| compare_values(x, y))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| a.len().cmp(&b.len())),
        (Value::Object(a), Value::Object(b)) if a == b => Ordering::Equal,
        (Value::Object(_), Value::Object(_)) => left.to_string().cmp(&right.to_string()),
        _ => type_rank(left).cmp(&type_rank(right)),
    }
}
