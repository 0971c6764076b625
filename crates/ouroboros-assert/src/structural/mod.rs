//! Structural (deep) equality over serde-serializable values
//!
//! Both values are turned into a [`Node`] tree and walked side by side.
//! [`equal`] stops at the first difference, [`diff`] collects all of them.
//!
//! Sequences compare in order. Sets serialize as sequences, so their
//! iteration order leaks into the result. Maps compare by key.

mod node;
mod options;

use std::fmt;

use serde::Serialize;

pub use node::{to_node, Fields, Node, NodeSerializer};
pub use options::{
    comparator, comparator_for, ignore_field, treat_internal, CompareFn, CompareOption,
    CompareOptions,
};

use crate::error::Result;

/// Compare two values structurally
pub fn equal<T: Serialize + ?Sized>(a: &T, b: &T, options: &CompareOptions) -> Result<bool> {
    let (a, b) = (to_node(a)?, to_node(b)?);
    let mut walker = Walker::new(options, true);
    walker.walk(&a, &b);
    Ok(walker.differences.is_empty())
}

/// Collect every structural difference between `expected` and `actual`
pub fn diff<T: Serialize + ?Sized>(
    expected: &T,
    actual: &T,
    options: &CompareOptions,
) -> Result<Vec<Difference>> {
    let (expected, actual) = (to_node(expected)?, to_node(actual)?);
    let mut walker = Walker::new(options, false);
    walker.walk(&expected, &actual);
    Ok(walker.differences)
}

/// One difference found by [`diff`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Difference {
    /// Rendered location, e.g. `items[1].price` (empty for the root)
    pub path: String,
    /// Expected side, `None` if the element only exists in `actual`
    pub expected: Option<String>,
    /// Actual side, `None` if the element is missing from `actual`
    pub actual: Option<String>,
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "<root>" } else { &self.path };
        match (&self.expected, &self.actual) {
            (Some(expected), Some(actual)) => write!(f, "{}: got {}, want {}", path, actual, expected),
            (Some(expected), None) => write!(f, "{}: missing, want {}", path, expected),
            (None, Some(actual)) => write!(f, "{}: unexpected {}", path, actual),
            (None, None) => write!(f, "{}: differs", path),
        }
    }
}

#[derive(Debug, Clone)]
enum Segment {
    Field(&'static str),
    Index(usize),
    Key(String),
}

struct Walker<'o> {
    options: &'o CompareOptions,
    first_only: bool,
    path: Vec<Segment>,
    differences: Vec<Difference>,
}

impl<'o> Walker<'o> {
    fn new(options: &'o CompareOptions, first_only: bool) -> Self {
        Self {
            options,
            first_only,
            path: Vec::new(),
            differences: Vec::new(),
        }
    }

    fn done(&self) -> bool {
        self.first_only && !self.differences.is_empty()
    }

    /// Dotted path of named fields only, used for ignore matching
    fn field_path(&self, next: &str) -> String {
        let mut path = String::new();
        for segment in &self.path {
            if let Segment::Field(name) = segment {
                path.push_str(name);
                path.push('.');
            }
        }
        path.push_str(next);
        path
    }

    fn rendered_path(&self) -> String {
        let mut path = String::new();
        for segment in &self.path {
            match segment {
                Segment::Field(name) => {
                    if !path.is_empty() {
                        path.push('.');
                    }
                    path.push_str(name);
                }
                Segment::Index(index) => path.push_str(&format!("[{}]", index)),
                Segment::Key(key) => path.push_str(&format!("[{}]", key)),
            }
        }
        path
    }

    fn record(&mut self, expected: Option<&Node>, actual: Option<&Node>) {
        self.differences.push(Difference {
            path: self.rendered_path(),
            expected: expected.map(Node::to_string),
            actual: actual.map(Node::to_string),
        });
    }

    fn nested(&mut self, segment: Segment, a: &Node, b: &Node) {
        self.path.push(segment);
        self.walk(a, b);
        self.path.pop();
    }

    fn walk(&mut self, a: &Node, b: &Node) {
        if self.done() {
            return;
        }

        if let (Some(name_a), Some(name_b)) = (a.type_name(), b.type_name()) {
            let options = self.options;
            if name_a == name_b {
                if let Some(comparators) = options.comparators_for(name_a) {
                    if !comparators.iter().all(|compare| compare(a, b)) {
                        self.record(Some(a), Some(b));
                    }
                    return;
                }
            }
        }

        match (a, b) {
            (
                Node::Struct {
                    name: name_a,
                    fields: fields_a,
                },
                Node::Struct {
                    name: name_b,
                    fields: fields_b,
                },
            ) if name_a == name_b => self.walk_fields(a, b, fields_a, fields_b),
            (
                Node::Variant {
                    name: name_a,
                    variant: variant_a,
                    fields: fields_a,
                },
                Node::Variant {
                    name: name_b,
                    variant: variant_b,
                    fields: fields_b,
                },
            ) if name_a == name_b && variant_a == variant_b => {
                self.walk_fields(a, b, fields_a, fields_b)
            }
            (Node::Some(inner_a), Node::Some(inner_b)) => self.walk(inner_a, inner_b),
            (Node::Seq(items_a), Node::Seq(items_b)) => self.walk_seq(items_a, items_b),
            (Node::Map(entries_a), Node::Map(entries_b)) => self.walk_map(entries_a, entries_b),
            _ => {
                if a != b {
                    self.record(Some(a), Some(b));
                }
            }
        }
    }

    fn walk_fields(&mut self, a: &Node, b: &Node, fields_a: &Fields, fields_b: &Fields) {
        match (fields_a, fields_b) {
            (Fields::Unit, Fields::Unit) => {}
            (Fields::Newtype(inner_a), Fields::Newtype(inner_b)) => self.walk(inner_a, inner_b),
            (Fields::Tuple(items_a), Fields::Tuple(items_b)) => self.walk_seq(items_a, items_b),
            (Fields::Named(named_a), Fields::Named(named_b)) => self.walk_named(named_a, named_b),
            _ => self.record(Some(a), Some(b)),
        }
    }

    fn skips(&self, field: &str) -> bool {
        (!self.options.treats_internal() && field.starts_with('_'))
            || self.options.is_ignored(&self.field_path(field))
    }

    fn walk_named(&mut self, named_a: &[(&'static str, Node)], named_b: &[(&'static str, Node)]) {
        for (field, value_a) in named_a {
            if self.done() {
                return;
            }
            if self.skips(field) {
                continue;
            }
            match named_b.iter().find(|(other, _)| other == field) {
                Some((_, value_b)) => self.nested(Segment::Field(*field), value_a, value_b),
                None => {
                    self.path.push(Segment::Field(*field));
                    self.record(Some(value_a), None);
                    self.path.pop();
                }
            }
        }

        // fields only present on one side (skip_serializing_if and friends)
        for (field, value_b) in named_b {
            if self.done() {
                return;
            }
            if self.skips(field) || named_a.iter().any(|(other, _)| other == field) {
                continue;
            }
            self.path.push(Segment::Field(*field));
            self.record(None, Some(value_b));
            self.path.pop();
        }
    }

    fn walk_seq(&mut self, items_a: &[Node], items_b: &[Node]) {
        for (index, (item_a, item_b)) in items_a.iter().zip(items_b).enumerate() {
            self.nested(Segment::Index(index), item_a, item_b);
        }

        let common = items_a.len().min(items_b.len());
        for (index, item) in items_a.iter().enumerate().skip(common) {
            if self.done() {
                return;
            }
            self.path.push(Segment::Index(index));
            self.record(Some(item), None);
            self.path.pop();
        }
        for (index, item) in items_b.iter().enumerate().skip(common) {
            if self.done() {
                return;
            }
            self.path.push(Segment::Index(index));
            self.record(None, Some(item));
            self.path.pop();
        }
    }

    /// Maps are matched by key, so iteration order does not matter
    fn walk_map(&mut self, entries_a: &[(Node, Node)], entries_b: &[(Node, Node)]) {
        for (key, value_a) in entries_a {
            if self.done() {
                return;
            }
            let segment = Segment::Key(key.to_string());
            match entries_b.iter().find(|(other, _)| other == key) {
                Some((_, value_b)) => self.nested(segment, value_a, value_b),
                None => {
                    self.path.push(segment);
                    self.record(Some(value_a), None);
                    self.path.pop();
                }
            }
        }

        for (key, value_b) in entries_b {
            if self.done() {
                return;
            }
            if entries_a.iter().any(|(other, _)| other == key) {
                continue;
            }
            self.path.push(Segment::Key(key.to_string()));
            self.record(None, Some(value_b));
            self.path.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Serialize)]
    struct Address {
        street: String,
        city: String,
    }

    #[derive(Serialize)]
    struct Customer {
        name: String,
        address: Address,
        orders: Vec<Order>,
        _revision: u32,
    }

    #[derive(Serialize)]
    struct Order {
        sku: String,
        price: f64,
    }

    #[derive(Serialize)]
    struct Timestamp {
        seconds: i64,
        nanos: i32,
    }

    fn customer(city: &str, price: f64, revision: u32) -> Customer {
        Customer {
            name: "ada".to_string(),
            address: Address {
                street: "1 Main St".to_string(),
                city: city.to_string(),
            },
            orders: vec![
                Order {
                    sku: "A-1".to_string(),
                    price: 10.0,
                },
                Order {
                    sku: "B-2".to_string(),
                    price,
                },
            ],
            _revision: revision,
        }
    }

    #[test]
    fn test_equal_values() {
        let options = CompareOptions::default();
        assert!(equal(&customer("Oslo", 5.0, 1), &customer("Oslo", 5.0, 1), &options).unwrap());
        assert!(!equal(&customer("Oslo", 5.0, 1), &customer("Rome", 5.0, 1), &options).unwrap());
    }

    #[test]
    fn test_diff_reports_paths() {
        let diffs = diff(
            &customer("Oslo", 5.0, 1),
            &customer("Rome", 7.5, 1),
            &CompareOptions::default(),
        )
        .unwrap();

        assert_eq!(diffs.len(), 2);
        assert_eq!(diffs[0].path, "address.city");
        assert_eq!(diffs[0].expected.as_deref(), Some("\"Oslo\""));
        assert_eq!(diffs[0].actual.as_deref(), Some("\"Rome\""));
        assert_eq!(diffs[1].path, "orders[1].price");
        assert_eq!(diffs[1].to_string(), "orders[1].price: got 7.5, want 5.0");
    }

    #[test]
    fn test_ignore_field() {
        let options = CompareOptions::new([ignore_field("address.city"), ignore_field("orders.price")]);
        assert!(equal(&customer("Oslo", 5.0, 1), &customer("Rome", 9.0, 1), &options).unwrap());

        // a bare field name does not match a nested path
        let options = CompareOptions::new([ignore_field("city")]);
        assert!(!equal(&customer("Oslo", 5.0, 1), &customer("Rome", 5.0, 1), &options).unwrap());
    }

    #[test]
    fn test_internal_fields() {
        let (a, b) = (customer("Oslo", 5.0, 1), customer("Oslo", 5.0, 2));
        assert!(!equal(&a, &b, &CompareOptions::default()).unwrap());
        assert!(equal(&a, &b, &CompareOptions::new([treat_internal(false)])).unwrap());
    }

    #[test]
    fn test_comparator_by_type() {
        let a = vec![Timestamp { seconds: 10, nanos: 1 }];
        let b = vec![Timestamp { seconds: 10, nanos: 999 }];
        let same_second = comparator_for::<Timestamp, _>(|a, b| a.field("seconds") == b.field("seconds"));

        assert!(!equal(&a, &b, &CompareOptions::default()).unwrap());
        assert!(equal(&a, &b, &CompareOptions::new([same_second.clone()])).unwrap());

        // every comparator registered for a type must agree
        let never = comparator("Timestamp", |_, _| false);
        assert!(!equal(&a, &b, &CompareOptions::new([same_second, never])).unwrap());
    }

    #[test]
    fn test_maps_ignore_iteration_order() {
        let a: HashMap<String, u32> = (0..32).map(|i| (format!("k{}", i), i)).collect();
        let b: HashMap<String, u32> = (0..32).rev().map(|i| (format!("k{}", i), i)).collect();
        assert!(equal(&a, &b, &CompareOptions::default()).unwrap());

        let mut c = b.clone();
        c.insert("extra".to_string(), 1);
        let diffs = diff(&a, &c, &CompareOptions::default()).unwrap();
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].path, "[\"extra\"]");
        assert_eq!(diffs[0].expected, None);
    }

    #[test]
    fn test_sequence_length_mismatch() {
        let diffs = diff(&vec![1, 2, 3], &vec![1], &CompareOptions::default()).unwrap();
        assert_eq!(
            diffs.iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["[1]: missing, want 2", "[2]: missing, want 3"]
        );
    }

    #[test]
    fn test_nan_is_not_equal() {
        assert!(!equal(&f64::NAN, &f64::NAN, &CompareOptions::default()).unwrap());
    }
}
