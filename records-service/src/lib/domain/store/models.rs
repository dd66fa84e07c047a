use std::fmt;

use serde_json::Map;
use serde_json::Value;

/// Free-form record as held by a document store.
pub type Document = Map<String, Value>;

/// Primary-key field present on every stored document.
pub const ID_FIELD: &str = "_id";

/// Backend selected for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Persistent,
    Emulated,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Persistent => "persistent",
            BackendKind::Emulated => "emulated",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural query over documents.
///
/// Only the operators the service needs are supported: primary-key lookup,
/// field-equality conjunctions and a logical-or of such conjunctions.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Exact `_id` match
    ById(String),

    /// Every listed field must equal the given value (empty matches everything)
    Eq(Document),

    /// At least one branch must match (no branches matches nothing)
    Or(Vec<Document>),
}

impl Filter {
    /// Match every document.
    pub fn all() -> Self {
        Filter::Eq(Document::new())
    }

    /// Primary-key lookup.
    pub fn by_id(id: impl Into<String>) -> Self {
        Filter::ById(id.into())
    }

    /// Single field-equality condition.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::all().and(field, value)
    }

    /// Logical-or of filters.
    ///
    /// Nested `Or` branches are flattened; `ById` becomes an `_id` equality.
    pub fn or(filters: impl IntoIterator<Item = Filter>) -> Self {
        let branches = filters
            .into_iter()
            .flat_map(|filter| filter.into_branches())
            .collect();
        Filter::Or(branches)
    }

    /// Add a field-equality condition to the filter.
    ///
    /// On an `Or` the condition is added to every branch.
    pub fn and(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        let field = field.into();
        let value = value.into();

        match self {
            Filter::Eq(mut fields) => {
                fields.insert(field, value);
                Filter::Eq(fields)
            }
            Filter::ById(id) => {
                let mut fields = Document::new();
                fields.insert(ID_FIELD.to_string(), Value::String(id));
                fields.insert(field, value);
                Filter::Eq(fields)
            }
            Filter::Or(branches) => Filter::Or(
                branches
                    .into_iter()
                    .map(|mut branch| {
                        branch.insert(field.clone(), value.clone());
                        branch
                    })
                    .collect(),
            ),
        }
    }

    /// Structural match of the filter against a document.
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Filter::ById(id) => document
                .get(ID_FIELD)
                .and_then(Value::as_str)
                .map_or(false, |candidate| candidate == id),
            Filter::Eq(fields) => fields_match(fields, document),
            Filter::Or(branches) => branches
                .iter()
                .any(|branch| fields_match(branch, document)),
        }
    }

    fn into_branches(self) -> Vec<Document> {
        match self {
            Filter::ById(id) => {
                let mut fields = Document::new();
                fields.insert(ID_FIELD.to_string(), Value::String(id));
                vec![fields]
            }
            Filter::Eq(fields) => vec![fields],
            Filter::Or(branches) => branches,
        }
    }
}

fn fields_match(fields: &Document, document: &Document) -> bool {
    fields
        .iter()
        .all(|(field, expected)| document.get(field) == Some(expected))
}

/// `$set`-style modification applied by `update_one`.
///
/// Top-level fields only; `_id` can never be changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Changes(Document);

impl Changes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field to a value.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        let field = field.into();
        if field != ID_FIELD {
            self.0.insert(field, value.into());
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_document(&self) -> &Document {
        &self.0
    }

    /// Overwrite the changed fields on a document in place.
    pub fn apply_to(&self, document: &mut Document) {
        for (field, value) in &self.0 {
            document.insert(field.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("test documents must be objects"),
        }
    }

    #[test]
    fn test_by_id_matches_only_primary_key() {
        let record = doc(json!({"_id": "abc", "username": "abc"}));

        assert!(Filter::by_id("abc").matches(&record));
        assert!(!Filter::by_id("abd").matches(&record));
        assert!(!Filter::by_id("abc").matches(&doc(json!({"username": "abc"}))));
    }

    #[test]
    fn test_eq_is_a_conjunction() {
        let record = doc(json!({"role": "doctor", "isActive": true}));

        assert!(Filter::eq("role", "doctor").matches(&record));
        assert!(Filter::eq("role", "doctor")
            .and("isActive", true)
            .matches(&record));
        assert!(!Filter::eq("role", "doctor")
            .and("isActive", false)
            .matches(&record));
        assert!(!Filter::eq("missing", "doctor").matches(&record));
    }

    #[test]
    fn test_empty_eq_matches_everything() {
        assert!(Filter::all().matches(&doc(json!({"anything": 1}))));
        assert!(Filter::all().matches(&Document::new()));
    }

    #[test]
    fn test_or_matches_any_branch() {
        let filter = Filter::or([Filter::eq("role", "doctor"), Filter::eq("role", "nurse")]);

        assert!(filter.matches(&doc(json!({"role": "doctor"}))));
        assert!(filter.matches(&doc(json!({"role": "nurse"}))));
        assert!(!filter.matches(&doc(json!({"role": "admin"}))));
    }

    #[test]
    fn test_empty_or_matches_nothing() {
        assert!(!Filter::Or(Vec::new()).matches(&doc(json!({"role": "doctor"}))));
    }

    #[test]
    fn test_or_flattens_nested_filters() {
        let filter = Filter::or([
            Filter::or([Filter::eq("a", 1), Filter::eq("b", 2)]),
            Filter::by_id("x"),
        ]);

        match &filter {
            Filter::Or(branches) => assert_eq!(branches.len(), 3),
            other => panic!("expected Or, got {:?}", other),
        }
        assert!(filter.matches(&doc(json!({"_id": "x"}))));
        assert!(filter.matches(&doc(json!({"b": 2}))));
    }

    #[test]
    fn test_and_distributes_over_or() {
        let filter = Filter::or([Filter::eq("username", "x"), Filter::eq("email", "x")])
            .and("isActive", true);

        assert!(filter.matches(&doc(json!({"email": "x", "isActive": true}))));
        assert!(!filter.matches(&doc(json!({"email": "x", "isActive": false}))));
    }

    #[test]
    fn test_values_compare_by_type() {
        let record = doc(json!({"count": 1}));

        assert!(Filter::eq("count", 1).matches(&record));
        assert!(!Filter::eq("count", "1").matches(&record));
    }

    #[test]
    fn test_changes_never_touch_id() {
        let changes = Changes::new().set("_id", "other").set("isActive", false);
        let mut record = doc(json!({"_id": "abc", "isActive": true, "role": "nurse"}));

        changes.apply_to(&mut record);

        assert_eq!(record, doc(json!({"_id": "abc", "isActive": false, "role": "nurse"})));
    }
}
