//! In-memory `VariableStore` with call-count instrumentation.
//!
//! The counters exist so tests can observe how often the resolver goes
//! back to the backing store, which is the contract the attribute cache
//! has to uphold.

use std::collections::BTreeMap;
use std::sync::Mutex;

use cf_model::{AttrValue, CfError, CfResult, DataType, VariableStore};

/// Definition of one variable held by a [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct VariableDef {
    name: String,
    dimensions: Vec<String>,
    shape: Vec<usize>,
    data_type: DataType,
    attributes: BTreeMap<String, AttrValue>,
    strings: Option<Vec<String>>,
}

impl VariableDef {
    /// Start a definition for a scalar variable of the given type.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            dimensions: Vec::new(),
            shape: Vec::new(),
            data_type,
            attributes: BTreeMap::new(),
            strings: None,
        }
    }

    /// Append a dimension with its extent.
    pub fn dim(mut self, name: impl Into<String>, extent: usize) -> Self {
        self.dimensions.push(name.into());
        self.shape.push(extent);
        self
    }

    /// Declare an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the decoded string payload (textual variables only).
    pub fn strings<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.strings = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// The variable name this definition was created with.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// In-memory implementation of [`VariableStore`].
///
/// Counts `attribute_names` and `attribute_value` calls per variable so
/// tests can assert the cache's at-most-once fetch behaviour.
#[derive(Default)]
pub struct MemoryStore {
    variables: BTreeMap<String, VariableDef>,
    globals: BTreeMap<String, AttrValue>,
    attr_name_calls: Mutex<BTreeMap<String, usize>>,
    attr_value_calls: Mutex<BTreeMap<String, usize>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable definition.
    pub fn with_variable(mut self, def: VariableDef) -> Self {
        self.variables.insert(def.name().to_string(), def);
        self
    }

    /// Add a dataset-level attribute.
    pub fn with_global(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.globals.insert(name.into(), value.into());
        self
    }

    /// How many times `attribute_names` has been called for `variable`.
    pub fn attribute_names_calls(&self, variable: &str) -> usize {
        self.attr_name_calls
            .lock()
            .expect("counter lock poisoned")
            .get(variable)
            .copied()
            .unwrap_or(0)
    }

    /// How many times `attribute_value` has been called for `variable`.
    pub fn attribute_value_calls(&self, variable: &str) -> usize {
        self.attr_value_calls
            .lock()
            .expect("counter lock poisoned")
            .get(variable)
            .copied()
            .unwrap_or(0)
    }

    fn def(&self, variable: &str) -> CfResult<&VariableDef> {
        self.variables
            .get(variable)
            .ok_or_else(|| CfError::VariableNotFound(variable.to_string()))
    }

    fn bump(counter: &Mutex<BTreeMap<String, usize>>, variable: &str) {
        *counter
            .lock()
            .expect("counter lock poisoned")
            .entry(variable.to_string())
            .or_insert(0) += 1;
    }
}

impl VariableStore for MemoryStore {
    fn variable_names(&self) -> Vec<String> {
        self.variables.keys().cloned().collect()
    }

    fn dimensions(&self, variable: &str) -> CfResult<Vec<String>> {
        Ok(self.def(variable)?.dimensions.clone())
    }

    fn shape(&self, variable: &str) -> CfResult<Vec<usize>> {
        Ok(self.def(variable)?.shape.clone())
    }

    fn data_type(&self, variable: &str) -> CfResult<DataType> {
        Ok(self.def(variable)?.data_type)
    }

    fn attribute_names(&self, variable: &str) -> CfResult<Vec<String>> {
        let def = self.def(variable)?;
        Self::bump(&self.attr_name_calls, variable);
        Ok(def.attributes.keys().cloned().collect())
    }

    fn attribute_value(&self, variable: &str, attribute: &str) -> CfResult<AttrValue> {
        let def = self.def(variable)?;
        Self::bump(&self.attr_value_calls, variable);
        def.attributes
            .get(attribute)
            .cloned()
            .ok_or_else(|| CfError::attribute_missing(variable, attribute))
    }

    fn global_attribute_names(&self) -> Vec<String> {
        self.globals.keys().cloned().collect()
    }

    fn global_attribute_value(&self, attribute: &str) -> CfResult<AttrValue> {
        self.globals
            .get(attribute)
            .cloned()
            .ok_or_else(|| CfError::GlobalAttributeMissing(attribute.to_string()))
    }

    fn string_values(&self, variable: &str) -> CfResult<Vec<String>> {
        let def = self.def(variable)?;
        if !def.data_type.is_text() {
            return Err(CfError::invalid_metadata(format!(
                "variable '{}' is not textual",
                variable
            )));
        }
        def.strings.clone().ok_or_else(|| {
            CfError::invalid_metadata(format!("variable '{}' has no string payload", variable))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let store = MemoryStore::new()
            .with_variable(VariableDef::new("t", DataType::Double).attr("units", "K"));
        assert_eq!(store.attribute_names_calls("t"), 0);
        assert_eq!(store.attribute_value_calls("t"), 0);
    }

    #[test]
    fn test_counters_track_calls() {
        let store = MemoryStore::new()
            .with_variable(VariableDef::new("t", DataType::Double).attr("units", "K"));
        store.attribute_names("t").unwrap();
        store.attribute_names("t").unwrap();
        store.attribute_value("t", "units").unwrap();
        assert_eq!(store.attribute_names_calls("t"), 2);
        assert_eq!(store.attribute_value_calls("t"), 1);
    }

    #[test]
    fn test_unknown_variable() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.dimensions("missing"),
            Err(CfError::VariableNotFound(_))
        ));
    }

    #[test]
    fn test_undeclared_attribute() {
        let store = MemoryStore::new().with_variable(VariableDef::new("t", DataType::Double));
        assert!(matches!(
            store.attribute_value("t", "units"),
            Err(CfError::AttributeMissing { .. })
        ));
    }

    #[test]
    fn test_string_values_require_text_type() {
        let store = MemoryStore::new()
            .with_variable(VariableDef::new("t", DataType::Double))
            .with_variable(
                VariableDef::new("names", DataType::Char)
                    .dim("region", 2)
                    .dim("string8", 8)
                    .strings(["a", "b"]),
            );
        assert!(store.string_values("t").is_err());
        assert_eq!(store.string_values("names").unwrap(), vec!["a", "b"]);
    }
}
