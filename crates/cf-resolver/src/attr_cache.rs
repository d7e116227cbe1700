//! Per-variable attribute access cache with use auditing.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use cf_model::{AttrValue, CfError, CfResult, VariableStore};

/// Lazy, memoized attribute access for one variable, recording which
/// attributes have been consumed.
///
/// The declared attribute-name set is fetched from the store exactly
/// once, when the cache is built. Values are fetched at most once per
/// attribute and retained for the life of the cache; [`reset`] clears
/// only the used/unused audit, never the cached values. Interior
/// mutability keeps reads ergonomic for the single-owner usage the
/// reader is built for; the cache provides no locking of its own.
///
/// [`reset`]: AttrCache::reset
pub struct AttrCache {
    store: Arc<dyn VariableStore>,
    variable: String,
    /// Declared attribute names, sorted for deterministic diagnostics.
    declared: Vec<String>,
    state: RefCell<CacheState>,
}

#[derive(Default)]
struct CacheState {
    values: BTreeMap<String, AttrValue>,
    used: BTreeSet<String>,
}

impl AttrCache {
    /// Build the cache for `variable`, fetching its declared attribute
    /// names once.
    pub fn new(store: Arc<dyn VariableStore>, variable: impl Into<String>) -> CfResult<Self> {
        let variable = variable.into();
        let mut declared = store.attribute_names(&variable)?;
        declared.sort();
        declared.dedup();
        Ok(Self {
            store,
            variable,
            declared,
            state: RefCell::new(CacheState::default()),
        })
    }

    /// The variable this cache belongs to.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Declared attribute names, sorted.
    pub fn declared(&self) -> &[String] {
        &self.declared
    }

    /// Whether `attribute` is declared on the variable.
    pub fn has(&self, attribute: &str) -> bool {
        self.declared.binary_search_by(|d| d.as_str().cmp(attribute)).is_ok()
    }

    /// Consuming read: memoized fetch that marks the attribute used.
    pub fn get(&self, attribute: &str) -> CfResult<AttrValue> {
        let value = self.fetch(attribute)?;
        self.state.borrow_mut().used.insert(attribute.to_string());
        Ok(value)
    }

    /// Consuming read of an attribute that may be absent.
    pub fn get_opt(&self, attribute: &str) -> CfResult<Option<AttrValue>> {
        if !self.has(attribute) {
            return Ok(None);
        }
        self.get(attribute).map(Some)
    }

    /// Non-consuming read: memoized fetch without touching the audit.
    pub fn peek(&self, attribute: &str) -> CfResult<AttrValue> {
        self.fetch(attribute)
    }

    fn fetch(&self, attribute: &str) -> CfResult<AttrValue> {
        if !self.has(attribute) {
            return Err(CfError::attribute_missing(&self.variable, attribute));
        }
        if let Some(value) = self.state.borrow().values.get(attribute) {
            return Ok(value.clone());
        }
        let value = self.store.attribute_value(&self.variable, attribute)?;
        self.state
            .borrow_mut()
            .values
            .insert(attribute.to_string(), value.clone());
        Ok(value)
    }

    /// Declared attributes consumed so far, sorted by name.
    pub fn used(&self) -> Vec<String> {
        let state = self.state.borrow();
        self.declared
            .iter()
            .filter(|name| state.used.contains(*name))
            .cloned()
            .collect()
    }

    /// Declared attributes not yet consumed, sorted by name.
    pub fn unused(&self) -> Vec<String> {
        let state = self.state.borrow();
        self.declared
            .iter()
            .filter(|name| !state.used.contains(*name))
            .cloned()
            .collect()
    }

    /// Clear the audit. Cached values and the declared set survive, so a
    /// repeat read counts as first use without re-querying the store.
    pub fn reset(&self) {
        self.state.borrow_mut().used.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_model::DataType;
    use test_utils::{MemoryStore, VariableDef};

    fn store() -> Arc<MemoryStore> {
        Arc::new(
            MemoryStore::new().with_variable(
                VariableDef::new("lat", DataType::Double)
                    .dim("lat", 3)
                    .attr("long_name", "latitude")
                    .attr("standard_name", "latitude")
                    .attr("units", "degrees_north"),
            ),
        )
    }

    #[test]
    fn test_declared_fetched_once() {
        let store = store();
        let cache = AttrCache::new(store.clone(), "lat").unwrap();
        assert_eq!(store.attribute_names_calls("lat"), 1);

        cache.get("units").unwrap();
        cache.get("long_name").unwrap();
        assert_eq!(store.attribute_names_calls("lat"), 1);
    }

    #[test]
    fn test_values_fetched_at_most_once() {
        let store = store();
        let cache = AttrCache::new(store.clone(), "lat").unwrap();

        cache.get("units").unwrap();
        cache.get("units").unwrap();
        cache.peek("units").unwrap();
        assert_eq!(store.attribute_value_calls("lat"), 1);
    }

    #[test]
    fn test_peek_does_not_touch() {
        let cache = AttrCache::new(store(), "lat").unwrap();
        cache.peek("units").unwrap();
        assert!(cache.used().is_empty());
        assert_eq!(cache.unused().len(), 3);
    }

    #[test]
    fn test_used_unused_partition() {
        let cache = AttrCache::new(store(), "lat").unwrap();
        cache.get("units").unwrap();
        cache.get("long_name").unwrap();

        assert_eq!(cache.used(), vec!["long_name", "units"]);
        assert_eq!(cache.unused(), vec!["standard_name"]);
    }

    #[test]
    fn test_reset_keeps_cached_values() {
        let store = store();
        let cache = AttrCache::new(store.clone(), "lat").unwrap();

        cache.get("units").unwrap();
        cache.reset();
        assert!(cache.used().is_empty());
        assert_eq!(cache.unused().len(), 3);

        // A repeat read is observably "first use" again, served from cache.
        cache.get("units").unwrap();
        assert_eq!(cache.used(), vec!["units"]);
        assert_eq!(store.attribute_value_calls("lat"), 1);
    }

    #[test]
    fn test_undeclared_attribute_fails() {
        let cache = AttrCache::new(store(), "lat").unwrap();
        assert!(matches!(
            cache.get("bogus"),
            Err(CfError::AttributeMissing { .. })
        ));
        assert_eq!(cache.get_opt("bogus").unwrap(), None);
        assert!(cache.used().is_empty());
    }
}
