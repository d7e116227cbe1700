//! Three-pass CF reader: classify, resolve, specialise labels.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};

use cf_model::{CfError, CfResult, VariableStore};

use crate::group::CfGroup;
use crate::variable::{Category, CfVariable};
use crate::{classify, label, resolve};

/// Entry point: classifies a dataset's variables and resolves their
/// cross-references into a queryable [`CfGroup`].
///
/// The three passes are strictly ordered: resolution needs the complete
/// name index from classification, and label specialisation needs both
/// categories and resolved neighbourhoods. They run exactly once, at
/// construction; every classification or resolution failure surfaces
/// here rather than at query time. Afterwards the reader is immutable
/// apart from per-variable attribute-touch state.
pub struct CfReader {
    group: CfGroup,
}

impl CfReader {
    /// Build a reader over `store`, running all passes eagerly.
    pub fn new(store: Arc<dyn VariableStore>) -> CfResult<Self> {
        let mut variables = classify::classify(&store)?;
        resolve::resolve(&mut variables)?;
        label::associate(&variables);
        verify(&variables)?;

        let mut global_attributes = BTreeMap::new();
        let mut names = store.global_attribute_names();
        names.sort();
        names.dedup();
        for name in names {
            let value = store.global_attribute_value(&name)?;
            global_attributes.insert(name, value);
        }

        for category in Category::ALL {
            let count = variables.values().filter(|v| v.is(category)).count();
            if count > 0 {
                debug!(section = category.section(), count = count, "assembled section");
            }
        }
        info!(
            variables = variables.len(),
            global_attributes = global_attributes.len(),
            "assembled CF group"
        );

        Ok(Self {
            group: CfGroup::new(variables, global_attributes),
        })
    }

    /// Convenience wrapper taking ownership of any concrete store.
    pub fn from_store(store: impl VariableStore + 'static) -> CfResult<Self> {
        Self::new(Arc::new(store))
    }

    /// The assembled group.
    pub fn cf_group(&self) -> &CfGroup {
        &self.group
    }
}

/// Post-assembly consistency checks. A failure here is an engine bug,
/// never a data-quality issue, and must not be swallowed.
fn verify(variables: &BTreeMap<String, CfVariable>) -> CfResult<()> {
    for var in variables.values() {
        if var.categories().next().is_none() {
            return Err(CfError::inconsistency(format!(
                "variable '{}' was assigned no category",
                var.name()
            )));
        }
        for related in var.related() {
            if !variables.contains_key(related) {
                return Err(CfError::inconsistency(format!(
                    "variable '{}' holds an unresolved neighbour '{}'",
                    var.name(),
                    related
                )));
            }
        }
        if var.is(Category::Label) && !var.data_type().is_text() {
            return Err(CfError::inconsistency(format!(
                "variable '{}' is classified as a label but has type {:?}",
                var.name(),
                var.data_type()
            )));
        }
    }
    Ok(())
}
