//! Pass 3: label-variable specialisation.
//!
//! Label variables carry human-readable names along one axis of the data
//! variables that reference them. The pass itself only sanity-checks the
//! resolved associations; the per-query computations live here too so
//! the variable wrapper can delegate to them.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use cf_model::{CfError, CfResult};

use crate::variable::{Category, CfVariable};

/// Walk every label variable's neighbourhood and flag labels that span no
/// dimension of a related data variable. Purely diagnostic: a label that
/// does not span a neighbour is a data-quality condition, not an error.
pub(crate) fn associate(variables: &BTreeMap<String, CfVariable>) {
    for label in variables.values().filter(|v| v.is(Category::Label)) {
        for name in label.related() {
            let Some(neighbour) = variables.get(name) else {
                continue;
            };
            if !neighbour.is(Category::Data) {
                continue;
            }
            let shared = shared_dimensions(label, neighbour);
            if shared.is_empty() {
                warn!(
                    label = label.name(),
                    data_variable = neighbour.name(),
                    "label spans no dimension of the data variable"
                );
            } else {
                debug!(
                    label = label.name(),
                    data_variable = neighbour.name(),
                    dimensions = ?shared,
                    "label association"
                );
            }
        }
    }
}

/// Dimensions of `label` shared with `data_var`, in `label`'s dimension
/// order. The character-length dimension of a string variable is never
/// shared, so it drops out naturally.
pub(crate) fn shared_dimensions(label: &CfVariable, data_var: &CfVariable) -> Vec<String> {
    label
        .dimensions()
        .iter()
        .filter(|dim| data_var.dimensions().contains(dim))
        .cloned()
        .collect()
}

/// Label strings aligned to the single dimension shared with `data_var`.
///
/// Recomputed on every call: the same label may be queried against data
/// variables with different dimension orderings, so nothing here is
/// cached per data variable.
pub(crate) fn aligned_values(label: &CfVariable, data_var: &CfVariable) -> CfResult<Vec<String>> {
    let shared = shared_dimensions(label, data_var);
    if shared.len() != 1 {
        return Err(CfError::invalid_metadata(format!(
            "label variable '{}' shares {} dimensions with '{}', expected exactly one",
            label.name(),
            shared.len(),
            data_var.name()
        )));
    }

    let extent = label
        .dimensions()
        .iter()
        .zip(label.shape())
        .find(|(dim, _)| **dim == shared[0])
        .map(|(_, extent)| *extent)
        .unwrap_or(0);

    let values = label.store().string_values(label.name())?;
    if values.len() != extent {
        return Err(CfError::invalid_metadata(format!(
            "label variable '{}' has {} strings for dimension '{}' of extent {}",
            label.name(),
            values.len(),
            shared[0],
            extent
        )));
    }
    Ok(values)
}
