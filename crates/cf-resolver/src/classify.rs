//! Pass 1: assign semantic categories to every raw variable.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::debug;

use cf_model::{CfResult, VariableStore};

use crate::resolve::{name_tokens, pair_tokens};
use crate::variable::{Category, CfVariable};

/// Wrap every store variable and assign its categories.
///
/// Self-evident roles (coordinate, grid mapping) come from the variable's
/// own metadata; reference roles (bounds, measures, labels, ...) come
/// from scanning the pointer attributes of every other variable. The
/// data role falls out last: anything unreferenced that is not itself a
/// coordinate.
pub(crate) fn classify(store: &Arc<dyn VariableStore>) -> CfResult<BTreeMap<String, CfVariable>> {
    let mut names = store.variable_names();
    names.sort();
    names.dedup();

    let mut variables = BTreeMap::new();
    for name in &names {
        variables.insert(name.clone(), CfVariable::from_store(store, name)?);
    }

    for var in variables.values_mut() {
        if var.has_attr("grid_mapping_name") {
            var.add_category(Category::GridMapping);
        }
        if var.dimensions().len() == 1 && var.dimensions()[0] == var.name() {
            var.add_category(Category::Coordinate);
        }
    }

    let mut marks: Vec<(String, Category)> = Vec::new();
    let mut referenced: BTreeSet<String> = BTreeSet::new();
    for var in variables.values() {
        collect_reference_marks(var, &variables, &mut marks, &mut referenced)?;
    }
    for (target, category) in marks {
        // Dangling targets are dropped here; the resolver pass logs them.
        if let Some(var) = variables.get_mut(&target) {
            var.add_category(category);
        }
    }

    for var in variables.values_mut() {
        if !referenced.contains(var.name()) && !var.is(Category::Coordinate) {
            var.add_category(Category::Data);
        }
    }

    debug!(variables = variables.len(), "classified dataset variables");
    Ok(variables)
}

/// Scan one variable's pointer attributes, recording the category each
/// referenced name should receive.
fn collect_reference_marks(
    var: &CfVariable,
    variables: &BTreeMap<String, CfVariable>,
    marks: &mut Vec<(String, Category)>,
    referenced: &mut BTreeSet<String>,
) -> CfResult<()> {
    const DIRECT: [(&str, Category); 4] = [
        ("bounds", Category::Bounds),
        ("climatology", Category::ClimatologyBounds),
        ("ancillary_variables", Category::Ancillary),
        ("grid_mapping", Category::GridMapping),
    ];

    for (attr, category) in DIRECT {
        if let Some(value) = var.try_attr(attr)? {
            for target in name_tokens(var.name(), attr, &value) {
                referenced.insert(target.clone());
                marks.push((target, category));
            }
        }
    }

    if let Some(value) = var.try_attr("cell_measures")? {
        for (_measure, target) in pair_tokens(var.name(), "cell_measures", &value) {
            referenced.insert(target.clone());
            marks.push((target, Category::CellMeasure));
        }
    }

    // "coordinates" splits by target type: textual variables are labels,
    // everything else an auxiliary coordinate.
    if let Some(value) = var.try_attr("coordinates")? {
        for target in name_tokens(var.name(), "coordinates", &value) {
            referenced.insert(target.clone());
            let category = match variables.get(&target) {
                Some(t) if t.data_type().is_text() => Category::Label,
                _ => Category::AuxiliaryCoordinate,
            };
            marks.push((target, category));
        }
    }

    Ok(())
}
