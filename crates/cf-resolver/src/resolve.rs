//! Pass 2: resolve named cross-references into mutual group edges.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};

use cf_model::{AttrValue, CfResult};

use crate::variable::{Category, CfVariable};

/// Attributes whose values are whitespace-separated variable names.
const NAME_LIST_ATTRS: [&str; 5] = [
    "ancillary_variables",
    "bounds",
    "climatology",
    "coordinates",
    "grid_mapping",
];

/// Follow every pointer attribute against the complete name index and
/// record the surviving edges.
///
/// Each resolving name adds a mutual edge between referencing and
/// referenced variable; names that resolve to nothing are dropped (CF
/// datasets are frequently partial). Data variables additionally pick up
/// the coordinate variables that span their dimensions, which they never
/// name in an attribute.
pub(crate) fn resolve(variables: &mut BTreeMap<String, CfVariable>) -> CfResult<()> {
    let mut edges: Vec<(String, String)> = Vec::new();
    // (root, term, target)
    let mut terms: Vec<(String, String, String)> = Vec::new();
    let mut dangling = 0usize;

    for (name, var) in variables.iter() {
        for attr in NAME_LIST_ATTRS {
            if let Some(value) = var.try_attr(attr)? {
                for target in name_tokens(name, attr, &value) {
                    if variables.contains_key(&target) {
                        edges.push((name.clone(), target));
                    } else {
                        dangling += 1;
                        debug!(
                            variable = %name,
                            attribute = attr,
                            target = %target,
                            "dropping dangling reference"
                        );
                    }
                }
            }
        }

        if let Some(value) = var.try_attr("cell_measures")? {
            for (_measure, target) in pair_tokens(name, "cell_measures", &value) {
                if variables.contains_key(&target) {
                    edges.push((name.clone(), target));
                } else {
                    dangling += 1;
                    debug!(
                        variable = %name,
                        attribute = "cell_measures",
                        target = %target,
                        "dropping dangling reference"
                    );
                }
            }
        }

        if let Some(value) = var.try_attr("formula_terms")? {
            for (term, target) in pair_tokens(name, "formula_terms", &value) {
                if variables.contains_key(&target) {
                    terms.push((name.clone(), term, target));
                } else {
                    dangling += 1;
                    debug!(
                        variable = %name,
                        attribute = "formula_terms",
                        term = %term,
                        target = %target,
                        "dropping dangling reference"
                    );
                }
            }
        }
    }

    let edge_count = edges.len() + terms.len();

    for (from, to) in edges {
        apply_edge(variables, &from, &to);
    }
    for (root, term, target) in terms {
        if let Some(var) = variables.get_mut(&target) {
            var.add_formula_root(&root, &term);
        }
        apply_edge(variables, &root, &target);
    }

    span_dimension_coordinates(variables);

    info!(
        edges = edge_count,
        dangling = dangling,
        "resolved cross references"
    );
    Ok(())
}

fn apply_edge(variables: &mut BTreeMap<String, CfVariable>, from: &str, to: &str) {
    if let Some(var) = variables.get_mut(from) {
        var.add_related(to);
    }
    if let Some(var) = variables.get_mut(to) {
        var.add_related(from);
    }
}

/// Give every data variable a one-way edge to each coordinate variable
/// whose dimensions are a subset of its own.
fn span_dimension_coordinates(variables: &mut BTreeMap<String, CfVariable>) {
    let coordinates: Vec<(String, Vec<String>)> = variables
        .values()
        .filter(|v| v.is(Category::Coordinate))
        .map(|v| (v.name().to_string(), v.dimensions().to_vec()))
        .collect();
    let data_names: Vec<String> = variables
        .values()
        .filter(|v| v.is(Category::Data))
        .map(|v| v.name().to_string())
        .collect();

    for name in data_names {
        let spanned: Vec<String> = {
            let Some(var) = variables.get(&name) else { continue };
            let dims: BTreeSet<&str> = var.dimensions().iter().map(String::as_str).collect();
            coordinates
                .iter()
                .filter(|(_, cdims)| cdims.iter().all(|d| dims.contains(d.as_str())))
                .map(|(cname, _)| cname.clone())
                .collect()
        };
        if let Some(var) = variables.get_mut(&name) {
            for cname in spanned {
                var.add_related(&cname);
            }
        }
    }
}

/// Split a reference attribute into variable-name tokens.
///
/// Reference attributes are text; anything else is a data-quality issue,
/// logged and skipped.
pub(crate) fn name_tokens(variable: &str, attribute: &str, value: &AttrValue) -> Vec<String> {
    match value.as_text() {
        Some(text) => text.split_whitespace().map(str::to_string).collect(),
        None => {
            warn!(
                variable = variable,
                attribute = attribute,
                value_type = value.type_name(),
                "ignoring non-text reference attribute"
            );
            Vec::new()
        }
    }
}

/// Split a `"key: name key: name"` attribute into (key, name) pairs.
///
/// Malformed tokens (a key with no name, a name with no key) are logged
/// and skipped; the rest of the list still parses.
pub(crate) fn pair_tokens(
    variable: &str,
    attribute: &str,
    value: &AttrValue,
) -> Vec<(String, String)> {
    let Some(text) = value.as_text() else {
        warn!(
            variable = variable,
            attribute = attribute,
            value_type = value.type_name(),
            "ignoring non-text reference attribute"
        );
        return Vec::new();
    };

    let mut pairs = Vec::new();
    let mut pending: Option<String> = None;
    for token in text.split_whitespace() {
        if let Some(key) = token.strip_suffix(':') {
            if let Some(dropped) = pending.replace(key.to_string()) {
                warn!(
                    variable = variable,
                    attribute = attribute,
                    key = %dropped,
                    "dropping key with no value"
                );
            }
        } else if let Some(key) = pending.take() {
            pairs.push((key, token.to_string()));
        } else {
            warn!(
                variable = variable,
                attribute = attribute,
                token = token,
                "dropping stray token"
            );
        }
    }
    if let Some(key) = pending {
        warn!(
            variable = variable,
            attribute = attribute,
            key = %key,
            "dropping trailing key with no value"
        );
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> AttrValue {
        AttrValue::from(value)
    }

    #[test]
    fn test_name_tokens_splits_whitespace() {
        assert_eq!(
            name_tokens("pr", "coordinates", &text("lon  lat\ttime")),
            vec!["lon", "lat", "time"]
        );
        assert!(name_tokens("pr", "coordinates", &text("")).is_empty());
    }

    #[test]
    fn test_name_tokens_rejects_non_text() {
        assert!(name_tokens("pr", "coordinates", &AttrValue::from(3)).is_empty());
    }

    #[test]
    fn test_pair_tokens_parses_pairs() {
        assert_eq!(
            pair_tokens("pr", "cell_measures", &text("area: cell_area volume: cell_vol")),
            vec![
                ("area".to_string(), "cell_area".to_string()),
                ("volume".to_string(), "cell_vol".to_string()),
            ]
        );
    }

    #[test]
    fn test_pair_tokens_skips_malformed() {
        // Stray leading name, doubled key, trailing key.
        assert_eq!(
            pair_tokens("pr", "cell_measures", &text("stray area: a: cell_area area:")),
            vec![("a".to_string(), "cell_area".to_string())]
        );
        assert!(pair_tokens("pr", "formula_terms", &AttrValue::from(1.0)).is_empty());
    }
}
