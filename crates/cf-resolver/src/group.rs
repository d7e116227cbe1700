//! Assembled CF group and its derived category views.

use std::collections::BTreeMap;

use cf_model::{AttrValue, CfError, CfResult};

use crate::variable::{Category, CfVariable};

/// All classified variables of one dataset, plus its global attributes.
///
/// Category views are derived on access from the per-variable category
/// sets; the variable map is the single source of truth, so repeated
/// calls return equal results without re-running classification.
pub struct CfGroup {
    variables: BTreeMap<String, CfVariable>,
    global_attributes: BTreeMap<String, AttrValue>,
}

impl CfGroup {
    pub(crate) fn new(
        variables: BTreeMap<String, CfVariable>,
        global_attributes: BTreeMap<String, AttrValue>,
    ) -> Self {
        Self {
            variables,
            global_attributes,
        }
    }

    /// Number of variables in the group.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether the group holds no variables.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// All variable names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// Iterate all variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CfVariable)> {
        self.variables.iter().map(|(name, var)| (name.as_str(), var))
    }

    /// Look up a variable by name.
    pub fn get(&self, name: &str) -> CfResult<&CfVariable> {
        self.variables
            .get(name)
            .ok_or_else(|| CfError::VariableNotFound(name.to_string()))
    }

    /// Look up a variable by name, `None` if absent.
    pub fn variable(&self, name: &str) -> Option<&CfVariable> {
        self.variables.get(name)
    }

    /// Dataset-level attributes. Never overlaps any variable's own
    /// attributes.
    pub fn global_attributes(&self) -> &BTreeMap<String, AttrValue> {
        &self.global_attributes
    }

    /// Variables holding `category`, keyed by name.
    pub fn section(&self, category: Category) -> BTreeMap<&str, &CfVariable> {
        filter_section(self.variables.values(), category)
    }

    /// Data variables.
    pub fn data_variables(&self) -> BTreeMap<&str, &CfVariable> {
        self.section(Category::Data)
    }

    /// Dimension coordinate variables.
    pub fn coordinates(&self) -> BTreeMap<&str, &CfVariable> {
        self.section(Category::Coordinate)
    }

    /// Auxiliary coordinate variables.
    pub fn auxiliary_coordinates(&self) -> BTreeMap<&str, &CfVariable> {
        self.section(Category::AuxiliaryCoordinate)
    }

    /// Bounds variables.
    pub fn bounds(&self) -> BTreeMap<&str, &CfVariable> {
        self.section(Category::Bounds)
    }

    /// Cell measure variables.
    pub fn cell_measures(&self) -> BTreeMap<&str, &CfVariable> {
        self.section(Category::CellMeasure)
    }

    /// Grid mapping variables.
    pub fn grid_mappings(&self) -> BTreeMap<&str, &CfVariable> {
        self.section(Category::GridMapping)
    }

    /// Label variables.
    pub fn labels(&self) -> BTreeMap<&str, &CfVariable> {
        self.section(Category::Label)
    }

    /// Ancillary data variables.
    pub fn ancillary_variables(&self) -> BTreeMap<&str, &CfVariable> {
        self.section(Category::Ancillary)
    }

    /// Climatology bounds variables.
    pub fn climatology(&self) -> BTreeMap<&str, &CfVariable> {
        self.section(Category::ClimatologyBounds)
    }

    /// Variables that participate in a formula term.
    pub fn formula_terms(&self) -> BTreeMap<&str, &CfVariable> {
        self.variables
            .values()
            .filter(|v| !v.formula_roots().is_empty())
            .map(|v| (v.name(), v))
            .collect()
    }

    /// One-hop neighbourhood of `name`, as a borrowed sub-group.
    ///
    /// Fails with `VariableNotFound` for an unknown name. A neighbourhood
    /// entry missing from the group is an `Inconsistency`: the resolver
    /// only ever records names it resolved.
    pub fn subgroup(&self, name: &str) -> CfResult<CfSubgroup<'_>> {
        let var = self.get(name)?;
        let mut members = BTreeMap::new();
        for related in var.related() {
            let member = self.variables.get(related).ok_or_else(|| {
                CfError::inconsistency(format!(
                    "variable '{}' is related to unknown variable '{}'",
                    name, related
                ))
            })?;
            members.insert(related.as_str(), member);
        }
        Ok(CfSubgroup { members })
    }
}

/// Borrowed one-hop neighbourhood of a single variable, with the same
/// category views as the owning group.
pub struct CfSubgroup<'a> {
    members: BTreeMap<&'a str, &'a CfVariable>,
}

impl<'a> CfSubgroup<'a> {
    /// Number of neighbours.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the neighbourhood is empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Neighbour names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().copied()
    }

    /// Look up a neighbour by name, `None` if absent.
    pub fn variable(&self, name: &str) -> Option<&'a CfVariable> {
        self.members.get(name).copied()
    }

    /// Neighbours holding `category`, keyed by name.
    pub fn section(&self, category: Category) -> BTreeMap<&'a str, &'a CfVariable> {
        filter_section(self.members.values().copied(), category)
    }

    /// Data variables among the neighbours.
    pub fn data_variables(&self) -> BTreeMap<&'a str, &'a CfVariable> {
        self.section(Category::Data)
    }

    /// Dimension coordinates among the neighbours.
    pub fn coordinates(&self) -> BTreeMap<&'a str, &'a CfVariable> {
        self.section(Category::Coordinate)
    }

    /// Auxiliary coordinates among the neighbours.
    pub fn auxiliary_coordinates(&self) -> BTreeMap<&'a str, &'a CfVariable> {
        self.section(Category::AuxiliaryCoordinate)
    }

    /// Bounds among the neighbours.
    pub fn bounds(&self) -> BTreeMap<&'a str, &'a CfVariable> {
        self.section(Category::Bounds)
    }

    /// Cell measures among the neighbours.
    pub fn cell_measures(&self) -> BTreeMap<&'a str, &'a CfVariable> {
        self.section(Category::CellMeasure)
    }

    /// Grid mappings among the neighbours.
    pub fn grid_mappings(&self) -> BTreeMap<&'a str, &'a CfVariable> {
        self.section(Category::GridMapping)
    }

    /// Labels among the neighbours.
    pub fn labels(&self) -> BTreeMap<&'a str, &'a CfVariable> {
        self.section(Category::Label)
    }

    /// Ancillary variables among the neighbours.
    pub fn ancillary_variables(&self) -> BTreeMap<&'a str, &'a CfVariable> {
        self.section(Category::Ancillary)
    }

    /// Climatology bounds among the neighbours.
    pub fn climatology(&self) -> BTreeMap<&'a str, &'a CfVariable> {
        self.section(Category::ClimatologyBounds)
    }
}

fn filter_section<'a>(
    variables: impl Iterator<Item = &'a CfVariable>,
    category: Category,
) -> BTreeMap<&'a str, &'a CfVariable> {
    variables
        .filter(|v| v.is(category))
        .map(|v| (v.name(), v))
        .collect()
}
