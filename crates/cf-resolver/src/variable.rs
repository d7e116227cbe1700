//! Classified CF variables and their category tags.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use cf_model::{AttrValue, CfError, CfResult, DataType, VariableStore};

use crate::attr_cache::AttrCache;
use crate::label;

/// Semantic role of a variable within a CF dataset.
///
/// Roles are additive: one variable can hold several at once (a
/// coordinate can also be the target of a bounds reference), and
/// classification never removes a role it has assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Data,
    Coordinate,
    AuxiliaryCoordinate,
    Bounds,
    CellMeasure,
    GridMapping,
    Label,
    Ancillary,
    ClimatologyBounds,
}

impl Category {
    /// Every category, in section order.
    pub const ALL: [Category; 9] = [
        Category::Data,
        Category::Coordinate,
        Category::AuxiliaryCoordinate,
        Category::Bounds,
        Category::CellMeasure,
        Category::GridMapping,
        Category::Label,
        Category::Ancillary,
        Category::ClimatologyBounds,
    ];

    /// Section title used in group listings and diagnostics.
    pub fn section(&self) -> &'static str {
        match self {
            Category::Data => "data variables",
            Category::Coordinate => "coordinates",
            Category::AuxiliaryCoordinate => "auxiliary coordinates",
            Category::Bounds => "bounds",
            Category::CellMeasure => "cell measures",
            Category::GridMapping => "grid mappings",
            Category::Label => "labels",
            Category::Ancillary => "ancillary variables",
            Category::ClimatologyBounds => "climatology bounds",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section())
    }
}

/// A raw variable wrapped with its resolved CF roles and neighbourhood.
///
/// Built by the reader's classification pass and immutable afterwards,
/// apart from the attribute-touch audit held by its [`AttrCache`].
pub struct CfVariable {
    name: String,
    dimensions: Vec<String>,
    shape: Vec<usize>,
    data_type: DataType,
    attrs: AttrCache,
    categories: BTreeSet<Category>,
    /// Names of the variables in this variable's one-hop neighbourhood.
    related: BTreeSet<String>,
    /// Formula-term participation: root variable name -> term key.
    formula_roots: BTreeMap<String, String>,
    store: Arc<dyn VariableStore>,
}

impl CfVariable {
    pub(crate) fn from_store(store: &Arc<dyn VariableStore>, name: &str) -> CfResult<Self> {
        let dimensions = store.dimensions(name)?;
        let shape = store.shape(name)?;
        if dimensions.len() != shape.len() {
            return Err(CfError::invalid_metadata(format!(
                "variable '{}' declares {} dimensions but a rank-{} shape",
                name,
                dimensions.len(),
                shape.len()
            )));
        }
        let data_type = store.data_type(name)?;
        let attrs = AttrCache::new(Arc::clone(store), name)?;
        Ok(Self {
            name: name.to_string(),
            dimensions,
            shape,
            data_type,
            attrs,
            categories: BTreeSet::new(),
            related: BTreeSet::new(),
            formula_roots: BTreeMap::new(),
            store: Arc::clone(store),
        })
    }

    /// Variable name, unique within its group.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered dimension names. Empty for scalars.
    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    /// Extent of each dimension.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.dimensions.len()
    }

    /// External data type.
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Whether this variable holds `category`.
    pub fn is(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    /// All assigned categories, in section order.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.categories.iter().copied()
    }

    /// Names of the variables in this variable's one-hop neighbourhood.
    pub fn related(&self) -> &BTreeSet<String> {
        &self.related
    }

    /// Formula-term participation: root variable name -> term key.
    pub fn formula_roots(&self) -> &BTreeMap<String, String> {
        &self.formula_roots
    }

    /// Consuming attribute read; marks the attribute used.
    pub fn attr(&self, name: &str) -> CfResult<AttrValue> {
        self.attrs.get(name)
    }

    /// Consuming read of an attribute that may be absent.
    pub fn try_attr(&self, name: &str) -> CfResult<Option<AttrValue>> {
        self.attrs.get_opt(name)
    }

    /// Whether `name` is declared on this variable.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.has(name)
    }

    /// All declared attributes as (name, value) pairs sorted by name.
    /// Does not perturb the use audit.
    pub fn cf_attrs(&self) -> CfResult<Vec<(String, AttrValue)>> {
        self.attrs
            .declared()
            .iter()
            .map(|name| Ok((name.clone(), self.attrs.peek(name)?)))
            .collect()
    }

    /// The consumed subset of [`cf_attrs`](CfVariable::cf_attrs).
    pub fn cf_attrs_used(&self) -> CfResult<Vec<(String, AttrValue)>> {
        self.attrs
            .used()
            .into_iter()
            .map(|name| {
                let value = self.attrs.peek(&name)?;
                Ok((name, value))
            })
            .collect()
    }

    /// The not-yet-consumed subset of [`cf_attrs`](CfVariable::cf_attrs).
    pub fn cf_attrs_unused(&self) -> CfResult<Vec<(String, AttrValue)>> {
        self.attrs
            .unused()
            .into_iter()
            .map(|name| {
                let value = self.attrs.peek(&name)?;
                Ok((name, value))
            })
            .collect()
    }

    /// Clear the attribute-use audit. Category assignments and the
    /// resolved neighbourhood are unaffected.
    pub fn cf_attrs_reset(&self) {
        self.attrs.reset();
    }

    /// Dimensions of this label variable shared with `data_var`, in this
    /// variable's dimension order.
    pub fn cf_label_dimensions(&self, data_var: &CfVariable) -> Vec<String> {
        label::shared_dimensions(self, data_var)
    }

    /// String payload aligned to the single dimension shared with
    /// `data_var`: the first element corresponds to index 0 along that
    /// dimension. Recomputed on every call.
    pub fn cf_label_data(&self, data_var: &CfVariable) -> CfResult<Vec<String>> {
        label::aligned_values(self, data_var)
    }

    pub(crate) fn add_category(&mut self, category: Category) {
        self.categories.insert(category);
    }

    pub(crate) fn add_related(&mut self, name: &str) {
        if name != self.name {
            self.related.insert(name.to_string());
        }
    }

    pub(crate) fn add_formula_root(&mut self, root: &str, term: &str) {
        self.formula_roots
            .insert(root.to_string(), term.to_string());
    }

    pub(crate) fn store(&self) -> &Arc<dyn VariableStore> {
        &self.store
    }
}

impl fmt::Debug for CfVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CfVariable")
            .field("name", &self.name)
            .field("dimensions", &self.dimensions)
            .field("shape", &self.shape)
            .field("data_type", &self.data_type)
            .field("categories", &self.categories)
            .field("related", &self.related)
            .finish()
    }
}
