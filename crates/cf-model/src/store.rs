//! Abstract raw variable store.

use crate::error::CfResult;
use crate::value::{AttrValue, DataType};

/// Read-only view over the raw variables of one dataset.
///
/// Implemented by the physical storage layer (NetCDF/HDF5 readers, GRIB or
/// PP decoders, in-memory stores). The resolver never touches files
/// directly; everything it learns about a dataset comes through this
/// trait. All methods are metadata lookups except [`string_values`],
/// which decodes the payload of a textual variable.
///
/// [`string_values`]: VariableStore::string_values
pub trait VariableStore: Send + Sync {
    /// Names of all variables in the dataset. Unique.
    fn variable_names(&self) -> Vec<String>;

    /// Ordered dimension names of a variable. Empty for scalars.
    fn dimensions(&self, variable: &str) -> CfResult<Vec<String>>;

    /// Extent of each dimension, same length and order as `dimensions`.
    fn shape(&self, variable: &str) -> CfResult<Vec<usize>>;

    /// External data type of a variable.
    fn data_type(&self, variable: &str) -> CfResult<DataType>;

    /// Names of the attributes declared on a variable.
    fn attribute_names(&self, variable: &str) -> CfResult<Vec<String>>;

    /// Value of a declared attribute. Fails with `AttributeMissing` if
    /// the attribute is not declared on the variable.
    fn attribute_value(&self, variable: &str, attribute: &str) -> CfResult<AttrValue>;

    /// Names of the dataset-level attributes.
    fn global_attribute_names(&self) -> Vec<String>;

    /// Value of a dataset-level attribute. Fails with
    /// `GlobalAttributeMissing` if not declared.
    fn global_attribute_value(&self, attribute: &str) -> CfResult<AttrValue>;

    /// Decoded string payload of a textual variable: one entry per index
    /// along its non-character dimension, in that dimension's storage
    /// order. Fails with `InvalidMetadata` for numeric variables.
    fn string_values(&self, variable: &str) -> CfResult<Vec<String>>;
}
