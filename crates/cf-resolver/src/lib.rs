//! CF metadata relationship resolver.
//!
//! Scientific datasets following the CF conventions encode relationships
//! between variables inside attribute values: a coordinate names its
//! bounds variable, a data variable names its auxiliary coordinates, its
//! grid mapping, its cell measures. This crate ingests such a dataset
//! through the [`VariableStore`](cf_model::VariableStore) abstraction and
//! resolves those implicit pointers into an explicit, queryable graph of
//! typed roles, which cube-construction rule engines consume when
//! assembling labelled arrays from NetCDF, GRIB, or PP sources.
//!
//! Construction runs three strictly ordered passes over the dataset:
//! classification (semantic categories per variable), reference
//! resolution (mutual one-hop edges from name-valued attributes), and
//! label specialisation. Every variable is wrapped with an attribute
//! cache that audits which attributes were actually consumed, backing
//! "unused attribute" diagnostics.
//!
//! ```
//! use cf_model::DataType;
//! use cf_resolver::CfReader;
//! use test_utils::{MemoryStore, VariableDef};
//!
//! let store = MemoryStore::new()
//!     .with_variable(
//!         VariableDef::new("time", DataType::Double)
//!             .dim("time", 4)
//!             .attr("bounds", "time_bnds"),
//!     )
//!     .with_variable(
//!         VariableDef::new("time_bnds", DataType::Double)
//!             .dim("time", 4)
//!             .dim("bnds", 2),
//!     )
//!     .with_variable(VariableDef::new("pr", DataType::Float).dim("time", 4));
//!
//! let reader = CfReader::from_store(store)?;
//! let group = reader.cf_group();
//! assert!(group.bounds().contains_key("time_bnds"));
//! assert!(group.data_variables().contains_key("pr"));
//! assert!(group.subgroup("time")?.bounds().contains_key("time_bnds"));
//! # Ok::<(), cf_model::CfError>(())
//! ```

pub mod attr_cache;
pub mod group;
pub mod reader;
pub mod variable;

mod classify;
mod label;
mod resolve;

pub use attr_cache::AttrCache;
pub use group::{CfGroup, CfSubgroup};
pub use reader::CfReader;
pub use variable::{Category, CfVariable};
