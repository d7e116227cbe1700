//! Canned CF datasets for resolver tests.
//!
//! Each fixture is a small but structurally faithful dataset exercising
//! one family of CF relationships.

use cf_model::DataType;

use crate::store::{MemoryStore, VariableDef};

/// Rotated-pole precipitation dataset.
///
/// One data variable (`pr`) on a rotated grid: dimension coordinates
/// `rlat`/`rlon`/`time`, 2-D auxiliary coordinates `lat`/`lon`, a bounds
/// variable on `time`, and a scalar grid mapping.
pub fn rotated_pole_precipitation() -> MemoryStore {
    MemoryStore::new()
        .with_global("Conventions", "CF-1.0")
        .with_global("institution", "DMI")
        .with_global("source", "HIRHAM")
        .with_global("experiment", "ER3")
        .with_variable(
            VariableDef::new("rlat", DataType::Double)
                .dim("rlat", 190)
                .attr("axis", "Y")
                .attr("long_name", "rotated latitude")
                .attr("standard_name", "grid_latitude")
                .attr("units", "degrees"),
        )
        .with_variable(
            VariableDef::new("rlon", DataType::Double)
                .dim("rlon", 174)
                .attr("axis", "X")
                .attr("long_name", "rotated longitude")
                .attr("standard_name", "grid_longitude")
                .attr("units", "degrees"),
        )
        .with_variable(
            VariableDef::new("time", DataType::Double)
                .dim("time", 4)
                .attr("axis", "T")
                .attr("bounds", "time_bnds")
                .attr("calendar", "gregorian")
                .attr("long_name", "Julian Day")
                .attr("units", "days since 1950-01-01 00:00:00.0"),
        )
        .with_variable(
            VariableDef::new("time_bnds", DataType::Double)
                .dim("time", 4)
                .dim("bnds", 2),
        )
        .with_variable(
            VariableDef::new("lat", DataType::Double)
                .dim("rlat", 190)
                .dim("rlon", 174)
                .attr("long_name", "latitude")
                .attr("standard_name", "latitude")
                .attr("units", "degrees_north"),
        )
        .with_variable(
            VariableDef::new("lon", DataType::Double)
                .dim("rlat", 190)
                .dim("rlon", 174)
                .attr("long_name", "longitude")
                .attr("standard_name", "longitude")
                .attr("units", "degrees_east"),
        )
        .with_variable(
            VariableDef::new("rotated_pole", DataType::Char)
                .attr("grid_mapping_name", "rotated_latitude_longitude")
                .attr("grid_north_pole_latitude", 18.0)
                .attr("grid_north_pole_longitude", -140.75),
        )
        .with_variable(
            VariableDef::new("pr", DataType::Float)
                .dim("time", 4)
                .dim("rlat", 190)
                .dim("rlon", 174)
                .attr("cell_methods", "time: mean")
                .attr("coordinates", "lon lat")
                .attr("grid_mapping", "rotated_pole")
                .attr("long_name", "Precipitation")
                .attr("standard_name", "precipitation_flux")
                .attr("units", "kg m-2 s-1"),
        )
}

/// River-flow climatology dataset with a region-name label.
///
/// Two data variables span the `georegion` axis, named by the `region_name`
/// label variable. The `time` coordinate points at climatology bounds
/// covering a single climatological period.
pub fn river_climatology() -> MemoryStore {
    MemoryStore::new()
        .with_global("Conventions", "CF-1.5")
        .with_global("source", "river flow reanalysis")
        .with_variable(
            VariableDef::new("time", DataType::Double)
                .dim("time", 1)
                .attr("climatology", "climatology_bounds")
                .attr("calendar", "360_day")
                .attr("units", "days since 1970-01-01 00:00:00"),
        )
        .with_variable(
            VariableDef::new("climatology_bounds", DataType::Double)
                .dim("time", 1)
                .dim("bnds", 2),
        )
        .with_variable(
            VariableDef::new("region_name", DataType::Char)
                .dim("georegion", 3)
                .dim("string64", 64)
                .attr("long_name", "river region name")
                .strings(["Anglian", "Thames", "Severn"]),
        )
        .with_variable(
            VariableDef::new("temp_dmax_tmean_abs", DataType::Float)
                .dim("time", 1)
                .dim("georegion", 3)
                .attr("cell_methods", "time: mean within years time: mean over years")
                .attr("coordinates", "region_name")
                .attr("units", "K"),
        )
        .with_variable(
            VariableDef::new("cdf_temp_dmax_tmean_abs", DataType::Float)
                .dim("percentile", 10)
                .dim("georegion", 3)
                .attr("coordinates", "region_name")
                .attr("units", "1"),
        )
}

/// Ensemble forecast dataset whose labels store the character dimension
/// first, the shared data dimension last.
pub fn ensemble_labels() -> MemoryStore {
    MemoryStore::new()
        .with_global("Conventions", "CF-1.5")
        .with_variable(
            VariableDef::new("ensemble", DataType::Int).dim("ensemble", 3),
        )
        .with_variable(
            VariableDef::new("time", DataType::Double)
                .dim("time", 2)
                .attr("units", "hours since 1960-11-01 00:00:00"),
        )
        .with_variable(
            VariableDef::new("experiment_id", DataType::Char)
                .dim("string8", 8)
                .dim("ensemble", 3)
                .strings(["2005", "2006", "2007"]),
        )
        .with_variable(
            VariableDef::new("institution", DataType::Char)
                .dim("string16", 16)
                .dim("ensemble", 3)
                .strings(["ECMWF", "ECMWF", "MetO"]),
        )
        .with_variable(
            VariableDef::new("tas", DataType::Float)
                .dim("time", 2)
                .dim("ensemble", 3)
                .attr("coordinates", "experiment_id institution")
                .attr("standard_name", "air_temperature")
                .attr("units", "K"),
        )
}
