//! Integration tests for the three-pass reader over complete datasets.

use std::sync::Arc;

use cf_model::{AttrValue, CfError, DataType};
use cf_resolver::CfReader;
use test_utils::{rotated_pole_precipitation, MemoryStore, VariableDef};

fn text(value: &str) -> AttrValue {
    AttrValue::from(value)
}

// ============================================================================
// Category views
// ============================================================================

#[test]
fn test_category_views() {
    let reader = CfReader::from_store(rotated_pole_precipitation()).unwrap();
    let group = reader.cf_group();

    fn keys<'a, V>(view: std::collections::BTreeMap<&'a str, V>) -> Vec<&'a str> {
        view.keys().copied().collect()
    }

    assert_eq!(keys(group.coordinates()), vec!["rlat", "rlon", "time"]);
    assert_eq!(keys(group.auxiliary_coordinates()), vec!["lat", "lon"]);
    assert_eq!(keys(group.bounds()), vec!["time_bnds"]);
    assert_eq!(keys(group.grid_mappings()), vec!["rotated_pole"]);
    assert_eq!(keys(group.data_variables()), vec!["pr"]);
    assert!(group.cell_measures().is_empty());
    assert!(group.ancillary_variables().is_empty());
    assert!(group.labels().is_empty());
    assert!(group.climatology().is_empty());
    assert!(group.formula_terms().is_empty());
}

#[test]
fn test_variable_metadata() {
    let reader = CfReader::from_store(rotated_pole_precipitation()).unwrap();
    let group = reader.cf_group();

    let lat = group.get("lat").unwrap();
    assert_eq!(lat.shape(), &[190, 174]);
    assert_eq!(lat.dimensions(), &["rlat", "rlon"]);
    assert_eq!(lat.ndim(), 2);
    assert_eq!(
        lat.cf_attrs().unwrap(),
        vec![
            ("long_name".to_string(), text("latitude")),
            ("standard_name".to_string(), text("latitude")),
            ("units".to_string(), text("degrees_north")),
        ]
    );

    let time_bnds = group.get("time_bnds").unwrap();
    assert_eq!(time_bnds.shape(), &[4, 2]);
    assert_eq!(time_bnds.ndim(), 2);
    assert!(time_bnds.cf_attrs().unwrap().is_empty());

    let rotated_pole = group.get("rotated_pole").unwrap();
    assert_eq!(rotated_pole.ndim(), 0);
    assert!(rotated_pole.shape().is_empty());
    assert_eq!(
        rotated_pole.cf_attrs().unwrap(),
        vec![
            (
                "grid_mapping_name".to_string(),
                text("rotated_latitude_longitude")
            ),
            ("grid_north_pole_latitude".to_string(), AttrValue::from(18.0)),
            (
                "grid_north_pole_longitude".to_string(),
                AttrValue::from(-140.75)
            ),
        ]
    );
}

#[test]
fn test_cf_attrs_sorted_by_name() {
    let reader = CfReader::from_store(rotated_pole_precipitation()).unwrap();
    let time = reader.cf_group().get("time").unwrap();

    let names: Vec<String> = time
        .cf_attrs()
        .unwrap()
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(names, vec!["axis", "bounds", "calendar", "long_name", "units"]);
}

// ============================================================================
// Per-variable sub-groups
// ============================================================================

#[test]
fn test_subgroups() {
    let reader = CfReader::from_store(rotated_pole_precipitation()).unwrap();
    let group = reader.cf_group();

    let time = group.subgroup("time").unwrap();
    assert_eq!(time.names().collect::<Vec<_>>(), vec!["time_bnds"]);

    let pr = group.subgroup("pr").unwrap();
    assert_eq!(
        pr.names().collect::<Vec<_>>(),
        vec!["lat", "lon", "rlat", "rlon", "rotated_pole", "time"]
    );
    assert_eq!(
        pr.coordinates().keys().copied().collect::<Vec<_>>(),
        vec!["rlat", "rlon", "time"]
    );
    assert_eq!(
        pr.auxiliary_coordinates().keys().copied().collect::<Vec<_>>(),
        vec!["lat", "lon"]
    );
    assert_eq!(
        pr.grid_mappings().keys().copied().collect::<Vec<_>>(),
        vec!["rotated_pole"]
    );
}

#[test]
fn test_bounds_edges_are_mutual() {
    let reader = CfReader::from_store(rotated_pole_precipitation()).unwrap();
    let group = reader.cf_group();

    let time_bnds = group.subgroup("time_bnds").unwrap();
    assert!(time_bnds.variable("time").is_some());
    assert_eq!(
        time_bnds.coordinates().keys().copied().collect::<Vec<_>>(),
        vec!["time"]
    );
}

#[test]
fn test_subgroup_is_one_hop_not_transitive() {
    // a -> b via coordinates, b -> c via bounds; c must not reach a's
    // neighbourhood.
    let store = MemoryStore::new()
        .with_variable(
            VariableDef::new("a", DataType::Float)
                .dim("x", 5)
                .attr("coordinates", "b"),
        )
        .with_variable(
            VariableDef::new("b", DataType::Double)
                .dim("x", 5)
                .attr("bounds", "c"),
        )
        .with_variable(
            VariableDef::new("c", DataType::Double)
                .dim("x", 5)
                .dim("bnds", 2),
        );
    let reader = CfReader::from_store(store).unwrap();
    let group = reader.cf_group();

    let a = group.subgroup("a").unwrap();
    assert!(a.variable("b").is_some());
    assert!(a.variable("c").is_none());

    let b = group.subgroup("b").unwrap();
    assert!(b.variable("a").is_some());
    assert!(b.variable("c").is_some());
}

#[test]
fn test_data_variable_spans_dimension_coordinates() {
    // Coordinates never named in an attribute still join a data
    // variable's group when their dimension spans it, one-way.
    let reader = CfReader::from_store(rotated_pole_precipitation()).unwrap();
    let group = reader.cf_group();

    let pr = group.subgroup("pr").unwrap();
    assert!(pr.variable("rlat").is_some());

    let rlat = group.subgroup("rlat").unwrap();
    assert!(rlat.is_empty());
}

// ============================================================================
// Attribute touch tracking
// ============================================================================

#[test]
fn test_touch_tracking_round_trip() {
    let reader = CfReader::from_store(rotated_pole_precipitation()).unwrap();
    let lat = reader.cf_group().get("lat").unwrap();

    // Nothing on a referenced variable is consumed by construction.
    assert!(lat.cf_attrs_used().unwrap().is_empty());
    assert_eq!(lat.cf_attrs_unused().unwrap().len(), 3);

    lat.attr("long_name").unwrap();
    lat.attr("units").unwrap();
    assert_eq!(
        lat.cf_attrs_used().unwrap(),
        vec![
            ("long_name".to_string(), text("latitude")),
            ("units".to_string(), text("degrees_north")),
        ]
    );
    assert_eq!(
        lat.cf_attrs_unused().unwrap(),
        vec![("standard_name".to_string(), text("latitude"))]
    );

    lat.cf_attrs_reset();
    assert!(lat.cf_attrs_used().unwrap().is_empty());
    assert_eq!(lat.cf_attrs_unused().unwrap().len(), 3);
}

#[test]
fn test_construction_consumes_pointer_attributes() {
    let reader = CfReader::from_store(rotated_pole_precipitation()).unwrap();
    let pr = reader.cf_group().get("pr").unwrap();

    let used: Vec<String> = pr
        .cf_attrs_used()
        .unwrap()
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(used, vec!["coordinates", "grid_mapping"]);
}

#[test]
fn test_attribute_caching_against_store() {
    let store = Arc::new(rotated_pole_precipitation());
    let reader = CfReader::new(store.clone()).unwrap();
    let lat = reader.cf_group().get("lat").unwrap();

    // The declared attribute-name set was fetched once, at wrap time.
    assert_eq!(store.attribute_names_calls("lat"), 1);

    lat.attr("units").unwrap();
    lat.attr("units").unwrap();
    lat.attr("long_name").unwrap();
    assert_eq!(store.attribute_names_calls("lat"), 1);
    assert_eq!(store.attribute_value_calls("lat"), 2);

    // Reset forgets the audit, not the values.
    lat.cf_attrs_reset();
    lat.attr("units").unwrap();
    assert_eq!(store.attribute_value_calls("lat"), 2);
    assert_eq!(lat.cf_attrs_used().unwrap().len(), 1);
}

// ============================================================================
// Global attributes
// ============================================================================

#[test]
fn test_global_attributes() {
    let reader = CfReader::from_store(rotated_pole_precipitation()).unwrap();
    let globals = reader.cf_group().global_attributes();

    assert_eq!(
        globals.keys().collect::<Vec<_>>(),
        vec!["Conventions", "experiment", "institution", "source"]
    );
    assert_eq!(globals["Conventions"], text("CF-1.0"));
    assert_eq!(globals["institution"], text("DMI"));
}

#[test]
fn test_global_attributes_isolated_from_variables() {
    let reader = CfReader::from_store(rotated_pole_precipitation()).unwrap();
    let group = reader.cf_group();

    for (_, var) in group.iter() {
        for (name, _) in var.cf_attrs().unwrap() {
            assert_ne!(name, "Conventions");
            assert_ne!(name, "experiment");
        }
    }
    assert!(!group.global_attributes().contains_key("standard_name"));
}

// ============================================================================
// Error conditions
// ============================================================================

#[test]
fn test_lookup_of_unknown_variable_fails() {
    let reader = CfReader::from_store(rotated_pole_precipitation()).unwrap();
    assert!(matches!(
        reader.cf_group().get("missing"),
        Err(CfError::VariableNotFound(_))
    ));
    assert!(matches!(
        reader.cf_group().subgroup("missing"),
        Err(CfError::VariableNotFound(_))
    ));
}

#[test]
fn test_undeclared_attribute_access_fails() {
    let reader = CfReader::from_store(rotated_pole_precipitation()).unwrap();
    let lat = reader.cf_group().get("lat").unwrap();

    assert!(matches!(
        lat.attr("positive"),
        Err(CfError::AttributeMissing { .. })
    ));
    assert_eq!(lat.try_attr("positive").unwrap(), None);
}

#[test]
fn test_dangling_references_are_dropped() {
    let store = MemoryStore::new()
        .with_variable(
            VariableDef::new("pr", DataType::Float)
                .dim("y", 3)
                .dim("x", 4)
                .attr("coordinates", "lon missing_lat")
                .attr("grid_mapping", "missing_crs"),
        )
        .with_variable(
            VariableDef::new("lon", DataType::Double).dim("y", 3).dim("x", 4),
        );
    let reader = CfReader::from_store(store).unwrap();
    let group = reader.cf_group();

    assert_eq!(
        group.auxiliary_coordinates().keys().copied().collect::<Vec<_>>(),
        vec!["lon"]
    );
    assert!(group.grid_mappings().is_empty());
    assert_eq!(
        group.subgroup("pr").unwrap().names().collect::<Vec<_>>(),
        vec!["lon"]
    );
}

// ============================================================================
// Other relationships
// ============================================================================

#[test]
fn test_cell_measures() {
    let store = MemoryStore::new()
        .with_variable(
            VariableDef::new("tas", DataType::Float)
                .dim("y", 3)
                .dim("x", 4)
                .attr("cell_measures", "area: cell_area"),
        )
        .with_variable(
            VariableDef::new("cell_area", DataType::Double)
                .dim("y", 3)
                .dim("x", 4)
                .attr("units", "m2"),
        );
    let reader = CfReader::from_store(store).unwrap();
    let group = reader.cf_group();

    assert_eq!(
        group.cell_measures().keys().copied().collect::<Vec<_>>(),
        vec!["cell_area"]
    );
    assert!(group.subgroup("tas").unwrap().variable("cell_area").is_some());
    assert!(group.subgroup("cell_area").unwrap().variable("tas").is_some());
}

#[test]
fn test_ancillary_variables() {
    let store = MemoryStore::new()
        .with_variable(
            VariableDef::new("q", DataType::Float)
                .dim("x", 4)
                .attr("ancillary_variables", "q_detection_limit"),
        )
        .with_variable(
            VariableDef::new("q_detection_limit", DataType::Float).dim("x", 4),
        );
    let reader = CfReader::from_store(store).unwrap();
    let group = reader.cf_group();

    assert_eq!(
        group
            .ancillary_variables()
            .keys()
            .copied()
            .collect::<Vec<_>>(),
        vec!["q_detection_limit"]
    );
}

#[test]
fn test_formula_terms() {
    let store = MemoryStore::new()
        .with_variable(
            VariableDef::new("lev", DataType::Double)
                .dim("lev", 5)
                .attr("standard_name", "atmosphere_sigma_coordinate")
                .attr("formula_terms", "sigma: lev ps: surface_pressure ptop: top_pressure"),
        )
        .with_variable(
            VariableDef::new("surface_pressure", DataType::Float)
                .dim("y", 3)
                .dim("x", 4),
        )
        .with_variable(VariableDef::new("top_pressure", DataType::Float))
        .with_variable(
            VariableDef::new("temp", DataType::Float)
                .dim("lev", 5)
                .dim("y", 3)
                .dim("x", 4),
        );
    let reader = CfReader::from_store(store).unwrap();
    let group = reader.cf_group();

    assert_eq!(
        group.formula_terms().keys().copied().collect::<Vec<_>>(),
        vec!["lev", "surface_pressure", "top_pressure"]
    );
    let ps = group.get("surface_pressure").unwrap();
    assert_eq!(ps.formula_roots().get("lev").map(String::as_str), Some("ps"));

    let lev = group.subgroup("lev").unwrap();
    assert!(lev.variable("surface_pressure").is_some());
    assert!(lev.variable("top_pressure").is_some());
}

// ============================================================================
// Idempotence
// ============================================================================

#[test]
fn test_views_are_idempotent() {
    let reader = CfReader::from_store(rotated_pole_precipitation()).unwrap();
    let group = reader.cf_group();

    let first = group.coordinates();
    let second = group.coordinates();
    assert_eq!(
        first.keys().collect::<Vec<_>>(),
        second.keys().collect::<Vec<_>>()
    );
    for (name, var) in &first {
        assert!(std::ptr::eq(*var, second[name]));
    }

    let sub_first = group.subgroup("pr").unwrap();
    let sub_second = group.subgroup("pr").unwrap();
    assert_eq!(
        sub_first.names().collect::<Vec<_>>(),
        sub_second.names().collect::<Vec<_>>()
    );
}
