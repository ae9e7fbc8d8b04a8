//! Compiled bundle on disk → hierarchical loss.

use candle_core::{Device, Tensor};
use mccell_loss::{HierarchicalLoss, HierarchicalLossConfig, LossError};
use mccell_ontology::{
    compile, parse_obo, CompileConfig, CompiledBundle, WorkingLabelSet, HEMATOPOIETIC_CELL,
};

const OBO: &str = r#"
[Term]
id: CL:0000000
name: cell

[Term]
id: CL:0000988
name: hematopoietic cell
is_a: CL:0000000

[Term]
id: CL:0000542
name: lymphocyte
is_a: CL:0000988

[Term]
id: CL:0000236
name: B cell
is_a: CL:0000542

[Term]
id: CL:0000084
name: T cell
is_a: CL:0000542

[Term]
id: CL:0000576
name: monocyte
is_a: CL:0000988
"#;

fn bundle() -> CompiledBundle {
    let graph = parse_obo(OBO).unwrap();
    let observations = [
        "CL:0000236",
        "CL:0000236",
        "CL:0000084",
        "CL:0000576",
        "CL:0000542",
        "CL:0000988",
    ];
    let working =
        WorkingLabelSet::from_observations(observations, 0, Some(HEMATOPOIETIC_CELL), &graph);
    compile(&graph, &working, CompileConfig::hematopoietic()).unwrap()
}

#[test]
fn test_saved_bundle_drives_loss() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bundle.json");
    bundle().save_json(&path).unwrap();
    let loaded = CompiledBundle::load_json(&path).unwrap();

    // leaves: T cell, B cell, monocyte; internal: lymphocyte, hematopoietic cell
    assert_eq!(loaded.num_leaves(), 3);
    assert_eq!(loaded.parent_nodes(), &["CL:0000542", "CL:0000988"]);

    let loss = HierarchicalLoss::new(&loaded, HierarchicalLossConfig::default(), &Device::Cpu)
        .unwrap();
    let probs = Tensor::new(&[[0.1f32, 0.8, 0.1], [0.3, 0.3, 0.4]], &Device::Cpu).unwrap();
    let targets = Tensor::new(&[1u32, 3], &Device::Cpu).unwrap();

    let (tensors, components) = loss.compute(&probs, &targets).unwrap();
    // Only the first sample is leaf-labeled.
    assert!((components.leaf - 8.0 * -(0.8f32.ln())).abs() < 1e-4);
    assert!(components.parent > 0.0);
    let total: f32 = tensors.total.to_scalar().unwrap();
    assert!((total - components.total).abs() < 1e-6);
}

#[test]
fn test_edited_matrix_is_stale() {
    let mut json = serde_json::to_value(bundle()).unwrap();
    let entry = &mut json["ancestor"]["data"][0];
    let flipped = 1 - entry.as_u64().unwrap();
    *entry = serde_json::Value::from(flipped);
    let tampered: CompiledBundle = serde_json::from_value(json).unwrap();

    let err = HierarchicalLoss::cpu(&tampered).unwrap_err();
    assert!(matches!(err, LossError::StaleEncoding(_)), "{err:?}");
}

#[test]
fn test_truncated_parent_axis_is_stale() {
    let mut json = serde_json::to_value(bundle()).unwrap();
    json["parent_nodes"].as_array_mut().unwrap().pop();
    let tampered: CompiledBundle = serde_json::from_value(json).unwrap();

    let err = HierarchicalLoss::cpu(&tampered).unwrap_err();
    assert!(matches!(err, LossError::StaleEncoding(_)), "{err:?}");
}
