//! Hierarchical loss: weighted leaf cross-entropy plus parent consistency BCE.
//!
//! For a batch of leaf probabilities `probs` (B × L, rows sum to 1) and
//! ground-truth label indices `targets` (B), with the bundle matrices bound at
//! construction:
//!
//! 1. Leaf loss over leaf-labeled samples (`target < L`):
//!    `leaf_weight * mean(-ln p[k, y_k])`, zero when there are none.
//! 2. Predicted parent mass: `min(probs · Mᵀ, 1)` (B × P).
//! 3. Targets: ancestor column of each sample's label (B × P).
//! 4. Weights: exclusion row of each sample's label (B × P). Parents that are
//!    strict descendants of an internal ground truth are masked out.
//! 5. Parent loss: BCE(predicted, targets) weighted by the mask, averaged
//!    over the weight sum; zero when every weight is masked.
//! 6. Total = leaf + parent.
//!
//! Cross-entropy is taken on probabilities floored at `epsilon`, not on
//! logits, since the model head already applies softmax. NaN components
//! become 0.0.

use candle_core::{DType, Device, Tensor};
use mccell_ontology::{CompiledBundle, RelationMatrix};

use crate::config::HierarchicalLossConfig;
use crate::error::{LossError, LossResult};

/// Loss tensors, still attached to the autograd graph.
#[derive(Debug, Clone)]
pub struct LossTensors {
    pub total: Tensor,
    pub leaf: Tensor,
    pub parent: Tensor,
}

/// Per-component loss values for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LossComponents {
    /// Weighted leaf cross-entropy.
    pub leaf: f32,
    /// Masked parent BCE.
    pub parent: f32,
    /// Total loss.
    pub total: f32,
}

/// Stateless evaluator over one compiled bundle.
#[derive(Debug)]
pub struct HierarchicalLoss {
    config: HierarchicalLossConfig,
    num_leaves: usize,
    num_labels: usize,
    num_parents: usize,
    /// L × P
    marginalization_t: Tensor,
    /// N × P
    ancestor_t: Tensor,
    /// N × P
    exclusion: Tensor,
    device: Device,
    fingerprint: String,
}

impl HierarchicalLoss {
    /// Bind a bundle's matrices on `device`.
    ///
    /// # Errors
    /// - `StaleEncoding` when the bundle's axes or fingerprint disagree
    /// - `InvalidConfig` for a bad config or a bundle without leaf labels
    pub fn new(
        bundle: &CompiledBundle,
        config: HierarchicalLossConfig,
        device: &Device,
    ) -> LossResult<Self> {
        config.validate()?;
        bundle.validate()?;

        if bundle.num_leaves() == 0 {
            return Err(LossError::InvalidConfig(
                "bundle has no leaf labels, nothing to predict".to_string(),
            ));
        }

        let marginalization_t = matrix_tensor(&bundle.marginalization().transposed(), device)?;
        let ancestor_t = matrix_tensor(&bundle.ancestor().transposed(), device)?;
        let exclusion = matrix_tensor(bundle.exclusion(), device)?;

        tracing::info!(
            leaves = bundle.num_leaves(),
            labels = bundle.num_labels(),
            parents = bundle.num_parents(),
            leaf_weight = config.leaf_weight,
            fingerprint = %bundle.fingerprint(),
            "Hierarchical loss ready"
        );

        Ok(Self {
            config,
            num_leaves: bundle.num_leaves(),
            num_labels: bundle.num_labels(),
            num_parents: bundle.num_parents(),
            marginalization_t,
            ancestor_t,
            exclusion,
            device: device.clone(),
            fingerprint: bundle.fingerprint().to_string(),
        })
    }

    /// Create with default configuration on the CPU.
    pub fn cpu(bundle: &CompiledBundle) -> LossResult<Self> {
        Self::new(bundle, HierarchicalLossConfig::default(), &Device::Cpu)
    }

    /// Fail unless `bundle` is the one this evaluator was built from.
    pub fn ensure_matches(&self, bundle: &CompiledBundle) -> LossResult<()> {
        if bundle.fingerprint() != self.fingerprint {
            return Err(LossError::StaleEncoding(format!(
                "evaluator bound to {}, bundle is {}",
                self.fingerprint,
                bundle.fingerprint()
            )));
        }
        Ok(())
    }

    /// Compute all loss components.
    ///
    /// `probs` must live on the evaluator's device. `targets` may be any
    /// integer dtype.
    ///
    /// # Returns
    /// (loss tensors for backprop, LossComponents for logging)
    pub fn compute(
        &self,
        probs: &Tensor,
        targets: &Tensor,
    ) -> LossResult<(LossTensors, LossComponents)> {
        let batch = self.check_probs(probs)?;
        let (targets, ids) = self.check_targets(targets, batch)?;
        let probs = probs.to_dtype(DType::F32).map_err(map_candle)?;

        let leaf = self.leaf_loss(&probs, &targets, &ids)?;
        let parent = self.parent_loss(&probs, &targets, batch)?;
        let total = leaf.add(&parent).map_err(map_candle)?;

        let components = LossComponents {
            leaf: tensor_to_f32(&leaf)?,
            parent: tensor_to_f32(&parent)?,
            total: tensor_to_f32(&total)?,
        };
        tracing::trace!(
            batch,
            leaf = components.leaf,
            parent = components.parent,
            total = components.total,
            "Hierarchical loss"
        );

        Ok((LossTensors { total, leaf, parent }, components))
    }

    /// Predicted parent mass `min(probs · Mᵀ, 1)`, shape B × P.
    pub fn predicted_parent_probabilities(&self, probs: &Tensor) -> LossResult<Tensor> {
        let batch = self.check_probs(probs)?;
        if self.num_parents == 0 {
            return Tensor::zeros((batch, 0), DType::F32, probs.device()).map_err(map_candle);
        }
        let probs = probs.to_dtype(DType::F32).map_err(map_candle)?;
        let mass = probs
            .matmul(&self.marginalization_t)
            .map_err(map_candle)?;
        let ones = Tensor::ones_like(&mass).map_err(map_candle)?;
        mass.minimum(&ones).map_err(map_candle)
    }

    /// Ancestor indicators per sample, shape B × P.
    pub fn target_parent_indicators(&self, targets: &Tensor) -> LossResult<Tensor> {
        let batch = targets.dims1().map_err(map_candle)?;
        let (targets, _) = self.check_targets(targets, batch)?;
        self.ancestor_t.index_select(&targets, 0).map_err(map_candle)
    }

    /// Exclusion weights per sample, shape B × P.
    pub fn exclusion_weights(&self, targets: &Tensor) -> LossResult<Tensor> {
        let batch = targets.dims1().map_err(map_candle)?;
        let (targets, _) = self.check_targets(targets, batch)?;
        self.exclusion.index_select(&targets, 0).map_err(map_candle)
    }

    pub fn config(&self) -> &HierarchicalLossConfig {
        &self.config
    }

    pub fn num_leaves(&self) -> usize {
        self.num_leaves
    }

    pub fn num_labels(&self) -> usize {
        self.num_labels
    }

    pub fn num_parents(&self) -> usize {
        self.num_parents
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    fn leaf_loss(&self, probs: &Tensor, targets: &Tensor, ids: &[u32]) -> LossResult<Tensor> {
        let rows: Vec<u32> = ids
            .iter()
            .enumerate()
            .filter(|(_, &t)| (t as usize) < self.num_leaves)
            .map(|(k, _)| k as u32)
            .collect();
        if rows.is_empty() {
            return self.zero();
        }

        let n = rows.len();
        let rows = Tensor::from_vec(rows, n, probs.device()).map_err(map_candle)?;
        let leaf_probs = probs.index_select(&rows, 0).map_err(map_candle)?;
        let leaf_targets = targets.index_select(&rows, 0).map_err(map_candle)?;

        let log_p = clamp(&leaf_probs, self.config.epsilon as f64, 1.0)?
            .log()
            .map_err(map_candle)?;
        let loss = candle_nn::loss::nll(&log_p, &leaf_targets)
            .map_err(map_candle)?
            .affine(self.config.leaf_weight as f64, 0.0)
            .map_err(map_candle)?;

        self.zero_if_nan(loss)
    }

    fn parent_loss(&self, probs: &Tensor, targets: &Tensor, batch: usize) -> LossResult<Tensor> {
        if self.num_parents == 0 || batch == 0 {
            return self.zero();
        }

        let predicted = self.predicted_parent_probabilities(probs)?;
        let truth = self.ancestor_t.index_select(targets, 0).map_err(map_candle)?;
        let weights = self.exclusion.index_select(targets, 0).map_err(map_candle)?;

        let weight_sum = weights
            .sum_all()
            .map_err(map_candle)?
            .to_scalar::<f32>()
            .map_err(map_candle)?;
        if weight_sum == 0.0 {
            return self.zero();
        }

        // BCE: -(y ln p + (1 - y) ln(1 - p)), p in [eps, 1 - eps]
        let eps = self.config.epsilon as f64;
        let p = clamp(&predicted, eps, 1.0 - eps)?;
        let log_p = p.log().map_err(map_candle)?;
        let log_not_p = p
            .affine(-1.0, 1.0)
            .map_err(map_candle)?
            .log()
            .map_err(map_candle)?;
        let not_truth = truth.affine(-1.0, 1.0).map_err(map_candle)?;

        let bce = truth
            .mul(&log_p)
            .map_err(map_candle)?
            .add(&not_truth.mul(&log_not_p).map_err(map_candle)?)
            .map_err(map_candle)?
            .neg()
            .map_err(map_candle)?;

        let loss = bce
            .mul(&weights)
            .map_err(map_candle)?
            .sum_all()
            .map_err(map_candle)?
            .affine(1.0 / weight_sum as f64, 0.0)
            .map_err(map_candle)?;

        self.zero_if_nan(loss)
    }

    fn check_probs(&self, probs: &Tensor) -> LossResult<usize> {
        let mismatch = || LossError::ShapeMismatch {
            input: "probabilities".to_string(),
            expected: format!("batch x {}", self.num_leaves),
            actual: format!("{:?}", probs.dims()),
        };
        let (batch, width) = probs.dims2().map_err(|_| mismatch())?;
        if width != self.num_leaves {
            return Err(mismatch());
        }
        Ok(batch)
    }

    /// Targets as a U32 tensor on the evaluator device, plus host copies.
    fn check_targets(&self, targets: &Tensor, batch: usize) -> LossResult<(Tensor, Vec<u32>)> {
        let len = targets.dims1().map_err(|_| LossError::ShapeMismatch {
            input: "targets".to_string(),
            expected: format!("{batch}"),
            actual: format!("{:?}", targets.dims()),
        })?;
        if len != batch {
            return Err(LossError::ShapeMismatch {
                input: "targets".to_string(),
                expected: format!("{batch}"),
                actual: format!("{len}"),
            });
        }

        let targets = targets
            .to_dtype(DType::U32)
            .map_err(map_candle)?
            .to_device(&self.device)
            .map_err(map_candle)?;
        let ids = targets.to_vec1::<u32>().map_err(map_candle)?;
        if let Some(&bad) = ids.iter().find(|&&t| t as usize >= self.num_labels) {
            return Err(LossError::UnknownIndex {
                index: bad as usize,
                len: self.num_labels,
            });
        }
        Ok((targets, ids))
    }

    fn zero(&self) -> LossResult<Tensor> {
        Tensor::zeros((), DType::F32, &self.device).map_err(map_candle)
    }

    fn zero_if_nan(&self, loss: Tensor) -> LossResult<Tensor> {
        if tensor_to_f32(&loss)?.is_nan() {
            tracing::debug!("NaN loss component replaced by zero");
            return self.zero();
        }
        Ok(loss)
    }
}

/// Clamp element-wise to `[lo, hi]`, keeping the gradient path.
fn clamp(t: &Tensor, lo: f64, hi: f64) -> LossResult<Tensor> {
    let ones = Tensor::ones_like(t).map_err(map_candle)?;
    let lo_t = ones.affine(lo, 0.0).map_err(map_candle)?;
    let hi_t = ones.affine(hi, 0.0).map_err(map_candle)?;
    t.maximum(&lo_t)
        .map_err(map_candle)?
        .minimum(&hi_t)
        .map_err(map_candle)
}

fn matrix_tensor(matrix: &RelationMatrix, device: &Device) -> LossResult<Tensor> {
    Tensor::from_vec(matrix.to_f32_vec(), matrix.shape(), device).map_err(map_candle)
}

/// Extract a scalar f32 from a 0-dim or 1-element tensor.
fn tensor_to_f32(t: &Tensor) -> LossResult<f32> {
    let flat = t.flatten_all().map_err(map_candle)?;
    flat.to_vec1::<f32>()
        .map_err(map_candle)?
        .first()
        .copied()
        .ok_or_else(|| LossError::Tensor {
            message: "expected a scalar, got an empty tensor".to_string(),
        })
}

/// Map candle errors to LossError.
fn map_candle(e: candle_core::Error) -> LossError {
    LossError::Tensor {
        message: format!("Loss computation error: {}", e),
    }
}

static_assertions::assert_impl_all!(HierarchicalLoss: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use mccell_ontology::{
        compile, CompileConfig, OntologyGraph, OntologyGraphBuilder, ParentAxis, WorkingLabelSet,
    };

    fn graph(terms: &[&str], edges: &[(&str, &str)]) -> OntologyGraph {
        let mut b = OntologyGraphBuilder::new();
        for id in terms {
            b.add_term(*id, "").unwrap();
        }
        for (child, parent) in edges {
            b.add_is_a(*child, *parent);
        }
        b.build().unwrap()
    }

    /// root → parent_AB → {leaf_A, leaf_B}; root → parent_C → leaf_C
    fn toy_graph() -> OntologyGraph {
        graph(
            &["root", "parent_AB", "parent_C", "leaf_A", "leaf_B", "leaf_C"],
            &[
                ("parent_AB", "root"),
                ("parent_C", "root"),
                ("leaf_A", "parent_AB"),
                ("leaf_B", "parent_AB"),
                ("leaf_C", "parent_C"),
            ],
        )
    }

    /// Leaves only; parents come from the ancestor closure.
    fn toy_leaf_bundle() -> CompiledBundle {
        let working = WorkingLabelSet::from_labels(["leaf_A", "leaf_B", "leaf_C"]);
        let config = CompileConfig::default().parent_axis(ParentAxis::AncestorClosure);
        compile(&toy_graph(), &working, config).unwrap()
    }

    /// root → parent_A → leaf_A, all three observed.
    fn internal_bundle() -> CompiledBundle {
        let g = graph(
            &["root", "parent_A", "leaf_A"],
            &[("parent_A", "root"), ("leaf_A", "parent_A")],
        );
        let working = WorkingLabelSet::from_labels(["leaf_A", "parent_A", "root"]);
        compile(&g, &working, CompileConfig::default()).unwrap()
    }

    fn probs(rows: &[&[f32]]) -> Tensor {
        let width = rows[0].len();
        let data: Vec<f32> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Tensor::from_vec(data, (rows.len(), width), &Device::Cpu).unwrap()
    }

    fn targets(ids: &[u32]) -> Tensor {
        Tensor::from_slice(ids, ids.len(), &Device::Cpu).unwrap()
    }

    fn assert_close(actual: &Tensor, expected: &[&[f32]]) {
        let actual: Vec<Vec<f32>> = actual.to_vec2().unwrap();
        assert_eq!(actual.len(), expected.len());
        for (a_row, e_row) in actual.iter().zip(expected) {
            assert_eq!(a_row.len(), e_row.len());
            for (a, e) in a_row.iter().zip(e_row.iter()) {
                assert!((a - e).abs() < 1e-5, "got {actual:?}, expected {expected:?}");
            }
        }
    }

    #[test]
    fn test_predicted_parent_probabilities() {
        let loss = HierarchicalLoss::cpu(&toy_leaf_bundle()).unwrap();
        assert_eq!(loss.num_parents(), 3);

        let p = probs(&[&[0.8, 0.1, 0.1], &[0.1, 0.2, 0.7]]);
        let predicted = loss.predicted_parent_probabilities(&p).unwrap();
        // columns: parent_AB, parent_C, root
        assert_close(&predicted, &[&[0.9, 0.1, 1.0], &[0.3, 0.7, 1.0]]);
    }

    #[test]
    fn test_target_parent_indicators() {
        let loss = HierarchicalLoss::cpu(&toy_leaf_bundle()).unwrap();
        let truth = loss.target_parent_indicators(&targets(&[0, 2])).unwrap();
        assert_close(&truth, &[&[1.0, 0.0, 1.0], &[0.0, 1.0, 1.0]]);
    }

    #[test]
    fn test_dag_no_double_counting() {
        let g = graph(
            &["root", "pCD", "pDE", "C", "D", "E"],
            &[
                ("pCD", "root"),
                ("pDE", "root"),
                ("C", "pCD"),
                ("D", "pCD"),
                ("D", "pDE"),
                ("E", "pDE"),
            ],
        );
        let working = WorkingLabelSet::from_labels(["C", "D", "E"]);
        let config = CompileConfig::default().parent_axis(ParentAxis::AncestorClosure);
        let bundle = compile(&g, &working, config).unwrap();
        let loss = HierarchicalLoss::cpu(&bundle).unwrap();

        let predicted = loss
            .predicted_parent_probabilities(&probs(&[&[0.6, 0.3, 0.1]]))
            .unwrap();
        // A recursive sum over pCD + pDE would give root = 1.3.
        assert_close(&predicted, &[&[0.9, 0.4, 1.0]]);
    }

    #[test]
    fn test_loss_values() {
        let loss = HierarchicalLoss::cpu(&toy_leaf_bundle()).unwrap();
        let p = probs(&[&[0.8, 0.1, 0.1], &[0.1, 0.2, 0.7]]);
        let (tensors, components) = loss.compute(&p, &targets(&[0, 2])).unwrap();

        let expected_leaf = 8.0 * (-(0.8f32.ln()) - 0.7f32.ln()) / 2.0;
        // Six BCE terms, all weights 1: two of -ln 0.9, two of -ln 0.7, two ~0.
        let expected_parent = (-2.0 * 0.9f32.ln() - 2.0 * 0.7f32.ln()) / 6.0;

        assert!((components.leaf - expected_leaf).abs() < 1e-4, "{components:?}");
        assert!((components.parent - expected_parent).abs() < 1e-4, "{components:?}");
        assert!((components.total - components.leaf - components.parent).abs() < 1e-5);

        let total: f32 = tensors.total.to_scalar().unwrap();
        assert!((total - components.total).abs() < 1e-6);
    }

    #[test]
    fn test_leaf_weight_scales_leaf_component_only() {
        let bundle = toy_leaf_bundle();
        let p = probs(&[&[0.8, 0.1, 0.1]]);
        let t = targets(&[0]);

        let heavy = HierarchicalLoss::cpu(&bundle).unwrap();
        let light = HierarchicalLoss::new(
            &bundle,
            HierarchicalLossConfig::default().leaf_weight(1.0),
            &Device::Cpu,
        )
        .unwrap();

        let (_, h) = heavy.compute(&p, &t).unwrap();
        let (_, l) = light.compute(&p, &t).unwrap();
        assert!((h.leaf - 8.0 * l.leaf).abs() < 1e-5);
        assert!((h.parent - l.parent).abs() < 1e-6);
    }

    #[test]
    fn test_internal_label_has_zero_leaf_loss() {
        let loss = HierarchicalLoss::cpu(&internal_bundle()).unwrap();
        assert_eq!(loss.num_leaves(), 1);

        // index 1 = parent_A
        let (_, components) = loss.compute(&probs(&[&[0.9]]), &targets(&[1])).unwrap();
        assert_eq!(components.leaf, 0.0);
        assert!(components.parent > 0.0);
        assert_eq!(components.total, components.parent);
    }

    #[test]
    fn test_degenerate_batch_without_leaf_labels() {
        let loss = HierarchicalLoss::cpu(&internal_bundle()).unwrap();
        let (tensors, components) = loss
            .compute(&probs(&[&[0.5], &[1.0]]), &targets(&[1, 2]))
            .unwrap();

        assert_eq!(components.leaf, 0.0);
        assert!(!components.parent.is_nan());
        let leaf: f32 = tensors.leaf.to_scalar().unwrap();
        assert_eq!(leaf, 0.0);
    }

    #[test]
    fn test_exclusion_masks_descendants_of_internal_truth() {
        let working = WorkingLabelSet::from_labels([
            "leaf_A",
            "leaf_B",
            "leaf_C",
            "parent_AB",
            "parent_C",
            "root",
        ]);
        let bundle = compile(&toy_graph(), &working, CompileConfig::default()).unwrap();
        let loss = HierarchicalLoss::cpu(&bundle).unwrap();

        // index 5 = root, index 0 = leaf_A
        let weights = loss.exclusion_weights(&targets(&[5, 0])).unwrap();
        assert_close(&weights, &[&[0.0, 0.0, 1.0], &[1.0, 1.0, 1.0]]);

        // Root truth: wrong-looking mass on parent_AB/parent_C costs nothing.
        let p = probs(&[&[1.0, 0.0, 0.0]]);
        let (_, components) = loss.compute(&p, &targets(&[5])).unwrap();
        assert_eq!(components.leaf, 0.0);
        assert!(components.parent < 1e-5, "{components:?}");
    }

    #[test]
    fn test_parent_mass_clamped_at_one() {
        let g = graph(
            &["root", "x", "y", "z"],
            &[("x", "root"), ("y", "root"), ("z", "root")],
        );
        let working = WorkingLabelSet::from_labels(["x", "y", "z"]);
        let config = CompileConfig::default().parent_axis(ParentAxis::AncestorClosure);
        let bundle = compile(&g, &working, config).unwrap();
        let loss = HierarchicalLoss::cpu(&bundle).unwrap();

        let predicted = loss
            .predicted_parent_probabilities(&probs(&[&[0.34, 0.34, 0.34]]))
            .unwrap();
        let values: Vec<Vec<f32>> = predicted.to_vec2().unwrap();
        assert_eq!(values[0][0], 1.0);
    }

    #[test]
    fn test_shape_and_index_checks() {
        let loss = HierarchicalLoss::cpu(&toy_leaf_bundle()).unwrap();

        let narrow = probs(&[&[0.5, 0.5]]);
        assert!(matches!(
            loss.compute(&narrow, &targets(&[0])),
            Err(LossError::ShapeMismatch { .. })
        ));

        let p = probs(&[&[0.8, 0.1, 0.1]]);
        assert!(matches!(
            loss.compute(&p, &targets(&[0, 1])),
            Err(LossError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            loss.compute(&p, &targets(&[3])),
            Err(LossError::UnknownIndex { index: 3, len: 3 })
        ));
    }

    #[test]
    fn test_i64_targets_accepted() {
        let loss = HierarchicalLoss::cpu(&toy_leaf_bundle()).unwrap();
        let t = Tensor::from_slice(&[0i64, 2], 2, &Device::Cpu).unwrap();
        let p = probs(&[&[0.8, 0.1, 0.1], &[0.1, 0.2, 0.7]]);
        let (_, from_i64) = loss.compute(&p, &t).unwrap();
        let (_, from_u32) = loss.compute(&p, &targets(&[0, 2])).unwrap();
        assert_eq!(from_i64, from_u32);
    }

    #[test]
    fn test_bundle_without_leaves_rejected() {
        let g = graph(&["root", "mid", "leaf"], &[("mid", "root"), ("leaf", "mid")]);
        let working = WorkingLabelSet::from_labels(["mid", "root"]);
        let bundle = compile(&g, &working, CompileConfig::default()).unwrap();
        assert!(matches!(
            HierarchicalLoss::cpu(&bundle),
            Err(LossError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_ensure_matches() {
        let bundle = toy_leaf_bundle();
        let loss = HierarchicalLoss::cpu(&bundle).unwrap();
        assert!(loss.ensure_matches(&bundle).is_ok());
        assert!(matches!(
            loss.ensure_matches(&internal_bundle()),
            Err(LossError::StaleEncoding(_))
        ));
    }

    #[test]
    fn test_gradient_connected() {
        use candle_core::Var;

        let bundle = toy_leaf_bundle();
        let loss = HierarchicalLoss::cpu(&bundle).unwrap();

        let p = probs(&[&[0.6, 0.3, 0.1], &[0.2, 0.2, 0.6]]);
        let p_var = Var::from_tensor(&p).unwrap();
        let (tensors, _) = loss.compute(p_var.as_tensor(), &targets(&[0, 2])).unwrap();

        let grads = tensors.total.backward().unwrap();
        let grad = grads.get(p_var.as_tensor()).expect("probability gradient must exist");
        let grad_norm: f32 = grad
            .sqr()
            .unwrap()
            .sum_all()
            .unwrap()
            .to_scalar()
            .unwrap();
        assert!(grad_norm > 0.0, "gradient must be non-zero, got {grad_norm}");
    }
}
