//! Hierarchical classification loss over the Cell Ontology.
//!
//! Combines a weighted cross-entropy on leaf-labeled samples with a parent
//! consistency loss: predicted leaf mass is summed along ontology ancestry
//! and compared against each sample's true ancestor set, with descendants of
//! an internal ground truth masked out.
//!
//! # Architecture
//!
//! - **config**: `HierarchicalLossConfig` (leaf weight, probability floor)
//! - **error**: `LossError` and `LossResult`
//! - **evaluator**: `HierarchicalLoss` built on candle tensors
//!
//! The evaluator reads only a validated [`mccell_ontology::CompiledBundle`];
//! a bundle whose matrices, axes or fingerprint disagree is rejected at
//! construction.
//!
//! # Example
//!
//! ```
//! use candle_core::{Device, Tensor};
//! use mccell_loss::{HierarchicalLoss, LossResult};
//! use mccell_ontology::{compile, CompileConfig, OntologyGraphBuilder, WorkingLabelSet};
//!
//! fn example() -> LossResult<()> {
//!     let mut builder = OntologyGraphBuilder::new();
//!     builder.add_term("CL:0000542", "lymphocyte")?;
//!     builder.add_term("CL:0000236", "B cell")?;
//!     builder.add_term("CL:0000084", "T cell")?;
//!     builder
//!         .add_is_a("CL:0000236", "CL:0000542")
//!         .add_is_a("CL:0000084", "CL:0000542");
//!     let graph = builder.build()?;
//!
//!     let working = WorkingLabelSet::from_labels(["CL:0000084", "CL:0000236", "CL:0000542"]);
//!     let bundle = compile(&graph, &working, CompileConfig::default())?;
//!     let loss = HierarchicalLoss::cpu(&bundle)?;
//!
//!     let probs = Tensor::new(&[[0.7f32, 0.3]], &Device::Cpu).unwrap();
//!     let targets = Tensor::new(&[2u32], &Device::Cpu).unwrap();
//!     let (_, components) = loss.compute(&probs, &targets)?;
//!     assert_eq!(components.leaf, 0.0);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod config;
pub mod error;
pub mod evaluator;

pub use config::HierarchicalLossConfig;
pub use error::{LossError, LossResult};
pub use evaluator::{HierarchicalLoss, LossComponents, LossTensors};
