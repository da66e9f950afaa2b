#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`ModelExportError`)
//! - [`config`]: Export configuration (`ExportConfig`, builder)
//! - [`types`]: Type tags, containers, identities, node handles (`NodeType`, `ContainerKind`, `NodeRef`)
//! - [`model`]: Arena-held evaluated model and its node types (`EvaluatedModel`, `Statistics`)
//! - [`schema`]: Field order and reference-field table (`Record`, `GraphNode`)
//! - [`policy`]: Reference policy and traversal order (`ReferencePolicy`, `TraversalOrder`)
//! - [`registry`]: Per-run identity allocation (`IdentityRegistry`)
//! - [`encoder`]: Canonical payload / reference encoding (`Encoder`, `FieldWriter`)
//! - [`walker`]: Container traversal (`GraphWalker`)
//! - [`collector`]: Top-level document assembly (`ContainerCollector`)
//! - [`normalize`]: Position == identity sorting (`normalize`)
//! - [`export`]: Main entry point (`ModelExporter`, `ExportOptions`, `ExportDocument`)
//!
//! # Architecture
//!
//! ```text
//! EvaluatedModel --> GraphWalker --(per container, TraversalOrder)--> Encoder
//!                                                                       |
//!                                          IdentityRegistry <-----------+
//!                                                                       |
//!                                                            ContainerCollector
//!                                                                       |
//!                                                                  normalize
//!                                                                       |
//!                                                       JSON (serde_json) / YAML (serde_yaml)
//! ```

pub mod collector;
pub mod config;
pub mod encoder;
pub mod error;
pub mod export;
pub mod model;
pub mod normalize;
pub mod policy;
pub mod registry;
pub mod schema;
pub mod types;
pub mod walker;

// --- Public API Re-exports ---

// Exporter (main entry point)
pub use export::{ExportDocument, ExportOptions, ModelExporter};

// Configuration
pub use config::{ExportConfig, ExportConfigBuilder};

// Error
pub use error::ModelExportError;

// Types
pub use types::{ContainerKind, Identity, NodeKey, NodeRef, NodeType, OutputFormat};

// Model
pub use model::{
    CopyrightStatement, DependencyTreeNode, EvaluatedFinding, EvaluatedIssue, EvaluatedModel,
    EvaluatedPackage, EvaluatedPackagePath, EvaluatedRuleViolation, EvaluatedScanResult,
    FindingType, IssueResolution, IssueType, LicenseId, PathExclude, RuleViolationResolution,
    ScannerDetails, ScopeExclude, ScopeName, Severity, SeverityCounts, Statistics, VcsInfo,
};

// Engine
pub use collector::ContainerCollector;
pub use encoder::{Encoder, FieldWriter};
pub use normalize::normalize;
pub use policy::{FieldMode, ReferencePolicy, TraversalOrder};
pub use registry::IdentityRegistry;
pub use schema::{GraphNode, Record};
pub use walker::GraphWalker;
