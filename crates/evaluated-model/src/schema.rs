//! 스키마 선언 -- 레코드 필드 순서와 노드 참조 필드 표
//!
//! 각 레코드 타입은 [`Record::encode_fields`]에서 필드를 선언된 순서대로
//! [`FieldWriter`]에 기록합니다. 노드를 가리키는 필드는 [`REFERENCE_FIELDS`]에
//! 등록되어 있어야 하며, [`ReferencePolicy`](crate::policy::ReferencePolicy)는
//! 이 표에 있는 필드에 대해서만 항목을 받습니다.

use crate::encoder::FieldWriter;
use crate::error::ModelExportError;
use crate::model::{
    CopyrightStatement, DependencyTreeNode, EvaluatedFinding, EvaluatedIssue, EvaluatedModel,
    EvaluatedPackage, EvaluatedPackagePath, EvaluatedRuleViolation, EvaluatedScanResult,
    IssueResolution, LicenseId, PathExclude, RuleViolationResolution, ScopeExclude, ScopeName,
};
use crate::types::NodeType;

/// 필드를 선언된 순서로 인코딩할 수 있는 레코드
pub trait Record {
    /// 스키마 이름 (참조 정책 표의 키)
    const SCHEMA: &'static str;

    /// 필드를 선언된 순서대로 기록합니다.
    fn encode_fields(&self, w: &mut FieldWriter<'_, '_>) -> Result<(), ModelExportError>;
}

/// 식별자가 부여되고 모델 arena에 저장되는 노드
pub trait GraphNode: Record + Sized {
    /// 노드 타입 태그
    const NODE_TYPE: NodeType;

    /// 이 타입의 arena
    fn arena(model: &EvaluatedModel) -> &[Self];

    /// 이 타입의 arena (가변)
    fn arena_mut(model: &mut EvaluatedModel) -> &mut Vec<Self>;
}

/// 스키마 이름 -- 의존성 트리 노드
pub const DEPENDENCY_TREE_NODE: &str = "dependency_tree_node";

/// 스키마 이름 -- finding
pub const FINDING: &str = "finding";

/// 노드를 가리키는 모든 필드 (스키마, 필드)
pub const REFERENCE_FIELDS: &[(&str, &str)] = &[
    ("issue", "resolutions"),
    ("issue", "package"),
    ("issue", "scan_result"),
    ("issue", "path"),
    ("scan_result", "issues"),
    ("package", "declared_licenses"),
    ("package", "detected_licenses"),
    ("package", "paths"),
    ("package", "scopes"),
    ("package", "scan_results"),
    ("package", "path_excludes"),
    ("package", "scope_excludes"),
    ("package", "issues"),
    ("package_path", "pkg"),
    ("package_path", "project"),
    ("package_path", "scope"),
    ("package_path", "path"),
    ("rule_violation", "pkg"),
    ("rule_violation", "license"),
    ("rule_violation", "resolutions"),
    (FINDING, "license"),
    (FINDING, "copyright"),
    (FINDING, "scan_result"),
    (FINDING, "path_excludes"),
    (DEPENDENCY_TREE_NODE, "pkg"),
    (DEPENDENCY_TREE_NODE, "scope"),
    (DEPENDENCY_TREE_NODE, "issues"),
];

/// 표에 등록된 참조 필드를 `'static` 이름 쌍으로 찾습니다.
pub fn reference_field(schema: &str, field: &str) -> Option<(&'static str, &'static str)> {
    REFERENCE_FIELDS
        .iter()
        .copied()
        .find(|(s, f)| *s == schema && *f == field)
}

macro_rules! graph_node {
    ($ty:ty, $node_type:expr, $arena:ident) => {
        impl GraphNode for $ty {
            const NODE_TYPE: NodeType = $node_type;

            fn arena(model: &EvaluatedModel) -> &[Self] {
                &model.$arena
            }

            fn arena_mut(model: &mut EvaluatedModel) -> &mut Vec<Self> {
                &mut model.$arena
            }
        }
    };
}

graph_node!(PathExclude, NodeType::PathExclude, path_excludes);
graph_node!(ScopeExclude, NodeType::ScopeExclude, scope_excludes);
graph_node!(CopyrightStatement, NodeType::Copyright, copyrights);
graph_node!(LicenseId, NodeType::License, licenses);
graph_node!(ScopeName, NodeType::Scope, scopes);
graph_node!(IssueResolution, NodeType::IssueResolution, issue_resolutions);
graph_node!(EvaluatedIssue, NodeType::Issue, issues);
graph_node!(EvaluatedScanResult, NodeType::ScanResult, scan_results);
graph_node!(EvaluatedPackage, NodeType::Package, packages);
graph_node!(EvaluatedPackagePath, NodeType::PackagePath, paths);
graph_node!(
    RuleViolationResolution,
    NodeType::RuleViolationResolution,
    rule_violation_resolutions
);
graph_node!(EvaluatedRuleViolation, NodeType::RuleViolation, rule_violations);

impl Record for PathExclude {
    const SCHEMA: &'static str = NodeType::PathExclude.as_str();

    fn encode_fields(&self, w: &mut FieldWriter<'_, '_>) -> Result<(), ModelExportError> {
        w.value("pattern", &self.pattern)?;
        w.value("reason", &self.reason)?;
        w.value("comment", &self.comment)
    }
}

impl Record for ScopeExclude {
    const SCHEMA: &'static str = NodeType::ScopeExclude.as_str();

    fn encode_fields(&self, w: &mut FieldWriter<'_, '_>) -> Result<(), ModelExportError> {
        w.value("pattern", &self.pattern)?;
        w.value("reason", &self.reason)?;
        w.value("comment", &self.comment)
    }
}

impl Record for CopyrightStatement {
    const SCHEMA: &'static str = NodeType::Copyright.as_str();

    fn encode_fields(&self, w: &mut FieldWriter<'_, '_>) -> Result<(), ModelExportError> {
        w.value("statement", &self.statement)
    }
}

impl Record for LicenseId {
    const SCHEMA: &'static str = NodeType::License.as_str();

    fn encode_fields(&self, w: &mut FieldWriter<'_, '_>) -> Result<(), ModelExportError> {
        w.value("id", &self.id)
    }
}

impl Record for ScopeName {
    const SCHEMA: &'static str = NodeType::Scope.as_str();

    fn encode_fields(&self, w: &mut FieldWriter<'_, '_>) -> Result<(), ModelExportError> {
        w.value("name", &self.name)
    }
}

impl Record for IssueResolution {
    const SCHEMA: &'static str = NodeType::IssueResolution.as_str();

    fn encode_fields(&self, w: &mut FieldWriter<'_, '_>) -> Result<(), ModelExportError> {
        w.value("message", &self.message)?;
        w.value("reason", &self.reason)?;
        w.value("comment", &self.comment)
    }
}

impl Record for RuleViolationResolution {
    const SCHEMA: &'static str = NodeType::RuleViolationResolution.as_str();

    fn encode_fields(&self, w: &mut FieldWriter<'_, '_>) -> Result<(), ModelExportError> {
        w.value("message", &self.message)?;
        w.value("reason", &self.reason)?;
        w.value("comment", &self.comment)
    }
}

impl Record for EvaluatedIssue {
    const SCHEMA: &'static str = NodeType::Issue.as_str();

    fn encode_fields(&self, w: &mut FieldWriter<'_, '_>) -> Result<(), ModelExportError> {
        w.value("timestamp", &self.timestamp)?;
        w.value("type", &self.issue_type)?;
        w.value("source", &self.source)?;
        w.value("message", &self.message)?;
        w.value("severity", &self.severity)?;
        w.nodes("resolutions", &self.resolutions)?;
        w.optional_node("package", self.package)?;
        w.optional_node("scan_result", self.scan_result)?;
        w.optional_node("path", self.path)?;
        w.value("how_to_fix", &self.how_to_fix)
    }
}

impl Record for EvaluatedScanResult {
    const SCHEMA: &'static str = NodeType::ScanResult.as_str();

    fn encode_fields(&self, w: &mut FieldWriter<'_, '_>) -> Result<(), ModelExportError> {
        w.value("provenance", &self.provenance)?;
        w.value("scanner", &self.scanner)?;
        w.value("start_time", &self.start_time)?;
        w.value("end_time", &self.end_time)?;
        w.value("file_count", &self.file_count)?;
        w.value("package_verification_code", &self.package_verification_code)?;
        w.nodes("issues", &self.issues)
    }
}

impl Record for EvaluatedPackage {
    const SCHEMA: &'static str = NodeType::Package.as_str();

    fn encode_fields(&self, w: &mut FieldWriter<'_, '_>) -> Result<(), ModelExportError> {
        w.value("id", &self.id)?;
        w.value("is_project", &self.is_project)?;
        w.value("definition_file_path", &self.definition_file_path)?;
        w.value("purl", &self.purl)?;
        w.nodes("declared_licenses", &self.declared_licenses)?;
        w.nodes("detected_licenses", &self.detected_licenses)?;
        w.optional("concluded_license", &self.concluded_license)?;
        w.value("description", &self.description)?;
        w.value("homepage_url", &self.homepage_url)?;
        w.optional("vcs", &self.vcs)?;
        w.nodes("paths", &self.paths)?;
        w.value("levels", &self.levels)?;
        w.nodes("scopes", &self.scopes)?;
        w.nodes("scan_results", &self.scan_results)?;
        w.records("findings", &self.findings)?;
        w.value("is_excluded", &self.is_excluded)?;
        w.nodes("path_excludes", &self.path_excludes)?;
        w.nodes("scope_excludes", &self.scope_excludes)?;
        w.nodes("issues", &self.issues)
    }
}

impl Record for EvaluatedPackagePath {
    const SCHEMA: &'static str = NodeType::PackagePath.as_str();

    fn encode_fields(&self, w: &mut FieldWriter<'_, '_>) -> Result<(), ModelExportError> {
        w.node("pkg", self.pkg)?;
        w.node("project", self.project)?;
        w.node("scope", self.scope)?;
        w.nodes("path", &self.path)
    }
}

impl Record for EvaluatedRuleViolation {
    const SCHEMA: &'static str = NodeType::RuleViolation.as_str();

    fn encode_fields(&self, w: &mut FieldWriter<'_, '_>) -> Result<(), ModelExportError> {
        w.value("rule", &self.rule)?;
        w.node("pkg", self.pkg)?;
        w.optional_node("license", self.license)?;
        w.optional("license_source", &self.license_source)?;
        w.value("severity", &self.severity)?;
        w.value("message", &self.message)?;
        w.value("how_to_fix", &self.how_to_fix)?;
        w.nodes("resolutions", &self.resolutions)
    }
}

impl Record for EvaluatedFinding {
    const SCHEMA: &'static str = FINDING;

    fn encode_fields(&self, w: &mut FieldWriter<'_, '_>) -> Result<(), ModelExportError> {
        w.value("type", &self.finding_type)?;
        w.optional_node("license", self.license)?;
        w.optional_node("copyright", self.copyright)?;
        w.value("path", &self.path)?;
        w.value("start_line", &self.start_line)?;
        w.value("end_line", &self.end_line)?;
        w.node("scan_result", self.scan_result)?;
        w.nodes("path_excludes", &self.path_excludes)
    }
}

impl Record for DependencyTreeNode {
    const SCHEMA: &'static str = DEPENDENCY_TREE_NODE;

    fn encode_fields(&self, w: &mut FieldWriter<'_, '_>) -> Result<(), ModelExportError> {
        w.value("title", &self.title)?;
        w.optional("linkage", &self.linkage)?;
        w.optional_node("pkg", self.pkg)?;
        w.optional_node("scope", self.scope)?;
        w.nodes("issues", &self.issues)?;
        w.records("children", &self.children)
    }
}
