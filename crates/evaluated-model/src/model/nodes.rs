//! 평가 모델 노드 정의
//!
//! 식별자가 부여되는 노드(패키지, 이슈, 스캔 결과 등)와 인라인으로만 인코딩되는
//! 레코드(finding, 의존성 트리 노드)를 정의합니다. 노드 간 관계는 모두 [`NodeRef`]입니다.

use serde::{Deserialize, Serialize};

use crate::types::NodeRef;

/// 이슈/규칙 위반 심각도
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Hint,
    #[default]
    Warning,
    Error,
}

/// 이슈 발생 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    #[default]
    Analyzer,
    Scanner,
}

/// finding 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingType {
    License,
    Copyright,
}

/// 경로 제외 규칙
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathExclude {
    /// glob 패턴
    pub pattern: String,
    /// 제외 사유 (예: `TEST_OF`, `BUILD_TOOL_OF`)
    pub reason: String,
    /// 자유 형식 설명
    pub comment: String,
}

/// 스코프 제외 규칙
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeExclude {
    /// 스코프 이름 정규식
    pub pattern: String,
    /// 제외 사유 (예: `TEST_DEPENDENCY_OF`)
    pub reason: String,
    /// 자유 형식 설명
    pub comment: String,
}

/// 저작권 문구
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyrightStatement {
    pub statement: String,
}

/// 라이선스 식별자 (SPDX 표현식 또는 LicenseRef)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseId {
    pub id: String,
}

/// 의존성 스코프 이름
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeName {
    pub name: String,
}

/// 이슈 해소 규칙
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueResolution {
    /// 대상 이슈 메시지 정규식
    pub message: String,
    /// 해소 사유
    pub reason: String,
    /// 자유 형식 설명
    pub comment: String,
}

/// 규칙 위반 해소 규칙
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleViolationResolution {
    /// 대상 위반 메시지 정규식
    pub message: String,
    /// 해소 사유
    pub reason: String,
    /// 자유 형식 설명
    pub comment: String,
}

/// 평가된 이슈
///
/// 출처 패키지, 스캔 결과, 의존성 경로로의 역참조를 가집니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatedIssue {
    /// 발생 시각 (RFC3339)
    pub timestamp: String,
    /// 발생 단계
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    /// 이슈를 보고한 도구/모듈
    pub source: String,
    pub message: String,
    pub severity: Severity,
    /// 이 이슈에 매칭된 해소 규칙
    pub resolutions: Vec<NodeRef<IssueResolution>>,
    /// 이슈가 속한 패키지
    pub package: Option<NodeRef<EvaluatedPackage>>,
    /// 이슈를 만든 스캔 결과
    pub scan_result: Option<NodeRef<EvaluatedScanResult>>,
    /// 이슈가 발견된 의존성 경로
    pub path: Option<NodeRef<EvaluatedPackagePath>>,
    pub how_to_fix: String,
}

impl EvaluatedIssue {
    /// 메시지와 심각도만 가진 이슈를 생성합니다.
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            ..Self::default()
        }
    }
}

/// 스캐너 정보
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerDetails {
    pub name: String,
    pub version: String,
    pub configuration: String,
}

/// 평가된 스캔 결과
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatedScanResult {
    /// 스캔한 소스의 출처 (아티팩트 URL 또는 VCS 위치)
    pub provenance: String,
    pub scanner: ScannerDetails,
    pub start_time: String,
    pub end_time: String,
    pub file_count: u32,
    pub package_verification_code: String,
    /// 이 스캔에서 발생한 이슈
    pub issues: Vec<NodeRef<EvaluatedIssue>>,
}

/// VCS 위치 정보
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VcsInfo {
    #[serde(rename = "type")]
    pub vcs_type: String,
    pub url: String,
    pub revision: String,
    pub path: String,
}

/// 평가된 패키지 (프로젝트 포함)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatedPackage {
    /// 패키지 식별자 (예: `Maven:org.example:lib:1.0.0`)
    pub id: String,
    pub is_project: bool,
    pub definition_file_path: String,
    pub purl: String,
    pub declared_licenses: Vec<NodeRef<LicenseId>>,
    pub detected_licenses: Vec<NodeRef<LicenseId>>,
    pub concluded_license: Option<String>,
    pub description: String,
    pub homepage_url: String,
    pub vcs: Option<VcsInfo>,
    /// 이 패키지로 이어지는 의존성 경로
    pub paths: Vec<NodeRef<EvaluatedPackagePath>>,
    /// 의존성 트리에서 나타나는 깊이 목록
    pub levels: Vec<u32>,
    pub scopes: Vec<NodeRef<ScopeName>>,
    pub scan_results: Vec<NodeRef<EvaluatedScanResult>>,
    pub findings: Vec<EvaluatedFinding>,
    pub is_excluded: bool,
    pub path_excludes: Vec<NodeRef<PathExclude>>,
    pub scope_excludes: Vec<NodeRef<ScopeExclude>>,
    pub issues: Vec<NodeRef<EvaluatedIssue>>,
}

impl EvaluatedPackage {
    /// 식별자만 가진 패키지를 생성합니다.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// 식별자만 가진 프로젝트를 생성합니다.
    pub fn project(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            is_project: true,
            ..Self::default()
        }
    }
}

/// 패키지에 포함된 라이선스/저작권 finding
///
/// 식별자가 없는 레코드로, 소유 패키지 안에 인라인으로 인코딩됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedFinding {
    #[serde(rename = "type")]
    pub finding_type: FindingType,
    #[serde(default)]
    pub license: Option<NodeRef<LicenseId>>,
    #[serde(default)]
    pub copyright: Option<NodeRef<CopyrightStatement>>,
    pub path: String,
    pub start_line: u32,
    pub end_line: u32,
    pub scan_result: NodeRef<EvaluatedScanResult>,
    #[serde(default)]
    pub path_excludes: Vec<NodeRef<PathExclude>>,
}

/// 프로젝트에서 패키지까지의 의존성 경로
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedPackagePath {
    /// 경로의 끝에 있는 패키지
    pub pkg: NodeRef<EvaluatedPackage>,
    /// 경로의 시작 프로젝트
    pub project: NodeRef<EvaluatedPackage>,
    pub scope: NodeRef<ScopeName>,
    /// 프로젝트와 패키지 사이의 중간 패키지
    #[serde(default)]
    pub path: Vec<NodeRef<EvaluatedPackage>>,
}

/// 의존성 트리 노드
///
/// 식별자가 없는 레코드로, 자식 노드를 직접 소유합니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyTreeNode {
    pub title: String,
    pub linkage: Option<String>,
    pub pkg: Option<NodeRef<EvaluatedPackage>>,
    pub scope: Option<NodeRef<ScopeName>>,
    pub issues: Vec<NodeRef<EvaluatedIssue>>,
    pub children: Vec<DependencyTreeNode>,
}

impl DependencyTreeNode {
    /// 트리의 깊이를 반환합니다 (자식이 없는 노드는 1).
    pub fn depth(&self) -> u32 {
        1 + self
            .children
            .iter()
            .map(DependencyTreeNode::depth)
            .max()
            .unwrap_or(0)
    }
}

/// 평가된 규칙 위반
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedRuleViolation {
    pub rule: String,
    pub pkg: NodeRef<EvaluatedPackage>,
    #[serde(default)]
    pub license: Option<NodeRef<LicenseId>>,
    #[serde(default)]
    pub license_source: Option<String>,
    pub severity: Severity,
    pub message: String,
    #[serde(default)]
    pub how_to_fix: String,
    #[serde(default)]
    pub resolutions: Vec<NodeRef<RuleViolationResolution>>,
}
