//! 도메인 타입 -- 노드 타입 태그, 컨테이너, 식별자, 노드 핸들
//!
//! 평가 모델의 노드는 모두 arena(`Vec`)에 저장되고, 노드 간 관계는
//! 타입이 지정된 인덱스 핸들([`NodeRef`])로 표현됩니다.
//! export 엔진은 (노드 타입, arena 인덱스) 쌍([`NodeKey`])을 인스턴스 식별 키로 사용합니다.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 식별자가 부여되는 노드 타입
///
/// 타입 태그 문자열은 출력 문서와 설정 파일에서 사용되는 호환성 표면입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    PathExclude,
    ScopeExclude,
    Copyright,
    License,
    Scope,
    IssueResolution,
    Issue,
    ScanResult,
    Package,
    PackagePath,
    RuleViolationResolution,
    RuleViolation,
}

impl NodeType {
    /// 모든 노드 타입 (스키마 선언 순서)
    pub const ALL: [NodeType; 12] = [
        Self::PathExclude,
        Self::ScopeExclude,
        Self::Copyright,
        Self::License,
        Self::Scope,
        Self::IssueResolution,
        Self::Issue,
        Self::ScanResult,
        Self::Package,
        Self::PackagePath,
        Self::RuleViolationResolution,
        Self::RuleViolation,
    ];

    /// 타입 태그 문자열을 반환합니다.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PathExclude => "path_exclude",
            Self::ScopeExclude => "scope_exclude",
            Self::Copyright => "copyright",
            Self::License => "license",
            Self::Scope => "scope",
            Self::IssueResolution => "issue_resolution",
            Self::Issue => "issue",
            Self::ScanResult => "scan_result",
            Self::Package => "package",
            Self::PackagePath => "package_path",
            Self::RuleViolationResolution => "rule_violation_resolution",
            Self::RuleViolation => "rule_violation",
        }
    }

    /// 이 타입의 정규 페이로드가 모이는 컨테이너를 반환합니다.
    pub const fn container(&self) -> ContainerKind {
        match self {
            Self::PathExclude => ContainerKind::PathExcludes,
            Self::ScopeExclude => ContainerKind::ScopeExcludes,
            Self::Copyright => ContainerKind::Copyrights,
            Self::License => ContainerKind::Licenses,
            Self::Scope => ContainerKind::Scopes,
            Self::IssueResolution => ContainerKind::IssueResolutions,
            Self::Issue => ContainerKind::Issues,
            Self::ScanResult => ContainerKind::ScanResults,
            Self::Package => ContainerKind::Packages,
            Self::PackagePath => ContainerKind::Paths,
            Self::RuleViolationResolution => ContainerKind::RuleViolationResolutions,
            Self::RuleViolation => ContainerKind::RuleViolations,
        }
    }

    /// 문자열에서 노드 타입을 파싱합니다 (대소문자, `-`/`_` 구분 없음).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 출력 문서의 최상위 컨테이너
///
/// 선언 순서가 곧 출력 문서의 필드 순서이며, 기본 방문 순서이기도 합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    PathExcludes,
    ScopeExcludes,
    Copyrights,
    Licenses,
    Scopes,
    IssueResolutions,
    Issues,
    ScanResults,
    Packages,
    Paths,
    DependencyTrees,
    RuleViolationResolutions,
    RuleViolations,
}

impl ContainerKind {
    /// 모든 컨테이너 (스키마 선언 순서)
    pub const ALL: [ContainerKind; 13] = [
        Self::PathExcludes,
        Self::ScopeExcludes,
        Self::Copyrights,
        Self::Licenses,
        Self::Scopes,
        Self::IssueResolutions,
        Self::Issues,
        Self::ScanResults,
        Self::Packages,
        Self::Paths,
        Self::DependencyTrees,
        Self::RuleViolationResolutions,
        Self::RuleViolations,
    ];

    /// 출력 문서에서의 필드 이름을 반환합니다.
    pub const fn field_name(&self) -> &'static str {
        match self {
            Self::PathExcludes => "path_excludes",
            Self::ScopeExcludes => "scope_excludes",
            Self::Copyrights => "copyrights",
            Self::Licenses => "licenses",
            Self::Scopes => "scopes",
            Self::IssueResolutions => "issue_resolutions",
            Self::Issues => "issues",
            Self::ScanResults => "scan_results",
            Self::Packages => "packages",
            Self::Paths => "paths",
            Self::DependencyTrees => "dependency_trees",
            Self::RuleViolationResolutions => "rule_violation_resolutions",
            Self::RuleViolations => "rule_violations",
        }
    }

    /// 컨테이너에 담기는 노드 타입을 반환합니다.
    ///
    /// `dependency_trees`는 식별자가 없는 트리 레코드를 담으므로 `None`입니다.
    pub const fn node_type(&self) -> Option<NodeType> {
        match self {
            Self::PathExcludes => Some(NodeType::PathExclude),
            Self::ScopeExcludes => Some(NodeType::ScopeExclude),
            Self::Copyrights => Some(NodeType::Copyright),
            Self::Licenses => Some(NodeType::License),
            Self::Scopes => Some(NodeType::Scope),
            Self::IssueResolutions => Some(NodeType::IssueResolution),
            Self::Issues => Some(NodeType::Issue),
            Self::ScanResults => Some(NodeType::ScanResult),
            Self::Packages => Some(NodeType::Package),
            Self::Paths => Some(NodeType::PackagePath),
            Self::DependencyTrees => None,
            Self::RuleViolationResolutions => Some(NodeType::RuleViolationResolution),
            Self::RuleViolations => Some(NodeType::RuleViolation),
        }
    }

    /// 문자열에서 컨테이너를 파싱합니다 (대소문자, `-`/`_` 구분 없음).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|c| c.field_name() == normalized)
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// export 실행 중 부여되는 식별자 (타입 태그, 0부터 시작하는 정수)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity {
    /// 노드 타입
    pub node_type: NodeType,
    /// 타입 내에서 밀집된 0 기반 정수
    pub id: u32,
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.node_type, self.id)
    }
}

/// 노드 인스턴스 식별 키
///
/// 값 동등성이 아닌 인스턴스(arena 슬롯) 동일성으로 노드를 구분합니다.
/// 필드가 같더라도 다른 슬롯에 있는 두 노드는 서로 다른 키를 가집니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey {
    /// 노드 타입
    pub node_type: NodeType,
    /// arena 인덱스
    pub index: u32,
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.node_type, self.index)
    }
}

/// arena에 저장된 `T` 노드에 대한 타입 지정 핸들
///
/// 직렬화 시 arena 인덱스 정수 하나로 표현됩니다.
pub struct NodeRef<T> {
    index: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> NodeRef<T> {
    /// arena 인덱스로 핸들을 생성합니다.
    pub const fn new(index: u32) -> Self {
        Self {
            index,
            _marker: PhantomData,
        }
    }

    /// arena 인덱스를 반환합니다.
    pub const fn index(&self) -> u32 {
        self.index
    }
}

impl<T> Clone for NodeRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeRef<T> {}

impl<T> PartialEq for NodeRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for NodeRef<T> {}

impl<T> Hash for NodeRef<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for NodeRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeRef({})", self.index)
    }
}

impl<T> Serialize for NodeRef<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.index)
    }
}

impl<'de, T> Deserialize<'de> for NodeRef<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u32::deserialize(deserializer).map(Self::new)
    }
}

/// 출력 텍스트 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// 들여쓰기된 JSON
    #[default]
    Json,
    /// YAML
    Yaml,
}

impl OutputFormat {
    /// 형식 이름을 반환합니다.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    /// 문자열에서 형식을 파싱합니다 (대소문자 구분 없음, `yml` 허용).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// 파일 확장자
    pub const fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_from_str_loose() {
        assert_eq!(OutputFormat::from_str_loose("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str_loose("yml"), Some(OutputFormat::Yaml));
        assert_eq!(OutputFormat::from_str_loose("xml"), None);
        assert_eq!(OutputFormat::default().to_string(), "json");
    }

    #[test]
    fn node_type_display_matches_tag() {
        assert_eq!(NodeType::Package.to_string(), "package");
        assert_eq!(NodeType::PackagePath.to_string(), "package_path");
        assert_eq!(
            NodeType::RuleViolationResolution.to_string(),
            "rule_violation_resolution"
        );
    }

    #[test]
    fn node_type_from_str_loose() {
        assert_eq!(NodeType::from_str_loose("issue"), Some(NodeType::Issue));
        assert_eq!(
            NodeType::from_str_loose("Scan-Result"),
            Some(NodeType::ScanResult)
        );
        assert_eq!(NodeType::from_str_loose(" license "), Some(NodeType::License));
        assert_eq!(NodeType::from_str_loose("vulnerability"), None);
    }

    #[test]
    fn every_node_type_has_its_own_container() {
        for node_type in NodeType::ALL {
            assert_eq!(node_type.container().node_type(), Some(node_type));
        }
    }

    #[test]
    fn dependency_trees_carry_no_node_type() {
        assert_eq!(ContainerKind::DependencyTrees.node_type(), None);
        let typed = ContainerKind::ALL
            .iter()
            .filter(|c| c.node_type().is_some())
            .count();
        assert_eq!(typed, NodeType::ALL.len());
    }

    #[test]
    fn container_from_str_loose() {
        assert_eq!(
            ContainerKind::from_str_loose("scan-results"),
            Some(ContainerKind::ScanResults)
        );
        assert_eq!(
            ContainerKind::from_str_loose("PACKAGES"),
            Some(ContainerKind::Packages)
        );
        assert_eq!(ContainerKind::from_str_loose("package"), None);
    }

    #[test]
    fn node_type_serde_uses_snake_case_tag() {
        let json = serde_json::to_string(&NodeType::ScopeExclude).unwrap();
        assert_eq!(json, "\"scope_exclude\"");
    }

    #[test]
    fn node_ref_serializes_as_plain_index() {
        let r: NodeRef<String> = NodeRef::new(42);
        assert_eq!(serde_json::to_string(&r).unwrap(), "42");

        let back: NodeRef<String> = serde_json::from_str("42").unwrap();
        assert_eq!(back, r);
        assert_eq!(back.index(), 42);
    }

    #[test]
    fn node_ref_rejects_negative_index() {
        let result: Result<NodeRef<String>, _> = serde_json::from_str("-1");
        assert!(result.is_err());
    }

    #[test]
    fn identity_display() {
        let identity = Identity {
            node_type: NodeType::Issue,
            id: 3,
        };
        assert_eq!(identity.to_string(), "issue#3");
    }

    #[test]
    fn node_key_orders_by_type_then_index() {
        let a = NodeKey {
            node_type: NodeType::License,
            index: 9,
        };
        let b = NodeKey {
            node_type: NodeType::Package,
            index: 0,
        };
        assert!(a < b);
    }
}
