//! 평가 모델 -- arena 기반 그래프
//!
//! [`EvaluatedModel`]은 식별자가 부여되는 모든 노드를 타입별 `Vec`(arena)에 소유합니다.
//! 노드 간 관계는 [`NodeRef`] 인덱스이므로 순환 그래프도 소유권 문제 없이 표현됩니다.
//! 각 arena는 그대로 해당 타입의 선언된 컨테이너 목록이기도 합니다.
//!
//! 모델은 arena 형태(핸들은 정수 인덱스) 그대로 serde 직렬화/역직렬화되며,
//! 이 형식이 CLI의 입력 형식입니다.

pub mod nodes;
pub mod statistics;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::GraphNode;
use crate::types::{NodeRef, NodeType};

pub use nodes::{
    CopyrightStatement, DependencyTreeNode, EvaluatedFinding, EvaluatedIssue, EvaluatedPackage,
    EvaluatedPackagePath, EvaluatedRuleViolation, EvaluatedScanResult, FindingType,
    IssueResolution, IssueType, LicenseId, PathExclude, RuleViolationResolution, ScannerDetails,
    ScopeExclude, ScopeName, Severity, VcsInfo,
};
pub use statistics::{SeverityCounts, Statistics};

/// 평가 모델
///
/// 필드 선언 순서는 출력 문서의 최상위 필드 순서와 같습니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatedModel {
    pub path_excludes: Vec<PathExclude>,
    pub scope_excludes: Vec<ScopeExclude>,
    pub copyrights: Vec<CopyrightStatement>,
    pub licenses: Vec<LicenseId>,
    pub scopes: Vec<ScopeName>,
    pub issue_resolutions: Vec<IssueResolution>,
    pub issues: Vec<EvaluatedIssue>,
    pub scan_results: Vec<EvaluatedScanResult>,
    pub packages: Vec<EvaluatedPackage>,
    pub paths: Vec<EvaluatedPackagePath>,
    pub dependency_trees: Vec<DependencyTreeNode>,
    pub rule_violation_resolutions: Vec<RuleViolationResolution>,
    pub rule_violations: Vec<EvaluatedRuleViolation>,
    pub statistics: Statistics,
    /// 저장소 설정 원문 (YAML 문자열)
    pub repository_configuration: String,
    /// 외부 도구가 덧붙인 임의 데이터
    pub custom_data: BTreeMap<String, serde_json::Value>,
}

impl EvaluatedModel {
    /// 노드를 해당 타입의 arena에 추가하고 핸들을 반환합니다.
    ///
    /// arena 인덱스는 `u32`로 표현되며, `u32::MAX`를 넘는 arena는 지원하지 않습니다.
    pub fn add<T: GraphNode>(&mut self, node: T) -> NodeRef<T> {
        let arena = T::arena_mut(self);
        let index = u32::try_from(arena.len()).unwrap_or(u32::MAX);
        arena.push(node);
        NodeRef::new(index)
    }

    /// 핸들이 가리키는 노드를 반환합니다. 범위를 벗어나면 `None`입니다.
    pub fn get<T: GraphNode>(&self, node: NodeRef<T>) -> Option<&T> {
        T::arena(self).get(node.index() as usize)
    }

    /// 핸들이 가리키는 노드의 가변 참조를 반환합니다.
    pub fn get_mut<T: GraphNode>(&mut self, node: NodeRef<T>) -> Option<&mut T> {
        T::arena_mut(self).get_mut(node.index() as usize)
    }

    /// 주어진 타입의 arena 길이를 반환합니다.
    pub fn len_of(&self, node_type: NodeType) -> usize {
        match node_type {
            NodeType::PathExclude => self.path_excludes.len(),
            NodeType::ScopeExclude => self.scope_excludes.len(),
            NodeType::Copyright => self.copyrights.len(),
            NodeType::License => self.licenses.len(),
            NodeType::Scope => self.scopes.len(),
            NodeType::IssueResolution => self.issue_resolutions.len(),
            NodeType::Issue => self.issues.len(),
            NodeType::ScanResult => self.scan_results.len(),
            NodeType::Package => self.packages.len(),
            NodeType::PackagePath => self.paths.len(),
            NodeType::RuleViolationResolution => self.rule_violation_resolutions.len(),
            NodeType::RuleViolation => self.rule_violations.len(),
        }
    }

    /// 식별자가 부여되는 노드의 총 개수
    pub fn node_count(&self) -> usize {
        NodeType::ALL.iter().map(|t| self.len_of(*t)).sum()
    }

    /// 현재 모델 내용으로 `statistics`를 다시 계산합니다.
    pub fn refresh_statistics(&mut self) {
        self.statistics = Statistics::compute(self);
    }
}
