//! 모델 통계 집계
//!
//! 해소되지 않은(open) 이슈와 규칙 위반을 심각도별로 세고,
//! 의존성 트리 깊이와 라이선스 사용 횟수를 집계합니다.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::EvaluatedModel;
use super::nodes::{DependencyTreeNode, Severity};

/// 심각도별 개수
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityCounts {
    pub errors: u32,
    pub warnings: u32,
    pub hints: u32,
}

impl SeverityCounts {
    fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Error => self.errors += 1,
            Severity::Warning => self.warnings += 1,
            Severity::Hint => self.hints += 1,
        }
    }

    /// 전체 개수
    pub fn total(&self) -> u32 {
        self.errors + self.warnings + self.hints
    }
}

/// 평가 모델 통계
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    /// 해소 규칙이 매칭되지 않은 이슈
    pub open_issues: SeverityCounts,
    /// 해소 규칙이 매칭되지 않은 규칙 위반
    pub open_rule_violations: SeverityCounts,
    /// 가장 깊은 의존성 트리의 깊이
    pub dependency_tree_depth: u32,
    /// 프로젝트 수 (제외된 프로젝트 포함)
    pub total_projects: u32,
    /// 제외된 프로젝트 수
    pub excluded_projects: u32,
    /// 프로젝트가 아닌 패키지 수 (제외된 패키지 포함)
    pub total_packages: u32,
    /// 제외된 패키지 수
    pub excluded_packages: u32,
    /// 선언된 라이선스별 패키지 수
    pub declared_licenses: BTreeMap<String, u32>,
    /// 검출된 라이선스별 패키지 수
    pub detected_licenses: BTreeMap<String, u32>,
}

impl Statistics {
    /// 모델에서 통계를 계산합니다.
    ///
    /// 범위를 벗어난 라이선스 참조는 집계에서 건너뜁니다.
    /// 참조 무결성 검사는 export 단계에서 수행됩니다.
    pub fn compute(model: &EvaluatedModel) -> Self {
        let mut stats = Self::default();

        for issue in model.issues.iter().filter(|i| i.resolutions.is_empty()) {
            stats.open_issues.record(issue.severity);
        }
        for violation in model
            .rule_violations
            .iter()
            .filter(|v| v.resolutions.is_empty())
        {
            stats.open_rule_violations.record(violation.severity);
        }

        stats.dependency_tree_depth = model
            .dependency_trees
            .iter()
            .map(DependencyTreeNode::depth)
            .max()
            .unwrap_or(0);

        for package in &model.packages {
            match (package.is_project, package.is_excluded) {
                (true, excluded) => {
                    stats.total_projects += 1;
                    stats.excluded_projects += u32::from(excluded);
                }
                (false, excluded) => {
                    stats.total_packages += 1;
                    stats.excluded_packages += u32::from(excluded);
                }
            }

            for license in package
                .declared_licenses
                .iter()
                .filter_map(|r| model.get(*r))
            {
                *stats.declared_licenses.entry(license.id.clone()).or_default() += 1;
            }
            for license in package
                .detected_licenses
                .iter()
                .filter_map(|r| model.get(*r))
            {
                *stats.detected_licenses.entry(license.id.clone()).or_default() += 1;
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::nodes::{
        EvaluatedIssue, EvaluatedPackage, EvaluatedRuleViolation, IssueResolution, LicenseId,
    };
    use crate::types::NodeRef;

    #[test]
    fn empty_model_has_zero_statistics() {
        let stats = Statistics::compute(&EvaluatedModel::default());
        assert_eq!(stats, Statistics::default());
    }

    #[test]
    fn resolved_issues_are_not_open() {
        let mut model = EvaluatedModel::default();
        let resolution = model.add(IssueResolution {
            message: "timeout.*".to_owned(),
            reason: "SCANNER_ISSUE".to_owned(),
            comment: String::new(),
        });
        model.add(EvaluatedIssue::new("error 1", Severity::Error));
        model.add(EvaluatedIssue::new("hint 1", Severity::Hint));
        let resolved = model.add(EvaluatedIssue::new("timeout", Severity::Error));
        if let Some(issue) = model.get_mut(resolved) {
            issue.resolutions.push(resolution);
        }

        let stats = Statistics::compute(&model);
        assert_eq!(stats.open_issues.errors, 1);
        assert_eq!(stats.open_issues.hints, 1);
        assert_eq!(stats.open_issues.total(), 2);
    }

    #[test]
    fn counts_rule_violations_and_packages() {
        let mut model = EvaluatedModel::default();
        let mit = model.add(LicenseId {
            id: "MIT".to_owned(),
        });
        let project = model.add(EvaluatedPackage::project("Cargo::app:1.0.0"));
        let mut dep = EvaluatedPackage::new("Cargo::serde:1.0.0");
        dep.declared_licenses.push(mit);
        dep.detected_licenses.push(mit);
        dep.detected_licenses.push(NodeRef::new(99));
        dep.is_excluded = true;
        let dep = model.add(dep);

        model.add(EvaluatedRuleViolation {
            rule: "COPYLEFT".to_owned(),
            pkg: dep,
            license: Some(mit),
            license_source: None,
            severity: Severity::Warning,
            message: "copyleft".to_owned(),
            how_to_fix: String::new(),
            resolutions: Vec::new(),
        });
        model.add(EvaluatedRuleViolation {
            rule: "UNKNOWN".to_owned(),
            pkg: project,
            license: None,
            license_source: None,
            severity: Severity::Error,
            message: "unknown".to_owned(),
            how_to_fix: String::new(),
            resolutions: Vec::new(),
        });

        let stats = Statistics::compute(&model);
        assert_eq!(stats.open_rule_violations.warnings, 1);
        assert_eq!(stats.open_rule_violations.errors, 1);
        assert_eq!(stats.total_projects, 1);
        assert_eq!(stats.total_packages, 1);
        assert_eq!(stats.excluded_packages, 1);
        assert_eq!(stats.declared_licenses.get("MIT"), Some(&1));
        assert_eq!(stats.detected_licenses.get("MIT"), Some(&1));
        assert_eq!(stats.detected_licenses.len(), 1);
    }

    #[test]
    fn dependency_tree_depth_is_maximum() {
        let mut model = EvaluatedModel::default();
        model.dependency_trees.push(DependencyTreeNode {
            title: "a".to_owned(),
            children: vec![DependencyTreeNode::default()],
            ..Default::default()
        });
        model.dependency_trees.push(DependencyTreeNode::default());
        assert_eq!(Statistics::compute(&model).dependency_tree_depth, 2);
    }
}
