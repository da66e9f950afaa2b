//! 그래프 순회기
//!
//! [`TraversalOrder`]에 따라 컨테이너를 차례로 방문하고, 각 컨테이너 안에서는
//! arena 순서대로 노드를 인코딩합니다. 노드의 필드는 스키마에 선언된 순서로
//! 깊이 우선 방문됩니다. 방문 결과는 [`ContainerCollector`]에 모입니다.

use serde_json::Value;

use crate::collector::ContainerCollector;
use crate::encoder::Encoder;
use crate::error::ModelExportError;
use crate::model::{
    CopyrightStatement, EvaluatedIssue, EvaluatedPackage, EvaluatedPackagePath,
    EvaluatedRuleViolation, EvaluatedScanResult, IssueResolution, LicenseId, PathExclude,
    RuleViolationResolution, ScopeExclude, ScopeName,
};
use crate::policy::{FieldMode, TraversalOrder};
use crate::schema::GraphNode;
use crate::types::{ContainerKind, NodeKey, NodeRef};

/// 컨테이너 방문 순서를 따르는 깊이 우선 순회기
pub struct GraphWalker<'o> {
    order: &'o TraversalOrder,
}

impl<'o> GraphWalker<'o> {
    /// 주어진 방문 순서로 순회기를 생성합니다.
    pub fn new(order: &'o TraversalOrder) -> Self {
        Self { order }
    }

    /// 모든 컨테이너를 방문하고 결과를 `collector`에 모읍니다.
    ///
    /// 에러가 발생하면 즉시 중단합니다. 이때 `collector`의 내용은 사용하지 않아야 합니다.
    pub fn walk(
        &self,
        encoder: &mut Encoder<'_>,
        collector: &mut ContainerCollector,
    ) -> Result<(), ModelExportError> {
        for kind in self.order.iter() {
            let entries = match kind {
                ContainerKind::PathExcludes => visit::<PathExclude>(encoder, kind)?,
                ContainerKind::ScopeExcludes => visit::<ScopeExclude>(encoder, kind)?,
                ContainerKind::Copyrights => visit::<CopyrightStatement>(encoder, kind)?,
                ContainerKind::Licenses => visit::<LicenseId>(encoder, kind)?,
                ContainerKind::Scopes => visit::<ScopeName>(encoder, kind)?,
                ContainerKind::IssueResolutions => visit::<IssueResolution>(encoder, kind)?,
                ContainerKind::Issues => visit::<EvaluatedIssue>(encoder, kind)?,
                ContainerKind::ScanResults => visit::<EvaluatedScanResult>(encoder, kind)?,
                ContainerKind::Packages => visit::<EvaluatedPackage>(encoder, kind)?,
                ContainerKind::Paths => visit::<EvaluatedPackagePath>(encoder, kind)?,
                ContainerKind::DependencyTrees => visit_trees(encoder)?,
                ContainerKind::RuleViolationResolutions => {
                    visit::<RuleViolationResolution>(encoder, kind)?
                }
                ContainerKind::RuleViolations => visit::<EvaluatedRuleViolation>(encoder, kind)?,
            };
            tracing::debug!(container = %kind, entries = entries.len(), "container visited");
            collector.collect(kind, entries);
        }
        Ok(())
    }
}

fn visit<T: GraphNode>(
    encoder: &mut Encoder<'_>,
    kind: ContainerKind,
) -> Result<Vec<Value>, ModelExportError> {
    let len = T::arena(encoder.model()).len();
    let len = u32::try_from(len).map_err(|_| ModelExportError::IdentityExhausted {
        node_type: T::NODE_TYPE,
        count: len as u64,
    })?;

    let mut entries = Vec::with_capacity(len as usize);
    for index in 0..len {
        let key = NodeKey {
            node_type: T::NODE_TYPE,
            index,
        };
        if encoder.registry().is_canonical(key) {
            tracing::warn!(
                container = %kind,
                index,
                "payload was embedded at an earlier field, container holds a reference"
            );
        }

        encoder.enter(format!("{kind}[{index}]"));
        entries.push(encoder.encode_node(NodeRef::<T>::new(index), FieldMode::Default)?);
        encoder.leave();
    }
    Ok(entries)
}

fn visit_trees(encoder: &mut Encoder<'_>) -> Result<Vec<Value>, ModelExportError> {
    let model = encoder.model();
    let mut entries = Vec::with_capacity(model.dependency_trees.len());
    for (i, tree) in model.dependency_trees.iter().enumerate() {
        encoder.enter(format!("{}[{i}]", ContainerKind::DependencyTrees));
        entries.push(encoder.encode_record(tree)?);
        encoder.leave();
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EvaluatedModel, Severity};
    use crate::policy::ReferencePolicy;
    use crate::registry::IdentityRegistry;

    fn issue_with_package() -> EvaluatedModel {
        let mut model = EvaluatedModel::default();
        let pkg = model.add(EvaluatedPackage::new("NPM::left-pad:1.0.0"));
        let mut issue = EvaluatedIssue::new("deprecated", Severity::Warning);
        issue.package = Some(pkg);
        model.add(issue);
        model
    }

    fn walk(
        model: &EvaluatedModel,
        order: &TraversalOrder,
        policy: &ReferencePolicy,
    ) -> ContainerCollector {
        let mut encoder = Encoder::new(model, policy, IdentityRegistry::default(), false);
        let mut collector = ContainerCollector::default();
        GraphWalker::new(order)
            .walk(&mut encoder, &mut collector)
            .unwrap();
        collector
    }

    #[test]
    fn every_container_is_visited() {
        let model = issue_with_package();
        let collector = walk(
            &model,
            &TraversalOrder::default(),
            &ReferencePolicy::default(),
        );
        for kind in ContainerKind::ALL {
            assert!(collector.entries(kind).is_some(), "{kind} not collected");
        }
        assert_eq!(collector.entries(ContainerKind::Issues).map(<[_]>::len), Some(1));
        assert_eq!(collector.entries(ContainerKind::Packages).map(<[_]>::len), Some(1));
    }

    #[test]
    fn order_decides_canonical_container_without_policy() {
        let model = issue_with_package();
        let policy = ReferencePolicy::empty();

        let issues_first = walk(&model, &TraversalOrder::default(), &policy);
        let issue = &issues_first.entries(ContainerKind::Issues).unwrap()[0];
        let package = &issues_first.entries(ContainerKind::Packages).unwrap()[0];
        assert_eq!(issue["package"]["id"], "NPM::left-pad:1.0.0");
        assert_eq!(package, &serde_json::json!({"_id": 0}));

        let order = TraversalOrder::new(&[ContainerKind::Packages]).unwrap();
        let packages_first = walk(&model, &order, &policy);
        let issue = &packages_first.entries(ContainerKind::Issues).unwrap()[0];
        let package = &packages_first.entries(ContainerKind::Packages).unwrap()[0];
        assert_eq!(issue["package"], serde_json::json!({"_id": 0}));
        assert_eq!(package["id"], "NPM::left-pad:1.0.0");
    }

    #[test]
    fn dependency_trees_are_inline_records() {
        let mut model = issue_with_package();
        model.dependency_trees.push(crate::model::DependencyTreeNode {
            title: "root".to_owned(),
            pkg: Some(NodeRef::new(0)),
            ..Default::default()
        });
        let collector = walk(
            &model,
            &TraversalOrder::default(),
            &ReferencePolicy::default(),
        );
        let tree = &collector.entries(ContainerKind::DependencyTrees).unwrap()[0];
        assert!(tree.get("_id").is_none());
        assert_eq!(tree["title"], "root");
        assert_eq!(tree["pkg"], serde_json::json!({"_id": 0}));
    }

    #[test]
    fn dangling_path_names_container_slot() {
        let mut model = EvaluatedModel::default();
        model.dependency_trees.push(crate::model::DependencyTreeNode {
            title: "root".to_owned(),
            children: vec![crate::model::DependencyTreeNode {
                title: "child".to_owned(),
                scope: Some(NodeRef::new(4)),
                ..Default::default()
            }],
            ..Default::default()
        });
        let order = TraversalOrder::default();
        let policy = ReferencePolicy::default();
        let mut encoder = Encoder::new(&model, &policy, IdentityRegistry::default(), false);
        let mut collector = ContainerCollector::default();

        let err = GraphWalker::new(&order)
            .walk(&mut encoder, &mut collector)
            .unwrap_err();
        assert!(
            err.to_string()
                .contains("dependency_trees[0].children[0].scope"),
            "{err}"
        );
    }
}
