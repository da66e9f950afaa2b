//! 식별자 레지스트리
//!
//! 한 번의 export 실행 동안 노드 인스턴스([`NodeKey`])마다 타입별로 0부터
//! 증가하는 정수 식별자를 부여하고, 어느 노드가 이미 정규 위치를 가졌는지 기록합니다.
//!
//! 레지스트리는 실행 하나에 속하며 실행 간에 공유하지 않습니다.
//! 동기화 수단이 없으므로 `&mut` 접근만 허용합니다.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::ModelExportError;
use crate::types::{Identity, NodeKey, NodeType};

/// 타입별 식별자 할당기
#[derive(Debug)]
pub struct IdentityRegistry {
    assigned: HashMap<NodeKey, u32>,
    canonical: HashSet<NodeKey>,
    counts: BTreeMap<NodeType, u32>,
    limit: u32,
}

impl Default for IdentityRegistry {
    fn default() -> Self {
        Self::with_limit(u32::MAX)
    }
}

impl IdentityRegistry {
    /// 타입당 최대 `limit`개의 식별자를 할당하는 레지스트리를 생성합니다.
    pub fn with_limit(limit: u32) -> Self {
        Self {
            assigned: HashMap::new(),
            canonical: HashSet::new(),
            counts: BTreeMap::new(),
            limit,
        }
    }

    /// 노드의 식별자를 반환합니다. 처음 보는 노드면 다음 정수를 할당합니다.
    ///
    /// # Errors
    ///
    /// 해당 타입에 이미 `limit`개가 할당되었으면 `IdentityExhausted`를 반환합니다.
    pub fn identify(&mut self, key: NodeKey) -> Result<Identity, ModelExportError> {
        if let Some(id) = self.assigned.get(&key) {
            return Ok(Identity {
                node_type: key.node_type,
                id: *id,
            });
        }

        let count = self.counts.entry(key.node_type).or_insert(0);
        if *count >= self.limit {
            return Err(ModelExportError::IdentityExhausted {
                node_type: key.node_type,
                count: u64::from(*count),
            });
        }

        let id = *count;
        *count += 1;
        self.assigned.insert(key, id);
        Ok(Identity {
            node_type: key.node_type,
            id,
        })
    }

    /// 노드가 이미 식별자를 가졌는지 확인합니다.
    pub fn identity_of(&self, key: NodeKey) -> Option<Identity> {
        self.assigned.get(&key).map(|id| Identity {
            node_type: key.node_type,
            id: *id,
        })
    }

    /// 현재 위치를 노드의 정규 위치로 기록합니다.
    ///
    /// 이번 호출이 정규 위치를 차지했으면 `true`, 이미 다른 곳이 차지했으면 `false`입니다.
    pub fn claim_canonical(&mut self, key: NodeKey) -> bool {
        self.canonical.insert(key)
    }

    /// 노드의 정규 위치가 이미 정해졌는지 확인합니다.
    pub fn is_canonical(&self, key: NodeKey) -> bool {
        self.canonical.contains(&key)
    }

    /// 타입별로 할당된 식별자 수
    pub fn count(&self, node_type: NodeType) -> u32 {
        self.counts.get(&node_type).copied().unwrap_or(0)
    }

    /// 식별자가 하나 이상 할당된 타입별 개수
    pub fn counts(&self) -> &BTreeMap<NodeType, u32> {
        &self.counts
    }

    /// 할당된 식별자 총 개수
    pub fn total(&self) -> u64 {
        self.counts.values().map(|c| u64::from(*c)).sum()
    }
}
