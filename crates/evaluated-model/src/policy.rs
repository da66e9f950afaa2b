//! 인코딩 정책 -- 필드별 참조 강제 여부와 컨테이너 방문 순서
//!
//! 정규 위치는 "먼저 도달한 곳"이 차지하므로, 어떤 컨테이너가 노드의 전체 페이로드를
//! 갖게 될지는 [`TraversalOrder`]와 [`ReferencePolicy`] 두 값으로 결정됩니다.
//! 두 값 모두 실행마다 명시적으로 전달되며 전역 상태는 없습니다.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::ModelExportError;
use crate::schema;
use crate::types::ContainerKind;

/// 노드 참조 필드의 인코딩 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldMode {
    /// 처음 만나면 전체 페이로드, 이후에는 참조
    #[default]
    Default,
    /// 방문 순서와 무관하게 항상 참조
    AlwaysReference,
}

/// 기본 참조 강제 필드
///
/// 기본 방문 순서에서 이슈는 패키지/스캔 결과/경로보다 먼저 방문되고,
/// 패키지는 경로보다 먼저 방문됩니다. 이 필드들을 참조로 고정해야
/// 모든 정규 페이로드가 자기 컨테이너에 남습니다.
pub const DEFAULT_ALWAYS_REFERENCE: &[(&str, &str)] = &[
    ("issue", "package"),
    ("issue", "scan_result"),
    ("issue", "path"),
    ("package", "paths"),
];

/// (스키마, 필드) -> [`FieldMode`] 표
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferencePolicy {
    always_reference: BTreeSet<(&'static str, &'static str)>,
}

impl Default for ReferencePolicy {
    fn default() -> Self {
        Self {
            always_reference: DEFAULT_ALWAYS_REFERENCE.iter().copied().collect(),
        }
    }
}

impl ReferencePolicy {
    /// 항목이 없는 정책. 모든 필드가 [`FieldMode::Default`]입니다.
    pub fn empty() -> Self {
        Self {
            always_reference: BTreeSet::new(),
        }
    }

    /// 필드의 인코딩 방식을 조회합니다.
    pub fn mode(&self, schema: &str, field: &str) -> FieldMode {
        if self
            .always_reference
            .iter()
            .any(|(s, f)| *s == schema && *f == field)
        {
            FieldMode::AlwaysReference
        } else {
            FieldMode::Default
        }
    }

    /// 필드를 항상 참조로 인코딩하도록 등록합니다.
    ///
    /// 노드를 가리키지 않는 필드나 알 수 없는 스키마는 거부합니다.
    pub fn with_always_reference(
        mut self,
        schema: &str,
        field: &str,
    ) -> Result<Self, ModelExportError> {
        let entry = schema::reference_field(schema, field).ok_or_else(|| {
            ModelExportError::Config {
                field: "always_reference".to_owned(),
                reason: format!("'{schema}.{field}' is not a node reference field"),
            }
        })?;
        self.always_reference.insert(entry);
        Ok(self)
    }

    /// `"schema.field"` 형식의 항목들을 등록합니다.
    pub fn with_entries<I, S>(self, entries: I) -> Result<Self, ModelExportError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        entries.into_iter().try_fold(self, |policy, entry| {
            let entry = entry.as_ref().trim();
            let (schema, field) = entry.split_once('.').ok_or_else(|| ModelExportError::Config {
                field: "always_reference".to_owned(),
                reason: format!("expected 'schema.field', got '{entry}'"),
            })?;
            policy.with_always_reference(schema.trim(), field.trim())
        })
    }

    /// 등록된 항목을 `"schema.field"` 형식으로 반환합니다.
    pub fn entries(&self) -> Vec<String> {
        self.always_reference
            .iter()
            .map(|(schema, field)| format!("{schema}.{field}"))
            .collect()
    }
}

/// 컨테이너 방문 순서
///
/// 항상 모든 [`ContainerKind`]를 정확히 한 번씩 포함하는 순열입니다.
/// 기본값은 스키마 선언 순서([`ContainerKind::ALL`])입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalOrder(Vec<ContainerKind>);

impl Default for TraversalOrder {
    fn default() -> Self {
        Self(ContainerKind::ALL.to_vec())
    }
}

impl TraversalOrder {
    /// 먼저 방문할 컨테이너를 지정합니다.
    ///
    /// 지정하지 않은 컨테이너는 기본 순서대로 뒤에 붙습니다. 중복은 거부합니다.
    pub fn new(first: &[ContainerKind]) -> Result<Self, ModelExportError> {
        let mut order = Vec::with_capacity(ContainerKind::ALL.len());
        for kind in first {
            if order.contains(kind) {
                return Err(ModelExportError::Config {
                    field: "traversal_order".to_owned(),
                    reason: format!("duplicate container '{kind}'"),
                });
            }
            order.push(*kind);
        }
        for kind in ContainerKind::ALL {
            if !order.contains(&kind) {
                order.push(kind);
            }
        }
        Ok(Self(order))
    }

    /// 컨테이너 이름 목록에서 방문 순서를 만듭니다.
    pub fn parse<I, S>(names: I) -> Result<Self, ModelExportError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let kinds = names
            .into_iter()
            .map(|name| {
                let name = name.as_ref();
                ContainerKind::from_str_loose(name).ok_or_else(|| ModelExportError::Config {
                    field: "traversal_order".to_owned(),
                    reason: format!("unknown container '{name}'"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(&kinds)
    }

    /// 방문 순서
    pub fn as_slice(&self) -> &[ContainerKind] {
        &self.0
    }

    /// 방문 순서 이터레이터
    pub fn iter(&self) -> impl Iterator<Item = ContainerKind> + '_ {
        self.0.iter().copied()
    }
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(ContainerKind::field_name).collect();
        f.write_str(&names.join(", "))
    }
}
