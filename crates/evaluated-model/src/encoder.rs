//! 이중 모드 인코더
//!
//! 노드를 만날 때마다 [`IdentityRegistry`]로 식별자를 얻은 뒤,
//! 정규 위치가 아직 없고 필드가 참조 강제가 아니면 전체 페이로드를,
//! 그렇지 않으면 참조 문서(`{"_id": n}`)를 만듭니다.
//!
//! 정규 위치는 필드를 인코딩하기 전에 먼저 기록되므로 순환 참조는
//! 두 번째 만남에서 참조 문서가 되어 재귀가 끝납니다.
//!
//! 인라인 페이로드의 중첩 깊이는 [`MAX_INLINE_DEPTH`]로 제한됩니다. 한도에 닿은
//! 노드는 정규 위치를 차지하지 않고 참조 문서가 되며, 이후 [`GraphWalker`]가
//! 그 노드의 컨테이너 슬롯을 방문할 때 페이로드가 기록됩니다. 아직 정규 위치가
//! 없는 노드의 슬롯은 항상 아직 방문 전이므로 모든 노드는 정확히 한 번 기록됩니다.
//!
//! [`GraphWalker`]: crate::walker::GraphWalker

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ModelExportError;
use crate::model::EvaluatedModel;
use crate::policy::{FieldMode, ReferencePolicy};
use crate::registry::IdentityRegistry;
use crate::schema::{self, GraphNode, Record};
use crate::types::{Identity, NodeKey, NodeRef};

/// 식별자 필드 이름
pub const ID_FIELD: &str = "_id";

/// 참조 문서의 타입 태그 필드 이름
pub const TYPE_FIELD: &str = "type";

/// 인라인 페이로드를 펼칠 수 있는 최대 필드 경로 깊이
///
/// 경로 세그먼트 하나가 인코더 재귀 한 단계에 해당하므로, 이 값이
/// 기본 모드 필드 체인의 길이와 무관하게 스택 사용량의 상한이 됩니다.
pub const MAX_INLINE_DEPTH: usize = 64;

/// 한 번의 export 실행에 속하는 인코더
pub struct Encoder<'m> {
    model: &'m EvaluatedModel,
    policy: &'m ReferencePolicy,
    registry: IdentityRegistry,
    tag_references: bool,
    path: Vec<String>,
}

impl<'m> Encoder<'m> {
    /// 새 인코더를 생성합니다.
    pub fn new(
        model: &'m EvaluatedModel,
        policy: &'m ReferencePolicy,
        registry: IdentityRegistry,
        tag_references: bool,
    ) -> Self {
        Self {
            model,
            policy,
            registry,
            tag_references,
            path: Vec::new(),
        }
    }

    /// 인코딩 대상 모델
    pub fn model(&self) -> &'m EvaluatedModel {
        self.model
    }

    /// 식별자 레지스트리
    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    /// 레지스트리를 돌려받고 인코더를 종료합니다.
    pub fn into_registry(self) -> IdentityRegistry {
        self.registry
    }

    /// 현재 위치의 필드 경로 (예: `issues[0].package`)
    pub fn path(&self) -> String {
        self.path.join(".")
    }

    pub(crate) fn enter(&mut self, segment: String) {
        self.path.push(segment);
    }

    pub(crate) fn leave(&mut self) {
        self.path.pop();
    }

    fn field_path(&self, field: &str) -> String {
        if self.path.is_empty() {
            field.to_owned()
        } else {
            format!("{}.{field}", self.path())
        }
    }

    /// 노드 하나를 인코딩합니다.
    ///
    /// # Errors
    ///
    /// - 핸들이 arena 범위를 벗어나면 `DanglingReference`
    /// - 식별자 공간이 고갈되면 `IdentityExhausted`
    /// - 필드 값을 인코딩할 수 없으면 `UnsupportedValue`
    pub fn encode_node<T: GraphNode>(
        &mut self,
        node: NodeRef<T>,
        mode: FieldMode,
    ) -> Result<Value, ModelExportError> {
        let key = NodeKey {
            node_type: T::NODE_TYPE,
            index: node.index(),
        };
        let model = self.model;
        let payload = model
            .get(node)
            .ok_or_else(|| ModelExportError::DanglingReference {
                path: self.path(),
                node_type: T::NODE_TYPE,
                index: node.index(),
            })?;

        let identity = self.registry.identify(key)?;
        if mode == FieldMode::AlwaysReference {
            return Ok(self.reference(identity));
        }
        if self.path.len() >= MAX_INLINE_DEPTH {
            tracing::trace!(
                identity = %identity,
                depth = self.path.len(),
                "inline depth reached, deferring payload to its container"
            );
            return Ok(self.reference(identity));
        }
        if !self.registry.claim_canonical(key) {
            return Ok(self.reference(identity));
        }

        tracing::trace!(identity = %identity, path = %self.path(), "canonical payload");

        let mut fields = Map::new();
        fields.insert(ID_FIELD.to_owned(), Value::from(identity.id));
        let mut writer = FieldWriter {
            encoder: self,
            schema: T::SCHEMA,
            fields,
        };
        payload.encode_fields(&mut writer)?;
        Ok(Value::Object(writer.fields))
    }

    /// 식별자가 없는 레코드를 인코딩합니다.
    pub fn encode_record<R: Record>(&mut self, record: &R) -> Result<Value, ModelExportError> {
        let mut writer = FieldWriter {
            encoder: self,
            schema: R::SCHEMA,
            fields: Map::new(),
        };
        record.encode_fields(&mut writer)?;
        Ok(Value::Object(writer.fields))
    }

    fn reference(&self, identity: Identity) -> Value {
        let mut doc = Map::new();
        if self.tag_references {
            doc.insert(
                TYPE_FIELD.to_owned(),
                Value::from(identity.node_type.as_str()),
            );
        }
        doc.insert(ID_FIELD.to_owned(), Value::from(identity.id));
        Value::Object(doc)
    }
}

/// 레코드 하나의 필드를 선언 순서대로 모으는 기록기
pub struct FieldWriter<'e, 'm> {
    encoder: &'e mut Encoder<'m>,
    schema: &'static str,
    fields: Map<String, Value>,
}

impl FieldWriter<'_, '_> {
    /// 일반 값 필드를 기록합니다.
    ///
    /// null로 직렬화되는 값은 거부합니다. 없을 수 있는 값은 [`Self::optional`]을 사용합니다.
    pub fn value<V: Serialize + ?Sized>(
        &mut self,
        name: &'static str,
        value: &V,
    ) -> Result<(), ModelExportError> {
        let value = serde_json::to_value(value).map_err(|e| ModelExportError::UnsupportedValue {
            path: self.encoder.field_path(name),
            reason: e.to_string(),
        })?;
        if value.is_null() {
            return Err(ModelExportError::UnsupportedValue {
                path: self.encoder.field_path(name),
                reason: "null value in a required field".to_owned(),
            });
        }
        self.fields.insert(name.to_owned(), value);
        Ok(())
    }

    /// 값이 있을 때만 필드를 기록합니다.
    pub fn optional<V: Serialize>(
        &mut self,
        name: &'static str,
        value: &Option<V>,
    ) -> Result<(), ModelExportError> {
        match value {
            Some(v) => self.value(name, v),
            None => Ok(()),
        }
    }

    /// 노드 참조 필드를 기록합니다.
    pub fn node<T: GraphNode>(
        &mut self,
        name: &'static str,
        node: NodeRef<T>,
    ) -> Result<(), ModelExportError> {
        let mode = self.mode(name);
        self.encoder.enter(name.to_owned());
        let value = self.encoder.encode_node(node, mode)?;
        self.encoder.leave();
        self.fields.insert(name.to_owned(), value);
        Ok(())
    }

    /// 값이 있을 때만 노드 참조 필드를 기록합니다.
    pub fn optional_node<T: GraphNode>(
        &mut self,
        name: &'static str,
        node: Option<NodeRef<T>>,
    ) -> Result<(), ModelExportError> {
        match node {
            Some(node) => self.node(name, node),
            None => Ok(()),
        }
    }

    /// 노드 참조 목록 필드를 기록합니다.
    pub fn nodes<T: GraphNode>(
        &mut self,
        name: &'static str,
        nodes: &[NodeRef<T>],
    ) -> Result<(), ModelExportError> {
        let mode = self.mode(name);
        let mut values = Vec::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            self.encoder.enter(format!("{name}[{i}]"));
            values.push(self.encoder.encode_node(*node, mode)?);
            self.encoder.leave();
        }
        self.fields.insert(name.to_owned(), Value::Array(values));
        Ok(())
    }

    /// 식별자가 없는 레코드 목록 필드를 인라인으로 기록합니다.
    pub fn records<R: Record>(
        &mut self,
        name: &'static str,
        records: &[R],
    ) -> Result<(), ModelExportError> {
        let mut values = Vec::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            self.encoder.enter(format!("{name}[{i}]"));
            values.push(self.encoder.encode_record(record)?);
            self.encoder.leave();
        }
        self.fields.insert(name.to_owned(), Value::Array(values));
        Ok(())
    }

    fn mode(&self, name: &'static str) -> FieldMode {
        debug_assert!(
            schema::reference_field(self.schema, name).is_some(),
            "'{}.{name}' is missing from REFERENCE_FIELDS",
            self.schema
        );
        self.encoder.policy.mode(self.schema, name)
    }
}
