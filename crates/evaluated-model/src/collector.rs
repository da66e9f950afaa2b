//! 컨테이너 수집기
//!
//! 순회 중 만들어진 컨테이너 항목을 모아, 고정된 스키마 순서의 최상위 문서로 조립합니다.
//! 방문 순서와 관계없이 출력 문서의 필드 순서는 항상 같습니다.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::ModelExportError;
use crate::model::EvaluatedModel;
use crate::types::ContainerKind;

/// 컨테이너별 항목 모음
#[derive(Debug, Default)]
pub struct ContainerCollector {
    containers: BTreeMap<ContainerKind, Vec<Value>>,
}

impl ContainerCollector {
    /// 컨테이너 항목을 방문 순서대로 덧붙입니다.
    pub fn collect(&mut self, kind: ContainerKind, entries: Vec<Value>) {
        self.containers.entry(kind).or_default().extend(entries);
    }

    /// 수집된 컨테이너 항목
    pub fn entries(&self, kind: ContainerKind) -> Option<&[Value]> {
        self.containers.get(&kind).map(Vec::as_slice)
    }

    /// 최상위 문서를 조립합니다.
    ///
    /// 컨테이너 13개를 스키마 순서로 배치한 뒤 `statistics`,
    /// `repository_configuration`, `custom_data`를 붙입니다.
    /// 방문되지 않은 컨테이너는 빈 배열입니다.
    pub fn into_document(mut self, model: &EvaluatedModel) -> Result<Value, ModelExportError> {
        let mut document = Map::new();
        for kind in ContainerKind::ALL {
            let entries = self.containers.remove(&kind).unwrap_or_default();
            document.insert(kind.field_name().to_owned(), Value::Array(entries));
        }

        document.insert(
            "statistics".to_owned(),
            aggregate("statistics", &model.statistics)?,
        );
        document.insert(
            "repository_configuration".to_owned(),
            Value::from(model.repository_configuration.as_str()),
        );
        document.insert(
            "custom_data".to_owned(),
            aggregate("custom_data", &model.custom_data)?,
        );
        Ok(Value::Object(document))
    }
}

fn aggregate<T: serde::Serialize>(path: &str, value: &T) -> Result<Value, ModelExportError> {
    serde_json::to_value(value).map_err(|e| ModelExportError::UnsupportedValue {
        path: path.to_owned(),
        reason: e.to_string(),
    })
}
