//! 인덱스 정규화
//!
//! 최상위 배열 중 첫 원소가 `_id`를 가진 객체인 배열을 `_id` 순으로 정렬합니다.
//! 정렬 후 모든 원소에 대해 배열 위치와 `_id`가 같은지 확인하므로, 소비자는
//! 참조 `{"_id": n}`를 `container[n]`으로 바로 해석할 수 있습니다.

use serde_json::Value;

use crate::encoder::ID_FIELD;
use crate::error::ModelExportError;

/// 문서의 최상위 컨테이너를 식별자 순으로 정렬합니다.
///
/// # Errors
///
/// `_id`가 없는 원소가 섞여 있거나, 정렬 후 위치와 `_id`가 어긋나면
/// (식별자에 빈칸이나 중복이 있으면) `Normalization`을 반환합니다.
pub fn normalize(mut document: Value) -> Result<Value, ModelExportError> {
    let Some(fields) = document.as_object_mut() else {
        return Ok(document);
    };

    for (name, value) in fields.iter_mut() {
        let Value::Array(items) = value else {
            continue;
        };
        if !items.first().is_some_and(|first| first.get(ID_FIELD).is_some()) {
            continue;
        }

        let mut keyed = Vec::with_capacity(items.len());
        for (position, item) in items.drain(..).enumerate() {
            let id = item
                .get(ID_FIELD)
                .and_then(Value::as_u64)
                .ok_or_else(|| ModelExportError::Normalization {
                    container: name.clone(),
                    position,
                    found: "element without an integer _id".to_owned(),
                })?;
            keyed.push((id, item));
        }
        keyed.sort_by_key(|(id, _)| *id);

        for (position, (id, _)) in keyed.iter().enumerate() {
            if *id != position as u64 {
                return Err(ModelExportError::Normalization {
                    container: name.clone(),
                    position,
                    found: format!("_id {id}"),
                });
            }
        }
        *items = keyed.into_iter().map(|(_, item)| item).collect();
    }

    Ok(document)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn sorts_arrays_by_id() {
        let doc = json!({
            "packages": [{"_id": 2, "id": "c"}, {"_id": 0, "id": "a"}, {"_id": 1}],
        });
        let doc = normalize(doc).unwrap();
        let ids: Vec<_> = doc["packages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["_id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(doc["packages"][0]["id"], "a");
    }

    #[test]
    fn leaves_arrays_without_ids_untouched() {
        let doc = json!({
            "dependency_trees": [{"title": "b"}, {"title": "a"}],
            "empty": [],
            "statistics": {"open_issues": {"errors": 1}},
        });
        let normalized = normalize(doc.clone()).unwrap();
        assert_eq!(normalized, doc);
    }

    #[test]
    fn gap_in_identities_is_rejected() {
        let doc = json!({"issues": [{"_id": 0}, {"_id": 2}]});
        let err = normalize(doc).unwrap_err();
        match err {
            ModelExportError::Normalization {
                container,
                position,
                found,
            } => {
                assert_eq!(container, "issues");
                assert_eq!(position, 1);
                assert_eq!(found, "_id 2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_identity_is_rejected() {
        let doc = json!({"scopes": [{"_id": 0}, {"_id": 0}]});
        assert!(normalize(doc).is_err());
    }

    #[test]
    fn element_without_id_is_rejected() {
        let doc = json!({"licenses": [{"_id": 0}, {"id": "MIT"}]});
        let err = normalize(doc).unwrap_err();
        assert!(err.to_string().contains("licenses"));
    }

    #[test]
    fn non_object_document_passes_through() {
        assert_eq!(normalize(json!([3, 1, 2])).unwrap(), json!([3, 1, 2]));
    }
}
