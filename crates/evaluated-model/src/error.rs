//! 평가 모델 export 에러 타입
//!
//! [`ModelExportError`]는 export 엔진 내에서 발생할 수 있는 모든 에러를 나타냅니다.
//! `From<ModelExportError> for LichenError` 구현을 통해 `?` 연산자로
//! 상위 에러 타입으로 자연스럽게 전파됩니다.
//!
//! # 에러 카테고리
//!
//! - **식별자 공간 고갈**: `IdentityExhausted`
//! - **스키마 불일치**: `DanglingReference`, `UnsupportedValue`
//! - **정규화 사후조건 위반**: `Normalization`
//! - **출력 형식**: `Serialization`, `Io`
//! - **설정**: `Config`
//!
//! 순환 참조는 에러가 아닙니다. 방문 여부 검사로 항상 종료가 보장됩니다.

use lichen_core::error::{ConfigError, ExportError, LichenError};

use crate::types::NodeType;

/// 평가 모델 export 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum ModelExportError {
    /// 한 타입에 할당 가능한 식별자 수를 초과함
    #[error("identity space exhausted for '{node_type}': {count} identities already allocated")]
    IdentityExhausted {
        /// 고갈된 노드 타입
        node_type: NodeType,
        /// 이미 할당된 식별자 수
        count: u64,
    },

    /// 노드 참조가 모델 arena 범위를 벗어남
    #[error("dangling reference at '{path}': no {node_type} at index {index}")]
    DanglingReference {
        /// 문제가 된 필드 경로 (예: `issues[0].package`)
        path: String,
        /// 참조 대상 노드 타입
        node_type: NodeType,
        /// 존재하지 않는 arena 인덱스
        index: u32,
    },

    /// 인코딩할 수 없는 필드 값
    #[error("unsupported value at '{path}': {reason}")]
    UnsupportedValue {
        /// 필드 경로
        path: String,
        /// 실패 사유
        reason: String,
    },

    /// 정규화 후 배열 위치와 식별자가 일치하지 않음
    #[error("container '{container}' is not index-aligned at position {position}: {found}")]
    Normalization {
        /// 컨테이너 이름
        container: String,
        /// 배열 위치
        position: usize,
        /// 실제로 발견된 값에 대한 설명
        found: String,
    },

    /// 출력 형식 직렬화 실패
    #[error("{format} serialization failed: {reason}")]
    Serialization {
        /// 출력 형식 (json, yaml)
        format: String,
        /// 실패 사유
        reason: String,
    },

    /// 출력 대상에 쓰기 실패
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },
}

impl ModelExportError {
    /// 메트릭 레이블로 사용할 짧은 에러 분류 이름을 반환합니다.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::IdentityExhausted { .. } => "identity_exhausted",
            Self::DanglingReference { .. } => "dangling_reference",
            Self::UnsupportedValue { .. } => "unsupported_value",
            Self::Normalization { .. } => "normalization",
            Self::Serialization { .. } => "serialization",
            Self::Io(_) => "io",
            Self::Config { .. } => "config",
        }
    }
}

impl From<ModelExportError> for LichenError {
    fn from(err: ModelExportError) -> Self {
        match err {
            ModelExportError::Serialization { .. } => {
                LichenError::Export(ExportError::Format(err.to_string()))
            }
            ModelExportError::Io(source) => LichenError::Io(source),
            ModelExportError::Config { field, reason } => {
                LichenError::Config(ConfigError::InvalidValue { field, reason })
            }
            other => LichenError::Export(ExportError::Encoding(other.to_string())),
        }
    }
}
