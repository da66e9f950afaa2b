//! export 설정
//!
//! [`ExportConfig`]는 core의 [`ExportSection`](lichen_core::config::ExportSection)을
//! 타입이 지정된 값으로 바꾸고, 방문 순서와 참조 정책 항목을 검증합니다.
//!
//! # 사용 예시
//!
//! ```
//! use lichen_evaluated_model::{ExportConfigBuilder, OutputFormat};
//!
//! let config = ExportConfigBuilder::new()
//!     .format(OutputFormat::Yaml)
//!     .traversal_order(vec!["packages".to_owned(), "issues".to_owned()])
//!     .build()
//!     .unwrap();
//! let options = config.to_options().unwrap();
//! assert_eq!(options.traversal_order.as_slice()[0].field_name(), "packages");
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ModelExportError;
use crate::export::ExportOptions;
use crate::policy::{ReferencePolicy, TraversalOrder};
use crate::types::OutputFormat;

/// export 설정
///
/// # 필드
///
/// - **format**: 출력 형식
/// - **traversal_order**: 먼저 방문할 컨테이너 이름 (나머지는 기본 순서)
/// - **always_reference**: 기본 정책에 추가할 `schema.field` 항목
/// - **max_identities_per_type**: 타입별 최대 식별자 수
/// - **tag_references**: 참조 문서에 `type` 태그를 붙일지 여부
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    pub format: OutputFormat,
    pub traversal_order: Vec<String>,
    pub always_reference: Vec<String>,
    pub max_identities_per_type: u32,
    pub tag_references: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            traversal_order: Vec::new(),
            always_reference: Vec::new(),
            max_identities_per_type: u32::MAX,
            tag_references: false,
        }
    }
}

impl ExportConfig {
    /// core의 `ExportSection`에서 설정을 생성합니다.
    ///
    /// 알 수 없는 형식 이름은 JSON으로 대체합니다.
    pub fn from_core(core: &lichen_core::config::ExportSection) -> Self {
        Self {
            format: OutputFormat::from_str_loose(&core.format).unwrap_or_default(),
            traversal_order: core.traversal_order.clone(),
            always_reference: core.always_reference.clone(),
            max_identities_per_type: core.max_identities_per_type,
            tag_references: core.tag_references,
        }
    }

    /// 설정 값의 유효성을 검증합니다.
    ///
    /// # 검증 규칙
    ///
    /// - `max_identities_per_type`: 1 이상
    /// - `traversal_order`: 알려진 컨테이너 이름, 중복 없음
    /// - `always_reference`: 노드 참조 필드를 가리키는 `schema.field`
    pub fn validate(&self) -> Result<(), ModelExportError> {
        self.to_options().map(|_| ())
    }

    /// 검증을 거쳐 실행 옵션으로 변환합니다.
    ///
    /// 검증 규칙은 [`Self::validate`]와 같습니다.
    pub fn to_options(&self) -> Result<ExportOptions, ModelExportError> {
        if self.max_identities_per_type == 0 {
            return Err(ModelExportError::Config {
                field: "max_identities_per_type".to_owned(),
                reason: "must be at least 1".to_owned(),
            });
        }
        Ok(ExportOptions {
            traversal_order: TraversalOrder::parse(&self.traversal_order)?,
            reference_policy: ReferencePolicy::default().with_entries(&self.always_reference)?,
            format: self.format,
            max_identities_per_type: self.max_identities_per_type,
            tag_references: self.tag_references,
        })
    }
}

/// [`ExportConfig`] 빌더
#[derive(Default)]
pub struct ExportConfigBuilder {
    config: ExportConfig,
}

impl ExportConfigBuilder {
    /// 기본값을 가진 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 출력 형식을 설정합니다.
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.config.format = format;
        self
    }

    /// 먼저 방문할 컨테이너 목록을 설정합니다.
    pub fn traversal_order(mut self, order: Vec<String>) -> Self {
        self.config.traversal_order = order;
        self
    }

    /// 참조 전용 필드를 추가합니다.
    pub fn always_reference(mut self, entry: impl Into<String>) -> Self {
        self.config.always_reference.push(entry.into());
        self
    }

    /// 타입별 최대 식별자 수를 설정합니다.
    pub fn max_identities_per_type(mut self, max: u32) -> Self {
        self.config.max_identities_per_type = max;
        self
    }

    /// 참조 문서 `type` 태그 여부를 설정합니다.
    pub fn tag_references(mut self, tag: bool) -> Self {
        self.config.tag_references = tag;
        self
    }

    /// 설정을 검증하고 빌드합니다.
    ///
    /// # Errors
    ///
    /// 유효성 검증 실패 시 `ModelExportError::Config` 반환
    pub fn build(self) -> Result<ExportConfig, ModelExportError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
