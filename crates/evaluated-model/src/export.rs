//! 모델 exporter -- 순회, 수집, 정규화, 형식 변환
//!
//! [`ModelExporter`]는 호출마다 새 [`IdentityRegistry`]와 [`ContainerCollector`]를 만들어
//! 한 번의 export를 수행합니다. 실행 간에 공유되는 상태가 없으므로 서로 다른 입력을
//! 동시에 export하려면 각 스레드에서 `export`를 호출하면 됩니다.
//!
//! export는 전부 성공하거나 전부 실패합니다. [`ModelExporter::write_to`]는 정규화된
//! 문서 전체가 텍스트로 만들어진 뒤에만 출력 대상에 씁니다.

use std::collections::BTreeMap;
use std::io::Write;
use std::time::Instant;

use serde_json::Value;
use tracing::{info, warn};

use lichen_core::metrics as m;

use crate::collector::ContainerCollector;
use crate::encoder::Encoder;
use crate::error::ModelExportError;
use crate::model::EvaluatedModel;
use crate::normalize::normalize;
use crate::policy::{ReferencePolicy, TraversalOrder};
use crate::registry::IdentityRegistry;
use crate::types::{NodeType, OutputFormat};
use crate::walker::GraphWalker;

/// export 한 번에 적용되는 옵션
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// 컨테이너 방문 순서
    pub traversal_order: TraversalOrder,
    /// 필드별 참조 강제 정책
    pub reference_policy: ReferencePolicy,
    /// [`ModelExporter::render`]의 출력 형식
    pub format: OutputFormat,
    /// 타입별 최대 식별자 수
    pub max_identities_per_type: u32,
    /// 참조 문서에 `type` 태그를 붙일지 여부
    pub tag_references: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            traversal_order: TraversalOrder::default(),
            reference_policy: ReferencePolicy::default(),
            format: OutputFormat::Json,
            max_identities_per_type: u32::MAX,
            tag_references: false,
        }
    }
}

/// 형식 변환까지 끝난 export 결과
#[derive(Debug, Clone)]
pub struct ExportDocument {
    /// 출력 형식
    pub format: OutputFormat,
    /// 직렬화된 문서
    pub content: String,
    /// 타입별 식별자 수
    pub node_counts: BTreeMap<NodeType, u32>,
}

impl ExportDocument {
    /// 식별자가 부여된 노드 총 개수
    pub fn total_nodes(&self) -> u64 {
        self.node_counts.values().map(|c| u64::from(*c)).sum()
    }
}

/// 평가 모델 exporter
#[derive(Debug, Clone, Default)]
pub struct ModelExporter {
    options: ExportOptions,
}

impl ModelExporter {
    /// 옵션으로 exporter를 생성합니다.
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    /// 적용 중인 옵션
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// 정규화된 문서 트리를 만듭니다.
    ///
    /// # Errors
    ///
    /// 식별자 공간 고갈, 범위를 벗어난 참조, 인코딩할 수 없는 값,
    /// 정규화 사후조건 위반 시 에러를 반환하며 부분 결과는 남기지 않습니다.
    pub fn export(&self, model: &EvaluatedModel) -> Result<Value, ModelExportError> {
        self.export_with_counts(model).map(|(document, _)| document)
    }

    /// 들여쓰기된 JSON 텍스트로 export합니다.
    pub fn to_json(&self, model: &EvaluatedModel) -> Result<String, ModelExportError> {
        self.render_as(model, OutputFormat::Json)
            .map(|document| document.content)
    }

    /// YAML 텍스트로 export합니다.
    pub fn to_yaml(&self, model: &EvaluatedModel) -> Result<String, ModelExportError> {
        self.render_as(model, OutputFormat::Yaml)
            .map(|document| document.content)
    }

    /// 옵션에 지정된 형식으로 export합니다.
    pub fn render(&self, model: &EvaluatedModel) -> Result<ExportDocument, ModelExportError> {
        self.render_as(model, self.options.format)
    }

    /// 옵션에 지정된 형식으로 export한 뒤 `writer`에 씁니다.
    ///
    /// 문서 전체가 만들어지기 전에는 `writer`에 아무것도 쓰지 않습니다.
    pub fn write_to<W: Write>(
        &self,
        model: &EvaluatedModel,
        mut writer: W,
    ) -> Result<ExportDocument, ModelExportError> {
        let document = self.render(model)?;
        writer.write_all(document.content.as_bytes())?;
        writer.flush()?;
        Ok(document)
    }

    fn render_as(
        &self,
        model: &EvaluatedModel,
        format: OutputFormat,
    ) -> Result<ExportDocument, ModelExportError> {
        let start = Instant::now();
        let result = self
            .export_with_counts(model)
            .and_then(|(document, node_counts)| {
                let content = serialize(&document, format)?;
                Ok(ExportDocument {
                    format,
                    content,
                    node_counts,
                })
            });

        match &result {
            Ok(document) => {
                metrics::counter!(m::EXPORT_RUNS_TOTAL, m::LABEL_FORMAT => format.as_str())
                    .increment(1);
                metrics::histogram!(m::EXPORT_DURATION_SECONDS)
                    .record(start.elapsed().as_secs_f64());
                for (node_type, count) in &document.node_counts {
                    metrics::counter!(m::EXPORT_NODES_TOTAL, m::LABEL_NODE_TYPE => node_type.as_str())
                        .increment(u64::from(*count));
                }
                info!(
                    format = %format,
                    nodes = document.total_nodes(),
                    bytes = document.content.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "evaluated model exported"
                );
            }
            Err(e) => {
                metrics::counter!(m::EXPORT_FAILURES_TOTAL, m::LABEL_REASON => e.kind())
                    .increment(1);
                warn!(format = %format, error = %e, "evaluated model export failed");
            }
        }
        result
    }

    fn export_with_counts(
        &self,
        model: &EvaluatedModel,
    ) -> Result<(Value, BTreeMap<NodeType, u32>), ModelExportError> {
        let registry = IdentityRegistry::with_limit(self.options.max_identities_per_type);
        let mut encoder = Encoder::new(
            model,
            &self.options.reference_policy,
            registry,
            self.options.tag_references,
        );
        let mut collector = ContainerCollector::default();

        GraphWalker::new(&self.options.traversal_order).walk(&mut encoder, &mut collector)?;

        let node_counts = encoder.into_registry().counts().clone();
        let document = normalize(collector.into_document(model)?)?;
        Ok((document, node_counts))
    }
}

fn serialize(document: &Value, format: OutputFormat) -> Result<String, ModelExportError> {
    let serialized = match format {
        OutputFormat::Json => serde_json::to_string_pretty(document).map_err(|e| e.to_string()),
        OutputFormat::Yaml => serde_yaml::to_string(document).map_err(|e| e.to_string()),
    };
    serialized.map_err(|reason| ModelExportError::Serialization {
        format: format.as_str().to_owned(),
        reason,
    })
}
