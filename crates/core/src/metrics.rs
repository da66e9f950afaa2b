//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 각 모듈은 이 상수를 사용하여 `metrics::counter!()`, `metrics::histogram!()`
//! 매크로를 호출합니다. 레코더가 설치되지 않았다면 모든 호출은 no-op입니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `lichen_`
//! - 모듈명: `export_`
//! - 접미어: `_total` (counter), `_seconds` (histogram/latency)
//!
//! # 사용 예시
//!
//! ```ignore
//! metrics::counter!(lichen_core::metrics::EXPORT_RUNS_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 출력 형식 레이블 키 (json, yaml)
pub const LABEL_FORMAT: &str = "format";

/// 노드 타입 레이블 키 (package, issue, ...)
pub const LABEL_NODE_TYPE: &str = "node_type";

/// 실패 사유 레이블 키
pub const LABEL_REASON: &str = "reason";

// ─── Export 메트릭 ──────────────────────────────────────────────────

/// Export: 완료된 export 실행 수 (counter, label: format)
pub const EXPORT_RUNS_TOTAL: &str = "lichen_export_runs_total";

/// Export: 식별자가 부여된 노드 수 (counter, label: node_type)
pub const EXPORT_NODES_TOTAL: &str = "lichen_export_nodes_total";

/// Export: 실패한 export 실행 수 (counter, label: reason)
pub const EXPORT_FAILURES_TOTAL: &str = "lichen_export_failures_total";

/// Export: 한 번의 export 소요 시간 (histogram, 초)
pub const EXPORT_DURATION_SECONDS: &str = "lichen_export_duration_seconds";

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출해야 합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!(
        EXPORT_RUNS_TOTAL,
        "Total number of completed evaluated-model exports"
    );
    describe_counter!(
        EXPORT_NODES_TOTAL,
        "Total number of nodes assigned an identity during export"
    );
    describe_counter!(
        EXPORT_FAILURES_TOTAL,
        "Total number of evaluated-model exports that failed"
    );
    describe_histogram!(
        EXPORT_DURATION_SECONDS,
        "Time to walk, encode and normalize one evaluated model in seconds"
    );
}
