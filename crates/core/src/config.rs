//! 설정 관리 -- lichen.toml 파싱 및 런타임 설정
//!
//! [`LichenConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`LICHEN_EXPORT_FORMAT=yaml` 형식)
//! 3. 설정 파일 (`lichen.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), lichen_core::error::LichenError> {
//! use lichen_core::config::LichenConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = LichenConfig::load("lichen.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = LichenConfig::parse("[export]\nformat = \"yaml\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, LichenError};

/// Lichen 통합 설정
///
/// `lichen.toml` 파일의 최상위 구조를 나타냅니다.
/// 각 모듈은 자기 섹션만 읽어 사용합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LichenConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 모델 export 설정
    #[serde(default)]
    pub export: ExportSection,
}

impl LichenConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. TOML 파일 파싱
    /// 2. 환경변수 오버라이드 적용
    /// 3. 유효성 검증
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LichenError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, LichenError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LichenError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                LichenError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, LichenError> {
        toml::from_str(toml_str).map_err(|e| {
            LichenError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `LICHEN_{SECTION}_{FIELD}`
    /// 예: `LICHEN_EXPORT_FORMAT=yaml`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "LICHEN_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "LICHEN_GENERAL_LOG_FORMAT");

        // Export
        override_string(&mut self.export.format, "LICHEN_EXPORT_FORMAT");
        override_csv(
            &mut self.export.traversal_order,
            "LICHEN_EXPORT_TRAVERSAL_ORDER",
        );
        override_csv(
            &mut self.export.always_reference,
            "LICHEN_EXPORT_ALWAYS_REFERENCE",
        );
        override_u32(
            &mut self.export.max_identities_per_type,
            "LICHEN_EXPORT_MAX_IDENTITIES_PER_TYPE",
        );
        override_bool(
            &mut self.export.tag_references,
            "LICHEN_EXPORT_TAG_REFERENCES",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    ///
    /// 컨테이너 이름이나 필드 경로처럼 모델 스키마에 의존하는 값은
    /// `lichen-evaluated-model`의 `ExportConfig::validate`에서 검증합니다.
    pub fn validate(&self) -> Result<(), LichenError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_log_formats.join(", ")),
            }
            .into());
        }

        let valid_export_formats = ["json", "yaml"];
        if !valid_export_formats.contains(&self.export.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "export.format".to_owned(),
                reason: format!("must be one of: {}", valid_export_formats.join(", ")),
            }
            .into());
        }

        if self.export.max_identities_per_type == 0 {
            return Err(ConfigError::InvalidValue {
                field: "export.max_identities_per_type".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 모델 export 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSection {
    /// 출력 형식 (json, yaml)
    pub format: String,
    /// 컨테이너 방문 순서. 비어 있으면 기본 순서를 사용
    pub traversal_order: Vec<String>,
    /// 기본 정책에 추가할 참조 전용 필드 (`schema.field` 형식)
    pub always_reference: Vec<String>,
    /// 타입별 최대 식별자 수
    pub max_identities_per_type: u32,
    /// 참조 문서에 `type` 태그를 명시할지 여부
    pub tag_references: bool,
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            format: "json".to_owned(),
            traversal_order: Vec::new(),
            always_reference: Vec::new(),
            max_identities_per_type: u32::MAX,
            tag_references: false,
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_u32(target: &mut u32, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u32>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u32 from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
}
