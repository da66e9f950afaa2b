//! 에러 타입 -- 도메인별 에러 정의

/// Lichen 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum LichenError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 모델 export 에러
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 모델 export 에러
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// 그래프 인코딩 실패 (식별자 공간 고갈, 잘못된 참조 등)
    #[error("encoding failed: {0}")]
    Encoding(String),

    /// 출력 형식(JSON/YAML) 직렬화 실패
    #[error("format error: {0}")]
    Format(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_into_lichen_error() {
        let err: LichenError = ConfigError::InvalidValue {
            field: "export.format".to_owned(),
            reason: "must be one of: json, yaml".to_owned(),
        }
        .into();
        assert!(matches!(err, LichenError::Config(_)));
        assert!(err.to_string().contains("export.format"));
    }

    #[test]
    fn export_error_display() {
        let err: LichenError = ExportError::Encoding("dangling reference".to_owned()).into();
        assert_eq!(
            err.to_string(),
            "export error: encoding failed: dangling reference"
        );
    }

    #[test]
    fn io_error_converts_into_lichen_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: LichenError = io.into();
        assert!(matches!(err, LichenError::Io(_)));
    }
}
