//! 분석 엔진의 에러 타입.
//!
//! 이 모듈은 시세 검증, 통계 계산, 설정 로드에서 사용되는 에러 타입을 정의합니다.
//!
//! 참조 불가(전월 가격 없음 등)나 퇴화 입력(경과 시간 0 등)은 에러가 아니라
//! 각 지표 필드의 `None` 또는 0으로 표현됩니다.

use thiserror::Error;

/// 핵심 분석 에러.
#[derive(Debug, Error)]
pub enum TickerError {
    /// 계산에 필요한 최소 데이터 수 미달
    #[error("데이터 부족: 필요={required}, 제공={actual}")]
    InsufficientData { required: usize, actual: usize },

    /// 시세 데이터가 불변 조건을 위반함
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),
}

/// 분석 작업을 위한 Result 타입.
pub type TickerResult<T> = Result<T, TickerError>;

impl TickerError {
    /// 데이터 부족 에러를 생성합니다.
    pub fn insufficient(required: usize, actual: usize) -> Self {
        TickerError::InsufficientData { required, actual }
    }

    /// 데이터 부족으로 인한 에러인지 확인합니다.
    ///
    /// 호출자는 이 경우 해당 종목만 화면에서 제외해야 합니다.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, TickerError::InsufficientData { .. })
    }

    /// 종목 단위로 건너뛸 수 있는 에러인지 확인합니다.
    pub fn is_instrument_local(&self) -> bool {
        matches!(
            self,
            TickerError::InsufficientData { .. } | TickerError::InvalidInput(_)
        )
    }
}

impl From<serde_json::Error> for TickerError {
    fn from(err: serde_json::Error) -> Self {
        TickerError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for TickerError {
    fn from(err: config::ConfigError) -> Self {
        TickerError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_classification() {
        let err = TickerError::insufficient(2, 1);
        assert!(err.is_insufficient_data());
        assert!(err.is_instrument_local());
        assert_eq!(err.to_string(), "데이터 부족: 필요=2, 제공=1");
    }

    #[test]
    fn test_config_error_is_not_instrument_local() {
        let err = TickerError::Config("missing".to_string());
        assert!(!err.is_insufficient_data());
        assert!(!err.is_instrument_local());
    }
}
