//! 로깅 초기화.
//!
//! 분석 결과(JSON 리포트)는 stdout으로 나가므로 로그는 항상 stderr에 씁니다.
//! 형식은 설정의 `logging.format`(또는 `TICKER__LOGGING__FORMAT`)으로 고릅니다.
//!
//! | 형식 | 용도 |
//! |------|------|
//! | `pretty` | 터미널에서 직접 실행할 때 |
//! | `json` | 로그 수집기로 보낼 때 |
//! | `compact` | 한 줄씩 grep 할 때 |

use std::fmt;
use std::str::FromStr;

use tracing_subscriber::{
    filter::ParseError, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::config::LoggingConfig;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

impl LogFormat {
    /// 설정 파일에 쓰는 이름
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pretty => "pretty",
            Self::Json => "json",
            Self::Compact => "compact",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Pretty, Self::Json, Self::Compact]
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("알 수 없는 로그 형식: {} (pretty, json, compact)", s))
    }
}

/// 구독자(subscriber) 설정.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// `EnvFilter` 지시문 (예: "info", "ticker_analytics=debug")
    pub level: String,
    pub format: LogFormat,
    /// span 생성/종료 시점도 이벤트로 출력
    pub with_span_events: bool,
    /// 소스 파일과 줄 번호 출력
    pub with_file: bool,
    /// 모듈 경로 출력
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new("info")
    }
}

impl LogConfig {
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            format: LogFormat::default(),
            with_span_events: false,
            with_file: false,
            with_target: true,
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.with_span_events = enabled;
        self
    }

    /// `RUST_LOG`가 있으면 그쪽이 우선합니다.
    fn env_filter(&self) -> Result<EnvFilter, ParseError> {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&self.level))
    }

    fn fmt_layer(&self) -> BoxedLayer {
        let span_events = if self.with_span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_file(self.with_file)
            .with_line_number(self.with_file)
            .with_target(self.with_target)
            .with_span_events(span_events);

        match self.format {
            LogFormat::Pretty => layer.pretty().boxed(),
            LogFormat::Json => layer.json().boxed(),
            LogFormat::Compact => layer.compact().boxed(),
        }
    }
}

impl From<&LoggingConfig> for LogConfig {
    /// 형식 문자열을 해석할 수 없으면 pretty.
    fn from(settings: &LoggingConfig) -> Self {
        Self::new(settings.level.clone())
            .with_format(settings.format.parse().unwrap_or_default())
            .with_span_events(settings.span_events)
    }
}

/// 전역 구독자를 설치합니다. 두 번째 호출은 에러입니다.
///
/// ```no_run
/// use ticker_core::logging::{init_logging, LogConfig, LogFormat};
///
/// init_logging(LogConfig::new("ticker_analytics=debug").with_format(LogFormat::Json)).unwrap();
/// ```
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(config.fmt_layer())
        .with(config.env_filter()?)
        .try_init()?;

    tracing::debug!(format = %config.format, level = %config.level, "logging initialized");
    Ok(())
}

/// 종목(`ticker`) 필드가 붙은 info span. 세 번째 인자는 계산 단계 이름.
#[macro_export]
macro_rules! series_span {
    ($name:expr, $ticker:expr) => {
        tracing::info_span!($name, ticker = %$ticker)
    };
    ($name:expr, $ticker:expr, $component:expr) => {
        tracing::info_span!($name, ticker = %$ticker, component = %$component)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse_and_display() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" compact ".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert!("xml".parse::<LogFormat>().is_err());

        for format in [LogFormat::Pretty, LogFormat::Json, LogFormat::Compact] {
            assert_eq!(format.to_string().parse::<LogFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_log_config_from_settings() {
        let settings = LoggingConfig {
            level: "ticker_analytics=debug".to_string(),
            format: "json".to_string(),
            span_events: true,
        };
        let config = LogConfig::from(&settings);
        assert_eq!(config.level, "ticker_analytics=debug");
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.with_span_events);
        assert!(!config.with_file);

        let unknown = LoggingConfig {
            level: "info".to_string(),
            format: "yaml".to_string(),
            span_events: false,
        };
        let fallback = LogConfig::from(&unknown);
        assert_eq!(fallback.format, LogFormat::Pretty);
        assert!(!fallback.with_span_events);
    }

    #[test]
    fn test_series_span_fields() {
        let span = crate::series_span!("statistics", "SPY", "drawdown");
        // 구독자가 없으면 비활성 span
        assert!(span.is_disabled());
    }
}
