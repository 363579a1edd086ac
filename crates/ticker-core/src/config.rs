//! 설정 관리.
//!
//! 이 모듈은 대시보드 분석 설정을 정의하고 관리합니다.
//! TOML 파일을 읽은 뒤 `TICKER__` 접두사의 환경 변수로 덮어씁니다.
//!
//! ```text
//! TICKER__BACKTEST__COMMISSION_RATE=0.002
//! TICKER__DISPLAY__START=2015-01-01
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{TickerError, TickerResult};
use crate::types::DateRange;

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 추세추종 백테스트 설정
    #[serde(default)]
    pub backtest: BacktestSettings,
    /// 롤링 수익률 설정
    #[serde(default)]
    pub rolling: RollingSettings,
    /// 표시 구간 설정
    #[serde(default)]
    pub display: DisplaySettings,
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
    /// 종목별 분석 span의 시작/종료도 출력
    #[serde(default)]
    pub span_events: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            span_events: false,
        }
    }
}

/// 추세추종 백테스트 설정.
///
/// 10개월 SMA 규칙 자체는 고정이며 여기서 바꿀 수 없습니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BacktestSettings {
    /// 신호 전환 시 1회 부과되는 수수료율 (예: 0.001 = 0.1%)
    #[serde(default = "default_commission_rate")]
    pub commission_rate: f64,
    /// 현금 보유 시 연 이자율이자 전략 샤프 비율의 무위험 이자율 (예: 0.02 = 2%)
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
}

fn default_commission_rate() -> f64 {
    0.001
}
fn default_risk_free_rate() -> f64 {
    0.02
}

impl Default for BacktestSettings {
    fn default() -> Self {
        Self {
            commission_rate: default_commission_rate(),
            risk_free_rate: default_risk_free_rate(),
        }
    }
}

/// 롤링 수익률 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RollingSettings {
    /// 계산할 윈도우 (년)
    #[serde(default = "default_windows_years")]
    pub windows_years: Vec<u32>,
}

fn default_windows_years() -> Vec<u32> {
    vec![1, 3, 5, 10]
}

impl Default for RollingSettings {
    fn default() -> Self {
        Self {
            windows_years: default_windows_years(),
        }
    }
}

/// 표시 구간 설정.
///
/// 둘 다 비어 있으면 모든 종목의 공통 구간을 사용합니다.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DisplaySettings {
    /// 시작일
    #[serde(default)]
    pub start: Option<NaiveDate>,
    /// 종료일
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

impl DisplaySettings {
    /// 설정된 값으로 구간을 채웁니다. 빈 쪽은 `fallback`에서 가져옵니다.
    pub fn resolve(&self, fallback: Option<DateRange>) -> Option<DateRange> {
        match (self.start, self.end, fallback) {
            (Some(start), Some(end), _) => Some(DateRange::new(start, end)),
            (start, end, Some(fb)) => Some(DateRange::new(
                start.unwrap_or(fb.start),
                end.unwrap_or(fb.end),
            )),
            (_, _, None) => None,
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> TickerResult<Self> {
        let builder = config::Config::builder()
            // 기본값으로 시작
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()).required(false))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("TICKER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> TickerResult<Self> {
        Self::load("config/default.toml")
    }

    /// 설정 값의 범위를 검사합니다.
    pub fn validate(&self) -> TickerResult<()> {
        let rate_ok = |r: f64| r.is_finite() && (0.0..1.0).contains(&r);

        if !rate_ok(self.backtest.commission_rate) {
            return Err(TickerError::Config(format!(
                "commission_rate는 [0, 1) 범위여야 합니다: {}",
                self.backtest.commission_rate
            )));
        }
        if !rate_ok(self.backtest.risk_free_rate) {
            return Err(TickerError::Config(format!(
                "risk_free_rate는 [0, 1) 범위여야 합니다: {}",
                self.backtest.risk_free_rate
            )));
        }
        if self.rolling.windows_years.is_empty() {
            return Err(TickerError::Config(
                "롤링 윈도우가 하나 이상 필요합니다".to_string(),
            ));
        }
        if self.rolling.windows_years.contains(&0) {
            return Err(TickerError::Config(
                "롤링 윈도우는 1년 이상이어야 합니다".to_string(),
            ));
        }
        if let (Some(start), Some(end)) = (self.display.start, self.display.end) {
            if start > end {
                return Err(TickerError::Config(format!(
                    "표시 시작일 {}이 종료일 {}보다 늦습니다",
                    start, end
                )));
            }
        }
        Ok(())
    }
}
