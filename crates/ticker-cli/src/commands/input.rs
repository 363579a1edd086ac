//! 입력 파일 로드.
//!
//! 각 파일은 `NamedSeries` 하나를 JSON으로 담고 있습니다.
//!
//! ```json
//! {"ticker": "SPY", "data": [{"date": "2024-01-02", "open": 1.0, "high": 1.0, "low": 1.0, "close": 1.0, "volume": 0.0}]}
//! ```

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use ticker_core::{parse_iso_date, NamedSeries};

/// 날짜 문자열 파싱 (YYYY-MM-DD)
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    parse_iso_date(s).ok_or_else(|| anyhow!("잘못된 날짜 형식: {} (YYYY-MM-DD)", s))
}

/// JSON 파일에서 종목 시계열을 읽습니다.
///
/// 검증은 분석 단계에서 종목별로 수행하므로 여기서는 파싱만 합니다.
pub fn load_series(path: &Path) -> Result<NamedSeries> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("입력 파일을 읽을 수 없습니다: {}", path.display()))?;
    let series: NamedSeries = serde_json::from_str(&text)
        .with_context(|| format!("시계열 JSON 파싱 실패: {}", path.display()))?;

    info!(
        ticker = %series.ticker,
        points = series.len(),
        path = %path.display(),
        "series loaded"
    );
    Ok(series)
}

/// 여러 파일을 순서대로 읽습니다.
pub fn load_all(paths: &[PathBuf]) -> Result<Vec<NamedSeries>> {
    paths.iter().map(|p| load_series(p)).collect()
}
