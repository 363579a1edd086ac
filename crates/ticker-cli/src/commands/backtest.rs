//! 추세추종 백테스트 명령어.
//!
//! 전체 이력으로 SMA-10 추세추종 전략을 실행하고 매수 후 보유와 비교합니다.
//!
//! # 사용 예시
//!
//! ```bash
//! ticker backtest -i data/spy.json
//! ticker backtest -i data/spy.json --commission 0.002 --cash-rate 0.03 --json
//! ```

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use ticker_analytics::{run_trend_following, TrendFollowingParams};
use ticker_core::BacktestSettings;

use super::input::load_series;

/// 백테스트 CLI 설정
#[derive(Debug, Clone)]
pub struct BacktestCliConfig {
    /// 입력 파일
    pub input: PathBuf,
    /// 수수료율과 현금 이자율
    pub settings: BacktestSettings,
    /// JSON 출력 여부
    pub json: bool,
}

/// 백테스트 실행
pub fn run_backtest(cli: BacktestCliConfig) -> Result<()> {
    let series = load_series(&cli.input)?;
    series
        .validate()
        .with_context(|| format!("잘못된 시계열: {}", cli.input.display()))?;

    let params = TrendFollowingParams::from(&cli.settings);
    info!(
        ticker = %series.ticker,
        commission_rate = params.commission_rate,
        risk_free_rate = params.risk_free_rate,
        "백테스트 시작"
    );

    let Some(result) = run_trend_following(&series.data, &params) else {
        println!(
            "{}: 백테스트에 필요한 이력이 부족합니다 (일별 {}개, 최소 일별 252개 / 월말 12개 필요)",
            series.ticker,
            series.len()
        );
        return Ok(());
    };

    if cli.json {
        let json = serde_json::to_string_pretty(&result).context("결과 직렬화 실패")?;
        println!("{}", json);
    } else {
        println!("[{}]", series.ticker);
        println!("{}", result.summary());
    }

    Ok(())
}
