//! 대시보드 리포트 명령어.
//!
//! 입력 종목을 모두 분석해 `DashboardReport`를 JSON으로 stdout에 출력합니다.
//! 제외된 종목은 리포트의 `omitted`에 남고 명령 자체는 실패하지 않습니다.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{info, warn};

use ticker_analytics::DashboardSession;
use ticker_core::AppConfig;

use super::input::load_all;

/// 리포트 CLI 설정
#[derive(Debug, Clone)]
pub struct ReportCliConfig {
    /// 입력 파일
    pub inputs: Vec<PathBuf>,
    /// 분석 설정 (표시 구간 포함)
    pub config: AppConfig,
    /// 한 줄 JSON 여부
    pub compact: bool,
}

/// 리포트 실행
pub fn run_report(cli: ReportCliConfig) -> Result<()> {
    let series = load_all(&cli.inputs)?;

    let session = DashboardSession::new(cli.config);
    let report = session.analyze(&series);

    for omitted in &report.omitted {
        warn!(ticker = %omitted.ticker, reason = %omitted.reason, "종목 제외");
    }
    info!(
        instruments = report.instruments.len(),
        omitted = report.omitted.len(),
        "리포트 생성 완료"
    );

    let json = report
        .to_json(!cli.compact)
        .context("리포트 직렬화 실패")?;
    println!("{}", json);
    Ok(())
}
