//! 티커 분석 CLI.
//!
//! 이미 파싱된 시세(JSON)를 읽어 분석 결과를 출력합니다.
//!
//! # 사용 예시
//!
//! ```bash
//! # 두 종목 대시보드 (공통 구간)
//! ticker report -i data/spy.json -i data/qqq.json
//!
//! # 구간 지정, 한 줄 JSON
//! ticker report -i data/spy.json -f 2015-01-01 -t 2024-12-31 --compact
//!
//! # 추세추종 백테스트만
//! ticker backtest -i data/spy.json --commission 0.002 --cash-rate 0.03
//! ```

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use ticker_core::{init_logging, AppConfig, LogConfig};

mod commands;

use commands::backtest::{run_backtest, BacktestCliConfig};
use commands::input::parse_date;
use commands::report::{run_report, ReportCliConfig};

#[derive(Parser)]
#[command(name = "ticker")]
#[command(about = "Ticker analytics CLI - 수익률/위험 통계와 추세추종 백테스트", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 (기본: config/default.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 대시보드 리포트 (JSON)
    Report {
        /// 종목 시계열 JSON 파일 (여러 번 지정 가능)
        #[arg(short, long, required = true)]
        input: Vec<PathBuf>,

        /// 표시 시작일 (YYYY-MM-DD)
        #[arg(short = 'f', long)]
        from: Option<String>,

        /// 표시 종료일 (YYYY-MM-DD)
        #[arg(short, long)]
        to: Option<String>,

        /// 한 줄 JSON으로 출력
        #[arg(long, default_value = "false")]
        compact: bool,
    },

    /// 추세추종 백테스트
    Backtest {
        /// 종목 시계열 JSON 파일
        #[arg(short, long)]
        input: PathBuf,

        /// 신호 전환 수수료율 (예: 0.001)
        #[arg(long)]
        commission: Option<f64>,

        /// 현금 연 이자율 (예: 0.02)
        #[arg(long)]
        cash_rate: Option<f64>,

        /// 결과를 JSON으로 출력
        #[arg(long, default_value = "false")]
        json: bool,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("설정 파일 로드 실패: {}", path.display()))?,
        None => AppConfig::load_default().context("기본 설정 로드 실패")?,
    };

    init_logging(LogConfig::from(&config.logging)).map_err(|e| anyhow!("로깅 초기화 실패: {}", e))?;
    debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Report {
            input,
            from,
            to,
            compact,
        } => {
            if let Some(from) = from {
                config.display.start = Some(parse_date(&from)?);
            }
            if let Some(to) = to {
                config.display.end = Some(parse_date(&to)?);
            }
            config.validate().context("표시 구간이 올바르지 않습니다")?;

            run_report(ReportCliConfig {
                inputs: input,
                config,
                compact,
            })?;
        }

        Commands::Backtest {
            input,
            commission,
            cash_rate,
            json,
        } => {
            if let Some(rate) = commission {
                config.backtest.commission_rate = rate;
            }
            if let Some(rate) = cash_rate {
                config.backtest.risk_free_rate = rate;
            }
            config.validate().context("백테스트 파라미터가 올바르지 않습니다")?;

            run_backtest(BacktestCliConfig {
                input,
                settings: config.backtest,
                json,
            })?;
        }
    }

    Ok(())
}
