use std::error::Error;
#[cfg(debug_assertions)]
use std::io::Write;
#[cfg(debug_assertions)]
use chrono::Local;

use env_logger::Builder;
use log::{info, LevelFilter};

mod config;
mod constants;
mod db;
mod error;
mod validate;

use config::settings::Settings;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // 로거 초기화
    setup_logger();

    info!("pg-validate 시작");

    // 설정 로드 (파일 오류는 경고 후 기본값 사용)
    let settings = Settings::load();
    settings.log_settings();

    // 진단 실행 - 오류도 결과 줄로 출력되며 종료 코드는 항상 0
    let outcome = validate::validate_database(&settings).await;
    for line in outcome.lines() {
        println!("{}", line);
    }

    Ok(())
}

/// 로거 설정
fn setup_logger() {
    #[cfg(debug_assertions)]
    {
        Builder::new()
            .filter(None, LevelFilter::Trace)
            .filter(Some("tokio_postgres"), LevelFilter::Info)
            .parse_env("RUST_LOG")
            .format(|buf, record| {
                writeln!(
                    buf,
                    "[{} {} {}:{}] {}",
                    Local::now().format("%Y-%m-%dT%H:%M:%S%.3fZ"),
                    record.level(),
                    record.file().unwrap_or("unknown"),
                    record.line().unwrap_or(0),
                    record.args()
                )
            })
            .init();
    }

    #[cfg(not(debug_assertions))]
    {
        Builder::new()
            .filter(None, LevelFilter::Info)
            .parse_env("RUST_LOG")
            .init();
    }
}
