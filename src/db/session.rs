use async_trait::async_trait;
use log::{debug, error, info, warn};
use tokio::task::JoinHandle;
use tokio_postgres::{Client, NoTls};

use super::catalog::CatalogSession;
use super::config::DbConfig;
use crate::error::{CheckError, Result};

/// 단일 데이터베이스 세션
///
/// 연결에 성공했을 때만 만들어지므로, 정리 단계는 항상 유효한 연결만 다룬다.
pub struct Session {
    pub(super) client: Client,
    connection: JoinHandle<()>,
}

impl Session {
    /// 설정에 따라 연결 (연결 제한 시간 적용)
    pub async fn connect(config: &DbConfig) -> Result<Self> {
        let pg_config = config.to_pg_config()?;
        let timeout = config.get_connection_timeout();

        debug!(
            "DB 연결 시도: {} (제한 시간 {})",
            config.redacted(),
            humantime::format_duration(timeout)
        );

        let (client, connection) = match tokio::time::timeout(timeout, pg_config.connect(NoTls)).await {
            Ok(Ok(pair)) => pair,
            Ok(Err(e)) => {
                error!("DB 연결 실패: {}", e);
                return Err(CheckError::Connect(e));
            }
            Err(_) => {
                error!("DB 연결 타임아웃: {}", config.redacted());
                return Err(CheckError::ConnectTimeout(timeout));
            }
        };

        // 연결 객체는 별도 태스크에서 구동
        let connection = tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("DB 연결 오류: {}", e);
            }
        });

        info!("DB 연결 성공: {}", config.redacted());
        Ok(Self { client, connection })
    }
}

#[async_trait]
impl CatalogSession for Session {
    /// 클라이언트와 연결 태스크 정리
    async fn close(self) {
        let Self { client, connection } = self;

        // 클라이언트를 먼저 해제해야 연결 태스크가 종료된다
        drop(client);
        if let Err(e) = connection.await {
            warn!("DB 연결 태스크 종료 실패: {}", e);
        }
        debug!("DB 세션 종료");
    }
}
