use std::time::Duration;

use thiserror::Error;

/// 진단 실행 중 발생하는 오류
#[derive(Error, Debug)]
pub enum CheckError {
    /// 설정 값이 잘못됨 (연결 문자열, sslmode 등)
    #[error("invalid configuration: {0}")]
    Config(String),

    /// 데이터베이스 연결 실패
    #[error("connection failed: {0}")]
    Connect(#[source] tokio_postgres::Error),

    /// 연결 제한 시간 초과
    #[error("connection timed out after {}", humantime::format_duration(*.0))]
    ConnectTimeout(Duration),

    /// 카탈로그 쿼리 실패
    #[error("{check} query failed: {source}")]
    Query {
        check: &'static str,
        #[source]
        source: tokio_postgres::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CheckError>;

/// 쿼리 오류를 어떤 검사에서 발생했는지와 함께 감싸는 헬퍼
pub fn query_err(check: &'static str) -> impl FnOnce(tokio_postgres::Error) -> CheckError {
    move |source| CheckError::Query { check, source }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_message_is_human_readable() {
        let err = CheckError::ConnectTimeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "connection timed out after 30s");
    }

    #[test]
    fn config_message_carries_detail() {
        let err = CheckError::Config("unknown sslmode 'sometimes'".to_string());
        assert!(err.to_string().contains("sometimes"));
    }
}
