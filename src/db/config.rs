use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use log::info;
use serde::Deserialize;
use tokio_postgres::config::{Host, SslMode};

use crate::error::{CheckError, Result};

/// 데이터베이스 연결 설정
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ConnectionConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_sslmode")]
    pub sslmode: String,
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_seconds: u64,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_database() -> String {
    "postgres".to_string()
}

fn default_user() -> String {
    "postgres".to_string()
}

fn default_sslmode() -> String {
    "prefer".to_string()
}

fn default_connection_timeout() -> u64 {
    30
}

impl Default for ConnectionConfig {
    // 비밀번호는 기본값을 두지 않는다
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database: default_database(),
            user: default_user(),
            password: None,
            sslmode: default_sslmode(),
            connection_timeout_seconds: default_connection_timeout(),
        }
    }
}

/// 데이터베이스 설정
///
/// `url`이 지정되면 (DATABASE_URL 또는 설정 파일) 개별 연결 필드보다 우선한다.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct DbConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub connection: ConnectionConfig,
}

impl DbConfig {
    /// 설정 파일에서 DB 설정 로드
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("DB 설정 파일 로드: {}", path.display());

        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: DbConfig = serde_yaml::from_str(&contents)?;
        info!("DB 설정 로드 완료: {}", config.redacted());

        Ok(config)
    }

    /// tokio-postgres 연결 설정 생성
    pub fn to_pg_config(&self) -> Result<tokio_postgres::Config> {
        if let Some(url) = &self.url {
            return url
                .parse::<tokio_postgres::Config>()
                .map_err(|e| CheckError::Config(format!("DATABASE_URL: {}", e)));
        }

        let conn = &self.connection;
        let mut config = tokio_postgres::Config::new();
        config
            .host(&conn.host)
            .port(conn.port)
            .dbname(&conn.database)
            .user(&conn.user)
            .ssl_mode(parse_sslmode(&conn.sslmode)?);
        if let Some(password) = &conn.password {
            config.password(password);
        }

        Ok(config)
    }

    /// 연결 제한 시간 설정 가져오기
    pub fn get_connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection.connection_timeout_seconds)
    }

    /// 로그 출력용 연결 정보
    ///
    /// 원본 문자열은 출력하지 않고 파싱된 설정의 사용자, 호스트, 포트, DB 이름만 사용한다.
    pub fn redacted(&self) -> String {
        match &self.url {
            Some(url) => match url.parse::<tokio_postgres::Config>() {
                Ok(config) => describe_pg_config(&config),
                Err(_) => "<잘못된 연결 URL>".to_string(),
            },
            None => format!(
                "{}@{}:{}/{}",
                self.connection.user,
                self.connection.host,
                self.connection.port,
                self.connection.database
            ),
        }
    }
}

fn parse_sslmode(value: &str) -> Result<SslMode> {
    match value.to_ascii_lowercase().as_str() {
        "disable" => Ok(SslMode::Disable),
        "prefer" => Ok(SslMode::Prefer),
        "require" => Ok(SslMode::Require),
        other => Err(CheckError::Config(format!("unknown sslmode '{}'", other))),
    }
}

/// 파싱된 연결 설정을 user@host:port/dbname 형태로 표시 (비밀번호 제외)
fn describe_pg_config(config: &tokio_postgres::Config) -> String {
    let hosts = config
        .get_hosts()
        .iter()
        .map(|host| match host {
            Host::Tcp(name) => name.clone(),
            #[cfg(unix)]
            Host::Unix(path) => path.display().to_string(),
        })
        .collect::<Vec<_>>();
    let ports = config
        .get_ports()
        .iter()
        .map(|port| port.to_string())
        .collect::<Vec<_>>();

    let host = if hosts.is_empty() { "-".to_string() } else { hosts.join(",") };
    let port = if ports.is_empty() { "-".to_string() } else { ports.join(",") };

    format!(
        "{}@{}:{}/{}",
        config.get_user().unwrap_or("-"),
        host,
        port,
        config.get_dbname().unwrap_or("-")
    )
}
