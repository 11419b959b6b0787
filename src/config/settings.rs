use std::env;
use std::path::Path;

use log::{debug, info, warn};

use crate::config::CheckConfig;
use crate::db::config::DbConfig;

const DEFAULT_DB_CONFIG_FILE: &str = "db.yml";
const DEFAULT_CHECK_CONFIG_FILE: &str = "checks.yml";

/// 설정 소스 우선순위
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    /// 환경 변수
    Environment,
    /// 설정 파일
    File,
    /// 기본값
    Default,
}

impl ConfigSource {
    fn describe(&self) -> &'static str {
        match self {
            ConfigSource::Environment => "환경 변수",
            ConfigSource::File => "설정 파일",
            ConfigSource::Default => "기본값",
        }
    }
}

/// 통합 설정 관리자
#[derive(Clone, Debug)]
pub struct Settings {
    /// 진단 대상 설정
    pub checks: CheckConfig,
    /// 데이터베이스 설정
    pub database: DbConfig,
    pub checks_source: ConfigSource,
    pub db_source: ConfigSource,
}

impl Settings {
    /// 프로세스 환경 변수로부터 설정 로드
    pub fn load() -> Self {
        Self::resolve(|key| env::var(key).ok())
    }

    /// 주어진 변수 조회 함수로 설정 결정
    pub fn resolve<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let (checks, checks_source) = Self::load_check_config(&lookup);
        let (database, db_source) = Self::load_db_config(&lookup);

        let mut settings = Self {
            checks,
            database,
            checks_source,
            db_source,
        };
        settings.override_from_env(&lookup);
        settings
    }

    /// 진단 대상 설정 로드
    fn load_check_config<F>(lookup: &F) -> (CheckConfig, ConfigSource)
    where
        F: Fn(&str) -> Option<String>,
    {
        // 1. 환경 변수에서 설정 파일 경로 확인
        if let Some(path) = lookup("CHECK_CONFIG_FILE") {
            info!("환경 변수에서 진단 설정 파일 경로 로드: {}", path);
            if Path::new(&path).exists() {
                match CheckConfig::from_file(&path) {
                    Ok(config) => return (config, ConfigSource::Environment),
                    Err(e) => warn!("환경 변수에 지정된 진단 설정 파일 로드 실패: {}", e),
                }
            } else {
                warn!("환경 변수에 지정된 진단 설정 파일이 존재하지 않음: {}", path);
            }
        }

        // 2. 현재 디렉토리의 checks.yml 파일 확인
        if Path::new(DEFAULT_CHECK_CONFIG_FILE).exists() {
            info!("진단 설정 파일 로드: {}", DEFAULT_CHECK_CONFIG_FILE);
            match CheckConfig::from_file(DEFAULT_CHECK_CONFIG_FILE) {
                Ok(config) => return (config, ConfigSource::File),
                Err(e) => warn!("기본 진단 설정 파일 로드 실패: {}", e),
            }
        }

        // 3. 기본 설정 사용
        debug!("진단 설정 파일이 없어 기본 대상 사용");
        (CheckConfig::default(), ConfigSource::Default)
    }

    /// 데이터베이스 설정 로드
    fn load_db_config<F>(lookup: &F) -> (DbConfig, ConfigSource)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("DB_CONFIG_FILE") {
            info!("환경 변수에서 DB 설정 파일 경로 로드: {}", path);
            if Path::new(&path).exists() {
                match DbConfig::load_from_file(&path) {
                    Ok(config) => return (config, ConfigSource::Environment),
                    Err(e) => warn!("환경 변수에 지정된 DB 설정 파일 로드 실패: {}", e),
                }
            } else {
                warn!("환경 변수에 지정된 DB 설정 파일이 존재하지 않음: {}", path);
            }
        }

        if Path::new(DEFAULT_DB_CONFIG_FILE).exists() {
            info!("DB 설정 파일 로드: {}", DEFAULT_DB_CONFIG_FILE);
            match DbConfig::load_from_file(DEFAULT_DB_CONFIG_FILE) {
                Ok(config) => return (config, ConfigSource::File),
                Err(e) => warn!("기본 DB 설정 파일 로드 실패: {}", e),
            }
        }

        debug!("DB 설정 파일이 없어 기본 설정 사용");
        (DbConfig::default(), ConfigSource::Default)
    }

    /// 환경 변수에서 설정 값 오버라이드
    fn override_from_env<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
            info!("환경 변수에서 DATABASE_URL 설정");
            self.database.url = Some(url);
            self.db_source = ConfigSource::Environment;
        }

        let conn = &mut self.database.connection;
        let mut overridden = false;

        if let Some(host) = lookup("DB_HOST") {
            info!("환경 변수에서 DB 호스트 설정: {}", host);
            conn.host = host;
            overridden = true;
        }

        if let Some(port) = lookup("DB_PORT") {
            match port.parse::<u16>() {
                Ok(port) => {
                    info!("환경 변수에서 DB 포트 설정: {}", port);
                    conn.port = port;
                    overridden = true;
                }
                Err(_) => warn!("환경 변수 DB_PORT 값이 유효한 포트 번호가 아님: {}", port),
            }
        }

        if let Some(name) = lookup("DB_NAME") {
            info!("환경 변수에서 DB 이름 설정: {}", name);
            conn.database = name;
            overridden = true;
        }

        if let Some(user) = lookup("DB_USER") {
            info!("환경 변수에서 DB 사용자 설정: {}", user);
            conn.user = user;
            overridden = true;
        }

        if let Some(password) = lookup("DB_PASSWORD") {
            info!("환경 변수에서 DB 비밀번호 설정");
            conn.password = Some(password);
            overridden = true;
        }

        if let Some(sslmode) = lookup("DB_SSLMODE") {
            info!("환경 변수에서 DB sslmode 설정: {}", sslmode);
            conn.sslmode = sslmode;
            overridden = true;
        }

        if overridden {
            if self.database.url.is_some() {
                warn!("연결 URL이 지정되어 개별 DB_* 환경 변수는 무시됩니다");
            } else {
                self.db_source = ConfigSource::Environment;
            }
        }
    }

    /// 설정 정보 로그 출력
    pub fn log_settings(&self) {
        info!("진단 설정 소스: {}", self.checks_source.describe());
        info!("데이터베이스 설정 소스: {}", self.db_source.describe());
        info!("데이터베이스 연결: {}", self.database.redacted());
        debug!(
            "진단 대상: 스키마 {}, 테이블 {:?}, 구체화 뷰 {}, 파티션 부모 {:?}",
            self.checks.schema,
            self.checks.tables,
            self.checks.materialized_view,
            self.checks.partition_parents
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let settings = Settings::resolve(lookup_from(&[]));
        assert_eq!(settings.checks, CheckConfig::default());
        assert_eq!(settings.database, DbConfig::default());
        assert_eq!(settings.db_source, ConfigSource::Default);
        assert_eq!(settings.checks_source, ConfigSource::Default);
    }

    #[test]
    fn database_url_wins() {
        let settings = Settings::resolve(lookup_from(&[
            ("DATABASE_URL", "postgresql://app:pw@db.internal/metrics"),
            ("DB_HOST", "ignored.example"),
        ]));
        assert_eq!(
            settings.database.url.as_deref(),
            Some("postgresql://app:pw@db.internal/metrics")
        );
        assert_eq!(settings.db_source, ConfigSource::Environment);
        let pg = settings.database.to_pg_config().unwrap();
        assert_eq!(pg.get_dbname(), Some("metrics"));
    }

    #[test]
    fn blank_database_url_is_ignored() {
        let settings = Settings::resolve(lookup_from(&[("DATABASE_URL", "  ")]));
        assert_eq!(settings.database.url, None);
        assert_eq!(settings.db_source, ConfigSource::Default);
    }

    #[test]
    fn field_overrides_apply_without_url() {
        let settings = Settings::resolve(lookup_from(&[
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "6543"),
            ("DB_PASSWORD", "pw"),
        ]));
        let conn = &settings.database.connection;
        assert_eq!(conn.host, "db.internal");
        assert_eq!(conn.port, 6543);
        assert_eq!(conn.password.as_deref(), Some("pw"));
        assert_eq!(settings.db_source, ConfigSource::Environment);
    }

    #[test]
    fn invalid_port_is_ignored() {
        let settings = Settings::resolve(lookup_from(&[("DB_PORT", "not-a-port")]));
        assert_eq!(settings.database.connection.port, 5432);
        assert_eq!(settings.db_source, ConfigSource::Default);
    }

    #[test]
    fn check_config_file_from_environment() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "materialized_view: daily_rollup\npartition_parents: [events]").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let settings = Settings::resolve(lookup_from(&[("CHECK_CONFIG_FILE", path.as_str())]));
        assert_eq!(settings.checks_source, ConfigSource::Environment);
        assert_eq!(settings.checks.materialized_view, "daily_rollup");
        assert_eq!(settings.checks.partition_parents, vec!["events"]);
    }

    #[test]
    fn file_url_wins_over_field_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "url: postgresql://app@db.internal:6543/metrics").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let settings = Settings::resolve(lookup_from(&[
            ("DB_CONFIG_FILE", path.as_str()),
            ("DB_HOST", "ignored.example"),
        ]));
        assert_eq!(settings.db_source, ConfigSource::Environment);
        assert_eq!(settings.database.redacted(), "app@db.internal:6543/metrics");
    }

    #[test]
    fn broken_db_config_file_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "connection: [not, a, map]").unwrap();
        let path = file.path().to_string_lossy().to_string();

        let settings = Settings::resolve(lookup_from(&[("DB_CONFIG_FILE", path.as_str())]));
        assert_eq!(settings.database, DbConfig::default());
        assert_eq!(settings.db_source, ConfigSource::Default);
    }
}
