//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `HOST`: 서버 바인딩 주소
//! - `PORT`: 서버 포트 번호
//! - `GATEWAY_TIMEOUT_SECS`: 주문 저장/조회 호출의 제한 시간(초)
//! - `SESSION_TTL_MINUTES`: 방치된 주문 초안을 정리하기까지의 시간(분), 0이면 정리하지 않음
//! - `REAP_INTERVAL_SECS`: 방치된 초안 정리 작업의 실행 주기(초)

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// 애플리케이션 전체에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL (예: "sqlite:data/vcups.db?mode=rwc")
    pub database_url: String,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 8000)
    pub port: u16,
    /// 영속 계층 호출 제한 시간 (기본값: 5초)
    pub gateway_timeout: Duration,
    /// 방치된 초안의 수명. None이면 정리 작업을 띄우지 않습니다. (기본값: 60분)
    pub session_ttl: Option<Duration>,
    /// 정리 작업 실행 주기 (기본값: 60초, 최소 1초)
    pub reap_interval: Duration,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`은 필수이며, 없으면 에러가 발생합니다.
    /// 나머지 설정은 기본값이 있고, 숫자로 파싱할 수 없는 값도 기본값으로 대체됩니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?, // 필수: 없으면 에러
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("PORT", 8000),
            gateway_timeout: Duration::from_secs(parse_or("GATEWAY_TIMEOUT_SECS", 5)),
            session_ttl: session_ttl(parse_or("SESSION_TTL_MINUTES", 60)),
            // 0초 주기는 허용하지 않습니다 (tokio interval 제약)
            reap_interval: Duration::from_secs(parse_or::<u64>("REAP_INTERVAL_SECS", 60).max(1)),
        })
    }
}

/// 분 단위 TTL을 Duration으로 바꿉니다. 0분이면 정리 기능을 끕니다.
fn session_ttl(minutes: u64) -> Option<Duration> {
    (minutes > 0).then(|| Duration::from_secs(minutes.saturating_mul(60)))
}

/// 환경변수를 읽어 T로 파싱합니다. 없거나 파싱에 실패하면 기본값을 사용합니다.
fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_falls_back_on_missing_and_garbage() {
        assert_eq!(parse_or::<u16>("VCUPS_TEST_SURELY_UNSET_VAR", 8000), 8000);

        env::set_var("VCUPS_TEST_GARBAGE_PORT", "not-a-port");
        assert_eq!(parse_or::<u16>("VCUPS_TEST_GARBAGE_PORT", 8000), 8000);

        env::set_var("VCUPS_TEST_GOOD_PORT", "9090");
        assert_eq!(parse_or::<u16>("VCUPS_TEST_GOOD_PORT", 8000), 9090);
    }

    #[test]
    fn test_session_ttl() {
        assert_eq!(session_ttl(0), None);
        assert_eq!(session_ttl(60), Some(Duration::from_secs(3600)));
        // 터무니없이 큰 값도 패닉 없이 포화
        assert_eq!(session_ttl(u64::MAX), Some(Duration::from_secs(u64::MAX)));
    }
}
