//! # 출력 컨텍스트 유틸리티
//!
//! 플랫폼이 보내는 출력 컨텍스트 이름은 다음과 같은 형태입니다:
//! `projects/<project>/agent/sessions/<session-id>/contexts/<context>`
//!
//! 이 중 `<session-id>` 부분이 대화 세션 ID입니다.

use regex::Regex;
use std::sync::LazyLock;

// LazyLock: 처음 사용할 때 한 번만 정규식을 컴파일합니다.
static SESSION_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/sessions/([^/]+)/contexts/").expect("valid session id pattern"));

/// 컨텍스트 이름에서 세션 ID를 추출합니다. 형식이 맞지 않으면 None.
pub fn extract_session_id(context_name: &str) -> Option<String> {
    SESSION_ID_PATTERN
        .captures(context_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_session_segment() {
        let name = "projects/vcups-chatbot/agent/sessions/7f2c-91ab/contexts/ongoing-order";
        assert_eq!(extract_session_id(name), Some("7f2c-91ab".to_string()));
    }

    #[test]
    fn test_rejects_names_without_session() {
        assert_eq!(extract_session_id("projects/p/agent/contexts/ongoing-order"), None);
        assert_eq!(extract_session_id(""), None);
    }
}
