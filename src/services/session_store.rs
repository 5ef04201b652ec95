//! # 세션 주문 저장소 (Session Order Store)
//!
//! 대화 세션 ID → 주문 초안(DraftOrder) 매핑을 보관하는 프로세스 전역 상태입니다.
//! 워크플로우는 전역 변수가 아니라 `Arc<dyn SessionStore>`를 주입받아 사용합니다.
//!
//! ## 세션 항목의 수명
//! ```text
//! [없음] merge_items() → 초안 작성 중 → take_and_clear() → [없음]
//!                                    ↘ reap_idle() (오래 방치된 경우)
//! ```
//!
//! ## 동시성
//! `InMemorySessionStore`는 맵 전체를 `tokio::sync::RwLock` 하나로 보호합니다.
//! 모든 변경 연산은 쓰기 락 한 번 안에서 읽기-판단-쓰기를 끝내므로,
//! 같은 세션에 대한 `remove_items`와 `take_and_clear`가 경쟁해도
//! 초안을 관찰하는 쪽은 정확히 하나입니다.
//! 락을 잡은 채로 `.await`하지 않으므로 DB I/O와는 직렬화되지 않습니다.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::models::{DraftOrder, Quantity};

/// `remove_items`의 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalOutcome {
    /// 초안에서 실제로 제거된 항목 (요청 순서)
    pub removed: Vec<String>,
    /// 초안에 없던 항목 (요청 순서)
    pub not_found: Vec<String>,
    /// 제거 후 남은 초안. 세션에 초안이 없었으면 None
    pub remaining: Option<DraftOrder>,
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// 세션의 초안을 반환하고, 없으면 빈 초안을 만들어 등록합니다.
    async fn get_or_create_draft(&self, session_id: &str) -> DraftOrder;

    /// 세션의 초안 스냅샷. 없으면 None (새로 만들지 않음)
    async fn get_draft(&self, session_id: &str) -> Option<DraftOrder>;

    /// 항목들을 초안에 병합하고 병합 후의 초안을 반환합니다.
    /// 같은 항목은 새 수량으로 교체됩니다 (last write wins).
    async fn merge_items(&self, session_id: &str, items: &[(String, Quantity)]) -> DraftOrder;

    /// 요청한 항목들을 초안에서 제거합니다.
    /// 초안이 없는 세션이면 아무것도 바꾸지 않고 모든 항목을 not_found로 보고합니다.
    async fn remove_items(&self, session_id: &str, food_items: &[String]) -> RemovalOutcome;

    /// 초안을 꺼내고 세션 항목을 삭제합니다. 같은 초안을 두 번 꺼낼 수 없습니다.
    async fn take_and_clear(&self, session_id: &str) -> Option<DraftOrder>;

    /// `now - max_idle`보다 오래 건드리지 않은 초안을 삭제하고 삭제한 개수를 반환합니다.
    async fn reap_idle(&self, now: DateTime<Utc>, max_idle: Duration) -> usize;

    /// 현재 초안을 가진 세션 수
    async fn len(&self) -> usize;
}

#[derive(Debug)]
struct SessionEntry {
    draft: DraftOrder,
    last_touched: DateTime<Utc>,
}

impl SessionEntry {
    fn new() -> Self {
        Self {
            draft: DraftOrder::new(),
            last_touched: Utc::now(),
        }
    }

    fn touch(&mut self) {
        self.last_touched = Utc::now();
    }
}

/// 메모리 기반 세션 저장소. 프로세스가 재시작되면 초안은 사라집니다.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get_or_create_draft(&self, session_id: &str) -> DraftOrder {
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .entry(session_id.to_string())
            .or_insert_with(SessionEntry::new);
        entry.touch();
        entry.draft.clone()
    }

    async fn get_draft(&self, session_id: &str) -> Option<DraftOrder> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).map(|entry| entry.draft.clone())
    }

    async fn merge_items(&self, session_id: &str, items: &[(String, Quantity)]) -> DraftOrder {
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .entry(session_id.to_string())
            .or_insert_with(SessionEntry::new);

        for (food_item, quantity) in items {
            entry.draft.merge(food_item, *quantity);
        }
        entry.touch();

        entry.draft.clone()
    }

    async fn remove_items(&self, session_id: &str, food_items: &[String]) -> RemovalOutcome {
        let mut sessions = self.sessions.write().await;

        let Some(entry) = sessions.get_mut(session_id) else {
            return RemovalOutcome {
                removed: Vec::new(),
                not_found: food_items.to_vec(),
                remaining: None,
            };
        };

        let mut removed = Vec::new();
        let mut not_found = Vec::new();
        for food_item in food_items {
            if entry.draft.remove(food_item) {
                removed.push(food_item.clone());
            } else {
                not_found.push(food_item.clone());
            }
        }
        entry.touch();

        RemovalOutcome {
            removed,
            not_found,
            remaining: Some(entry.draft.clone()),
        }
    }

    async fn take_and_clear(&self, session_id: &str) -> Option<DraftOrder> {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id).map(|entry| entry.draft)
    }

    async fn reap_idle(&self, now: DateTime<Utc>, max_idle: Duration) -> usize {
        let Some(cutoff) = now.checked_sub_signed(max_idle) else {
            return 0;
        };
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_touched >= cutoff);
        before - sessions.len()
    }

    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
