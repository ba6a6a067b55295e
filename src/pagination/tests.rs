//! Tests for pagination module

use super::*;
use crate::error::{Error, ErrorKind};
use crate::fetcher::{CursorRequest, OpenedCursor, Page, RecordsRequest};
use crate::query::Query;
use crate::types::{JsonObject, Record, RecordId, SortKey};
use pretty_assertions::assert_eq;

fn records(ids: impl IntoIterator<Item = u64>) -> Vec<Record> {
    ids.into_iter()
        .map(|id| Record {
            id: RecordId(id),
            fields: JsonObject::new(),
        })
        .collect()
}

fn records_request(request: PageRequest) -> RecordsRequest {
    match request {
        PageRequest::Records(request) => request,
        other => panic!("Expected Records, got {other:?}"),
    }
}

// ============================================================================
// StrategyKind Tests
// ============================================================================

#[test]
fn test_strategy_kind_parse() {
    assert_eq!("id".parse::<StrategyKind>().unwrap(), StrategyKind::IdThreshold);
    assert_eq!("Cursor".parse::<StrategyKind>().unwrap(), StrategyKind::Cursor);
    assert_eq!("offset".parse::<StrategyKind>().unwrap(), StrategyKind::Offset);
    assert!("page".parse::<StrategyKind>().is_err());
    assert_eq!(StrategyKind::IdThreshold.to_string(), "id");
}

// ============================================================================
// FetchState Tests
// ============================================================================

#[test]
fn test_fetch_state_push_page() {
    let mut state = FetchState::new(Continuation::IdThreshold {
        last_seen: RecordId::ZERO,
    });
    assert!(state.records.is_empty());
    assert_eq!(state.pages, 0);

    state.push_page(records(1..=3));
    state.push_page(records(4..=5));
    assert_eq!(state.records.len(), 5);
    assert_eq!(state.pages, 2);
    assert!(!state.done);

    state.mark_done();
    assert!(state.done);
    assert!(state.cursor_handle().is_none());
}

// ============================================================================
// CursorHandle Tests
// ============================================================================

#[test]
fn test_cursor_handle_expiry() {
    let opened = OpenedCursor {
        id: "c".to_string(),
        total_count: Some(3),
    };

    let live = CursorHandle::new(opened.clone(), chrono::Duration::minutes(10));
    assert!(!live.is_expired());
    assert_eq!(live.total_count, Some(3));

    let dead = CursorHandle::new(opened, chrono::Duration::seconds(-1));
    assert!(dead.is_expired());
}

#[test]
fn test_cursor_handle_touch_extends_deadline() {
    let mut handle = CursorHandle::new(
        OpenedCursor {
            id: "c".to_string(),
            total_count: None,
        },
        chrono::Duration::minutes(10),
    );
    let before = handle.expires_at();
    handle.touch();
    assert!(handle.expires_at() >= before);
}

// ============================================================================
// IdThresholdPaginator Tests
// ============================================================================

#[test]
fn test_id_first_request() {
    let paginator = IdThresholdPaginator::default();
    let query = Query::new().filter("status in (\"open\")").fields(["title"]);

    let state = paginator.initial_state(&query).unwrap();
    let request = records_request(paginator.next_request("3", &query, &state).unwrap());

    assert_eq!(
        request,
        RecordsRequest {
            app: "3".to_string(),
            query: "(status in (\"open\")) and $id > 0 order by $id asc limit 500".to_string(),
            fields: Some(vec!["title".to_string(), "$id".to_string()]),
        }
    );
}

#[test]
fn test_id_start_after() {
    let paginator = IdThresholdPaginator::new(100).start_after(RecordId(41));
    let query = Query::new();

    let state = paginator.initial_state(&query).unwrap();
    let request = records_request(paginator.next_request("3", &query, &state).unwrap());
    assert_eq!(request.query, "$id > 41 order by $id asc limit 100");
    assert_eq!(request.fields, None);
}

#[test]
fn test_id_full_page_advances_threshold() {
    let paginator = IdThresholdPaginator::new(3);
    let query = Query::new();
    let mut state = paginator.initial_state(&query).unwrap();

    paginator
        .process_response(PageResponse::Page(Page::new(records([2, 5, 9]))), &mut state)
        .unwrap();
    assert!(!state.done);
    assert_eq!(
        state.continuation,
        Continuation::IdThreshold {
            last_seen: RecordId(9)
        }
    );

    let request = records_request(paginator.next_request("3", &query, &state).unwrap());
    assert_eq!(request.query, "$id > 9 order by $id asc limit 3");

    paginator
        .process_response(PageResponse::Page(Page::new(records([10]))), &mut state)
        .unwrap();
    assert!(state.done);
    assert_eq!(state.records.len(), 4);
    assert_eq!(state.pages, 2);
}

#[test]
fn test_id_empty_page_finishes() {
    let paginator = IdThresholdPaginator::new(3);
    let mut state = paginator.initial_state(&Query::new()).unwrap();

    paginator
        .process_response(PageResponse::Page(Page::new(vec![])), &mut state)
        .unwrap();
    assert!(state.done);
    assert!(state.records.is_empty());
}

#[test]
fn test_id_rejects_non_increasing_ids() {
    let paginator = IdThresholdPaginator::new(2).start_after(RecordId(10));
    let mut state = paginator.initial_state(&Query::new()).unwrap();

    let err = paginator
        .process_response(PageResponse::Page(Page::new(records([4, 7]))), &mut state)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[test]
fn test_id_accepts_explicit_ascending_id_sort() {
    let paginator = IdThresholdPaginator::default();
    assert!(paginator
        .initial_state(&Query::new().sort(SortKey::asc("$id")))
        .is_ok());
}

#[test]
fn test_id_rejects_other_sorts() {
    let paginator = IdThresholdPaginator::default();

    let err = paginator
        .initial_state(&Query::new().sort(SortKey::desc("$id")))
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));

    let err = paginator
        .initial_state(&Query::new().sort(SortKey::asc("updated")))
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
}

#[test]
fn test_id_rejects_limit_and_offset() {
    let paginator = IdThresholdPaginator::default();
    assert!(paginator.initial_state(&Query::new().limit(5)).is_err());
    assert!(paginator.initial_state(&Query::new().offset(5)).is_err());
}

#[test]
fn test_page_size_bounds() {
    let query = Query::new();
    assert!(IdThresholdPaginator::new(0).initial_state(&query).is_err());
    assert!(IdThresholdPaginator::new(501).initial_state(&query).is_err());
    assert!(CursorPaginator::new(0).initial_state(&query).is_err());
    assert!(OffsetPaginator::new(501).initial_state(&query).is_err());
    assert!(OffsetPaginator::new(1).initial_state(&query).is_ok());
}

#[test]
fn test_id_custom_field() {
    let paginator = IdThresholdPaginator::new(10).with_id_field("レコード番号");
    let query = Query::new().fields(["title"]);
    let state = paginator.initial_state(&query).unwrap();
    let request = records_request(paginator.next_request("1", &query, &state).unwrap());

    assert_eq!(
        request.query,
        "レコード番号 > 0 order by レコード番号 asc limit 10"
    );
    assert_eq!(
        request.fields,
        Some(vec!["title".to_string(), "レコード番号".to_string()])
    );
}

// ============================================================================
// CursorPaginator Tests
// ============================================================================

#[test]
fn test_cursor_open_then_advance() {
    let paginator = CursorPaginator::new(2);
    let query = Query::new()
        .filter("a = 1")
        .sort(SortKey::desc("updated"))
        .fields(["title"]);
    let mut state = paginator.initial_state(&query).unwrap();

    let request = paginator.next_request("8", &query, &state).unwrap();
    assert_eq!(
        request,
        PageRequest::OpenCursor(CursorRequest {
            app: "8".to_string(),
            query: "a = 1 order by updated desc".to_string(),
            fields: Some(vec!["title".to_string(), "$id".to_string()]),
            size: 2,
        })
    );

    paginator
        .process_response(
            PageResponse::CursorOpened(OpenedCursor {
                id: "c-1".to_string(),
                total_count: Some(3),
            }),
            &mut state,
        )
        .unwrap();
    assert_eq!(state.pages, 0);
    assert_eq!(state.cursor_handle().map(|h| h.id.as_str()), Some("c-1"));

    let request = paginator.next_request("8", &query, &state).unwrap();
    assert_eq!(
        request,
        PageRequest::CursorPage {
            cursor_id: "c-1".to_string()
        }
    );

    paginator
        .process_response(
            PageResponse::Page(Page {
                records: records([1, 2]),
                continuation: Some("c-1".to_string()),
            }),
            &mut state,
        )
        .unwrap();
    assert!(!state.done);

    paginator
        .process_response(PageResponse::Page(Page::new(records([3]))), &mut state)
        .unwrap();
    assert!(state.done);
    assert_eq!(state.records.len(), 3);
    assert_eq!(state.pages, 2);
}

#[test]
fn test_cursor_expired_handle_fails_locally() {
    let paginator = CursorPaginator::new(2).with_idle_lifetime(chrono::Duration::seconds(-1));
    let query = Query::new();
    let mut state = paginator.initial_state(&query).unwrap();

    paginator
        .process_response(
            PageResponse::CursorOpened(OpenedCursor {
                id: "c-1".to_string(),
                total_count: None,
            }),
            &mut state,
        )
        .unwrap();

    let err = paginator.next_request("8", &query, &state).unwrap_err();
    assert!(err.is_cursor_expired());
}

#[test]
fn test_cursor_lifetime_past_calendar_range_saturates() {
    let paginator =
        CursorPaginator::new(2).with_idle_lifetime(chrono::Duration::days(365 * 1_000_000));
    let query = Query::new();
    let mut state = paginator.initial_state(&query).unwrap();

    paginator
        .process_response(
            PageResponse::CursorOpened(OpenedCursor {
                id: "c-1".to_string(),
                total_count: None,
            }),
            &mut state,
        )
        .unwrap();

    let handle = state.cursor_handle().unwrap();
    assert!(!handle.is_expired());
    assert_eq!(handle.expires_at(), chrono::DateTime::<chrono::Utc>::MAX_UTC);
}

#[test]
fn test_cursor_page_before_open_is_rejected() {
    let paginator = CursorPaginator::default();
    let mut state = paginator.initial_state(&Query::new()).unwrap();

    let err = paginator
        .process_response(PageResponse::Page(Page::new(records([1]))), &mut state)
        .unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}

#[test]
fn test_cursor_rejects_limit() {
    let err = CursorPaginator::default()
        .initial_state(&Query::new().limit(10))
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
}

// ============================================================================
// OffsetPaginator Tests
// ============================================================================

#[test]
fn test_offset_projection_keeps_id_field() {
    let paginator = OffsetPaginator::new(2).with_id_field("レコード番号");
    let query = Query::new().fields(["title"]);
    let state = paginator.initial_state(&query).unwrap();
    let request = records_request(paginator.next_request("1", &query, &state).unwrap());

    assert_eq!(
        request.fields,
        Some(vec!["title".to_string(), "レコード番号".to_string()])
    );

    let query = Query::new();
    let request = records_request(paginator.next_request("1", &query, &state).unwrap());
    assert_eq!(request.fields, None);
}

#[test]
fn test_offset_unbounded_paging() {
    let paginator = OffsetPaginator::new(2);
    let query = Query::new().sort(SortKey::asc("$id"));
    let mut state = paginator.initial_state(&query).unwrap();

    let request = records_request(paginator.next_request("1", &query, &state).unwrap());
    assert_eq!(request.query, "order by $id asc limit 2 offset 0");

    paginator
        .process_response(PageResponse::Page(Page::new(records([1, 2]))), &mut state)
        .unwrap();
    assert!(!state.done);

    let request = records_request(paginator.next_request("1", &query, &state).unwrap());
    assert_eq!(request.query, "order by $id asc limit 2 offset 2");

    paginator
        .process_response(PageResponse::Page(Page::new(records([3]))), &mut state)
        .unwrap();
    assert!(state.done);
    assert_eq!(
        state.continuation,
        Continuation::Offset {
            offset: 3,
            remaining: None
        }
    );
}

#[test]
fn test_offset_limit_shrinks_page() {
    let paginator = OffsetPaginator::default();
    let query = Query::new().limit(50).offset(20);
    let mut state = paginator.initial_state(&query).unwrap();

    let request = records_request(paginator.next_request("1", &query, &state).unwrap());
    assert_eq!(request.query, "limit 50 offset 20");

    paginator
        .process_response(PageResponse::Page(Page::new(records(21..=70))), &mut state)
        .unwrap();
    assert!(state.done);
    assert_eq!(state.records.len(), 50);
}

#[test]
fn test_offset_limit_across_pages() {
    let paginator = OffsetPaginator::new(3);
    let query = Query::new().limit(5);
    let mut state = paginator.initial_state(&query).unwrap();

    paginator
        .process_response(PageResponse::Page(Page::new(records(1..=3))), &mut state)
        .unwrap();
    assert!(!state.done);

    let request = records_request(paginator.next_request("1", &query, &state).unwrap());
    assert_eq!(request.query, "limit 2 offset 3");

    paginator
        .process_response(PageResponse::Page(Page::new(records(4..=5))), &mut state)
        .unwrap();
    assert!(state.done);
    assert_eq!(state.records.len(), 5);
}

#[test]
fn test_offset_oversized_page_is_truncated() {
    let paginator = OffsetPaginator::new(3);
    let query = Query::new().limit(2);
    let mut state = paginator.initial_state(&query).unwrap();

    paginator
        .process_response(PageResponse::Page(Page::new(records(1..=3))), &mut state)
        .unwrap();
    assert!(state.done);
    assert_eq!(state.records.len(), 2);
}

#[test]
fn test_offset_zero_limit_is_done_immediately() {
    let state = OffsetPaginator::default()
        .initial_state(&Query::new().limit(0))
        .unwrap();
    assert!(state.done);
}

#[test]
fn test_offset_max_offset() {
    let paginator = OffsetPaginator::new(2).with_max_offset(3);

    let err = paginator
        .initial_state(&Query::new().offset(4))
        .unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));

    let query = Query::new();
    let mut state = paginator.initial_state(&query).unwrap();
    paginator
        .process_response(PageResponse::Page(Page::new(records(1..=2))), &mut state)
        .unwrap();
    paginator
        .process_response(PageResponse::Page(Page::new(records(3..=4))), &mut state)
        .unwrap();

    let err = paginator.next_request("1", &query, &state).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_offset_rejects_cursor_response() {
    let paginator = OffsetPaginator::default();
    let mut state = paginator.initial_state(&Query::new()).unwrap();

    let err = paginator
        .process_response(
            PageResponse::CursorOpened(OpenedCursor {
                id: "c".to_string(),
                total_count: None,
            }),
            &mut state,
        )
        .unwrap_err();
    assert!(matches!(err, Error::Decode { .. }));
}
