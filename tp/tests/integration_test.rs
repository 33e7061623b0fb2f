//! Integration tests for TripPlanner
//!
//! These tests drive the public API end-to-end: plan request, schedule
//! editing, save back into the transcript, and session persistence.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use tripplanner::calendar::DateRangePicker;
use tripplanner::chat::ChatStore;
use tripplanner::config::PlannerConfig;
use tripplanner::drag::{DragController, DragEvent, DragOutcome, DragSource, DropTarget};
use tripplanner::planner::{
    self, ERROR_MESSAGE, HttpPlannerClient, PlanForm, PlanRequest, PlanResponse, PlannerClient, PlannerError,
    SubmitError,
};
use tripplanner::schedule::{Day, Place, ScheduleStore};
use tripplanner::session::{Session, SessionFile};
use tripplanner::sync::{BackupSlot, FileBackup, ItinerarySync};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn form() -> PlanForm {
    let today = date(2025, 6, 1);
    let mut picker = DateRangePicker::new(today);
    let range = picker.click(Default::default(), date(2025, 6, 10));
    let range = picker.click(range, date(2025, 6, 11));
    PlanForm {
        user_input: "서울 2일 여행, 궁궐이랑 시장 위주로".into(),
        region: "서울".into(),
        dates: range,
        ..Default::default()
    }
}

fn seoul() -> PlanResponse {
    PlanResponse {
        text: "서울 일정입니다".into(),
        travel_schedule: vec![
            Day::new(
                "1일차",
                "2025-06-10",
                vec![
                    Place::new("경복궁").with_coords(37.5796, 126.977),
                    Place::new("광장시장"),
                    Place::new("청계천"),
                ],
            ),
            Day::new("2일차", "2025-06-11", vec![Place::new("남산타워").with_coords(37.5512, 126.9882)]),
        ],
    }
}

fn names(store: &ScheduleStore, day: usize) -> Vec<String> {
    store.days()[day].plan.iter().map(|p| p.place.clone()).collect()
}

/// Planner that replays canned responses, then fails
struct StubPlanner {
    responses: Mutex<VecDeque<PlanResponse>>,
}

impl StubPlanner {
    fn new(responses: Vec<PlanResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

#[async_trait]
impl PlannerClient for StubPlanner {
    async fn plan(&self, _request: &PlanRequest) -> Result<PlanResponse, PlannerError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| PlannerError::InvalidResponse("no more responses".into()))
    }
}

/// Serve exactly one HTTP response; the handle yields the raw request
async fn serve_once(status: &'static str, body: String) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
                let len = headers
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= pos + 4 + len {
                    break;
                }
            }
        }
        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        String::from_utf8_lossy(&buf).into_owned()
    });
    (format!("http://{}", addr), handle)
}

// =============================================================================
// Planner Round Trip Tests
// =============================================================================

#[tokio::test]
async fn test_http_planner_populates_store() {
    let body = r#"{"text":"완료","travelSchedule":[{"day":"1일차","date":"2025-06-10","plan":[{"order":7,"place":"경복궁"},{"order":2,"place":"북촌"}]}]}"#;
    let (base_url, server) = serve_once("200 OK", body.to_string()).await;
    let client = HttpPlannerClient::from_config(&PlannerConfig {
        base_url,
        timeout_ms: 5_000,
    })
    .unwrap();

    let mut chats = ChatStore::new();
    let mut store = ScheduleStore::new();
    let pending = planner::submit(&client, &form(), false, &mut chats, &mut store)
        .await
        .expect("plan should succeed");

    let raw = server.await.unwrap();
    assert!(raw.starts_with("POST /v1/plan"));
    assert!(raw.contains(r#""date":"2025-06-10 ~ 2025-06-11""#));
    assert!(raw.contains(r#""travelType":"관광""#));
    assert!(raw.contains(r#""transportation":"자가용""#));

    // Orders come from position, not from the wire
    let orders: Vec<u32> = store.days()[0].plan.iter().map(|p| p.order).collect();
    assert_eq!(orders, vec![1, 2]);
    let msg = chats.chat(&pending.chat_id).unwrap().message(&pending.message_id).unwrap();
    assert_eq!(msg.message, "완료");
    assert_eq!(msg.content, store.snapshot());
}

#[tokio::test]
async fn test_http_error_status_marks_message() {
    let (base_url, server) = serve_once("500 Internal Server Error", r#"{"detail":"boom"}"#.to_string()).await;
    let client = HttpPlannerClient::from_config(&PlannerConfig {
        base_url,
        timeout_ms: 5_000,
    })
    .unwrap();

    let mut chats = ChatStore::new();
    let mut store = ScheduleStore::new();
    store.replace(seoul().travel_schedule);
    let before = store.snapshot();

    let err = planner::submit(&client, &form(), false, &mut chats, &mut store)
        .await
        .unwrap_err();
    server.await.unwrap();

    match err {
        SubmitError::Planner(PlannerError::ApiError { status, ref message }) => {
            assert_eq!(status, 500);
            assert!(message.contains("boom"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(store.snapshot(), before);
    let chat = chats.current_chat().unwrap();
    let reply = chat.messages.last().unwrap();
    assert!(reply.is_error);
    assert!(!reply.is_loading);
    assert_eq!(reply.message, ERROR_MESSAGE);
}

#[tokio::test]
async fn test_invalid_form_sends_nothing() {
    let client = StubPlanner::new(vec![seoul()]);
    let mut chats = ChatStore::new();
    let mut store = ScheduleStore::new();
    let mut incomplete = form();
    incomplete.dates = Default::default();

    let err = planner::submit(&client, &incomplete, false, &mut chats, &mut store)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "여행 기간을 선택해주세요");
    assert!(chats.chats().is_empty());
    assert_eq!(client.responses.lock().unwrap().len(), 1);
}

// =============================================================================
// Edit And Save Tests
// =============================================================================

#[tokio::test]
async fn test_edit_then_save_updates_transcript_and_backup() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let client = StubPlanner::new(vec![seoul()]);
    let mut chats = ChatStore::new();
    let mut store = ScheduleStore::new();
    let pending = planner::submit(&client, &form(), false, &mut chats, &mut store)
        .await
        .unwrap();

    // Drag 청계천 onto the start of day 2, then drop 경복궁 on day 1's end
    let mut drag = DragController::new();
    drag.handle(DragEvent::Start(DragSource { day: 0, place: 2 }), &mut store);
    drag.handle(DragEvent::Over(DropTarget::place(1, 0)), &mut store);
    assert!(drag.is_highlighted(1, Some(0)));
    assert!(matches!(
        drag.handle(DragEvent::Drop(DropTarget::place(1, 0)), &mut store),
        DragOutcome::Moved(_)
    ));
    drag.handle(DragEvent::Start(DragSource { day: 0, place: 0 }), &mut store);
    drag.handle(DragEvent::Drop(DropTarget::day_end(0)), &mut store);
    assert!(!drag.is_dragging());

    assert_eq!(names(&store, 0), vec!["광장시장", "경복궁"]);
    assert_eq!(names(&store, 1), vec!["청계천", "남산타워"]);
    assert!(store.days().iter().all(|d| d.is_normalized()));

    let sync = ItinerarySync::new(FileBackup::new(temp.path().join("backups")));
    let report = sync.save(&store, &mut chats, Utc::now());
    assert!(report.backup_written);
    assert_eq!(report.updated.as_ref().unwrap().message_id, pending.message_id);

    let saved = chats.chat(&pending.chat_id).unwrap().message(&pending.message_id).unwrap();
    assert_eq!(saved.content, store.snapshot());
    let draft = FileBackup::new(temp.path().join("backups"))
        .read("plandl-schedule-draft")
        .unwrap()
        .unwrap();
    assert_eq!(draft.schedule, store.snapshot());

    // Reopening the message brings back the edited schedule
    let mut reopened = ScheduleStore::new();
    assert!(planner::open_itinerary(&mut chats, &pending.chat_id, &pending.message_id, &mut reopened));
    assert_eq!(reopened.snapshot(), store.snapshot());
}

#[tokio::test]
async fn test_save_targets_latest_itinerary_after_follow_up() {
    let mut second = seoul();
    second.travel_schedule.truncate(1);
    let client = StubPlanner::new(vec![seoul(), second]);
    let mut chats = ChatStore::new();
    let mut store = ScheduleStore::new();

    let first = planner::submit(&client, &form(), false, &mut chats, &mut store)
        .await
        .unwrap();
    let follow = PlanForm {
        user_input: "하루로 줄여줘".into(),
        ..Default::default()
    };
    let latest = planner::submit(&client, &follow, true, &mut chats, &mut store)
        .await
        .unwrap();
    assert_eq!(first.chat_id, latest.chat_id);
    assert_eq!(store.len(), 1);

    assert!(store.remove_place(0, 0));
    let sync = ItinerarySync::new(tripplanner::sync::MemoryBackup::new());
    let report = sync.save(&store, &mut chats, Utc::now());
    assert_eq!(report.updated.unwrap().message_id, latest.message_id);

    // The earlier itinerary is untouched and can still be reopened
    let mut older = ScheduleStore::new();
    assert!(planner::open_itinerary(&mut chats, &first.chat_id, &first.message_id, &mut older));
    assert_eq!(older.len(), 2);
    assert_eq!(older.total_places(), 4);
}

// =============================================================================
// Session Tests
// =============================================================================

#[tokio::test]
async fn test_session_survives_restart() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let file = SessionFile::new(temp.path().join("session.json"));
    let client = StubPlanner::new(vec![seoul()]);

    let (mut chats, mut store) = file.load().unwrap().into_stores(&[]);
    planner::submit(&client, &form(), false, &mut chats, &mut store)
        .await
        .unwrap();
    assert!(store.set_day_color("#000000", 1));
    file.save(&Session::from_stores(chats.clone(), &store)).unwrap();

    let (chats2, store2) = file.load().unwrap().into_stores(&[]);
    assert_eq!(chats2, chats);
    assert_eq!(store2.snapshot(), store.snapshot());
    assert_eq!(store2.color_for_day(1), "#000000");

    let markers = store2.markers();
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[1].name, "남산타워");
    assert_eq!(markers[1].color, "#000000");
}
