//! Request lifecycle: begin -> (async planner call) -> complete
//!
//! `begin` records the user message and a loading placeholder, `complete`
//! resolves the placeholder. The store is only touched in `complete`, and
//! only on success.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{FormError, PlanForm, PlanRequest, PlanResponse, PlannerClient, PlannerError};
use crate::chat::{Chat, ChatStore, Message, MessageUpdate, chat_title};
use crate::schedule::ScheduleStore;

/// Text shown on the assistant message when the planner call fails
pub const ERROR_MESSAGE: &str = "AI 응답 중 오류가 발생했습니다. 다시 시도해주세요";

/// A request whose placeholder message is waiting in the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPlan {
    pub chat_id: String,
    /// Id of the loading assistant message
    pub message_id: String,
    pub request: PlanRequest,
}

/// Why [`submit`] did not produce a schedule
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Planner(#[from] PlannerError),
}

/// Start a new conversation from the form
pub fn begin(form: &PlanForm, chats: &mut ChatStore, now: DateTime<Utc>) -> Result<PendingPlan, FormError> {
    debug!(region = %form.region, "begin: called");
    form.validate()?;

    let chat_id = Uuid::now_v7().to_string();
    let user_id = format!("{}-user", chat_id);
    let loading_id = format!("{}-loading", chat_id);

    let chat = Chat::new(
        chat_id.clone(),
        chat_title(&form.user_input),
        vec![
            Message::user(user_id, form.user_input.trim(), now),
            Message::loading(loading_id.clone(), now),
        ],
        now,
    );
    chats.add_chat(chat);

    Ok(PendingPlan {
        chat_id,
        message_id: loading_id,
        request: form.to_request(),
    })
}

/// Continue the current conversation, or start one if none is selected
pub fn begin_follow_up(form: &PlanForm, chats: &mut ChatStore, now: DateTime<Utc>) -> Result<PendingPlan, FormError> {
    let Some(chat_id) = chats.current_chat_id().map(str::to_string) else {
        debug!("begin_follow_up: no current chat, starting new one");
        return begin(form, chats, now);
    };
    debug!(%chat_id, "begin_follow_up: called");
    form.validate_follow_up()?;

    let id = Uuid::now_v7();
    let loading_id = format!("{}-loading", id);
    chats.push_message(&chat_id, Message::user(format!("{}-user", id), form.user_input.trim(), now), now);
    chats.push_message(&chat_id, Message::loading(loading_id.clone(), now), now);

    Ok(PendingPlan {
        chat_id,
        message_id: loading_id,
        request: form.to_request(),
    })
}

/// Resolve a pending request with the planner's result
///
/// Success fills the placeholder and replaces the schedule; failure marks
/// the placeholder as an error and leaves the schedule alone. The planner
/// error is handed back for the caller to report.
pub fn complete(
    pending: &PendingPlan,
    result: Result<PlanResponse, PlannerError>,
    chats: &mut ChatStore,
    store: &mut ScheduleStore,
) -> Result<(), PlannerError> {
    debug!(chat_id = %pending.chat_id, message_id = %pending.message_id, ok = result.is_ok(), "complete: called");
    match result {
        Ok(response) => {
            store.replace(response.travel_schedule);
            chats.update_message(
                &pending.chat_id,
                &pending.message_id,
                MessageUpdate {
                    message: Some(response.text),
                    content: Some(store.snapshot()),
                    is_loading: Some(false),
                    is_error: Some(false),
                },
            );
            info!(chat_id = %pending.chat_id, days = store.len(), "Planner response applied");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, chat_id = %pending.chat_id, "Planner request failed");
            chats.update_message(
                &pending.chat_id,
                &pending.message_id,
                MessageUpdate {
                    message: Some(ERROR_MESSAGE.to_string()),
                    content: Some(Vec::new()),
                    is_loading: Some(false),
                    is_error: Some(true),
                },
            );
            Err(e)
        }
    }
}

/// Validate, call the planner, apply the result
pub async fn submit(
    client: &dyn PlannerClient,
    form: &PlanForm,
    follow_up: bool,
    chats: &mut ChatStore,
    store: &mut ScheduleStore,
) -> Result<PendingPlan, SubmitError> {
    let now = Utc::now();
    let pending = if follow_up {
        begin_follow_up(form, chats, now)?
    } else {
        begin(form, chats, now)?
    };
    let result = client.plan(&pending.request).await;
    complete(&pending, result, chats, store)?;
    Ok(pending)
}

/// Load the itinerary of a transcript message into the store
///
/// Returns false if the message does not exist or has no itinerary.
pub fn open_itinerary(chats: &mut ChatStore, chat_id: &str, message_id: &str, store: &mut ScheduleStore) -> bool {
    debug!(%chat_id, %message_id, "open_itinerary: called");
    let Some(content) = chats
        .chat(chat_id)
        .and_then(|c| c.message(message_id))
        .filter(|m| !m.content.is_empty())
        .map(|m| m.content.clone())
    else {
        debug!("open_itinerary: no itinerary on message");
        return false;
    };
    chats.set_current(Some(chat_id));
    store.replace(content);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::DateRange;
    use crate::planner::client::mock::MockPlannerClient;
    use crate::schedule::{Day, Place};
    use chrono::NaiveDate;

    fn form() -> PlanForm {
        PlanForm {
            user_input: "부산 먹방 여행 계획을 짜줘".into(),
            region: "부산".into(),
            dates: DateRange::new(
                NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
                NaiveDate::from_ymd_opt(2025, 6, 11).unwrap(),
            ),
            ..Default::default()
        }
    }

    fn response() -> PlanResponse {
        let mut a = Place::new("자갈치시장");
        a.order = 5;
        PlanResponse {
            text: "일정을 만들었어요".into(),
            travel_schedule: vec![
                Day::new("1일차", "2025-06-10", vec![a, Place::new("광안리")]),
                Day::new("2일차", "2025-06-11", vec![Place::new("해동용궁사")]),
            ],
        }
    }

    #[test]
    fn test_begin_creates_chat_with_placeholder() {
        let mut chats = ChatStore::new();
        let pending = begin(&form(), &mut chats, Utc::now()).unwrap();
        let chat = chats.current_chat().unwrap();
        assert_eq!(chat.id, pending.chat_id);
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.messages[0].id, format!("{}-user", pending.chat_id));
        assert!(chat.messages[1].is_loading);
        assert_eq!(pending.request.date, "2025-06-10 ~ 2025-06-11");
    }

    #[test]
    fn test_begin_rejects_invalid_form() {
        let mut chats = ChatStore::new();
        let mut bad = form();
        bad.region.clear();
        assert_eq!(begin(&bad, &mut chats, Utc::now()), Err(FormError::MissingRegion));
        assert!(chats.chats().is_empty());
    }

    #[test]
    fn test_complete_success_replaces_schedule() {
        let mut chats = ChatStore::new();
        let mut store = ScheduleStore::new();
        let pending = begin(&form(), &mut chats, Utc::now()).unwrap();
        complete(&pending, Ok(response()), &mut chats, &mut store).unwrap();

        assert_eq!(store.len(), 2);
        assert!(store.days().iter().all(|d| d.is_normalized()));
        let msg = chats.chat(&pending.chat_id).unwrap().message(&pending.message_id).unwrap();
        assert!(!msg.is_loading);
        assert!(!msg.is_error);
        assert_eq!(msg.message, "일정을 만들었어요");
        assert_eq!(msg.content, store.snapshot());
    }

    #[test]
    fn test_complete_failure_leaves_store_untouched() {
        let mut chats = ChatStore::new();
        let mut store = ScheduleStore::new();
        store.replace(vec![Day::new("기존", "2025-01-01", vec![Place::new("X")])]);
        let before = store.clone();

        let pending = begin(&form(), &mut chats, Utc::now()).unwrap();
        let err = PlannerError::InvalidResponse("bad".into());
        assert!(complete(&pending, Err(err), &mut chats, &mut store).is_err());

        assert_eq!(store, before);
        let msg = chats.chat(&pending.chat_id).unwrap().message(&pending.message_id).unwrap();
        assert!(msg.is_error);
        assert!(!msg.is_loading);
        assert_eq!(msg.message, ERROR_MESSAGE);
        assert!(msg.content.is_empty());
    }

    #[tokio::test]
    async fn test_submit_and_follow_up() {
        let client = MockPlannerClient::new(vec![response()]);
        let mut chats = ChatStore::new();
        let mut store = ScheduleStore::new();

        let first = submit(&client, &form(), false, &mut chats, &mut store).await.unwrap();
        assert_eq!(store.total_places(), 3);

        let mut more = form();
        more.user_input = "둘째 날은 쉬엄쉬엄".into();
        let err = submit(&client, &more, true, &mut chats, &mut store).await.unwrap_err();
        assert!(matches!(err, SubmitError::Planner(_)));

        // Follow-up landed in the same chat; the failed reply did not touch the store
        let chat = chats.chat(&first.chat_id).unwrap();
        assert_eq!(chat.messages.len(), 4);
        assert!(chat.messages[3].is_error);
        assert_eq!(store.total_places(), 3);
        assert_eq!(client.requests()[1].user_input, "둘째 날은 쉬엄쉬엄");
        assert_eq!(chats.latest_itinerary_message(&first.chat_id).unwrap().id, first.message_id);
    }

    #[test]
    fn test_follow_up_needs_only_text() {
        let mut chats = ChatStore::new();
        begin(&form(), &mut chats, Utc::now()).unwrap();
        let text_only = PlanForm {
            user_input: "카페 추가".into(),
            ..Default::default()
        };
        let pending = begin_follow_up(&text_only, &mut chats, Utc::now()).unwrap();
        assert_eq!(chats.current_chat().unwrap().messages.len(), 4);
        assert!(pending.message_id.ends_with("-loading"));

        let empty = PlanForm::default();
        assert_eq!(begin_follow_up(&empty, &mut chats, Utc::now()), Err(FormError::MissingRequest));
    }

    #[test]
    fn test_open_itinerary() {
        let mut chats = ChatStore::new();
        let mut store = ScheduleStore::new();
        let pending = begin(&form(), &mut chats, Utc::now()).unwrap();
        complete(&pending, Ok(response()), &mut chats, &mut store).unwrap();
        store.clear();

        let user_id = format!("{}-user", pending.chat_id);
        assert!(!open_itinerary(&mut chats, &pending.chat_id, &user_id, &mut store));
        assert!(store.is_empty());
        assert!(open_itinerary(&mut chats, &pending.chat_id, &pending.message_id, &mut store));
        assert_eq!(store.len(), 2);
    }
}
