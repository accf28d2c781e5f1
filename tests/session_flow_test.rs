use std::sync::Arc;

use assessment_engine::{
    backend::{LocalBackend, SessionBackend},
    dto::assessment_dto::{CreateQuestionPayload, CreateTestPayload},
    error::Error,
    models::{question::QuestionType, submission::SubmissionFilter},
    services::{question_service::QuestionService, test_service::TestService},
    session::{
        engine::SaveStatus, SessionContext, SessionPhase, SessionRunner, SessionSettings,
        SubmissionLifecycle,
    },
    storage::{open_store, DataStore},
    widgets::Widget,
};
use uuid::Uuid;

struct Scenario {
    store: DataStore,
    ctx: SessionContext,
    q1: String,
    q2: String,
}

/// Two questions (single-choice "B" for 10 points, fill-blank "def" for 5
/// points) in a one-minute test.
async fn scenario() -> Scenario {
    let dir = std::env::temp_dir().join(format!("assessment-session-{}", Uuid::new_v4()));
    let store = open_store(&dir, false).await.expect("open store");

    let questions = QuestionService::new(store.questions.clone());
    let q1 = questions
        .create_question(CreateQuestionPayload {
            question_type: QuestionType::SingleChoice,
            title: "Letters".into(),
            prompt: "Pick the second letter".into(),
            options: Some(vec!["A".into(), "B".into(), "C".into()]),
            expected_answer: Some("B".into()),
            code_template: None,
            language: None,
            points: 10,
            time_limit_seconds: None,
        })
        .await
        .expect("q1");
    let q2 = questions
        .create_question(CreateQuestionPayload {
            question_type: QuestionType::FillBlank,
            title: "Keyword".into(),
            prompt: "Python functions start with _____".into(),
            options: None,
            expected_answer: Some("def".into()),
            code_template: None,
            language: None,
            points: 5,
            time_limit_seconds: None,
        })
        .await
        .expect("q2");

    let test = TestService::new(store.tests.clone(), store.questions.clone())
        .create_test(CreateTestPayload {
            title: "Quick check".into(),
            description: String::new(),
            question_ids: vec![q1.id.clone(), q2.id.clone()],
            time_limit_minutes: 1,
            is_active: None,
        })
        .await
        .expect("test");
    assert_eq!(test.total_points, 15);

    Scenario {
        ctx: SessionContext::new("c1", test.id),
        store,
        q1: q1.id,
        q2: q2.id,
    }
}

fn lifecycle(store: &DataStore) -> (SubmissionLifecycle, Arc<LocalBackend>) {
    let backend = Arc::new(LocalBackend::new(store));
    (SubmissionLifecycle::new(backend.clone()), backend)
}

#[tokio::test(start_paused = true)]
async fn manual_submit_scores_answers_and_time_spent() {
    let s = scenario().await;
    let (lifecycle, backend) = lifecycle(&s.store);
    let (mut handle, task) = SessionRunner::start(lifecycle, s.ctx.clone(), SessionSettings::default())
        .await
        .expect("start");

    handle.set_answer(&s.q1, "B".into()).unwrap();
    handle.set_answer(&s.q2, "DEF".into()).unwrap();
    handle.wait_for(|snap| snap.remaining_seconds == 15).await.unwrap();

    let submission = handle.submit().await.expect("submit");
    assert!(submission.is_completed);
    assert_eq!(submission.total_score, Some(15));
    assert_eq!(submission.max_score, 15);
    assert_eq!(submission.time_spent_seconds, Some(45));
    assert!(submission.end_time.is_some());

    task.await.unwrap();
    let snap = handle.snapshot();
    assert_eq!(snap.phase, SessionPhase::Completed);
    assert_eq!(snap.score.map(|score| score.percentage()), Some(100));

    let stored = backend
        .list_submissions(&SubmissionFilter::for_pair("c1", &s.ctx.test_id))
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].total_score, Some(15));
}

#[tokio::test(start_paused = true)]
async fn timer_expiry_finalizes_with_full_time() {
    let s = scenario().await;
    let (lifecycle, backend) = lifecycle(&s.store);
    let (mut handle, task) = SessionRunner::start(lifecycle, s.ctx.clone(), SessionSettings::default())
        .await
        .expect("start");

    handle.set_answer(&s.q1, "B".into()).unwrap();
    let snap = handle
        .wait_for(|snap| snap.phase == SessionPhase::Completed)
        .await
        .unwrap();
    assert_eq!(snap.remaining_seconds, 0);
    task.await.unwrap();

    let stored = backend
        .list_submissions(&SubmissionFilter::for_pair("c1", &s.ctx.test_id))
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    let submission = &stored[0];
    assert!(submission.is_completed);
    assert_eq!(submission.total_score, Some(10));
    assert_eq!(submission.time_spent_seconds, Some(60));

    assert!(matches!(handle.set_answer(&s.q2, "def".into()), Err(Error::InvalidState(_))));
}

#[tokio::test(start_paused = true)]
async fn resume_restores_saved_answers() {
    let s = scenario().await;

    let (lc, _) = lifecycle(&s.store);
    let (mut handle, task) = SessionRunner::start(lc, s.ctx.clone(), SessionSettings::default())
        .await
        .expect("start");
    let first_id = handle.snapshot().submission_id.clone();

    let mut widget = handle.widget(1).unwrap();
    match &mut widget {
        Widget::FillBlank(w) => {
            assert_eq!(w.prefix(), "Python functions start with ");
            assert!(w.input("def"));
        }
        _ => panic!("expected a fill-blank widget"),
    }
    handle
        .wait_for(|snap| snap.save_status == SaveStatus::Saved)
        .await
        .unwrap();

    // Closing every handle abandons the session and leaves it incomplete.
    drop(widget);
    drop(handle);
    task.await.unwrap();

    let (lc, _) = lifecycle(&s.store);
    let (handle, _task) = SessionRunner::start(lc, s.ctx.clone(), SessionSettings::default())
        .await
        .expect("resume");
    let snap = handle.snapshot();
    assert_eq!(snap.submission_id, first_id);
    assert_eq!(snap.answers.get(&s.q2).and_then(|a| a.as_text()), Some("def"));
    assert_eq!(snap.remaining_seconds, 60);
    assert_eq!(snap.current_index, 0);

    let restored = handle.widget(1).unwrap();
    assert_eq!(restored.value(), Some("def".into()));
}

#[tokio::test]
async fn rapid_double_start_leaves_one_incomplete_submission() {
    let s = scenario().await;
    let (lc, backend) = lifecycle(&s.store);
    let other = lc.clone();

    let (a, b) = tokio::join!(lc.start_or_resume(&s.ctx, 15), other.start_or_resume(&s.ctx, 15));
    assert_eq!(a.unwrap().id, b.unwrap().id);

    let incomplete: Vec<_> = backend
        .list_submissions(&SubmissionFilter::for_pair("c1", &s.ctx.test_id))
        .await
        .unwrap()
        .into_iter()
        .filter(|sub| !sub.is_completed)
        .collect();
    assert_eq!(incomplete.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn concurrent_submit_completes_once() {
    let s = scenario().await;
    let (lifecycle, backend) = lifecycle(&s.store);
    let (handle, task) = SessionRunner::start(lifecycle, s.ctx.clone(), SessionSettings::default())
        .await
        .expect("start");

    handle.set_answer(&s.q1, "A".into()).unwrap();
    let (a, b) = tokio::join!(handle.submit(), handle.submit());
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(a, b);
    assert_eq!(a.total_score, Some(0));
    task.await.unwrap();

    let stored = backend
        .list_submissions(&SubmissionFilter::for_pair("c1", &s.ctx.test_id))
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert!(stored[0].is_completed);
}

#[tokio::test]
async fn missing_test_and_empty_test_fail_differently() {
    let s = scenario().await;
    let (lc, _) = lifecycle(&s.store);

    let missing = SessionRunner::start(
        lc.clone(),
        SessionContext::new("c1", "no-such-test"),
        SessionSettings::default(),
    )
    .await;
    assert!(matches!(missing, Err(Error::NotFound(_))));

    QuestionService::new(s.store.questions.clone())
        .delete_question(&s.q1)
        .await
        .unwrap();
    QuestionService::new(s.store.questions.clone())
        .delete_question(&s.q2)
        .await
        .unwrap();
    let empty = SessionRunner::start(lc, s.ctx.clone(), SessionSettings::default()).await;
    assert!(matches!(empty, Err(Error::TestConfiguration(_))));
}

#[tokio::test(start_paused = true)]
async fn untouched_ordered_list_in_authored_order_scores() {
    let dir = std::env::temp_dir().join(format!("assessment-session-{}", Uuid::new_v4()));
    let store = open_store(&dir, true).await.expect("open store");
    let (lc, _) = lifecycle(&store);
    let (mut handle, task) = SessionRunner::start(lc, SessionContext::new("c1", "t1"), SessionSettings::default())
        .await
        .expect("start");

    let index = handle
        .questions()
        .iter()
        .position(|q| q.question_type == QuestionType::OrderedList)
        .expect("seeded ordered-list question");
    let widget = handle.widget(index).unwrap();
    assert!(matches!(widget, Widget::OrderedList(_)));
    drop(widget);

    let snap = handle
        .wait_for(|snap| snap.save_status == SaveStatus::Saved)
        .await
        .unwrap();
    assert_eq!(snap.answered_count, 1);

    let submission = handle.submit().await.expect("submit");
    task.await.unwrap();
    assert_eq!(submission.total_score, Some(10));
}
