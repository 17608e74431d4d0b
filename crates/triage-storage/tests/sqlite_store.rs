// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the SQLite thread store.

use triage_core::metrics::Window;
use triage_core::{
    Answer, Pattern, PatternKind, TeamMember, Thread, ThreadKind, ThreadStatus, ThreadStore,
    TriageError, User,
};
use triage_storage::{Database, SqliteThreadStore};

async fn store() -> SqliteThreadStore {
    SqliteThreadStore::from_database(Database::open_in_memory().await.unwrap())
}

fn thread(ts: &str, author: &str, kind: ThreadKind) -> Thread {
    let mut thread = Thread::new(ts, User::new(author, author.to_lowercase()), "help");
    thread.kind = kind;
    thread
}

#[tokio::test]
async fn upsert_then_find_round_trips_document() {
    let store = store().await;
    let mut original = thread("1000.000100", "U1", ThreadKind::User);
    original.tools = vec!["vault".into()];
    original.remind_at = Some(4600);

    let version = store.upsert_thread(&original, None).await.unwrap();
    assert_eq!(version, 1);

    let found = store.find_thread("1000.000100").await.unwrap().unwrap();
    assert_eq!(found.tools, vec!["vault".to_string()]);
    assert_eq!(found.remind_at, Some(4600));
    assert_eq!(found.version, 1);
    assert!(store.find_thread("9.0").await.unwrap().is_none());
}

#[tokio::test]
async fn stale_version_is_rejected() {
    let store = store().await;
    let original = thread("1000.0", "U1", ThreadKind::User);
    store.upsert_thread(&original, Some(0)).await.unwrap();

    let mut first = store.find_thread("1000.0").await.unwrap().unwrap();
    let second = first.clone();

    first.text = "first writer".into();
    assert_eq!(store.upsert_thread(&first, Some(first.version)).await.unwrap(), 2);

    let err = store
        .upsert_thread(&second, Some(second.version))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TriageError::Conflict { expected: 1, found: 2, .. }
    ));
    let stored = store.find_thread("1000.0").await.unwrap().unwrap();
    assert_eq!(stored.text, "first writer");
}

#[tokio::test]
async fn malformed_identity_is_rejected_before_write() {
    let store = store().await;
    let bad = thread("not-a-ts", "U1", ThreadKind::User);
    let err = store.upsert_thread(&bad, None).await.unwrap_err();
    assert!(matches!(err, TriageError::Validation(_)));
}

#[tokio::test]
async fn window_queries_only_return_user_threads() {
    let store = store().await;
    store.upsert_thread(&thread("100.0", "U1", ThreadKind::User), None).await.unwrap();
    store.upsert_thread(&thread("150.0", "T1", ThreadKind::Team), None).await.unwrap();
    store.upsert_thread(&thread("200.0", "U2", ThreadKind::User), None).await.unwrap();
    store.upsert_thread(&thread("300.0", "U3", ThreadKind::User), None).await.unwrap();

    let found = store
        .find_threads_by_window(Window::new(100.0, 200.0).unwrap())
        .await
        .unwrap();
    let ids: Vec<_> = found.iter().map(|t| t.ts.as_str()).collect();
    assert_eq!(ids, vec!["100.0", "200.0"]);
}

#[tokio::test]
async fn reminder_query_skips_closed_and_out_of_window_threads() {
    let store = store().await;
    let now = 10_000;

    let mut due = thread("1.0", "U1", ThreadKind::User);
    due.remind_at = Some(now - 30);
    let mut fixed = thread("2.0", "U2", ThreadKind::User);
    fixed.remind_at = Some(now - 10);
    fixed.status = ThreadStatus::Fixed;
    let mut stale = thread("3.0", "U3", ThreadKind::User);
    stale.remind_at = Some(now - 120);
    let mut future = thread("4.0", "U4", ThreadKind::User);
    future.remind_at = Some(now + 5);
    let mut team = thread("5.0", "T1", ThreadKind::Team);
    team.remind_at = Some(now - 5);
    let cleared = thread("6.0", "U5", ThreadKind::User);

    for t in [&due, &fixed, &stale, &future, &team, &cleared] {
        store.upsert_thread(t, None).await.unwrap();
    }

    let found = store.find_threads_due_for_reminder(now, 60).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].ts, "1.0");
}

#[tokio::test]
async fn recent_by_author_ignores_topic_records() {
    let store = store().await;
    store.upsert_thread(&thread("1000.0", "U1", ThreadKind::User), None).await.unwrap();
    store.upsert_thread(&thread("1010.0", "U1", ThreadKind::Topic), None).await.unwrap();
    store.upsert_thread(&thread("1020.0", "U2", ThreadKind::User), None).await.unwrap();

    let window = Window::trailing(1100.0, 120);
    let recent = store.find_recent_by_author("U1", window).await.unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].ts, "1000.0");
}

#[tokio::test]
async fn roster_membership_follows_admin_changes() {
    let store = store().await;
    assert!(!store.is_team_member("T1").await.unwrap());

    store
        .add_team_member(&TeamMember {
            user_id: "T1".into(),
            name: "alice".into(),
        })
        .await
        .unwrap();
    assert!(store.is_team_member("T1").await.unwrap());
    assert_eq!(store.list_team_members().await.unwrap().len(), 1);

    assert!(store.remove_team_member("T1").await.unwrap());
    assert!(!store.remove_team_member("T1").await.unwrap());
    assert!(!store.is_team_member("T1").await.unwrap());
}

#[tokio::test]
async fn patterns_match_case_insensitively_in_order() {
    let store = store().await;
    for (name, regex) in [("vault", r"\bvault\b"), ("kafka", "kafka")] {
        store
            .add_pattern(&Pattern {
                kind: PatternKind::Tool,
                name: name.into(),
                regex: regex.into(),
            })
            .await
            .unwrap();
    }
    store
        .add_pattern(&Pattern {
            kind: PatternKind::Label,
            name: "rights".into(),
            regex: "droits?|permission".into(),
        })
        .await
        .unwrap();

    let text = "Bonjour, je n'ai pas les droits sur Vault ni sur Kafka";
    assert_eq!(
        store.match_tools(text).await.unwrap(),
        vec!["vault".to_string(), "kafka".to_string()]
    );
    assert_eq!(store.match_labels(text).await.unwrap(), vec!["rights".to_string()]);
    assert!(store.match_tools("rien à voir").await.unwrap().is_empty());
}

#[tokio::test]
async fn invalid_pattern_is_rejected() {
    let store = store().await;
    let err = store
        .add_pattern(&Pattern {
            kind: PatternKind::Tool,
            name: "broken".into(),
            regex: "(unclosed".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TriageError::Validation(_)));
    assert!(store.list_patterns(PatternKind::Tool).await.unwrap().is_empty());
}

#[tokio::test]
async fn answers_match_detected_pair() {
    let store = store().await;
    let id = store
        .add_answer(&Answer {
            tool: "vault".into(),
            label: "rights".into(),
            answer: "As-tu bien vérifié...".into(),
            ..Answer::default()
        })
        .await
        .unwrap();
    store
        .add_answer(&Answer {
            answer: "Précise ton outil".into(),
            feedback: true,
            ..Answer::default()
        })
        .await
        .unwrap();

    let matched = store
        .match_answers(&["vault".into()], &["rights".into()])
        .await
        .unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].id, Some(id));

    let fallback = store.match_answers(&[], &[]).await.unwrap();
    assert_eq!(fallback.len(), 1);
    assert!(fallback[0].feedback);

    assert!(store.remove_answer(id).await.unwrap());
    assert_eq!(store.list_answers().await.unwrap().len(), 1);
}

#[tokio::test]
async fn designees_are_topic_records_in_window() {
    let store = store().await;
    store.upsert_thread(&thread("100.0", "T1", ThreadKind::Topic), None).await.unwrap();
    store.upsert_thread(&thread("200.0", "T2", ThreadKind::Topic), None).await.unwrap();
    store.upsert_thread(&thread("150.0", "U1", ThreadKind::User), None).await.unwrap();

    let designees = store
        .find_designees(Window::new(0.0, 1000.0).unwrap())
        .await
        .unwrap();
    let ids: Vec<_> = designees.iter().map(|t| t.author.id.as_str()).collect();
    assert_eq!(ids, vec!["T1", "T2"]);
}
