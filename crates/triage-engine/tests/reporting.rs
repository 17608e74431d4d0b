// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Statistics, weekly reports, history backfill and raw platform events.

use triage_core::{
    ActionDirective, Reaction, Reply, Thread, ThreadKind, ThreadStatus, TriageError, User,
};
use triage_engine::event::{RawItem, RawMessage};
use triage_engine::{Event, RawEvent};
use triage_test_utils::{TestHarness, BOT_USER_ID};

const AUTHOR: &str = "UB210NGRK";
const MEMBER: &str = "UTEAM000001";
const DESIGNEE: &str = "UFIRE000001";
/// 2026-10-12 00:00:00 UTC.
const LAST_MONDAY: f64 = 1_791_763_200.0;
/// 2026-10-05 00:00:00 UTC.
const MONDAY_BEFORE: f64 = 1_791_158_400.0;

fn ts(epoch: f64) -> String {
    format!("{epoch:.6}")
}

fn user_thread(epoch: f64, status: ThreadStatus) -> Thread {
    let mut thread = Thread::new(ts(epoch), User::new(AUTHOR, "author"), "question");
    thread.kind = ThreadKind::User;
    thread.status = status;
    thread
}

async fn seeded() -> TestHarness {
    let h = TestHarness::builder().with_member(MEMBER).build().await;

    let mut fixed = user_thread(LAST_MONDAY + 1000.0, ThreadStatus::Fixed);
    fixed.reactions.push(Reaction::default());
    fixed.resolution_time = Some(30.0);
    h.store.insert_thread(fixed).await;

    let mut responded = user_thread(LAST_MONDAY + 2000.0, ThreadStatus::Responded);
    responded.replies.push(Reply::default());
    responded.response_time = Some(12.0);
    h.store.insert_thread(responded).await;

    h.store
        .insert_thread(user_thread(LAST_MONDAY + 3000.0, ThreadStatus::Unresponded))
        .await;

    let mut team = user_thread(LAST_MONDAY + 4000.0, ThreadStatus::Unresponded);
    team.kind = ThreadKind::Team;
    h.store.insert_thread(team).await;

    let mut designee = Thread::new(ts(LAST_MONDAY + 50.0), User::new(DESIGNEE, ""), "topic");
    designee.kind = ThreadKind::Topic;
    h.store.insert_thread(designee).await;

    h.store
        .insert_thread(user_thread(MONDAY_BEFORE + 100.0, ThreadStatus::Fixed))
        .await;
    h
}

#[tokio::test]
async fn analyse_aggregates_user_threads_only() {
    let h = seeded().await;
    let stats = h.engine.analyse("2026-10-12", "2026-10-19").await.unwrap();
    assert_eq!(stats.threads.len(), 3);
    assert_eq!(stats.designees.len(), 1);
    assert_eq!(stats.response_time, 12.0);
    assert_eq!(stats.resolution_time, 30.0);
    assert_eq!(stats.resolution_rate, 33);
}

#[tokio::test]
async fn report_compares_with_previous_week() {
    let h = seeded().await;
    let directives = h
        .handle(Event::Report {
            start: "2026-10-12".into(),
            end: "2026-10-19".into(),
        })
        .await
        .unwrap();

    let [ActionDirective::PostToChannel { text, blocks }] = &directives[..] else {
        panic!("unexpected directives {directives:?}");
    };
    assert_eq!(text, "Report");
    let fields = blocks[1]["fields"].as_array().unwrap();
    assert_eq!(fields[0]["text"], "*Messages:*\n3 messages this week");
    assert_eq!(
        fields[3]["text"],
        "*Messages evolution*\n2 messages more compared to last week"
    );
    assert_eq!(
        fields[4]["text"],
        "*Resolution rate compared to last week*\n-67 %"
    );
    assert_eq!(fields[5]["text"], "*Firemen*\n<@UFIRE000001>");
    assert_eq!(
        blocks[2]["text"]["text"],
        "For more statistics see our *<https://dashboard.test|analytics dashboard>*"
    );
}

#[tokio::test]
async fn malformed_dates_are_rejected_before_store_access() {
    let h = TestHarness::builder().build().await;
    h.store.fail_reads(true);
    for (start, end) in [("2026-13-01", "2026-10-19"), ("2026-10-19", "2026-10-12")] {
        let err = h
            .handle(Event::Report {
                start: start.into(),
                end: end.into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, TriageError::Validation(_)), "{start}..{end}");
    }
}

#[tokio::test]
async fn analyse_propagates_read_failures() {
    let h = TestHarness::builder().build().await;
    h.store.fail_reads(true);
    let err = h.engine.analyse("2026-10-12", "2026-10-19").await.unwrap_err();
    assert!(matches!(err, TriageError::StoreRead { .. }));
}

fn history_message(ts: &str, user: &str, text: &str) -> RawEvent {
    RawEvent {
        event_type: "message".into(),
        user: user.into(),
        text: text.into(),
        ts: ts.into(),
        thread_ts: Some(ts.into()),
        ..RawEvent::default()
    }
}

#[tokio::test]
async fn backfill_rebuilds_history_without_reminders() {
    let h = TestHarness::builder().with_member(MEMBER).build().await;
    h.store
        .insert_thread(user_thread(5000.0, ThreadStatus::Unresponded))
        .await;

    let mut answered = history_message("1000.000000", AUTHOR, "vault ?");
    answered.replies = vec![
        Reply {
            author: User::new(BOT_USER_ID, ""),
            ts: "1001.000000".into(),
            thread_ts: "1000.000000".into(),
            ..Reply::default()
        },
        Reply {
            author: User::new(MEMBER, ""),
            ts: "1300.000000".into(),
            thread_ts: "1000.000000".into(),
            ..Reply::default()
        },
    ];
    answered.reactions = vec![Reaction {
        name: "heavy_check_mark".into(),
        ts: "2200.000000".into(),
        message_ts: "1000.000000".into(),
        users: vec![MEMBER.into()],
        count: 1,
    }];

    let mut join = history_message("1500.000000", AUTHOR, "a rejoint le canal");
    join.subtype = Some("channel_join".into());

    let events = vec![
        answered,
        history_message("2000.000000", MEMBER, "maintenance ce soir"),
        join,
        history_message(
            "3000.000000",
            MEMBER,
            "<@UTEAM000001> set the channel topic: pompier <@UFIRE000001>",
        ),
        history_message("5000.000000", AUTHOR, "changed"),
    ];

    let directives = h.handle(Event::Backfill { events }).await.unwrap();
    assert_eq!(directives, vec![ActionDirective::NoOp]);
    assert_eq!(h.store.write_count(), 3);

    let answered = h.store.thread("1000.000000").await.unwrap();
    assert_eq!(answered.kind, ThreadKind::User);
    assert_eq!(answered.status, ThreadStatus::Fixed);
    assert_eq!(answered.response_time, Some(5.0));
    assert_eq!(answered.resolution_time, Some(20.0));
    assert_eq!(answered.remind_at, None);
    assert!(answered.replies[0].from_bot);

    assert_eq!(
        h.store.thread("2000.000000").await.unwrap().kind,
        ThreadKind::Team
    );
    assert!(h.store.thread("1500.000000").await.is_none());
    assert_eq!(
        h.store.thread("3000.000000").await.unwrap().author.id,
        DESIGNEE
    );
    assert_eq!(h.store.thread("5000.000000").await.unwrap().text, "question");
}

#[tokio::test]
async fn raw_events_flow_through_classification() {
    let h = TestHarness::builder().with_member(MEMBER).build().await;

    let question = RawEvent {
        event_type: "message".into(),
        user: AUTHOR.into(),
        text: "Bonjour".into(),
        ts: "1792368060.000000".into(),
        ..RawEvent::default()
    };
    let directives = h.handle_raw(question).await.unwrap();
    assert_eq!(directives[0].text(), Some("Merci pour ton message."));

    let bot_post = RawEvent {
        event_type: "message".into(),
        user: BOT_USER_ID.into(),
        text: "annonce".into(),
        ts: "1792368070.000000".into(),
        ..RawEvent::default()
    };
    assert_eq!(
        h.handle_raw(bot_post).await.unwrap(),
        vec![ActionDirective::NoOp]
    );

    let answer = RawEvent {
        event_type: "message".into(),
        user: MEMBER.into(),
        text: "regarde ta config".into(),
        ts: "1792368360.000000".into(),
        thread_ts: Some("1792368060.000000".into()),
        ..RawEvent::default()
    };
    h.handle_raw(answer).await.unwrap();

    let edit = RawEvent {
        event_type: "message".into(),
        subtype: Some("message_changed".into()),
        ts: "1792368400.000000".into(),
        message: Some(RawMessage {
            user: AUTHOR.into(),
            text: "Bonjour, vault est cassé".into(),
            ts: "1792368060.000000".into(),
            ..RawMessage::default()
        }),
        ..RawEvent::default()
    };
    h.handle_raw(edit).await.unwrap();

    let removed = RawEvent {
        event_type: "reaction_removed".into(),
        user: MEMBER.into(),
        reaction: Some("heavy_check_mark".into()),
        item: Some(RawItem {
            ts: "1792368060.000000".into(),
        }),
        ..RawEvent::default()
    };
    let writes = h.store.write_count();
    assert_eq!(
        h.handle_raw(removed).await.unwrap(),
        vec![ActionDirective::NoOp]
    );
    assert_eq!(h.store.write_count(), writes);

    let thread = h.store.thread("1792368060.000000").await.unwrap();
    assert_eq!(thread.text, "Bonjour, vault est cassé");
    assert_eq!(thread.status, ThreadStatus::Responded);
    assert_eq!(thread.response_time, Some(5.0));
}
