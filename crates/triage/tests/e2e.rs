// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests over the real SQLite store, the keyword classifier and
//! the compiled binary.

use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use triage_classifier::ClassifierRegistry;
use triage_config::model::{StorageConfig, TriageConfig};
use triage_core::{
    ActionDirective, Answer, Pattern, PatternKind, Reaction, Reply, TeamMember, Thread,
    ThreadStatus, ThreadStore, User,
};
use triage_engine::{EngineSettings, Event, LifecycleEngine, ManualClock};
use triage_storage::SqliteThreadStore;

const START: f64 = 1_792_368_000.0;
const BOT: &str = "UBOT0000001";
const MEMBER: &str = "UTEAM000001";
const AUTHOR: &str = "UAUTHOR0001";
const THREAD_TS: &str = "1792368060.000000";

fn config(dir: &TempDir) -> TriageConfig {
    let mut config = TriageConfig::default();
    config.service.bot_user_id = BOT.into();
    config.service.dashboard_url = "https://dashboard.test".into();
    config.storage = StorageConfig {
        database_path: dir.path().join("triage.db").to_string_lossy().into_owned(),
        wal_mode: true,
    };
    config
        .classifier
        .keywords
        .labels
        .insert("rights".into(), vec!["droits".into()]);
    config
}

async fn seeded_store(config: &TriageConfig) -> Arc<SqliteThreadStore> {
    let store = SqliteThreadStore::open(&config.storage).await.unwrap();
    store
        .add_team_member(&TeamMember {
            user_id: MEMBER.into(),
            name: "Alice".into(),
        })
        .await
        .unwrap();
    store
        .add_pattern(&Pattern {
            kind: PatternKind::Tool,
            name: "vault".into(),
            regex: r"\bvault\b".into(),
        })
        .await
        .unwrap();
    store
        .add_answer(&Answer {
            id: None,
            tool: "vault".into(),
            label: String::new(),
            answer: "Consulte la doc vault".into(),
            feedback: true,
        })
        .await
        .unwrap();
    Arc::new(store)
}

fn engine(
    config: &TriageConfig,
    store: Arc<SqliteThreadStore>,
    clock: Arc<ManualClock>,
) -> LifecycleEngine {
    let settings = EngineSettings::from_config(config);
    let classifier = ClassifierRegistry::with_builtins()
        .build(&config.classifier, settings.classifier_timeout)
        .unwrap();
    LifecycleEngine::new(store, classifier, settings).with_clock(clock)
}

#[tokio::test]
async fn thread_lifecycle_survives_a_store_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir);
    let store = seeded_store(&config).await;
    let clock = Arc::new(ManualClock::new(START + 60.0));
    let engine = engine(&config, store.clone(), clock.clone());

    let question = Thread::new(THREAD_TS, User::new(AUTHOR, "bob"), "Mon vault refuse mes droits");
    let directives = engine
        .handle(Event::NewMessage { thread: question })
        .await
        .unwrap();
    assert_eq!(directives.len(), 2);
    assert_eq!(
        directives[0].text(),
        Some("Merci pour ton message.\nConsulte la doc vault")
    );
    assert!(matches!(
        &directives[1],
        ActionDirective::ReplyInThread { blocks, .. } if !blocks.is_empty()
    ));

    clock.advance(600.0);
    engine
        .handle(Event::Reply {
            reply: Reply {
                author: User::new(MEMBER, "alice"),
                ts: "1792368660.000000".into(),
                thread_ts: THREAD_TS.into(),
                text: "regarde tes policies".into(),
                from_bot: false,
            },
        })
        .await
        .unwrap();

    clock.advance(1200.0);
    engine
        .handle(Event::Reaction {
            reaction: Reaction {
                name: "heavy_check_mark".into(),
                ts: "1792369860.000000".into(),
                message_ts: THREAD_TS.into(),
                users: vec![AUTHOR.into()],
                count: 1,
            },
        })
        .await
        .unwrap();

    drop(engine);
    Arc::try_unwrap(store).ok().unwrap().close().await.unwrap();

    let reopened = SqliteThreadStore::open(&config.storage).await.unwrap();
    let thread = reopened.find_thread(THREAD_TS).await.unwrap().unwrap();
    assert_eq!(thread.status, ThreadStatus::Fixed);
    assert_eq!(thread.tools, vec!["vault"]);
    assert_eq!(thread.response_time, Some(10.0));
    assert_eq!(thread.resolution_time, Some(30.0));
    assert_eq!(thread.remind_at, None);
    assert!(thread.ai_labels.iter().any(|c| c.name == "rights"));
    assert_eq!(thread.replies.len(), 1);
    reopened.close().await.unwrap();
}

#[tokio::test]
async fn reminder_and_report_run_against_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir);
    let store = seeded_store(&config).await;
    let clock = Arc::new(ManualClock::new(START + 60.0));
    let engine = engine(&config, store, clock.clone());

    let question = Thread::new(THREAD_TS, User::new(AUTHOR, "bob"), "Bonjour");
    engine
        .handle(Event::NewMessage { thread: question })
        .await
        .unwrap();

    clock.advance(Duration::from_secs(3600).as_secs_f64());
    let reminders = engine.handle(Event::ReminderSweep).await.unwrap();
    assert_eq!(reminders[0].text(), Some("Du nouveau l'équipe ?"));

    let report = engine
        .handle(Event::Report {
            start: "2026-10-19".into(),
            end: "2026-10-20".into(),
        })
        .await
        .unwrap();
    match &report[..] {
        [ActionDirective::PostToChannel { text, blocks }] => {
            assert_eq!(text, "Report");
            assert!(!blocks.is_empty());
        }
        other => panic!("unexpected report directives {other:?}"),
    }
}

fn write_config(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("triage.toml");
    let db = dir.path().join("cli.db");
    std::fs::write(
        &path,
        format!(
            "[service]\nbot_user_id = \"{BOT}\"\nlog_level = \"warn\"\n\n[storage]\ndatabase_path = {:?}\n",
            db.to_string_lossy()
        ),
    )
    .unwrap();
    path
}

fn triage(config: &std::path::Path, args: &[&str]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_triage"));
    cmd.arg("--config").arg(config).args(args);
    cmd
}

#[test]
fn cli_manages_roster_and_processes_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(&dir);

    let status = triage(&config, &["team", "add", MEMBER, "--name", "Alice"])
        .status()
        .unwrap();
    assert!(status.success());

    let listed = triage(&config, &["team", "list"]).output().unwrap();
    assert!(listed.status.success());
    assert_eq!(
        String::from_utf8(listed.stdout).unwrap().trim(),
        format!("{MEMBER}\tAlice")
    );

    let question = Thread::new(THREAD_TS, User::new(AUTHOR, "bob"), "Bonjour");
    let line = serde_json::to_string(&Event::NewMessage { thread: question }).unwrap();

    let mut child = triage(&config, &["process"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    {
        let mut stdin = child.stdin.take().unwrap();
        writeln!(stdin, "{line}").unwrap();
        writeln!(stdin, "{{\"event\":\"unknown\"}}").unwrap();
    }
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let directives: Vec<ActionDirective> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(directives.len(), 1);
    assert_eq!(directives[0].text(), Some("Merci pour ton message."));
}

#[test]
fn cli_rejects_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[engine]\nreminder_intervall_secs = 5\n").unwrap();

    let output = triage(&path, &["team", "list"]).output().unwrap();
    assert!(!output.status.success());
}
