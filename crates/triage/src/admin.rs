// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Roster, canned-answer and pattern maintenance commands.

use triage_config::model::TriageConfig;
use triage_core::{Answer, Pattern, TeamMember, TriageError};
use triage_storage::SqliteThreadStore;

use crate::app::open_store;
use crate::{AnswerAction, PatternAction, TeamAction};

pub async fn run_team(config: &TriageConfig, action: TeamAction) -> Result<(), TriageError> {
    let store = open_store(config).await?;
    for line in team(&store, action).await? {
        println!("{line}");
    }
    store.close().await
}

pub async fn run_answer(config: &TriageConfig, action: AnswerAction) -> Result<(), TriageError> {
    let store = open_store(config).await?;
    for line in answer(&store, action).await? {
        println!("{line}");
    }
    store.close().await
}

pub async fn run_pattern(config: &TriageConfig, action: PatternAction) -> Result<(), TriageError> {
    let store = open_store(config).await?;
    for line in pattern(&store, action).await? {
        println!("{line}");
    }
    store.close().await
}

async fn team(store: &SqliteThreadStore, action: TeamAction) -> Result<Vec<String>, TriageError> {
    match action {
        TeamAction::Add { user_id, name } => {
            store
                .add_team_member(&TeamMember {
                    user_id: user_id.clone(),
                    name,
                })
                .await?;
            Ok(vec![format!("added {user_id}")])
        }
        TeamAction::Remove { user_id } => {
            if store.remove_team_member(&user_id).await? {
                Ok(vec![format!("removed {user_id}")])
            } else {
                Err(TriageError::NotFound {
                    what: "team member",
                    id: user_id,
                })
            }
        }
        TeamAction::List => Ok(store
            .list_team_members()
            .await?
            .into_iter()
            .map(|m| format!("{}\t{}", m.user_id, m.name))
            .collect()),
    }
}

async fn answer(
    store: &SqliteThreadStore,
    action: AnswerAction,
) -> Result<Vec<String>, TriageError> {
    match action {
        AnswerAction::Add {
            tool,
            label,
            feedback,
            text,
        } => {
            if text.trim().is_empty() {
                return Err(TriageError::Validation("answer text must not be empty".into()));
            }
            let id = store
                .add_answer(&Answer {
                    id: None,
                    tool,
                    label,
                    answer: text,
                    feedback,
                })
                .await?;
            Ok(vec![format!("added answer {id}")])
        }
        AnswerAction::Remove { id } => {
            if store.remove_answer(id).await? {
                Ok(vec![format!("removed answer {id}")])
            } else {
                Err(TriageError::NotFound {
                    what: "answer",
                    id: id.to_string(),
                })
            }
        }
        AnswerAction::List => Ok(store
            .list_answers()
            .await?
            .into_iter()
            .map(|a| {
                format!(
                    "{}\t{}\t{}\t{}\t{}",
                    a.id.unwrap_or_default(),
                    or_any(&a.tool),
                    or_any(&a.label),
                    if a.feedback { "feedback" } else { "-" },
                    a.answer
                )
            })
            .collect()),
    }
}

async fn pattern(
    store: &SqliteThreadStore,
    action: PatternAction,
) -> Result<Vec<String>, TriageError> {
    match action {
        PatternAction::Add { kind, name, regex } => {
            store
                .add_pattern(&Pattern {
                    kind,
                    name: name.clone(),
                    regex,
                })
                .await?;
            Ok(vec![format!("added {kind} pattern {name}")])
        }
        PatternAction::Remove { kind, name } => {
            if store.remove_pattern(kind, &name).await? {
                Ok(vec![format!("removed {kind} pattern {name}")])
            } else {
                Err(TriageError::NotFound {
                    what: "pattern",
                    id: format!("{kind}/{name}"),
                })
            }
        }
        PatternAction::List { kind } => Ok(store
            .list_patterns(kind)
            .await?
            .into_iter()
            .map(|p| format!("{}\t{}", p.name, p.regex))
            .collect()),
    }
}

fn or_any(axis: &str) -> &str {
    if axis.is_empty() { "*" } else { axis }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::PatternKind;
    use triage_storage::Database;

    async fn store() -> SqliteThreadStore {
        SqliteThreadStore::from_database(Database::open_in_memory().await.unwrap())
    }

    #[tokio::test]
    async fn team_add_list_remove() {
        let store = store().await;
        team(
            &store,
            TeamAction::Add {
                user_id: "U0000000001".into(),
                name: "Alice".into(),
            },
        )
        .await
        .unwrap();

        let listed = team(&store, TeamAction::List).await.unwrap();
        assert_eq!(listed, vec!["U0000000001\tAlice".to_string()]);

        team(
            &store,
            TeamAction::Remove {
                user_id: "U0000000001".into(),
            },
        )
        .await
        .unwrap();
        assert!(team(&store, TeamAction::List).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn removing_unknown_member_is_not_found() {
        let store = store().await;
        let err = team(
            &store,
            TeamAction::Remove {
                user_id: "UNOBODY0001".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TriageError::NotFound { .. }));
    }

    #[tokio::test]
    async fn answer_list_marks_wildcards_and_feedback() {
        let store = store().await;
        answer(
            &store,
            AnswerAction::Add {
                tool: "vault".into(),
                label: String::new(),
                feedback: true,
                text: "See the vault runbook".into(),
            },
        )
        .await
        .unwrap();

        let listed = answer(&store, AnswerAction::List).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].ends_with("vault\t*\tfeedback\tSee the vault runbook"));
    }

    #[tokio::test]
    async fn empty_answer_text_is_rejected() {
        let store = store().await;
        let err = answer(
            &store,
            AnswerAction::Add {
                tool: String::new(),
                label: String::new(),
                feedback: false,
                text: "  ".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TriageError::Validation(_)));
    }

    #[tokio::test]
    async fn invalid_regex_never_reaches_the_store() {
        let store = store().await;
        let err = pattern(
            &store,
            PatternAction::Add {
                kind: PatternKind::Tool,
                name: "broken".into(),
                regex: "(unclosed".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TriageError::Validation(_)));
        assert!(store.list_patterns(PatternKind::Tool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn patterns_are_listed_per_kind() {
        let store = store().await;
        pattern(
            &store,
            PatternAction::Add {
                kind: PatternKind::Label,
                name: "access".into(),
                regex: r"(?i)\baccess\b".into(),
            },
        )
        .await
        .unwrap();

        assert!(pattern(&store, PatternAction::List { kind: PatternKind::Tool })
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            pattern(&store, PatternAction::List { kind: PatternKind::Label })
                .await
                .unwrap(),
            vec![format!("access\t{}", r"(?i)\baccess\b")]
        );
    }
}
