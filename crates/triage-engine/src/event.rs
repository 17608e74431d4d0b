// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound events: the platform-shaped payload, its classification, and the
//! canonical [`Event`] the engine dispatches on.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::Display;
use triage_core::{Interaction, Reaction, Reply, Thread, TriageError, User, UserProfile};

use crate::clock::format_ts;

/// Text the platform substitutes into an edited message that was deleted.
pub const DELETED_SENTINEL: &str = "This message was deleted.";

/// `<@AUTHOR> set the channel topic: ... <@DESIGNEE>`; the second mention is the designee.
static TOPIC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<@(.{11})> set the channel topic:.*<@(.{11})>").expect("valid topic pattern")
});

/// Extracts the designee user id from a topic-change text.
pub fn designee_from_topic(text: &str) -> Option<String> {
    TOPIC_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().to_string())
}

/// Nested message carried by edit and delete notifications.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMessage {
    pub user: String,
    pub text: String,
    pub ts: String,
    pub thread_ts: Option<String>,
    pub replies: Vec<Reply>,
    pub reactions: Vec<Reaction>,
}

/// The message a reaction points at.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawItem {
    pub ts: String,
}

/// A messaging-platform event payload as delivered by the transport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub subtype: Option<String>,
    pub user: String,
    /// Author handle, when the transport resolved it.
    pub user_name: String,
    pub user_profile: Option<UserProfile>,
    pub text: String,
    pub ts: String,
    pub event_ts: Option<String>,
    pub thread_ts: Option<String>,
    pub deleted_ts: Option<String>,
    pub reaction: Option<String>,
    pub item: Option<RawItem>,
    pub message: Option<RawMessage>,
    pub previous_message: Option<RawMessage>,
    pub replies: Vec<Reply>,
    pub reactions: Vec<Reaction>,
}

impl RawEvent {
    fn subtype_is(&self, subtype: &str) -> bool {
        self.subtype.as_deref() == Some(subtype)
    }

    fn author(&self) -> User {
        User {
            id: self.user.clone(),
            name: self.user_name.clone(),
            profile: self.user_profile.clone().unwrap_or_default(),
        }
    }

    fn nested_text(&self) -> Option<&str> {
        self.message.as_ref().map(|m| m.text.as_str())
    }
}

/// What a raw event is, decided in a fixed precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    ThreadReply,
    Bot,
    Join,
    Leave,
    Reaction,
    TopicChange,
    Deleted,
    Updated,
    NewMessage,
}

/// A canonical event, ready for dispatch by [`crate::LifecycleEngine::handle`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    NewMessage {
        thread: Thread,
    },
    Reply {
        reply: Reply,
    },
    Reaction {
        reaction: Reaction,
    },
    /// The platform removed a reaction; recorded reactions are append-only.
    ReactionRemoved {
        reaction: Reaction,
    },
    Edit {
        ts: String,
        text: String,
        #[serde(default)]
        edited_ts: Option<String>,
    },
    Delete {
        #[serde(default)]
        deleted_ts: Option<String>,
        #[serde(default)]
        edited_ts: Option<String>,
    },
    TopicChange {
        ts: String,
        author: User,
        text: String,
    },
    Feedback {
        interaction: Interaction,
    },
    Join {
        user_id: String,
    },
    Backfill {
        events: Vec<RawEvent>,
    },
    ReminderSweep,
    Report {
        start: String,
        end: String,
    },
    /// Events the engine observes but never acts on (bot posts, departures).
    Ignored {
        reason: String,
    },
}

impl Event {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Event::NewMessage { .. } => "new_message",
            Event::Reply { .. } => "reply",
            Event::Reaction { .. } => "reaction",
            Event::ReactionRemoved { .. } => "reaction_removed",
            Event::Edit { .. } => "edit",
            Event::Delete { .. } => "delete",
            Event::TopicChange { .. } => "topic_change",
            Event::Feedback { .. } => "feedback",
            Event::Join { .. } => "join",
            Event::Backfill { .. } => "backfill",
            Event::ReminderSweep => "reminder_sweep",
            Event::Report { .. } => "report",
            Event::Ignored { .. } => "ignored",
        }
    }
}

/// Classifies raw payloads and turns them into canonical events.
#[derive(Debug, Clone)]
pub struct EventClassifier {
    bot_user_id: String,
}

impl EventClassifier {
    pub fn new(bot_user_id: impl Into<String>) -> Self {
        Self {
            bot_user_id: bot_user_id.into(),
        }
    }

    fn is_bot(&self, user: &str) -> bool {
        !self.bot_user_id.is_empty() && user == self.bot_user_id
    }

    /// Decides the kind of a raw event.
    ///
    /// A parent message listed in history carries `thread_ts == ts`; only a
    /// differing `thread_ts` marks a reply.
    pub fn classify(&self, raw: &RawEvent) -> EventKind {
        let in_thread = raw
            .thread_ts
            .as_deref()
            .is_some_and(|t| !t.is_empty() && t != raw.ts);
        if in_thread {
            return EventKind::ThreadReply;
        }
        if raw.subtype_is("bot_message") || self.is_bot(&raw.user) {
            return EventKind::Bot;
        }
        if raw.subtype_is("channel_join") {
            return EventKind::Join;
        }
        if raw.subtype_is("channel_leave") {
            return EventKind::Leave;
        }
        if matches!(raw.event_type.as_str(), "reaction_added" | "reaction_removed") {
            return EventKind::Reaction;
        }
        if designee_from_topic(&raw.text).is_some() {
            return EventKind::TopicChange;
        }
        if raw.subtype_is("message_deleted")
            || (raw.subtype_is("message_changed") && raw.nested_text() == Some(DELETED_SENTINEL))
        {
            return EventKind::Deleted;
        }
        if raw.subtype_is("message_changed") {
            return EventKind::Updated;
        }
        EventKind::NewMessage
    }

    /// Converts a raw payload into the canonical event for its kind.
    ///
    /// `now` stamps reactions, which the platform delivers without a
    /// timestamp of their own.
    pub fn canonicalize(&self, raw: RawEvent, now: f64) -> Result<Event, TriageError> {
        let kind = self.classify(&raw);
        let event = match kind {
            EventKind::ThreadReply => Event::Reply {
                reply: Reply {
                    author: raw.author(),
                    thread_ts: raw.thread_ts.clone().unwrap_or_default(),
                    from_bot: self.is_bot(&raw.user) || raw.subtype_is("bot_message"),
                    ts: raw.ts,
                    text: raw.text,
                },
            },
            EventKind::Bot => Event::Ignored {
                reason: "bot message".into(),
            },
            EventKind::Leave => Event::Ignored {
                reason: "channel leave".into(),
            },
            EventKind::Join => Event::Join { user_id: raw.user },
            EventKind::Reaction => {
                let message_ts = raw.item.as_ref().map(|i| i.ts.clone()).unwrap_or_default();
                if message_ts.is_empty() {
                    return Err(TriageError::Validation(
                        "reaction event without a target message".into(),
                    ));
                }
                let reaction = Reaction {
                    name: raw.reaction.clone().unwrap_or_default(),
                    ts: raw.event_ts.clone().unwrap_or_else(|| format_ts(now)),
                    message_ts,
                    users: vec![raw.user.clone()],
                    count: 1,
                };
                if raw.event_type == "reaction_removed" {
                    Event::ReactionRemoved { reaction }
                } else {
                    Event::Reaction { reaction }
                }
            }
            EventKind::TopicChange => Event::TopicChange {
                author: raw.author(),
                ts: raw.ts,
                text: raw.text,
            },
            EventKind::Deleted => Event::Delete {
                deleted_ts: raw.deleted_ts.filter(|ts| !ts.is_empty()),
                edited_ts: raw.message.map(|m| m.ts).filter(|ts| !ts.is_empty()),
            },
            EventKind::Updated => {
                let message = raw.message.clone().unwrap_or_default();
                if message.ts.is_empty() {
                    return Err(TriageError::Validation(
                        "edit event without the edited message".into(),
                    ));
                }
                Event::Edit {
                    ts: message.ts,
                    text: message.text,
                    edited_ts: raw.event_ts.or(Some(raw.ts)).filter(|ts| !ts.is_empty()),
                }
            }
            EventKind::NewMessage => Event::NewMessage {
                thread: self.thread_from(raw),
            },
        };
        Ok(event)
    }

    /// Builds a thread record from a top-level message, keeping any replies
    /// and reactions the payload already carries.
    pub fn thread_from(&self, raw: RawEvent) -> Thread {
        let mut thread = Thread::new(raw.ts.clone(), raw.author(), raw.text.clone());
        let (replies, reactions) = match raw.message {
            Some(message) if !message.replies.is_empty() || !message.reactions.is_empty() => {
                (message.replies, message.reactions)
            }
            _ => (raw.replies, raw.reactions),
        };
        thread.replies = replies
            .into_iter()
            .map(|mut reply| {
                reply.from_bot = reply.from_bot || self.is_bot(&reply.author.id);
                reply
            })
            .collect();
        thread.reactions = reactions;
        thread
    }
}
