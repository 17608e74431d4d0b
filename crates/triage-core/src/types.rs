// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the engine, the store and the classifier.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::TriageError;

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of collaborator behind an adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterKind {
    Store,
    Classifier,
}

/// Current classification of a tracked thread.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ThreadKind {
    /// Question from someone outside the team roster.
    #[default]
    User,
    /// Message authored by a team member.
    Team,
    /// Designee assignment extracted from a topic change.
    Topic,
    /// The original message was deleted on the platform.
    Deleted,
    /// The original message was edited on the platform.
    Updated,
}

/// Lifecycle status of a tracked thread.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ThreadStatus {
    #[default]
    Unresponded,
    Responded,
    Fixed,
    Deleted,
}

impl ThreadStatus {
    /// Whether moving from `self` to `to` is allowed.
    ///
    /// Status only moves forward: `Unresponded -> Responded -> Fixed`, with
    /// `Deleted` reachable from anywhere and terminal. A self-transition is
    /// accepted and changes nothing.
    pub fn can_transition(self, to: ThreadStatus) -> bool {
        use ThreadStatus::*;
        match (self, to) {
            (Unresponded, _) => true,
            (Responded, Unresponded) => false,
            (Responded, Responded | Fixed | Deleted) => true,
            (Fixed, Fixed | Deleted) => true,
            (Fixed, Unresponded | Responded) => false,
            (Deleted, Deleted) => true,
            (Deleted, Unresponded | Responded | Fixed) => false,
        }
    }

    /// Whether the reminder sweep may still select a thread in this status.
    pub fn is_open(self) -> bool {
        matches!(self, ThreadStatus::Unresponded | ThreadStatus::Responded)
    }
}

/// Outcome of the post-answer feedback prompt.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FeedbackStatus {
    #[default]
    NoFeedback,
    AskedFeedback,
    FeedbackUseful,
    FeedbackUseless,
}

/// Display metadata for a platform user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub real_name: String,
    pub display_name: String,
    pub image_url: Option<String>,
}

/// A platform user as seen by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: String,
    pub name: String,
    pub profile: UserProfile,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            profile: UserProfile::default(),
        }
    }
}

/// A message posted inside a tracked thread.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reply {
    pub author: User,
    pub ts: String,
    pub thread_ts: String,
    pub text: String,
    /// True when the reply was authored by the system's own account.
    pub from_bot: bool,
}

/// An emoji reaction attached to a tracked message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reaction {
    pub name: String,
    pub ts: String,
    pub message_ts: String,
    pub users: Vec<String>,
    pub count: u32,
}

/// A category proposed by the external classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub confidence: f64,
}

impl Category {
    pub fn new(name: impl Into<String>, confidence: f64) -> Self {
        Self {
            name: name.into(),
            confidence,
        }
    }
}

/// A canned answer keyed by a (tool, label) pair.
///
/// An empty `tool` or `label` matches messages for which nothing was
/// detected on that axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Answer {
    pub id: Option<i64>,
    pub tool: String,
    pub label: String,
    pub answer: String,
    /// Ask the author whether the answer solved their problem.
    pub feedback: bool,
}

impl Answer {
    /// Whether this answer applies to a message with the given detections.
    pub fn matches(&self, tools: &[String], labels: &[String]) -> bool {
        fn axis(value: &str, detected: &[String]) -> bool {
            if detected.is_empty() {
                value.is_empty()
            } else {
                detected.iter().any(|d| d == value)
            }
        }
        axis(&self.tool, tools) && axis(&self.label, labels)
    }
}

/// Which detection axis a text pattern feeds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PatternKind {
    Tool,
    Label,
}

/// A named regular expression used to detect a tool or a label in free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub kind: PatternKind,
    pub name: String,
    pub regex: String,
}

/// A roster entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamMember {
    pub user_id: String,
    pub name: String,
}

/// A click on one of the feedback prompt buttons.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Interaction {
    pub message_ts: String,
    pub thread_ts: String,
    pub action_ts: String,
    pub action_user_id: String,
    pub action_value: String,
    pub response_url: String,
}

/// The tracked lifecycle record for one conversation-starting message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thread {
    /// Platform timestamp of the original message; the thread identity.
    pub ts: String,
    pub kind: ThreadKind,
    pub status: ThreadStatus,
    pub text: String,
    pub author: User,
    pub tools: Vec<String>,
    pub labels: Vec<String>,
    pub ai_tools: Vec<Category>,
    pub ai_labels: Vec<Category>,
    pub replies: Vec<Reply>,
    pub reactions: Vec<Reaction>,
    /// Minutes between the thread start and the first team reply.
    pub response_time: Option<f64>,
    /// Minutes between the thread start and the resolving reaction.
    pub resolution_time: Option<f64>,
    /// Epoch seconds at which the reminder sweep should pick the thread up.
    pub remind_at: Option<i64>,
    pub feedback_status: FeedbackStatus,
    pub feedback_ts: Option<String>,
    pub edited_ts: Option<String>,
    pub deleted_ts: Option<String>,
    /// Optimistic concurrency token, bumped by the store on every write.
    pub version: u64,
}

impl Thread {
    pub fn new(ts: impl Into<String>, author: User, text: impl Into<String>) -> Self {
        Self {
            ts: ts.into(),
            author,
            text: text.into(),
            ..Self::default()
        }
    }

    /// Moves the thread to `to`, clearing `remind_at` on `Fixed` or `Deleted`.
    pub fn transition(&mut self, to: ThreadStatus) -> Result<(), TriageError> {
        if !self.status.can_transition(to) {
            return Err(TriageError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        if matches!(to, ThreadStatus::Fixed | ThreadStatus::Deleted) {
            self.remind_at = None;
        }
        Ok(())
    }

    /// Replaces tools and labels together.
    pub fn set_categories(&mut self, tools: Vec<String>, labels: Vec<String>) {
        self.tools = tools;
        self.labels = labels;
    }

    /// Records the response time unless one is already set.
    pub fn record_response_time(&mut self, minutes: f64) -> bool {
        if self.response_time.is_some() {
            return false;
        }
        self.response_time = Some(minutes);
        true
    }

    /// Records the resolution time unless one is already set.
    pub fn record_resolution_time(&mut self, minutes: f64) -> bool {
        if self.resolution_time.is_some() {
            return false;
        }
        self.resolution_time = Some(minutes);
        true
    }

    /// The single reply authored by the bot, if that is the only reply.
    pub fn sole_bot_reply(&self) -> Option<&Reply> {
        match self.replies.as_slice() {
            [only] if only.from_bot => Some(only),
            _ => None,
        }
    }
}

/// Aggregated metrics over a period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub threads: Vec<Thread>,
    /// Designee records (topic threads) dated within the period.
    pub designees: Vec<Thread>,
    /// Mean response time in minutes over threads having replies.
    pub response_time: f64,
    /// Mean resolution time in minutes over threads having reactions.
    pub resolution_time: f64,
    /// Percentage of fixed threads, capped at 100.
    pub resolution_rate: u32,
    pub start: String,
    pub end: String,
}

/// An outbound action instruction for the messaging platform executor.
///
/// Directives are pure values; the engine never executes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionDirective {
    PostToChannel {
        text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        blocks: Vec<serde_json::Value>,
    },
    ReplyInThread {
        thread_ts: String,
        text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        blocks: Vec<serde_json::Value>,
    },
    React {
        thread_ts: String,
        emoji: String,
    },
    Ephemeral {
        user_id: String,
        text: String,
    },
    DeletePriorReply {
        ts: String,
    },
    UpdateViaCallbackUrl {
        response_url: String,
        text: String,
    },
    NoOp,
}

impl ActionDirective {
    pub fn is_no_op(&self) -> bool {
        matches!(self, ActionDirective::NoOp)
    }

    /// The text body carried by the directive, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            ActionDirective::PostToChannel { text, .. }
            | ActionDirective::ReplyInThread { text, .. }
            | ActionDirective::Ephemeral { text, .. }
            | ActionDirective::UpdateViaCallbackUrl { text, .. } => Some(text),
            ActionDirective::React { .. }
            | ActionDirective::DeletePriorReply { .. }
            | ActionDirective::NoOp => None,
        }
    }
}
