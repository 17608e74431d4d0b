// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Construction helpers for outbound action directives.

use serde_json::{json, Value};
use triage_config::model::MessagesConfig;
use triage_core::ActionDirective;

/// Button value sent back when the author found the answer useful.
pub const FEEDBACK_USEFUL: &str = "feedback_useful";
/// Button value sent back when the author asks for a human.
pub const FEEDBACK_USELESS: &str = "feedback_useless";

const DESIGNEE_PLACEHOLDER: &str = "{designee}";

/// Platform mention markup for a user id.
pub fn mention(user_id: &str) -> String {
    format!("<@{user_id}>")
}

/// Substitutes the designee mention into a message template.
pub fn render_template(template: &str, designee: Option<&str>, messages: &MessagesConfig) -> String {
    let who = match designee {
        Some(id) => mention(id),
        None => messages.no_designee.clone(),
    };
    template.replace(DESIGNEE_PLACEHOLDER, &who)
}

/// Blocks for the two-button "did this help?" prompt.
pub fn feedback_blocks(messages: &MessagesConfig) -> Vec<Value> {
    vec![
        json!({
            "type": "section",
            "text": {
                "type": "mrkdwn",
                "text": messages.feedback_question,
            },
        }),
        json!({
            "type": "actions",
            "elements": [
                {
                    "type": "button",
                    "style": "primary",
                    "value": FEEDBACK_USEFUL,
                    "text": {
                        "type": "plain_text",
                        "emoji": true,
                        "text": messages.feedback_useful_button,
                    },
                },
                {
                    "type": "button",
                    "style": "danger",
                    "value": FEEDBACK_USELESS,
                    "text": {
                        "type": "plain_text",
                        "emoji": true,
                        "text": messages.feedback_useless_button,
                    },
                },
            ],
        }),
    ]
}

/// Accumulates directives for one event.
///
/// `build` never returns an empty list: an event with nothing to say yields a
/// single `NoOp`.
#[derive(Debug, Default)]
pub struct DirectiveBuilder {
    directives: Vec<ActionDirective>,
}

impl DirectiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, directive: ActionDirective) -> &mut Self {
        if !directive.is_no_op() {
            self.directives.push(directive);
        }
        self
    }

    pub fn reply(&mut self, thread_ts: &str, text: impl Into<String>) -> &mut Self {
        self.push(ActionDirective::ReplyInThread {
            thread_ts: thread_ts.to_string(),
            text: text.into(),
            blocks: Vec::new(),
        })
    }

    pub fn feedback_prompt(&mut self, thread_ts: &str, messages: &MessagesConfig) -> &mut Self {
        self.push(ActionDirective::ReplyInThread {
            thread_ts: thread_ts.to_string(),
            text: messages.feedback_question.clone(),
            blocks: feedback_blocks(messages),
        })
    }

    pub fn react(&mut self, thread_ts: &str, emoji: &str) -> &mut Self {
        self.push(ActionDirective::React {
            thread_ts: thread_ts.to_string(),
            emoji: emoji.to_string(),
        })
    }

    pub fn update(&mut self, response_url: &str, text: impl Into<String>) -> &mut Self {
        self.push(ActionDirective::UpdateViaCallbackUrl {
            response_url: response_url.to_string(),
            text: text.into(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    pub fn build(self) -> Vec<ActionDirective> {
        if self.directives.is_empty() {
            vec![ActionDirective::NoOp]
        } else {
            self.directives
        }
    }
}

/// The single directive returned by handlers that only update state.
pub fn no_op() -> Vec<ActionDirective> {
    vec![ActionDirective::NoOp]
}
