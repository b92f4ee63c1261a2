//! Career coach chat. There is no dialogue engine: quick-action prompts map to
//! canned replies and everything else gets the fallback.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

pub mod handlers;

pub const GREETING: &str = "Hi! I'm your career coach. What would you like to explore today?";

const FALLBACK_REPLY: &str = "That's a great question! Take the career assessment so I can \
    look at your profile, or pick one of the quick actions below to explore careers and skills.";

const CANNED_REPLIES: &[(&str, &str)] = &[
    (
        "Help me choose a career",
        "Start the career assessment: tell me about your education, interests and skills, \
         and I'll show the roles that fit you best with a match score for each.",
    ),
    (
        "What skills do I need?",
        "Every recommendation lists the skills you already have, the ones to improve and \
         the ones to learn. Open a result to see its skill gap.",
    ),
    (
        "Build a learning roadmap",
        "Save a career you like and create a roadmap from it. Missing skills become \
         foundation tasks and partial skills become practice tasks you can tick off.",
    ),
    (
        "Salary expectations",
        "Salaries vary by role, location and experience. Specialised skills usually raise \
         the range, so closing your skill gaps pays off.",
    ),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("message must not be blank")]
    BlankMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub reply: String,
    /// False when the fallback was used.
    pub matched: bool,
    pub quick_actions: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ChatResponder {
    replies: HashMap<String, String>,
    quick_actions: Vec<String>,
    fallback: String,
}

impl Default for ChatResponder {
    fn default() -> Self {
        Self::new(CANNED_REPLIES, FALLBACK_REPLY)
    }
}

impl ChatResponder {
    pub fn new(table: &[(&str, &str)], fallback: &str) -> Self {
        Self {
            replies: table
                .iter()
                .map(|(tag, reply)| (tag.to_string(), reply.to_string()))
                .collect(),
            quick_actions: table.iter().map(|(tag, _)| tag.to_string()).collect(),
            fallback: fallback.to_string(),
        }
    }

    pub fn quick_actions(&self) -> &[String] {
        &self.quick_actions
    }

    /// Exact lookup on the trimmed message.
    pub fn respond(&self, message: &str) -> Result<ChatReply, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::BlankMessage);
        }

        let (reply, matched) = match self.replies.get(message) {
            Some(reply) => (reply.clone(), true),
            None => (self.fallback.clone(), false),
        };

        Ok(ChatReply {
            reply,
            matched,
            quick_actions: self.quick_actions.clone(),
        })
    }
}
