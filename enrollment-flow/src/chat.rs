//! Conversational helper answering questions about plans, documents and the
//! enrollment steps.
//!
//! [`ChatAssistant`] owns the transcript and never fails: every model error
//! is turned into a message the member can read. The model itself sits
//! behind [`ChatModel`] so the assistant can run against OpenRouter through
//! `rig` or against a stub.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::error::ChatError;

pub const GREETING: &str =
    "Hello! I'm the AABB virtual assistant. Questions about the plans or the sign-up form? I can help!";
pub const APOLOGY: &str =
    "Sorry, I'm having trouble answering right now. Please try again later.";
pub const NOT_CONFIGURED: &str =
    "Error: the assistant API key is not configured. Please check the environment.";
pub const NOT_UNDERSTOOD: &str = "Sorry, I didn't understand.";

pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

/// Instructions given to the model ahead of every conversation
pub const SYSTEM_PREAMBLE: &str = r#"
You are the virtual assistant of AABB Aracaju (Associação Atlética Banco do Brasil).
You help prospective members fill in the membership enrollment form. Answer in the
language the member writes in; Brazilian Portuguese by default.

Membership plans:
- Comunitário Família: open to the general public.
  * Monthly fee: R$ 184,00.
  * Joining fee: R$ 600,00, payable in 3 installments with an entry of R$ 200,00.
  * Full club access, dependents allowed, guest passes, no Banco do Brasil tie needed.
- Efetivo Família: only for Banco do Brasil employees, active or retired.
  * Monthly fee: R$ 129,00, debited every 20th.
  * Joining fee: exempt.
  * Member discount and access to the whole AABB network.

Documents:
- Holder: 3x4 photo, RG or CNH, proof of residence, marriage certificate when married.
- Dependents: 3x4 photo (optional), CPF (required).
- Efetivo members: proof of employment with Banco do Brasil.

Form steps:
1. Plan choice.
2. Personal data, with documents and photo.
3. Address and contact, with proof of residence.
4. Professional data.
5. Dependents: children up to 24 years old, grandparents and parents-in-law
   from 65, each with a CPF copy.
6. Review and digital signature.

Be friendly, short and direct, using simple Markdown. If asked about anything
unrelated to AABB, gently steer the conversation back.
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Text-in, text-out language model
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Answers `message` given the turns exchanged before it
    async fn reply(&self, message: &str, history: &[ChatMessage]) -> Result<String, ChatError>;
}

/// Stand-in used when no API key is available
pub struct UnconfiguredChatModel;

#[async_trait]
impl ChatModel for UnconfiguredChatModel {
    async fn reply(&self, _message: &str, _history: &[ChatMessage]) -> Result<String, ChatError> {
        Err(ChatError::MissingApiKey)
    }
}

pub struct ChatAssistant {
    model: Box<dyn ChatModel>,
    transcript: Vec<ChatMessage>,
}

impl ChatAssistant {
    pub fn new(model: Box<dyn ChatModel>) -> Self {
        Self {
            model,
            transcript: vec![ChatMessage::assistant(GREETING)],
        }
    }

    /// Every turn so far, starting with the greeting
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// Sends one member message and returns the reply that was appended.
    /// Blank input is ignored and yields `None`.
    pub async fn send(&mut self, input: &str) -> Option<&ChatMessage> {
        let message = input.trim();
        if message.is_empty() {
            return None;
        }

        // the greeting is local, the model never said it
        let history = self.transcript[1..].to_vec();
        self.transcript.push(ChatMessage::user(message));

        let reply = match self.model.reply(message, &history).await {
            Ok(text) if text.trim().is_empty() => {
                warn!("chat model returned an empty reply");
                NOT_UNDERSTOOD.to_string()
            }
            Ok(text) => {
                info!(turns = self.transcript.len(), "chat reply received");
                text
            }
            Err(ChatError::MissingApiKey) => {
                warn!("chat assistant used without an API key");
                NOT_CONFIGURED.to_string()
            }
            Err(e) => {
                error!(error = %e, "chat request failed");
                APOLOGY.to_string()
            }
        };
        self.transcript.push(ChatMessage::assistant(reply));
        self.transcript.last()
    }
}

#[cfg(feature = "rig")]
pub use openrouter::OpenRouterChatModel;

#[cfg(feature = "rig")]
mod openrouter {
    use async_trait::async_trait;
    use rig::{
        agent::Agent,
        client::CompletionClient,
        completion::{Chat, Message},
        providers::openrouter,
    };

    use super::{ChatMessage, ChatModel, ChatRole, DEFAULT_MODEL, SYSTEM_PREAMBLE};
    use crate::error::ChatError;

    /// OpenRouter-backed model built as a `rig` agent
    pub struct OpenRouterChatModel {
        agent: Agent<openrouter::CompletionModel>,
    }

    impl OpenRouterChatModel {
        pub fn new(api_key: &str, model: &str) -> Self {
            let client = openrouter::Client::new(api_key);
            let agent = client.agent(model).preamble(SYSTEM_PREAMBLE).build();
            Self { agent }
        }

        /// Reads `OPENROUTER_API_KEY`, using the default model
        pub fn from_env() -> Result<Self, ChatError> {
            let api_key = std::env::var("OPENROUTER_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty())
                .ok_or(ChatError::MissingApiKey)?;
            Ok(Self::new(&api_key, DEFAULT_MODEL))
        }
    }

    fn to_rig_message(message: &ChatMessage) -> Message {
        match message.role {
            ChatRole::User => Message::user(message.content.clone()),
            ChatRole::Assistant => Message::assistant(message.content.clone()),
        }
    }

    #[async_trait]
    impl ChatModel for OpenRouterChatModel {
        async fn reply(&self, message: &str, history: &[ChatMessage]) -> Result<String, ChatError> {
            let history: Vec<Message> = history.iter().map(to_rig_message).collect();
            self.agent
                .chat(message, history)
                .await
                .map_err(|e| ChatError::Request(e.to_string()))
        }
    }
}
