//! Shared agent plumbing: cached instruction, private state, exchange cycle.

use std::sync::Arc;

use crate::error::Result;
use crate::gateway::{GenerationOptions, ModelGateway};
use crate::types::{ModelMessage, Role};

use super::conversation::Conversation;

/// State and behavior shared by both agent specializations.
///
/// The system instruction is rendered once by the owning agent and never
/// re-rendered. The conversation is mutated only on a successful exchange;
/// a failed gateway call leaves it byte-identical.
pub struct AgentCore {
    model_id: String,
    gateway: Arc<ModelGateway>,
    system_instruction: String,
    conversation: Conversation,
}

impl AgentCore {
    pub fn new(
        model_id: impl Into<String>,
        gateway: Arc<ModelGateway>,
        system_instruction: String,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            gateway,
            system_instruction,
            conversation: Conversation::new(),
        }
    }

    /// One request/reply exchange.
    ///
    /// Builds `[system (+ transient context), ...history, incoming]`, invokes
    /// the gateway, and appends the incoming and produced turns only after
    /// success. The transient context is applied to this call alone; it is
    /// never persisted into history or into the cached instruction.
    pub async fn exchange(
        &mut self,
        incoming: &str,
        transient_context: Option<&str>,
        options: GenerationOptions,
    ) -> Result<String> {
        let mut system = self.system_instruction.clone();
        if let Some(context) = transient_context {
            system.push_str(context);
        }

        let mut messages = Vec::with_capacity(self.conversation.len() + 2);
        messages.push(ModelMessage::system(system));
        messages.extend(self.conversation.as_messages());
        messages.push(ModelMessage::user(incoming));

        let reply = self
            .gateway
            .generate(&self.model_id, &messages, options)
            .await?;

        self.conversation.push(Role::User, incoming);
        self.conversation.push(Role::Assistant, reply.clone());

        Ok(reply)
    }

    /// Generation seeded by a one-shot instruction with no prior history.
    ///
    /// Only the produced reply is recorded; the seed does not become a turn.
    pub async fn open(&mut self, seed: &str, options: GenerationOptions) -> Result<String> {
        let messages = vec![
            ModelMessage::system(self.system_instruction.clone()),
            ModelMessage::user(seed),
        ];

        let reply = self
            .gateway
            .generate(&self.model_id, &messages, options)
            .await?;

        self.conversation.push(Role::Assistant, reply.clone());

        Ok(reply)
    }

    /// Side-channel generation over the existing history under a different
    /// system instruction. Never mutates conversation state.
    pub async fn side_channel(
        &self,
        system: &str,
        closing_prompt: &str,
        options: GenerationOptions,
    ) -> Result<String> {
        let mut messages = Vec::with_capacity(self.conversation.len() + 2);
        messages.push(ModelMessage::system(system));
        messages.extend(self.conversation.as_messages());
        messages.push(ModelMessage::user(closing_prompt));

        self.gateway
            .generate(&self.model_id, &messages, options)
            .await
    }

    pub fn reset(&mut self) {
        self.conversation.clear();
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}
