use crate::conversation::{self, SYSTEM_PROMPT};
use crate::errors::{AgentError, AgentResult};
use crate::providers::base::Provider;
use crate::toolbox::{catalog, Toolbox};

/// Two-round tool dispatch orchestrator. Round 1 offers the model the full
/// tool catalog; if it answers directly that answer is final. If it requests
/// a tool, the first request is executed, its synthesized outcome is folded
/// back into the conversation, and round 2 (with no tools attached) produces
/// the final answer.
pub struct Agent {
    provider: Box<dyn Provider + Send + Sync>,
    toolbox: Toolbox,
}

impl Agent {
    pub fn new(provider: Box<dyn Provider + Send + Sync>, toolbox: Toolbox) -> Self {
        Self { provider, toolbox }
    }

    /// Answer a single user prompt. The caller has already validated the
    /// prompt; the conversation built here lives only for this call.
    ///
    /// Transport failures, unknown tool names and malformed arguments abort
    /// with an error. Collaborator failures do not: they are summarized into
    /// the conversation so the follow-up round can degrade gracefully.
    pub async fn reply(&self, prompt: &str) -> AgentResult<String> {
        let mut conversation = conversation::seed(prompt);
        let tools = catalog();

        let (reply, _) = self
            .provider
            .complete(SYSTEM_PROMPT, &conversation, &tools)
            .await
            .map_err(|e| AgentError::Transport(e.to_string()))?;

        // Only the first requested tool is honored; any further requests from
        // the same round are dropped.
        let request = match reply.first_tool_request() {
            None => return Ok(reply.text()),
            Some(request) => request.clone(),
        };

        let call = request.tool_call?;
        let report = self.toolbox.dispatch(&call).await?;
        let summary = conversation::summarize(&report);
        conversation::append_tool_result(&mut conversation, reply, &request.id, &call.name, summary);

        // No tools on the follow-up round: the model must answer with what it
        // has. A tool request here would be ignored anyway.
        let (followup, _) = self
            .provider
            .complete(SYSTEM_PROMPT, &conversation, &[])
            .await
            .map_err(|e| AgentError::Transport(e.to_string()))?;

        Ok(followup.text())
    }
}
