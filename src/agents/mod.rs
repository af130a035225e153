// file: src/agents/mod.rs
// description: round-robin multi-agent group chat with sentinel termination

use crate::config::AgentsConfig;
use crate::error::Result;
use crate::llm::{ChatBackend, ChatMessage};
use serde::Serialize;
use tracing::debug;

/// One conversational agent: a name plus the system prompt that shapes its
/// turns.
#[derive(Debug, Clone)]
pub struct Agent {
    pub name: String,
    pub description: String,
    pub system_message: String,
}

impl Agent {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        system_message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            system_message: system_message.into(),
        }
    }
}

/// A message produced by one agent turn.
#[derive(Debug, Clone, Serialize)]
pub struct AgentMessage {
    pub sender: String,
    pub content: String,
}

/// Fixed round-robin conversation over a list of agents.
///
/// Each turn the next agent receives its own system message, the task, and
/// the full transcript so far, and appends one reply. The loop ends when a
/// reply contains the termination keyword or the turn cap is reached.
pub struct GroupChat<B: ChatBackend> {
    backend: B,
    agents: Vec<Agent>,
    termination_keyword: String,
    max_turns: usize,
}

impl<B: ChatBackend> GroupChat<B> {
    pub fn new(backend: B, agents: Vec<Agent>, config: &AgentsConfig) -> Self {
        Self {
            backend,
            agents,
            termination_keyword: config.termination_keyword.clone(),
            max_turns: config.max_turns,
        }
    }

    /// Run the conversation for `task`, invoking `on_message` with each
    /// message as it is produced so the caller can display turns as they
    /// arrive. Returns the full transcript.
    pub async fn run<F>(&self, task: &str, mut on_message: F) -> Result<Vec<AgentMessage>>
    where
        F: FnMut(&AgentMessage),
    {
        let mut transcript: Vec<AgentMessage> = Vec::new();

        if self.agents.is_empty() {
            debug!("no agents configured, conversation is empty");
            return Ok(transcript);
        }

        for turn in 0..self.max_turns {
            let agent = &self.agents[turn % self.agents.len()];
            debug!("turn {}: {}", turn, agent.name);

            let messages = self.turn_messages(agent, task, &transcript);
            let reply = self.backend.complete(&messages).await?;

            let terminated = reply.contains(&self.termination_keyword);
            let content = if terminated {
                reply.replace(&self.termination_keyword, "").trim().to_string()
            } else {
                reply
            };

            let message = AgentMessage {
                sender: agent.name.clone(),
                content,
            };
            on_message(&message);
            transcript.push(message);

            if terminated {
                debug!("conversation terminated after {} turns", turn + 1);
                break;
            }
        }

        Ok(transcript)
    }

    /// The view one agent gets of the conversation: its own past replies as
    /// assistant turns, every other agent's as attributed user turns.
    fn turn_messages(
        &self,
        agent: &Agent,
        task: &str,
        transcript: &[AgentMessage],
    ) -> Vec<ChatMessage> {
        let mut messages = vec![
            ChatMessage::system(agent.system_message.clone()),
            ChatMessage::user(task),
        ];

        for entry in transcript {
            if entry.sender == agent.name {
                messages.push(ChatMessage::assistant(entry.content.clone()));
            } else {
                messages.push(ChatMessage::user(format!(
                    "{}: {}",
                    entry.sender, entry.content
                )));
            }
        }

        messages
    }
}

/// The fixed travel planning team.
pub fn travel_team() -> Vec<Agent> {
    vec![
        Agent::new(
            "planner_agent",
            "A helpful assistant that can plan trips.",
            "You are a helpful assistant that can suggest a travel plan for a user based on \
             their request.",
        ),
        Agent::new(
            "local_agent",
            "A local assistant that can suggest local activities or places to visit.",
            "You are a helpful assistant that can suggest authentic and interesting local \
             activities or places to visit for a user and can utilize any context information \
             provided.",
        ),
        Agent::new(
            "language_agent",
            "A helpful assistant that can provide language tips for a given destination.",
            "You are a helpful assistant that can review travel plans, providing feedback on \
             important/critical tips about how best to address language or communication \
             challenges for the given destination. If the plan already includes language tips, \
             you can mention that the plan is satisfactory, with rationale.",
        ),
        Agent::new(
            "travel_summary_agent",
            "A helpful assistant that can summarize the travel plan.",
            "You are a helpful assistant that can take in all of the suggestions and advice \
             from the other agents and provide a detailed final travel plan. You must ensure \
             that the final plan is integrated and complete. YOUR FINAL RESPONSE MUST BE THE \
             COMPLETE PLAN. When the plan is complete and all perspectives are integrated, you \
             can respond with TERMINATE.",
        ),
    ]
}

/// The task line handed to the team.
pub fn travel_task(destination: &str, days: u32, preferences: &str) -> String {
    format!("Plan a {days} day trip to {destination}. {preferences}")
}
