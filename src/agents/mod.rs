//! Agents turn a resolved scope into shell-sourceable text
//!
//! Each `[scopes.<name>]` table in a theme names an agent with `agent = "..."`.
//! The agent reads the rest of the (already rendered) table and returns lines
//! the caller prints for the shell to `source`.

mod environment;
mod fzf;
mod iterm;
mod ls_colors;
mod scope;
mod shell;

use std::collections::HashMap;

use thiserror::Error;

use crate::style::StyleError;
use crate::template::ResolveError;

pub use environment::EnvironmentVariables;
pub use fzf::Fzf;
pub use iterm::Iterm;
pub use ls_colors::{Eza, LsColors};
pub use scope::Scope;
pub use shell::Shell;

/// Errors raised while running a scope through its agent
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("{0}: unknown agent")]
    UnknownAgent(String),

    #[error("scope '{scope}' does not have an agent")]
    MissingAgent { scope: String },

    #[error("agent '{agent}' is already registered")]
    Duplicate { agent: String },

    #[error("scope '{scope}': {message}")]
    InvalidKey { scope: String, message: String },

    #[error("scope '{scope}': style '{name}': {source}")]
    Style {
        scope: String,
        name: String,
        source: StyleError,
    },

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("scope '{scope}': failed to run enabled_if: {source}")]
    EnabledIf {
        scope: String,
        source: std::io::Error,
    },
}

/// An output adapter for one kind of tool
pub trait Agent {
    /// Name used in `agent = "..."`
    fn name(&self) -> &'static str;

    /// One-line description shown by `dye agents`
    fn description(&self) -> &'static str;

    /// Generate shell text for the scope; may be empty
    fn run(&self, scope: &Scope) -> Result<String, AgentError>;
}

/// Agents available by name
#[derive(Default)]
pub struct AgentRegistry {
    agents: HashMap<&'static str, Box<dyn Agent>>,
}

impl AgentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in agent
    pub fn with_builtin() -> Self {
        let builtin: [Box<dyn Agent>; 6] = [
            Box::new(EnvironmentVariables),
            Box::new(Fzf),
            Box::new(LsColors),
            Box::new(Eza),
            Box::new(Iterm),
            Box::new(Shell),
        ];
        let mut registry = Self::new();
        for agent in builtin {
            registry.agents.insert(agent.name(), agent);
        }
        registry
    }

    pub fn register(&mut self, agent: Box<dyn Agent>) -> Result<(), AgentError> {
        let name = agent.name();
        if self.agents.contains_key(name) {
            return Err(AgentError::Duplicate {
                agent: name.to_string(),
            });
        }
        self.agents.insert(name, agent);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn Agent> {
        self.agents.get(name).map(|agent| agent.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.agents.contains_key(name)
    }

    /// Agents sorted by name
    pub fn iter(&self) -> impl Iterator<Item = &dyn Agent> {
        let mut agents: Vec<&dyn Agent> = self.agents.values().map(|a| a.as_ref()).collect();
        agents.sort_by_key(|a| a.name());
        agents.into_iter()
    }

    /// Run a scope through the agent it names
    pub fn run(&self, scope: &Scope) -> Result<String, AgentError> {
        let name = scope.agent()?;
        let agent = self
            .get(name)
            .ok_or_else(|| AgentError::UnknownAgent(name.to_string()))?;
        tracing::debug!(scope = scope.name(), agent = name, "running agent");
        agent.run(scope)
    }
}
