//! `shell` agent

use super::{Agent, AgentError, Scope};

/// Execute arbitrary shell commands
pub struct Shell;

impl Agent for Shell {
    fn name(&self) -> &'static str {
        "shell"
    }

    fn description(&self) -> &'static str {
        "Execute arbitrary shell commands"
    }

    fn run(&self, scope: &Scope) -> Result<String, AgentError> {
        let Some(commands) = scope.get_table("command") else {
            return Ok(String::new());
        };

        let mut out = Vec::new();
        for (name, cmd) in commands {
            let cmd = cmd
                .as_str()
                .ok_or_else(|| scope.invalid(format!("command '{}' must be a string", name)))?;
            if !cmd.is_empty() {
                out.push(cmd.to_string());
            }
        }
        Ok(out.join("\n"))
    }
}
