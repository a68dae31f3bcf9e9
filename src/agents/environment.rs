//! `environment_variables` agent

use super::{Agent, AgentError, Scope};

/// Export and unset environment variables
pub struct EnvironmentVariables;

impl Agent for EnvironmentVariables {
    fn name(&self) -> &'static str {
        "environment_variables"
    }

    fn description(&self) -> &'static str {
        "Export and unset environment variables"
    }

    fn run(&self, scope: &Scope) -> Result<String, AgentError> {
        let mut output = Vec::new();

        // a single string is one name, not a list of characters
        match scope.get("unset") {
            None => {}
            Some(toml::Value::String(name)) => push_unset(&mut output, name),
            Some(toml::Value::Array(names)) => {
                for name in names {
                    let name = name
                        .as_str()
                        .ok_or_else(|| scope.invalid("'unset' entries must be strings".to_string()))?;
                    push_unset(&mut output, name);
                }
            }
            Some(_) => {
                return Err(scope.invalid("'unset' must be a string or a list of strings".to_string()))
            }
        }

        if let Some(exports) = scope.get_table("export") {
            for (var, value) in exports {
                let value = match value {
                    toml::Value::String(s) => s.clone(),
                    toml::Value::Integer(i) => i.to_string(),
                    toml::Value::Float(f) => f.to_string(),
                    toml::Value::Boolean(b) => b.to_string(),
                    _ => return Err(scope.invalid(format!("export '{}' must be a scalar", var))),
                };
                if !value.is_empty() {
                    output.push(format!("export {}=\"{}\"", var, value));
                }
            }
        }

        Ok(output.join("\n"))
    }
}

fn push_unset(output: &mut Vec<String>, name: &str) {
    if !name.is_empty() {
        output.push(format!("unset {}", name));
    }
}
