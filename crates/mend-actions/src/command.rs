use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("duplicate command id: {0}")]
    Duplicate(String),
    #[error("command `{command}` failed: {message}")]
    Failed { command: String, message: String },
}

impl CommandError {
    pub fn failed(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            command: command.into(),
            message: message.into(),
        }
    }
}

/// Executes one named command with its JSON arguments.
pub trait CommandHandler: Send + Sync {
    fn run(&self, args: &[Value]) -> Result<Value, CommandError>;
}

impl<F> CommandHandler for F
where
    F: Fn(&[Value]) -> Result<Value, CommandError> + Send + Sync,
{
    fn run(&self, args: &[Value]) -> Result<Value, CommandError> {
        self(args)
    }
}

/// Named command handlers, dispatched after an action's edit has applied.
#[derive(Default)]
pub struct CommandRegistry {
    handlers: RwLock<HashMap<String, Arc<dyn CommandHandler>>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &self,
        id: impl Into<String>,
        handler: Arc<dyn CommandHandler>,
    ) -> Result<(), CommandError> {
        let id = id.into();
        let mut handlers = self.handlers.write();
        if handlers.contains_key(&id) {
            return Err(CommandError::Duplicate(id));
        }
        handlers.insert(id, handler);
        Ok(())
    }

    pub fn unregister(&self, id: &str) {
        self.handlers.write().remove(id);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.handlers.read().contains_key(id)
    }

    /// Run the handler registered under `command`. An unknown id is a
    /// failure, not a crash. The handler runs outside the registry lock.
    pub fn dispatch(&self, command: &str, args: &[Value]) -> Result<Value, CommandError> {
        let handler = self
            .handlers
            .read()
            .get(command)
            .cloned()
            .ok_or_else(|| CommandError::Unknown(command.to_string()))?;
        tracing::debug!(target: "mend.actions", command, "dispatching command");
        handler.run(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dispatch_routes_by_id_and_passes_arguments() {
        let registry = CommandRegistry::new();
        registry
            .register(
                "echo.first",
                Arc::new(|args: &[Value]| -> Result<Value, CommandError> {
                    Ok(args.first().cloned().unwrap_or(Value::Null))
                }),
            )
            .unwrap();

        let out = registry.dispatch("echo.first", &[json!("hello")]).unwrap();
        assert_eq!(out, json!("hello"));
    }

    #[test]
    fn unknown_command_is_a_failure() {
        let registry = CommandRegistry::new();
        assert_eq!(
            registry.dispatch("nope", &[]),
            Err(CommandError::Unknown("nope".to_string()))
        );
    }

    #[test]
    fn unregister_frees_the_id() {
        let registry = CommandRegistry::new();
        let handler: Arc<dyn CommandHandler> =
            Arc::new(|_: &[Value]| -> Result<Value, CommandError> { Ok(Value::Null) });
        registry.register("cmd", handler.clone()).unwrap();
        assert!(registry.contains("cmd"));

        registry.unregister("cmd");
        assert!(!registry.contains("cmd"));
        registry.register("cmd", handler).unwrap();
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let registry = CommandRegistry::new();
        let handler: Arc<dyn CommandHandler> =
            Arc::new(|_: &[Value]| -> Result<Value, CommandError> { Ok(Value::Null) });
        registry.register("dup", handler.clone()).unwrap();
        assert_eq!(
            registry.register("dup", handler),
            Err(CommandError::Duplicate("dup".to_string()))
        );
    }
}
