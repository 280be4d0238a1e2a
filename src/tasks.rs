//! Step compilation.
//!
//! Maps one runbook [`Step`] to one playbook [`Task`]. The step kind is a
//! closed enum, so the dispatch is a total match.

use crate::playbook::{Task, TaskAction};
use crate::runbook::{Step, StepKind};

/// Prefix for print-only task names.
pub const PRINT_PREFIX: &str = "Print: ";

/// Compiles a step into a task.
///
/// Command steps take their own `become` override, falling back to
/// `become_default`. Print-only tasks carry no `become` at all.
pub fn compile_step(step: &Step, become_default: Option<bool>) -> Task {
    let mut task = match &step.kind {
        StepKind::Message { message } => Task::new(
            format!("{}{}", PRINT_PREFIX, step.name),
            TaskAction::Debug {
                msg: message.clone(),
            },
        ),
        StepKind::StdinCommand {
            command,
            stdin,
            become_override,
        } => {
            let mut task = Task::new(
                &step.name,
                TaskAction::Command {
                    cmd: command.clone(),
                    stdin: stdin.clone(),
                },
            );
            task.r#become = become_override.or(become_default);
            task
        }
        StepKind::Shell {
            command,
            become_override,
        } => {
            let mut task = Task::new(&step.name, TaskAction::Shell(command.clone()));
            task.r#become = become_override.or(become_default);
            task
        }
    };
    task.loop_ = step.loop_expr.clone();
    task
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_message_step() {
        let task = compile_step(&Step::message("greet", "hello"), Some(true));
        assert_eq!(task.name, "Print: greet");
        assert_eq!(
            task.action,
            TaskAction::Debug {
                msg: "hello".into()
            }
        );
        assert_eq!(task.r#become, None);
        assert_eq!(task.register, None);
    }

    #[test]
    fn test_shell_step_inherits_default_become() {
        let task = compile_step(&Step::shell("ping", "echo pong"), Some(true));
        assert_eq!(task.name, "ping");
        assert_eq!(task.action, TaskAction::Shell("echo pong".into()));
        assert_eq!(task.r#become, Some(true));
    }

    #[test]
    fn test_override_beats_default() {
        let step = Step::stdin_command("load", "psql", "select 1;").with_become(false);
        let task = compile_step(&step, Some(true));
        assert_eq!(task.r#become, Some(false));
        assert_eq!(
            task.action,
            TaskAction::Command {
                cmd: "psql".into(),
                stdin: "select 1;".into()
            }
        );
    }

    #[test]
    fn test_no_become_anywhere() {
        let task = compile_step(&Step::shell("ping", "echo pong"), None);
        assert_eq!(task.r#become, None);
    }

    #[test]
    fn test_loop_is_passed_through() {
        let step = Step::shell("each", "echo {{ item }}").with_loop("{{ packages }}");
        let task = compile_step(&step, None);
        assert_eq!(task.loop_.as_deref(), Some("{{ packages }}"));
    }
}
