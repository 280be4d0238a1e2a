//! Run command - Compile a runbook and execute it
//!
//! Writes the artifacts exactly like `generate`, then hands them to
//! `ansible-playbook`. The engine's exit status becomes ours.

use super::{CommandContext, CompileArgs};
use anyhow::Result;
use clap::Parser;
use runbook::executor::{AnsiblePlaybook, ExecutionAdapter};
use tracing::info;

/// Arguments for the run command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub compile: CompileArgs,

    /// ansible-playbook executable to use
    #[arg(long, env = "RUNBOOK_ANSIBLE_PLAYBOOK")]
    pub ansible_playbook: Option<String>,

    /// Extra arguments passed through to ansible-playbook (after `--`)
    #[arg(last = true)]
    pub extra_args: Vec<String>,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, ctx: &mut CommandContext) -> Result<i32> {
        let adapter = self.adapter(ctx);
        self.execute_with(ctx, &adapter).await
    }

    /// Execute against a specific adapter
    pub async fn execute_with<A>(&self, ctx: &mut CommandContext, adapter: &A) -> Result<i32>
    where
        A: ExecutionAdapter + ?Sized,
    {
        let (artifacts, written) = self.compile.compile_and_write(ctx)?;
        ctx.output.generated(&written, artifacts.debug);
        ctx.output.flush();

        info!(debug = artifacts.debug, "handing artifacts to the engine");
        adapter
            .run(&written.inventory_path, &written.playbook_path, artifacts.debug)
            .await?;

        ctx.output.completed(&self.program(ctx));
        Ok(0)
    }

    fn program(&self, ctx: &CommandContext) -> String {
        self.ansible_playbook
            .clone()
            .unwrap_or_else(|| ctx.config.execution.executable.clone())
    }

    fn adapter(&self, ctx: &CommandContext) -> AnsiblePlaybook {
        let mut execution = ctx.config.execution.clone();
        execution.executable = self.program(ctx);
        execution.extra_args.extend(self.extra_args.iter().cloned());
        AnsiblePlaybook::from_config(&execution)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use async_trait::async_trait;
    use runbook::error::Error;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(PathBuf, PathBuf, bool)>>,
        fail_with: Option<i32>,
    }

    #[async_trait]
    impl ExecutionAdapter for Recorder {
        async fn run(&self, inventory: &Path, playbook: &Path, debug: bool) -> runbook::error::Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push((inventory.to_path_buf(), playbook.to_path_buf(), debug));
            match self.fail_with {
                Some(code) => Err(Error::ExecutionFailed {
                    program: "recorder".into(),
                    exit_code: Some(code),
                }),
                None => Ok(()),
            }
        }
    }

    fn run_args(source: &Path, out: &Path, debug: bool) -> RunArgs {
        let mut compile = compile_args(source, out);
        compile.debug = debug;
        RunArgs {
            compile,
            ansible_playbook: None,
            extra_args: vec![],
        }
    }

    #[tokio::test]
    async fn test_run_passes_written_paths() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("deploy.toml");
        std::fs::write(&source, SAMPLE_RUNBOOK).unwrap();
        let out = dir.path().join("out");

        let recorder = Recorder::default();
        let code = run_args(&source, &out, true)
            .execute_with(&mut quiet_context(), &recorder)
            .await
            .unwrap();

        assert_eq!(code, 0);
        let calls = recorder.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], (out.join("hosts"), out.join("playbook.yml"), true));
    }

    #[tokio::test]
    async fn test_run_propagates_engine_status() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("deploy.toml");
        std::fs::write(&source, SAMPLE_RUNBOOK).unwrap();

        let recorder = Recorder {
            fail_with: Some(2),
            ..Recorder::default()
        };
        let err = run_args(&source, &dir.path().join("out"), false)
            .execute_with(&mut quiet_context(), &recorder)
            .await
            .unwrap_err();

        let err = err.downcast_ref::<Error>().unwrap();
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_adapter_not_called_for_invalid_runbook() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("deploy.toml");
        std::fs::write(&source, "name = \"broken\"\n[[hosts]]\naddr = \"h\"\n[[steps]]\nname = \"s\"\n").unwrap();

        let recorder = Recorder::default();
        let result = run_args(&source, &dir.path().join("out"), false)
            .execute_with(&mut quiet_context(), &recorder)
            .await;

        assert!(result.is_err());
        assert!(recorder.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_adapter_merges_extra_args() {
        let ctx = quiet_context();
        let args = RunArgs {
            compile: compile_args(Path::new("r.toml"), Path::new("out")),
            ansible_playbook: Some("/opt/bin/ansible-playbook".into()),
            extra_args: vec!["--check".into()],
        };
        let adapter = args.adapter(&ctx);
        assert_eq!(adapter.executable(), "/opt/bin/ansible-playbook");
        assert_eq!(
            adapter.args(Path::new("h"), Path::new("p"), false),
            vec!["-i", "h", "p", "--check"]
        );
    }
}
