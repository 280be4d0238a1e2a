//! Shell completions for the runbook CLI
//!
//! Provides shell completion scripts for bash, zsh, fish, powershell, and elvish.

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io;

use crate::cli::Cli;

const BIN_NAME: &str = "runbook";

/// Generate shell completions and write to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, BIN_NAME, &mut io::stdout());
}

/// Get completions as a string
#[cfg_attr(not(test), allow(dead_code))]
pub fn get_completions(shell: Shell) -> String {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    generate(shell, &mut cmd, BIN_NAME, &mut buf);
    String::from_utf8(buf).unwrap_or_default()
}

/// Print installation instructions for completions
pub fn print_installation_instructions(shell: Shell) {
    match shell {
        Shell::Bash => {
            println!("# Bash completion installation:");
            println!("# Add the following to your ~/.bashrc:");
            println!();
            println!("eval \"$(runbook completions bash)\"");
            println!();
            println!("# Or save to file:");
            println!("runbook completions bash > ~/.local/share/bash-completion/completions/runbook");
        }
        Shell::Zsh => {
            println!("# Zsh completion installation:");
            println!("mkdir -p ~/.zsh/completions");
            println!("echo 'fpath=(~/.zsh/completions $fpath)' >> ~/.zshrc");
            println!("echo 'autoload -Uz compinit && compinit' >> ~/.zshrc");
            println!("runbook completions zsh > ~/.zsh/completions/_runbook");
        }
        Shell::Fish => {
            println!("# Fish completion installation:");
            println!("runbook completions fish > ~/.config/fish/completions/runbook.fish");
        }
        Shell::PowerShell => {
            println!("# PowerShell completion installation:");
            println!("# Add the following to your PowerShell profile ($PROFILE):");
            println!();
            println!("Invoke-Expression (& runbook completions powershell | Out-String)");
        }
        Shell::Elvish => {
            println!("# Elvish completion installation:");
            println!("# Add the following to ~/.elvish/rc.elv:");
            println!();
            println!("eval (runbook completions elvish | slurp)");
        }
        _ => {
            println!("# Unknown shell. Please refer to your shell's documentation for completion installation.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_completions() {
        let completions = get_completions(Shell::Bash);
        assert!(completions.contains("runbook"));
        assert!(completions.contains("complete"));
    }

    #[test]
    fn test_zsh_completions() {
        let completions = get_completions(Shell::Zsh);
        assert!(completions.contains("compdef") || completions.contains("_runbook"));
    }

    #[test]
    fn test_fish_completions() {
        let completions = get_completions(Shell::Fish);
        assert!(completions.contains("runbook"));
        assert!(completions.contains("generate"));
    }
}
