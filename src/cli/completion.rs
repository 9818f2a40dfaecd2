//! Shell completion generation for dtdhint
//!
//! Generates completion scripts for bash, zsh, fish, PowerShell and elvish.
//! For bash, element names after `hint -g FILE` are completed from the
//! `[elements]` table of that declarations file.

use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::CliArgs;
use crate::error::{HintError, Result};

const BIN_NAME: &str = "dtdhint";

/// Generate a shell completion script
pub fn generate_completion(shell: Shell) -> Result<String> {
    let basic = render(shell)?;
    match shell {
        Shell::Bash => Ok(format!("{basic}{BASH_ELEMENT_COMPLETION}")),
        _ => Ok(basic),
    }
}

fn render(shell: Shell) -> Result<String> {
    let mut cmd = CliArgs::command();
    let mut buffer = Vec::new();
    generate(shell, &mut cmd, BIN_NAME, &mut buffer);
    String::from_utf8(buffer)
        .map_err(|e| HintError::Generic(format!("Completion script is not UTF-8: {e}")))
}

/// Element-name completion for `dtdhint hint -g FILE <TAB>`
const BASH_ELEMENT_COMPLETION: &str = r#"
# Element names declared in the [elements] table of a declarations file
_dtdhint_list_elements() {
    sed -n '/^\[elements\]/,/^\[/{s/^[[:space:]]*\([A-Za-z_:][-A-Za-z0-9_:.]*\)[[:space:]]*=.*/\1/p}' "$1" 2>/dev/null
}

_dtdhint_enhanced() {
    local cur prev words cword
    _init_completion || return

    if [[ "${words[1]}" == "hint" && "$cur" != -* ]]; then
        local i grammar=""
        for (( i = 2; i < cword; i++ )); do
            if [[ "${words[i]}" == "-g" || "${words[i]}" == "--grammar" ]]; then
                grammar="${words[i+1]}"
            fi
        done
        if [[ -n "$grammar" && "$prev" != "-g" && "$prev" != "--grammar" && "$prev" != "-p" && "$prev" != "--prefix" ]]; then
            COMPREPLY=($(compgen -W "$(_dtdhint_list_elements "$grammar")" -- "$cur"))
            return 0
        fi
    fi

    _dtdhint "$@"
}

complete -F _dtdhint_enhanced -o bashdefault -o default dtdhint
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_includes_element_completion() {
        let script = generate_completion(Shell::Bash).unwrap();
        assert!(script.contains("_dtdhint()"));
        assert!(script.contains("_dtdhint_list_elements"));
    }

    #[test]
    fn test_other_shells() {
        for shell in [Shell::Zsh, Shell::Fish] {
            let script = generate_completion(shell).unwrap();
            assert!(script.contains("dtdhint"));
            assert!(!script.contains("_dtdhint_enhanced"));
        }
    }
}
