//! Shared helpers for command handlers.

use std::io::IsTerminal;

use secrecy::SecretString;

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()?;
    Ok(confirmed)
}

/// Whether an operator can answer prompts on this terminal.
pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal()
}

/// Read a password from the terminal without echo.
pub fn prompt_password(prompt: &str) -> Result<SecretString, CliError> {
    let password = rpassword::prompt_password(prompt)?;
    if password.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "empty password".into(),
        });
    }
    Ok(SecretString::from(password))
}
