//! Interactive yes/no prompt boundary

use async_trait::async_trait;
use dialoguer::{Select, theme::ColorfulTheme};

use crate::error::{Error, Result};

/// Asks the operator a yes/no question
#[async_trait]
pub trait ConfirmPrompt: Send + Sync {
    /// `true` when the operator answers "yes".
    async fn confirm(&self, message: &str) -> Result<bool>;
}

/// Terminal prompt backed by dialoguer
pub struct TerminalPrompt;

#[async_trait]
impl ConfirmPrompt for TerminalPrompt {
    async fn confirm(&self, message: &str) -> Result<bool> {
        let message = message.to_string();
        // dialoguer blocks on stdin, keep it off the runtime threads
        let selection = tokio::task::spawn_blocking(move || {
            Select::with_theme(&ColorfulTheme::default())
                .with_prompt(message)
                .items(&["yes", "no"])
                .default(1)
                .interact()
        })
        .await
        .map_err(|e| Error::Prompt(e.to_string()))??;

        Ok(selection == 0)
    }
}
