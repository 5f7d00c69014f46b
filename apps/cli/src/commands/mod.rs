//! Subcommand implementations.

use std::io::{self, BufRead, Write};

use anyhow::{anyhow, Context};
use ivss_client::{ApiRetryClass, ClientError};

pub mod arco;
pub mod auth;
pub mod engine;
pub mod profile;
pub mod vehicles;

/// Turn a client error into a command failure with a hint on what to do
/// next: sign in again, or retry a transient failure.
pub(crate) fn client_failure(err: ClientError) -> anyhow::Error {
    match err.retry_class() {
        ApiRetryClass::ReauthRequired => anyhow!("{} Run `ivss login`.", err),
        ApiRetryClass::Retryable => anyhow!("{}. Try again later.", err),
        ApiRetryClass::Permanent => anyhow::Error::new(err),
    }
}

/// Print `label` and read one line from stdin, without the line ending.
/// `None` at end of input.
pub(crate) fn prompt_line(label: &str) -> anyhow::Result<Option<String>> {
    print!("{}", label);
    io::stdout().flush().context("failed to flush stdout")?;

    let mut line = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
}

/// `y`/`yes` (any case) answers affirmatively; anything else declines.
pub(crate) fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_answers() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
    }

    #[test]
    fn session_errors_point_at_login() {
        let message = client_failure(ClientError::SessionInvalid).to_string();
        assert!(message.ends_with("Run `ivss login`."));

        let message = client_failure(ClientError::failure("Placas ya registradas")).to_string();
        assert_eq!(message, "Placas ya registradas");
    }

    #[test]
    fn network_errors_suggest_retrying() {
        let message = client_failure(ClientError::network("connection refused")).to_string();
        assert_eq!(
            message,
            "Could not connect to the server: connection refused. Try again later."
        );
    }
}
