//! `KEY=VALUE` run options
//!
//! `func`, `bench` and `auth` take trailing `env=<name>` / `tag=<name>`
//! pairs. Arguments are trimmed and lowercased before splitting.

use crate::error::{Error, Result};

/// Keys accepted in `KEY=VALUE` arguments
pub const KNOWN_KEYS: &[&str] = &["env", "tag"];

/// Parsed `KEY=VALUE` arguments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub env: Option<String>,
    pub tag: Option<String>,
}

impl RunOptions {
    /// Parse trailing arguments. Later duplicates win.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let mut options = RunOptions::default();

        for arg in args {
            let arg = arg.as_ref().trim().to_lowercase();
            let Some((key, value)) = arg.split_once('=') else {
                return Err(Error::InvalidArgument(format!(
                    "'{}' is not of the form KEY=VALUE",
                    arg
                )));
            };

            let value = value.trim();
            let value = (!value.is_empty()).then(|| value.to_string());
            match key.trim() {
                "env" => options.env = value,
                "tag" => options.tag = value,
                other => {
                    return Err(Error::InvalidArgument(format!(
                        "unknown option '{}' (expected one of: {})",
                        other,
                        KNOWN_KEYS.join(", ")
                    )));
                }
            }
        }

        Ok(options)
    }
}
