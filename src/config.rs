//! Runtime knobs resolved from flags and the environment.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use clap::ValueEnum;
use designer::consts::{MODEL_TO_TEXT_DEBOUNCE_MS, TEXT_TO_MODEL_DEBOUNCE_MS};
use designer::doc::DeletePolicy;
use designer::engine::EditorConfig;
use designer::render::ViewMode;

/// Debounce for text→model sync, in milliseconds.
pub const DEBOUNCE_ENV: &str = "FORMDESK_DEBOUNCE_MS";

/// Delay for model→text pushes, in milliseconds.
pub const PUSH_DELAY_ENV: &str = "FORMDESK_PUSH_DELAY_MS";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum DeletePolicyArg {
    /// Remove every column in the element's row.
    #[default]
    WholeRow,
    /// Remove only the element's column.
    ColumnOnly,
}

impl From<DeletePolicyArg> for DeletePolicy {
    fn from(arg: DeletePolicyArg) -> Self {
        match arg {
            DeletePolicyArg::WholeRow => Self::WholeRow,
            DeletePolicyArg::ColumnOnly => Self::ColumnOnly,
        }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Build the editor config. An explicit debounce flag beats the environment.
#[must_use]
pub fn editor_config(debounce_ms: Option<u64>, policy: DeletePolicyArg, initial_mode: ViewMode) -> EditorConfig {
    let debounce_ms = debounce_ms.unwrap_or_else(|| env_parse(DEBOUNCE_ENV, TEXT_TO_MODEL_DEBOUNCE_MS));
    let push_ms = env_parse(PUSH_DELAY_ENV, MODEL_TO_TEXT_DEBOUNCE_MS);
    EditorConfig {
        text_debounce: Duration::from_millis(debounce_ms),
        model_debounce: Duration::from_millis(push_ms),
        delete_policy: policy.into(),
        initial_mode,
        ..EditorConfig::default()
    }
}
