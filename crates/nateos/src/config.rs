//! CLI configuration: thin wrapper around `nateos_config`.
//!
//! Adds resolution that respects `GlobalOpts` overrides (--api-url,
//! --insecure, --timeout) on top of the selected profile.

use std::time::Duration;

use nateos_core::{ConsoleConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use nateos_config::{
    Config, Profile, config_path, load_config_or_default, parse_api_url, save_config,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the `ConsoleConfig` for this invocation.
///
/// Precedence: flag > env > profile > `[defaults]` > built-in.
pub fn resolve_console_config(global: &GlobalOpts, cfg: &Config) -> Result<ConsoleConfig, CliError> {
    let selected = cfg.profile(global.profile.as_deref()).map_err(|e| match e {
        nateos_config::ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
            name,
            available: available_profiles(cfg),
        },
        other => other.into(),
    })?;

    let mut console = match selected {
        Some((name, profile)) => {
            tracing::debug!(profile = name, "using profile");
            nateos_config::profile_to_console_config(profile, &cfg.defaults)?
        }
        None => nateos_config::defaults_to_console_config(&cfg.defaults),
    };

    if let Some(ref url) = global.api_url {
        console.api_url = parse_api_url(url)?;
    }
    if global.insecure {
        console.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        console.timeout = Duration::from_secs(secs);
    }
    Ok(console)
}

fn available_profiles(cfg: &Config) -> String {
    let mut names: Vec<_> = cfg.profiles.keys().map(String::as_str).collect();
    names.sort_unstable();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}
