//! Config subcommand handlers.

use dialoguer::{Confirm, Input};

use nateos_core::default_api_url;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, InitArgs, OutputFormat};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = match global.output {
                OutputFormat::Table | OutputFormat::Plain => {
                    let active = config::active_profile_name(global, &cfg);
                    let body = toml::to_string_pretty(&cfg)
                        .map_err(|e| CliError::Encode(e.to_string()))?;
                    format!("# active profile: {active}\n{body}")
                }
                format => output::render_structured(format, &cfg)?.unwrap_or_default(),
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init(init) => init_profile(&init, global),
    }
}

fn init_profile(init: &InitArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_path();
    let mut cfg = config::load_config_or_default();

    let profile = if init.non_interactive {
        let api_url = global
            .api_url
            .clone()
            .unwrap_or_else(|| default_api_url().to_string());
        config::parse_api_url(&api_url)?;
        Profile {
            api_url,
            ca_cert: None,
            insecure: global.insecure.then_some(true),
            timeout: global.timeout,
        }
    } else {
        eprintln!("NateOS console: configuration wizard");
        eprintln!("   Config path: {}\n", path.display());
        prompt_profile(global, cfg.profiles.get(&init.name))?
    };

    cfg.profiles.insert(init.name.clone(), profile);
    if cfg.profiles.len() == 1 || cfg.default_profile.is_none() {
        cfg.default_profile = Some(init.name.clone());
    }
    save(&cfg)?;

    if !global.quiet {
        eprintln!("Profile '{}' saved to {}", init.name, path.display());
    }
    Ok(())
}

fn prompt_profile(global: &GlobalOpts, existing: Option<&Profile>) -> Result<Profile, CliError> {
    let initial = global
        .api_url
        .clone()
        .or_else(|| existing.map(|p| p.api_url.clone()))
        .unwrap_or_else(|| default_api_url().to_string());

    let api_url: String = Input::new()
        .with_prompt("API URL")
        .default(initial)
        .validate_with(|input: &String| {
            config::parse_api_url(input)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()
        .map_err(prompt_err)?;

    let insecure = if api_url.starts_with("https://") {
        Confirm::new()
            .with_prompt("Accept self-signed certificates?")
            .default(existing.and_then(|p| p.insecure).unwrap_or(false))
            .interact()
            .map_err(prompt_err)?
    } else {
        false
    };

    Ok(Profile {
        api_url,
        ca_cert: existing.and_then(|p| p.ca_cert.clone()),
        insecure: insecure.then_some(true),
        timeout: existing.and_then(|p| p.timeout),
    })
}

fn save(cfg: &Config) -> Result<(), CliError> {
    config::save_config(cfg)?;
    Ok(())
}
