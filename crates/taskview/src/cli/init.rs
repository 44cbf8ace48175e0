/*
[INPUT]:  Interactive user input via CLI
[OUTPUT]: Generated YAML configuration file
[POS]:    CLI initialization layer
[UPDATE]: When TaskViewConfig schema changes
*/

use std::path::PathBuf;

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Input, Select, theme::ColorfulTheme};
use url::Url;

use taskview::config::{DEFAULT_SERVICE_URL, LogConfig, TaskViewConfig, TimeoutConfig};

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

pub fn run_init(output: PathBuf) -> Result<()> {
    println!("{}", style("Welcome to taskview init").bold().cyan());
    println!(
        "{}",
        style("This will guide you through creating a configuration file.").dim()
    );

    let theme = ColorfulTheme::default();

    let service_url: String = Input::with_theme(&theme)
        .with_prompt("Task service URL")
        .default(DEFAULT_SERVICE_URL.to_string())
        .validate_with(|input: &String| -> Result<(), String> {
            match Url::parse(input) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
                Ok(url) => Err(format!("unsupported scheme: {}", url.scheme())),
                Err(err) => Err(err.to_string()),
            }
        })
        .interact_text()?;

    println!("\n{}", style("--- Timeouts (seconds) ---").bold());
    let defaults = TimeoutConfig::default();
    let request_secs: u64 = Input::with_theme(&theme)
        .with_prompt("HTTP request timeout")
        .default(defaults.request_secs)
        .interact_text()?;
    let connect_secs: u64 = Input::with_theme(&theme)
        .with_prompt("Connect timeout")
        .default(defaults.connect_secs)
        .interact_text()?;
    let operation_secs: u64 = Input::with_theme(&theme)
        .with_prompt("Operation timeout")
        .default(defaults.operation_secs)
        .interact_text()?;

    println!("\n{}", style("--- Logging ---").bold());
    let level_selection = Select::with_theme(&theme)
        .with_prompt("Log level")
        .items(&LOG_LEVELS[..])
        .default(2)
        .interact()?;

    let config = TaskViewConfig {
        service_url,
        timeouts: TimeoutConfig {
            request_secs,
            connect_secs,
            operation_secs,
        },
        log: LogConfig {
            level: LOG_LEVELS[level_selection].to_string(),
            file: None,
        },
    };
    config.validate().context("generated config is invalid")?;

    let yaml = serde_yaml::to_string(&config).context("failed to serialize config to YAML")?;
    if let Some(parent) = output.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&output, yaml)
        .with_context(|| format!("failed to write config to {}", output.display()))?;

    println!("\n{}", style("SUCCESS!").bold().green());
    println!("Configuration written to: {}", style(output.display()).cyan());

    Ok(())
}
