//! Interactive setup that writes a starter `journey.toml`.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::{Confirm, Input};

use crate::config::{JourneyConfig, CONFIG_FILE_NAME};

pub fn handle_init() -> Result<()> {
    eprintln!("{}", "Setting up journey".bold());
    eprintln!();

    let config_path = Path::new(CONFIG_FILE_NAME);
    if config_path.exists() {
        let overwrite = Confirm::new()
            .with_prompt(format!("{} already exists. Overwrite?", CONFIG_FILE_NAME))
            .default(false)
            .interact()?;
        if !overwrite {
            eprintln!("{}", "Keeping the existing config.".dimmed());
            return Ok(());
        }
    }

    let data: String = Input::new()
        .with_prompt("Log file to analyze")
        .default("logs.jsonl".to_string())
        .interact_text()?;

    let timeout: String = Input::new()
        .with_prompt("Session timeout (e.g. 30m, 2h)")
        .default("30m".to_string())
        .interact_text()?;

    let port: u16 = Input::new()
        .with_prompt("Port for journey serve")
        .default(4170)
        .interact_text()?;

    let content = format!(
        "# journey project configuration\n\
         data = \"{}\"\n\
         session_timeout = \"{}\"\n\
         \n\
         [serve]\n\
         port = {}\n",
        data, timeout, port
    );

    // A timeout humantime cannot parse should fail now, not on the next run.
    toml::from_str::<JourneyConfig>(&content)
        .with_context(|| format!("Invalid settings for {}", CONFIG_FILE_NAME))?;

    std::fs::write(config_path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    eprintln!();
    eprintln!("  {} Wrote {}", "✓".bright_green(), CONFIG_FILE_NAME.bold());
    eprintln!(
        "  {} Try {} next",
        "->".dimmed(),
        "journey list".bright_cyan()
    );

    Ok(())
}
