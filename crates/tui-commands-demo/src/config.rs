use std::str::FromStr;
use std::{env, path::PathBuf};

use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use tui_commands::HelpInfo;

/// Demo configuration loaded from tui-commands-demo.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_help_title")]
    pub help_title: String,
    #[serde(default = "default_help_about")]
    pub help_about: Option<String>,
    #[serde(default)]
    pub help_license: Option<String>,
    /// Colour of binding hints in the palette; "none" falls back to dim text
    #[serde(default = "default_accent")]
    pub accent: String,
}

fn default_help_title() -> String {
    "tui-commands demo".to_string()
}

fn default_help_about() -> Option<String> {
    Some(
        "A small application showing the command palette, binding hints \
         and contextual help."
            .to_string(),
    )
}

fn default_accent() -> String {
    "cyan".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            help_title: default_help_title(),
            help_about: default_help_about(),
            help_license: None,
            accent: default_accent(),
        }
    }
}

impl Config {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        const CONFIG_FILE: &str = "tui-commands-demo.toml";

        // Try current directory first
        if let Ok(content) = std::fs::read_to_string(CONFIG_FILE)
            && let Ok(config) = toml::from_str(&content)
        {
            log::debug!("Loaded config from {}", CONFIG_FILE);
            return config;
        }

        // Try home directory
        if let Some(home) = env::var_os("HOME") {
            let home_config = PathBuf::from(home).join(format!(".{}", CONFIG_FILE));
            if let Ok(content) = std::fs::read_to_string(&home_config)
                && let Ok(config) = toml::from_str(&content)
            {
                log::debug!("Loaded config from {}", home_config.display());
                return config;
            }
        }

        log::debug!("Using default config");
        Self::default()
    }

    /// Sections for the help document
    pub fn help_info(&self) -> HelpInfo {
        HelpInfo {
            title: Some(self.help_title.clone()).filter(|title| !title.is_empty()),
            about: self.help_about.clone(),
            license: self.help_license.clone(),
        }
    }

    /// The accent colour, if one is configured and valid
    pub fn accent_color(&self) -> Option<Color> {
        if self.accent.eq_ignore_ascii_case("none") {
            return None;
        }
        match Color::from_str(&self.accent) {
            Ok(color) => Some(color),
            Err(_) => {
                log::warn!("Unknown accent colour {:?}, using dim hints", self.accent);
                None
            }
        }
    }
}
