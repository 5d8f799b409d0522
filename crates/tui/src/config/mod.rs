use clap::Parser;
use engine::{AllocationSchema, Rgb};
use serde::Deserialize;

use crate::error::Result;

const DEFAULT_CONFIG_PATH: &str = "config/allocation.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `accounts` (Stocks/Bonds/Cash) or `funds` (Equities/Fixed Income/Cash).
    pub preset: String,
    pub entry_label: Option<String>,
    /// Replaces the preset's categories when not empty.
    pub categories: Vec<CategoryConfig>,
    pub highlight: Option<String>,
    pub default_splits: Option<Vec<u8>>,
    pub log_file: Option<String>,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    /// `#RRGGBB`; derived from the name when missing.
    pub color: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            preset: "accounts".to_string(),
            entry_label: None,
            categories: Vec::new(),
            highlight: None,
            default_splits: None,
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Builds the form schema: the preset, with any overrides applied.
    pub fn schema(&self) -> Result<AllocationSchema> {
        let preset = AllocationSchema::from_preset(&self.preset)?;
        if self.entry_label.is_none()
            && self.categories.is_empty()
            && self.highlight.is_none()
            && self.default_splits.is_none()
        {
            return Ok(preset);
        }

        let mut builder = AllocationSchema::builder().entry_label(
            self.entry_label
                .clone()
                .unwrap_or_else(|| preset.entry_label().to_string()),
        );

        if self.categories.is_empty() {
            for category in preset.categories() {
                builder = builder.category(category.name.clone(), Some(category.color));
            }
        } else {
            for category in &self.categories {
                let color = category
                    .color
                    .as_deref()
                    .map(str::parse::<Rgb>)
                    .transpose()?;
                builder = builder.category(category.name.clone(), color);
            }
        }

        let highlight = self.highlight.clone().or_else(|| {
            let name = preset
                .highlighted()
                .and_then(|i| preset.category(i))
                .map(|c| c.name.clone())?;
            let kept = self.categories.is_empty()
                || self.categories.iter().any(|c| c.name.trim() == name);
            kept.then_some(name)
        });
        if let Some(highlight) = highlight {
            builder = builder.highlight(highlight);
        }
        if let Some(splits) = &self.default_splits {
            builder = builder.default_splits(splits.clone());
        }

        Ok(builder.build()?)
    }
}

#[derive(Debug, Parser)]
#[command(name = "allocation_tui", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override preset (accounts or funds).
    #[arg(long)]
    preset: Option<String>,
    /// Write logs to this file (nothing is logged otherwise).
    #[arg(long)]
    log_file: Option<String>,
    /// Override log level (e.g. debug).
    #[arg(long)]
    log_level: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    resolve(Args::parse())
}

fn resolve(args: Args) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("ALLOCATION_TUI"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(preset) = args.preset {
        settings.preset = preset;
    }
    if let Some(log_file) = args.log_file {
        settings.log_file = Some(log_file);
    }
    if let Some(log_level) = args.log_level {
        settings.log_level = log_level;
    }

    // Surface schema mistakes at startup rather than on first render.
    settings.schema()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str, color: Option<&str>) -> CategoryConfig {
        CategoryConfig {
            name: name.to_string(),
            color: color.map(str::to_string),
        }
    }

    #[test]
    fn default_config_uses_accounts_preset() {
        let schema = AppConfig::default().schema().unwrap();
        assert_eq!(schema, AllocationSchema::accounts());
    }

    #[test]
    fn funds_preset_is_selectable() {
        let config = AppConfig {
            preset: "funds".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(config.schema().unwrap(), AllocationSchema::funds());
    }

    #[test]
    fn custom_categories_replace_the_preset() {
        let config = AppConfig {
            entry_label: Some("Portfolio".to_string()),
            categories: vec![
                category("Cash", Some("#C99213")),
                category("Gold", None),
            ],
            default_splits: Some(vec![20, 80]),
            ..AppConfig::default()
        };
        let schema = config.schema().unwrap();
        assert_eq!(schema.entry_label(), "Portfolio");
        assert_eq!(schema.category_names().collect::<Vec<_>>(), ["Cash", "Gold"]);
        assert_eq!(schema.highlighted(), Some(0));
        assert_eq!(schema.default_splits(), [20, 80]);
    }

    #[test]
    fn preset_highlight_is_dropped_when_category_is_gone() {
        let config = AppConfig {
            categories: vec![category("Gold", None), category("Silver", None)],
            ..AppConfig::default()
        };
        assert_eq!(config.schema().unwrap().highlighted(), None);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let unknown = AppConfig {
            preset: "crypto".to_string(),
            ..AppConfig::default()
        };
        assert!(unknown.schema().is_err());

        let bad_color = AppConfig {
            categories: vec![category("Gold", Some("gold"))],
            ..AppConfig::default()
        };
        assert!(bad_color.schema().is_err());

        let bad_splits = AppConfig {
            default_splits: Some(vec![50, 50, 50]),
            ..AppConfig::default()
        };
        assert!(bad_splits.schema().is_err());
    }

    #[test]
    fn cli_overrides_win() {
        let args = Args::try_parse_from([
            "allocation_tui",
            "--config",
            "does/not/exist.toml",
            "--preset",
            "funds",
            "--log-level",
            "debug",
        ])
        .unwrap();
        let config = resolve(args).unwrap();
        assert_eq!(config.preset, "funds");
        assert_eq!(config.log_level, "debug");
        assert!(config.log_file.is_none());
    }
}
