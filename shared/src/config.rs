use questmas_atoms::TestMode;

use crate::photos::captions::Locale;

pub const DEFAULT_TABLE_NAME: &str = "questmas";

/// Runtime configuration, read from the environment at cold start.
#[derive(Debug, Clone)]
pub struct Config {
    pub table_name: String,
    pub test_mode: TestMode,
    /// Every door with a task opens regardless of its unlock rule.
    pub open_all_doors: bool,
    pub default_locale: Locale,
    pub allowed_origin: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table_name: DEFAULT_TABLE_NAME.to_string(),
            test_mode: TestMode::default(),
            open_all_doors: false,
            default_locale: Locale::En,
            allowed_origin: "*".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Malformed values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let test_enabled = read("QUESTMAS_TEST_MODE")
            .map(|v| parse_flag("QUESTMAS_TEST_MODE", &v, false))
            .unwrap_or(false);

        let day_offset = read("QUESTMAS_TEST_DATE_OFFSET")
            .map(|v| {
                v.parse::<i64>().unwrap_or_else(|_| {
                    tracing::warn!("⚠️ Ignoring QUESTMAS_TEST_DATE_OFFSET={}: not a whole number of days", v);
                    0
                })
            })
            .unwrap_or(0);

        let open_all_doors = read("QUESTMAS_OPEN_ALL_DOORS")
            .map(|v| parse_flag("QUESTMAS_OPEN_ALL_DOORS", &v, test_enabled))
            .unwrap_or(test_enabled);

        let default_locale = read("QUESTMAS_DEFAULT_LOCALE")
            .map(|v| Locale::from_tag(&v))
            .unwrap_or(defaults.default_locale);

        Self {
            table_name: read("TABLE_NAME").unwrap_or(defaults.table_name),
            test_mode: TestMode {
                enabled: test_enabled,
                day_offset,
            },
            open_all_doors,
            default_locale,
            allowed_origin: read("ALLOWED_ORIGIN").unwrap_or(defaults.allowed_origin),
        }
    }
}

fn parse_flag(key: &str, value: &str, default: bool) -> bool {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            tracing::warn!("⚠️ Ignoring {}={}: expected true or false", key, value);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let cfg = config(&[]);
        assert_eq!(cfg.table_name, "questmas");
        assert_eq!(cfg.test_mode, TestMode::default());
        assert!(!cfg.open_all_doors);
        assert_eq!(cfg.default_locale, Locale::En);
        assert_eq!(cfg.allowed_origin, "*");
    }

    #[test]
    fn test_mode_opens_all_doors_unless_overridden() {
        let cfg = config(&[("QUESTMAS_TEST_MODE", "true"), ("QUESTMAS_TEST_DATE_OFFSET", "-3")]);
        assert_eq!(cfg.test_mode, TestMode { enabled: true, day_offset: -3 });
        assert!(cfg.open_all_doors);

        let cfg = config(&[("QUESTMAS_TEST_MODE", "1"), ("QUESTMAS_OPEN_ALL_DOORS", "false")]);
        assert!(cfg.test_mode.enabled);
        assert!(!cfg.open_all_doors);
    }

    #[test]
    fn malformed_values_fall_back() {
        let cfg = config(&[
            ("TABLE_NAME", "  "),
            ("QUESTMAS_TEST_MODE", "maybe"),
            ("QUESTMAS_TEST_DATE_OFFSET", "two days"),
            ("QUESTMAS_DEFAULT_LOCALE", "de-CH"),
        ]);
        assert_eq!(cfg.table_name, "questmas");
        assert!(!cfg.test_mode.enabled);
        assert_eq!(cfg.test_mode.day_offset, 0);
        assert_eq!(cfg.default_locale, Locale::De);
    }
}
