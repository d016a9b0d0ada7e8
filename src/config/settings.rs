//! User settings for the expense tracker
//!
//! Manages user preferences including the currency symbol, the payment mode
//! vocabulary, the suggested categories and the default table ordering.

use serde::{Deserialize, Serialize};

use super::paths::ExpensePaths;
use crate::error::ExpenseError;
use crate::query::SortSpec;

/// Payment modes offered when none are configured
pub const DEFAULT_PAYMENT_MODES: &[&str] = &[
    "Cash",
    "Cheque",
    "Credit Card",
    "Debit Card",
    "Online Transfer",
    "UPI",
    "Paytm",
    "Google Pay",
    "PhonePe",
    "Other",
];

/// Suggested categories, extended at runtime by whatever the store contains
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Food",
    "Travel",
    "Utilities",
    "Entertainment",
    "Education",
    "Shopping",
    "Health",
    "Salary",
    "Gifts",
    "Other",
];

/// User settings for the expense tracker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when formatting amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Accepted payment modes
    #[serde(default = "default_payment_modes")]
    pub payment_modes: Vec<String>,

    /// Suggested categories
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,

    /// Default sort column for listings (falls back to "id" when unknown)
    #[serde(default = "default_sort_column")]
    pub default_sort_column: String,

    /// Default sort direction for listings (falls back to "asc" when unknown)
    #[serde(default = "default_sort_direction")]
    pub default_sort_direction: String,

    /// Maximum rows printed by `list` (0 = unlimited)
    #[serde(default)]
    pub table_row_limit: usize,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "₹".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_payment_modes() -> Vec<String> {
    DEFAULT_PAYMENT_MODES.iter().map(|s| s.to_string()).collect()
}

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect()
}

fn default_sort_column() -> String {
    "id".to_string()
}

fn default_sort_direction() -> String {
    "asc".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            payment_modes: default_payment_modes(),
            categories: default_categories(),
            default_sort_column: default_sort_column(),
            default_sort_direction: default_sort_direction(),
            table_row_limit: 0,
        }
    }
}

impl Settings {
    /// The configured default ordering, leniently parsed
    pub fn default_sort(&self) -> SortSpec {
        SortSpec::parse_lenient(&self.default_sort_column, &self.default_sort_direction)
    }

    /// Check whether a payment mode is accepted (case-insensitive)
    pub fn is_known_payment_mode(&self, mode: &str) -> bool {
        self.payment_modes
            .iter()
            .any(|m| m.eq_ignore_ascii_case(mode.trim()))
    }

    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &ExpensePaths) -> Result<Self, ExpenseError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                ExpenseError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                ExpenseError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &ExpensePaths) -> Result<(), ExpenseError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            ExpenseError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            ExpenseError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{SortColumn, SortDirection};
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency_symbol, "₹");
        assert_eq!(settings.payment_modes.len(), 10);
        assert!(settings.categories.contains(&"Food".to_string()));
        assert_eq!(settings.table_row_limit, 0);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ExpensePaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.currency_symbol = "$".into();
        settings.default_sort_column = "amount".into();
        settings.default_sort_direction = "desc".into();

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.currency_symbol, "$");
        let sort = loaded.default_sort();
        assert_eq!(sort.column, SortColumn::Amount);
        assert_eq!(sort.direction, SortDirection::Desc);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"currency_symbol": "€"}"#).unwrap();
        assert_eq!(settings.currency_symbol, "€");
        assert_eq!(settings.date_format, "%Y-%m-%d");
        assert_eq!(settings.payment_modes.len(), DEFAULT_PAYMENT_MODES.len());
    }

    #[test]
    fn test_unknown_default_sort_falls_back() {
        let mut settings = Settings::default();
        settings.default_sort_column = "colour".into();
        settings.default_sort_direction = "sideways".into();
        assert_eq!(settings.default_sort(), SortSpec::default());
    }

    #[test]
    fn test_payment_mode_lookup() {
        let settings = Settings::default();
        assert!(settings.is_known_payment_mode("upi"));
        assert!(settings.is_known_payment_mode("Credit Card"));
        assert!(!settings.is_known_payment_mode("Barter"));
    }
}
