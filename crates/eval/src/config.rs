//! Engine configuration.
//!
//! Every field has a default, so an empty file (or no file at all) yields
//! the stock behavior.
//!
//! # Example
//!
//! ```toml
//! [physical_financial]
//! indicator_codes = ["2.1.4", "3.2.3"]
//! physical_label = "Physical Report"
//! financial_label = "Financial Report"
//! physical_aliases = ["Physical Accomplishment Report"]
//!
//! [remark_templates]
//! pass = "{code} {name}: compliant"
//! fail = "{code} {name}: not compliant"
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use assay_core::IndicatorStatus;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse engine config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub physical_financial: PhysicalFinancialOverride,
    pub remark_templates: RemarkTemplates,
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

// ──────────────────────────────────────────────
// Physical/Financial override
// ──────────────────────────────────────────────

/// Indicators whose checklist status is decided solely by whether the
/// Physical Report or the Financial Report item is met.
///
/// An item counts as one of the two reports only when its normalized label
/// equals the canonical label or one of the listed aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalFinancialOverride {
    pub indicator_codes: BTreeSet<String>,
    pub physical_label: String,
    pub financial_label: String,
    pub physical_aliases: Vec<String>,
    pub financial_aliases: Vec<String>,
}

const DEFAULT_OVERRIDE_CODES: [&str; 6] = ["2.1.4", "3.2.3", "4.1.6", "4.3.4", "4.5.6", "4.8.4"];

impl Default for PhysicalFinancialOverride {
    fn default() -> Self {
        PhysicalFinancialOverride::with_codes(DEFAULT_OVERRIDE_CODES)
    }
}

impl PhysicalFinancialOverride {
    pub fn with_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PhysicalFinancialOverride {
            indicator_codes: codes.into_iter().map(Into::into).collect(),
            physical_label: "Physical Report".to_string(),
            financial_label: "Financial Report".to_string(),
            physical_aliases: vec!["Physical Accomplishment Report".to_string()],
            financial_aliases: vec!["Financial Accomplishment Report".to_string()],
        }
    }

    /// Canonical labels and aliases for both reports, in authored form.
    pub fn report_labels(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.physical_label.as_str())
            .chain(std::iter::once(self.financial_label.as_str()))
            .chain(self.physical_aliases.iter().map(String::as_str))
            .chain(self.financial_aliases.iter().map(String::as_str))
    }

    pub fn applies_to(&self, indicator_code: &str) -> bool {
        self.indicator_codes.contains(indicator_code.trim())
    }
}

// ──────────────────────────────────────────────
// Remark templates
// ──────────────────────────────────────────────

/// Generic remarks used when an indicator's own remark schema has no entry.
/// `{code}` and `{name}` are replaced with the indicator's code and name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemarkTemplates {
    pub pass: String,
    pub fail: String,
    pub conditional: String,
    pub pending: String,
}

impl Default for RemarkTemplates {
    fn default() -> Self {
        RemarkTemplates {
            pass: "{code} {name}: all requirements met".to_string(),
            fail: "{code} {name}: requirements not met".to_string(),
            conditional: "{code} {name}: conditionally compliant".to_string(),
            pending: "{code} {name}: not yet evaluated".to_string(),
        }
    }
}

impl RemarkTemplates {
    pub fn for_status(&self, status: Option<IndicatorStatus>) -> &str {
        match status {
            Some(IndicatorStatus::Pass) => &self.pass,
            Some(IndicatorStatus::Fail) => &self.fail,
            Some(IndicatorStatus::Conditional) => &self.conditional,
            None => &self.pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_config_uses_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(config.physical_financial.applies_to("4.8.4"));
        assert!(!config.physical_financial.applies_to("1.1.1"));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [physical_financial]
            indicator_codes = ["9.9.9"]

            [remark_templates]
            fail = "{code} failed"
            "#,
        )
        .unwrap();
        assert!(config.physical_financial.applies_to("9.9.9"));
        assert!(!config.physical_financial.applies_to("4.8.4"));
        assert_eq!(config.physical_financial.physical_label, "Physical Report");
        assert_eq!(
            config.physical_financial.physical_aliases,
            vec!["Physical Accomplishment Report".to_string()]
        );
        assert_eq!(config.remark_templates.fail, "{code} failed");
        assert_eq!(config.remark_templates.pass, RemarkTemplates::default().pass);
    }

    #[test]
    fn aliases_replace_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [physical_financial]
            financial_aliases = ["Statement of Receipts and Expenditures"]
            "#,
        )
        .unwrap();
        let labels: Vec<&str> = config.physical_financial.report_labels().collect();
        assert_eq!(
            labels,
            vec![
                "Physical Report",
                "Financial Report",
                "Physical Accomplishment Report",
                "Statement of Receipts and Expenditures",
            ]
        );
    }

    #[test]
    fn load_reports_parse_and_io_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[remark_templates]\npass = 3").unwrap();
        let err = EngineConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "{}", err);

        let err = EngineConfig::load(Path::new("/nonexistent/engine.toml")).unwrap_err();
        assert!(err.to_string().starts_with("could not read"), "{}", err);
    }
}
