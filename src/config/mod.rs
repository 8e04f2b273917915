//! Configuration for the aggregation pipeline.
//!
//! Lookup tables, keyword lists, column sets and query text differ between
//! hospital installations, so they are loaded from a versioned TOML file
//! instead of being compiled in. [`PipelineConfig::default`] reproduces the
//! reference installation.

pub mod queries;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::algorithm::assembler::check_unique;
use crate::algorithm::mapping::LookupTable;
use crate::error::{PipelineError, Result};

pub use queries::QuerySet;

/// Configuration file version understood by this build
pub const SUPPORTED_CONFIG_VERSION: u32 = 1;

/// Number of intensive care units tracked by the occupancy summary
pub const ICU_UNIT_COUNT: usize = 3;

/// Configuration for a pipeline deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Configuration file format version
    pub version: u32,
    /// First-field value marking a failed query
    pub failure_marker: String,
    pub lookups: LookupConfig,
    pub keywords: KeywordConfig,
    pub columns: ColumnConfig,
    pub positions: PositionConfig,
    pub queries: QuerySet,
}

/// The two deployment lookup tables (localized label -> canonical field)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Admission channel / department profile labels
    pub profiles: BTreeMap<String, String>,
    /// Department and unit labels
    pub departments: BTreeMap<String, String>,
}

/// Keyword lists used for counting, in output order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    /// Value of the admitted flag for hospitalised arrivals
    pub admitted_flag: i64,
    pub channels: Vec<String>,
    pub statuses: Vec<String>,
    /// Outcome keywords for the discharge totals
    pub outcomes: Vec<String>,
    /// Outcome value of a regular discharge
    pub discharged: String,
    /// Outcome value counted as a non-death sign-out on the dashboard
    pub other_reason: String,
    /// Intensive care unit names, in occupancy column order
    pub icu_units: Vec<String>,
}

/// Fixed column sets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Channel columns followed by patient type columns
    pub arrived: Vec<String>,
    /// Outcome total columns, aligned with `keywords.outcomes`
    pub signout: Vec<String>,
    pub deads: Vec<String>,
    pub oar_arrived: Vec<String>,
    pub oar_moved: Vec<String>,
    pub oar_current: Vec<String>,
    /// Occupancy columns, aligned with `keywords.icu_units`
    pub oar_amounts: Vec<String>,
}

/// Positional indexes into raw rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionConfig {
    pub admitted_flag: usize,
    pub channel: usize,
    pub patient_type: usize,
    pub signout_department: usize,
    pub outcome: usize,
    pub death_unit: usize,
    pub icu_unit: usize,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

fn table(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            version: SUPPORTED_CONFIG_VERSION,
            failure_marker: "Error".to_string(),
            lookups: LookupConfig::default(),
            keywords: KeywordConfig::default(),
            columns: ColumnConfig::default(),
            positions: PositionConfig::default(),
            queries: QuerySet::default(),
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            profiles: table(&[
                ("Терапия", "therapy"),
                ("Хирургия", "surgery"),
                ("Кардиология", "cardiology"),
                ("Урология", "urology"),
                ("Неврология", "neurology"),
            ]),
            departments: table(&[
                ("ОРИТ №1", "oar1"),
                ("ОРИТ №2", "oar2"),
                ("ОРИТ №3", "oar3"),
                ("Кардиологическое отделение", "cardio_d"),
                ("Хирургическое отделение", "surgery_d"),
                ("Терапевтическое отделение", "therapy_d"),
            ]),
        }
    }
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            admitted_flag: 1,
            channels: strings(&["103", "Поликлиника", "103 Поликлиника", "самотек"]),
            statuses: strings(&["ЗЛ", "Иногородний", "ДМС", "Не указано"]),
            outcomes: strings(&["Умер", "Переведен", "Выписан"]),
            discharged: "Выписан".to_string(),
            other_reason: "Другая причина".to_string(),
            icu_units: strings(&["ОРИТ №1", "ОРИТ №2", "ОРИТ №3"]),
        }
    }
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            arrived: strings(&[
                "ch103",
                "clinic_only",
                "ch103_clinic",
                "singly",
                "ZL",
                "foreign",
                "moscow",
                "undefined",
            ]),
            signout: strings(&["deads", "moved", "signout"]),
            deads: strings(&[
                "pat_fio",
                "ib_num",
                "sex",
                "age",
                "arriving_dt",
                "state",
                "dept",
                "days",
                "diag_arr",
                "diag_dead",
            ]),
            oar_arrived: strings(&["pat_fio", "ib_num", "age", "dept", "doc_fio", "diag_start"]),
            oar_moved: strings(&[
                "pat_fio",
                "ib_num",
                "age",
                "dept",
                "doc_fio",
                "move_date",
                "from_dept",
                "diag_start",
            ]),
            oar_current: strings(&[
                "pat_fio",
                "ib_num",
                "age",
                "dept",
                "doc_fio",
                "days",
                "diag_start",
            ]),
            oar_amounts: strings(&["oar1", "oar2", "oar3"]),
        }
    }
}

impl Default for PositionConfig {
    fn default() -> Self {
        Self {
            admitted_flag: 0,
            channel: 2,
            patient_type: 3,
            signout_department: 0,
            outcome: 1,
            death_unit: 6,
            icu_unit: 3,
        }
    }
}

impl PipelineConfig {
    /// Create a configuration with the reference installation's settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML configuration
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        log::info!(
            "Loaded pipeline configuration v{} from {}",
            config.version,
            path.display()
        );
        Ok(config)
    }

    /// Set the failure marker
    #[must_use]
    pub fn with_failure_marker(mut self, marker: &str) -> Self {
        self.failure_marker = marker.to_string();
        self
    }

    /// Add or override a department lookup entry
    pub fn add_department(&mut self, label: &str, canonical: &str) {
        self.lookups
            .departments
            .insert(label.to_string(), canonical.to_string());
    }

    /// Add or override a profile lookup entry
    pub fn add_profile(&mut self, label: &str, canonical: &str) {
        self.lookups
            .profiles
            .insert(label.to_string(), canonical.to_string());
    }

    /// Check that column sets line up with the keyword lists they label
    pub fn validate(&self) -> Result<()> {
        if self.version != SUPPORTED_CONFIG_VERSION {
            return Err(PipelineError::config(format!(
                "unsupported configuration version {} (expected {SUPPORTED_CONFIG_VERSION})",
                self.version
            )));
        }
        if self.failure_marker.is_empty() {
            return Err(PipelineError::config("failure_marker must not be empty"));
        }

        let arrivals_width = self.keywords.channels.len() + self.keywords.statuses.len();
        check_width("columns.arrived", self.columns.arrived.len(), arrivals_width)?;
        check_width(
            "columns.signout",
            self.columns.signout.len(),
            self.keywords.outcomes.len(),
        )?;
        check_width("keywords.icu_units", self.keywords.icu_units.len(), ICU_UNIT_COUNT)?;
        check_width("columns.oar_amounts", self.columns.oar_amounts.len(), ICU_UNIT_COUNT)?;

        for (name, columns) in [
            ("columns.deads", &self.columns.deads),
            ("columns.oar_arrived", &self.columns.oar_arrived),
            ("columns.oar_moved", &self.columns.oar_moved),
            ("columns.oar_current", &self.columns.oar_current),
        ] {
            if columns.is_empty() {
                return Err(PipelineError::config(format!("{name} must not be empty")));
            }
        }

        for (name, columns) in [
            ("columns.arrived", &self.columns.arrived),
            ("columns.signout", &self.columns.signout),
            ("columns.deads", &self.columns.deads),
            ("columns.oar_arrived", &self.columns.oar_arrived),
            ("columns.oar_moved", &self.columns.oar_moved),
            ("columns.oar_current", &self.columns.oar_current),
            ("columns.oar_amounts", &self.columns.oar_amounts),
        ] {
            check_unique(columns)
                .map_err(|err| PipelineError::config(format!("{name}: {err}")))?;
        }

        Ok(())
    }

    /// Lookup table for admission channel / profile labels
    #[must_use]
    pub fn profiles_table(&self) -> LookupTable {
        LookupTable::new("profiles", &self.lookups.profiles)
    }

    /// Lookup table for department / unit labels
    #[must_use]
    pub fn departments_table(&self) -> LookupTable {
        LookupTable::new("departments", &self.lookups.departments)
    }
}

fn check_width(name: &str, actual: usize, expected: usize) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(PipelineError::config(format!(
            "{name} has {actual} entries, expected {expected}"
        )))
    }
}

impl fmt::Display for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipeline Configuration v{}:", self.version)?;
        writeln!(f, "  Failure marker: {}", self.failure_marker)?;
        writeln!(f, "  Profile labels: {}", self.lookups.profiles.len())?;
        writeln!(f, "  Department labels: {}", self.lookups.departments.len())?;
        writeln!(f, "  Channels: {}", self.keywords.channels.join(", "))?;
        writeln!(f, "  Statuses: {}", self.keywords.statuses.join(", "))?;
        writeln!(f, "  ICU units: {}", self.keywords.icu_units.join(", "))
    }
}
