//! Configuration management with layered hierarchy

use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;

use crate::core::Project;

/// Labor cost per person when nothing else is configured
pub const DEFAULT_LABOR_RATE: i64 = 10_000;

/// bomq configuration with layered hierarchy
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Labor cost per person billed
    pub labor_rate: Option<Decimal>,

    /// Currency label appended to amounts
    pub currency: Option<String>,

    /// Unit label for assembly and component quantities
    pub unit_label: Option<String>,

    /// Unit label for the labor row
    pub labor_unit_label: Option<String>,

    pub customer: Option<String>,
    pub project_name: Option<String>,
    pub delivery_terms: Option<String>,
    pub lead_time: Option<String>,
    pub payment_terms: Option<String>,
    pub validity: Option<String>,
    pub remarks: Option<String>,
    pub contact: Option<String>,

    /// Default output format for quotations
    pub default_format: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load(project: Option<&Project>) -> Self {
        let mut config = Config::default();

        // 1. Global user config (~/.config/bomq/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 2. Project config (.bomq/config.yaml)
        if let Some(project) = project {
            if let Some(project_config) = Self::read_file(&project.config_path()) {
                config.merge(project_config);
            }
        }

        // 3. Environment variables
        config.merge(Self::from_env());

        config
    }

    fn read_file(path: &std::path::Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read config file");
                return None;
            }
        };
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
                None
            }
        }
    }

    fn from_env() -> Config {
        let mut config = Config::default();
        if let Ok(rate) = std::env::var("BOMQ_LABOR_RATE") {
            match Decimal::from_str(rate.trim()) {
                Ok(rate) => config.labor_rate = Some(rate),
                Err(_) => tracing::warn!(value = %rate, "ignoring non-numeric BOMQ_LABOR_RATE"),
            }
        }
        if let Ok(currency) = std::env::var("BOMQ_CURRENCY") {
            config.currency = Some(currency);
        }
        if let Ok(customer) = std::env::var("BOMQ_CUSTOMER") {
            config.customer = Some(customer);
        }
        config
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "bomq")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        fn take<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        take(&mut self.labor_rate, other.labor_rate);
        take(&mut self.currency, other.currency);
        take(&mut self.unit_label, other.unit_label);
        take(&mut self.labor_unit_label, other.labor_unit_label);
        take(&mut self.customer, other.customer);
        take(&mut self.project_name, other.project_name);
        take(&mut self.delivery_terms, other.delivery_terms);
        take(&mut self.lead_time, other.lead_time);
        take(&mut self.payment_terms, other.payment_terms);
        take(&mut self.validity, other.validity);
        take(&mut self.remarks, other.remarks);
        take(&mut self.contact, other.contact);
        take(&mut self.default_format, other.default_format);
    }

    pub fn labor_rate(&self) -> Decimal {
        self.labor_rate
            .unwrap_or_else(|| Decimal::from(DEFAULT_LABOR_RATE))
    }

    pub fn currency(&self) -> &str {
        self.currency.as_deref().unwrap_or("KRW")
    }

    pub fn unit_label(&self) -> &str {
        self.unit_label.as_deref().unwrap_or("ea")
    }

    pub fn labor_unit_label(&self) -> &str {
        self.labor_unit_label.as_deref().unwrap_or("person")
    }

    pub fn customer(&self) -> &str {
        self.customer.as_deref().unwrap_or("")
    }

    pub fn project_name(&self) -> &str {
        self.project_name.as_deref().unwrap_or("")
    }

    pub fn delivery_terms(&self) -> &str {
        self.delivery_terms
            .as_deref()
            .unwrap_or("Delivered to customer site")
    }

    pub fn lead_time(&self) -> &str {
        self.lead_time.as_deref().unwrap_or("To be agreed")
    }

    pub fn payment_terms(&self) -> &str {
        self.payment_terms.as_deref().unwrap_or("To be agreed")
    }

    pub fn validity(&self) -> &str {
        self.validity
            .as_deref()
            .unwrap_or("30 days from quotation date")
    }

    pub fn remarks(&self) -> &str {
        self.remarks.as_deref().unwrap_or("")
    }

    pub fn contact(&self) -> &str {
        self.contact.as_deref().unwrap_or("")
    }
}
