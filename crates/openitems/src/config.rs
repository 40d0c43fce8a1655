//! Job configuration.
//!
//! A single TOML file describes where the query extracts live, where the
//! workbook goes, how mail is delivered and how the report is laid out:
//!
//! ```toml
//! [source]
//! directory = "/var/lib/openitems/extracts"
//! delimiter = ";"
//!
//! [source.queries]
//! lancamentos = "lancamentos.csv"
//!
//! [export]
//! directory = "/var/lib/openitems/out"
//! prefix = "lancamentos_abertos"
//!
//! [mail]
//! transport = "smtp"
//! host = "relay.example.com"
//! from = "noreply@example.com"
//! to = "financeiro@example.com"
//! cc = "a@example.com; b@example.com"
//!
//! [[sections]]
//! id = "lancamentos"
//! title = "LANÇAMENTOS EM ABERTO"
//! result_set = "lancamentos"
//! group_by = "TIPO PAGAMENTO"
//! ```

use indexmap::IndexMap;
use openitems_core::{HeadlineFact, HeadlineSpec, ReportLayout, SectionSpec};
use openitems_io::parse_address_list;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "openitems.toml";

/// Error loading or validating the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// Config file.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configuration is well-formed but inconsistent.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Complete job configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Query extracts.
    pub source: SourceConfig,
    /// Workbook output.
    #[serde(default)]
    pub export: ExportConfig,
    /// Mail delivery.
    pub mail: MailConfig,
    /// Opening sentence facts.
    #[serde(default)]
    pub headline: Option<HeadlineSpec>,
    /// Report sections in display order.
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
}

/// `[source]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Directory holding the extracts.
    pub directory: PathBuf,
    /// CSV field delimiter.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Query name to extract file, in query order.
    pub queries: IndexMap<String, PathBuf>,
}

/// `[export]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Output directory.
    #[serde(default = "default_export_directory")]
    pub directory: PathBuf,
    /// Workbook file name prefix.
    #[serde(default = "default_export_prefix")]
    pub prefix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: default_export_directory(),
            prefix: default_export_prefix(),
        }
    }
}

/// How mail leaves the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailTransport {
    /// Plain SMTP relay.
    #[default]
    Smtp,
    /// `.eml` files in a pickup directory.
    Pickup,
}

/// A recipient list written either as one `;`-separated string or as an array.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AddressList {
    /// `"a@x; b@x"`
    Joined(String),
    /// `["a@x", "b@x"]`
    List(Vec<String>),
}

impl Default for AddressList {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl AddressList {
    /// The individual addresses.
    pub fn addresses(&self) -> Vec<String> {
        match self {
            Self::Joined(list) => parse_address_list(list),
            Self::List(items) => items.iter().flat_map(|s| parse_address_list(s)).collect(),
        }
    }
}

/// `[mail]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// Delivery method.
    #[serde(default)]
    pub transport: MailTransport,
    /// SMTP relay host.
    #[serde(default = "default_host")]
    pub host: String,
    /// SMTP relay port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Pickup directory, required for the pickup transport.
    #[serde(default)]
    pub pickup_dir: Option<PathBuf>,
    /// Sender address.
    pub from: String,
    /// Primary recipients.
    pub to: AddressList,
    /// Carbon-copy recipients.
    #[serde(default)]
    pub cc: AddressList,
    /// Subject text before the date.
    #[serde(default = "default_subject_prefix")]
    pub subject_prefix: String,
}

fn default_delimiter() -> char {
    ','
}

fn default_export_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_export_prefix() -> String {
    "lancamentos_abertos".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    25
}

fn default_subject_prefix() -> String {
    "Posição sobre lançamentos em aberto".to_string()
}

impl SourceConfig {
    /// The delimiter as a byte.
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "source.delimiter must be a single ASCII character, got '{}'",
                    self.delimiter
                ))
            })
    }
}

impl Config {
    /// Parse and validate a configuration document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// The report layout described by `[headline]` and `[[sections]]`.
    pub fn layout(&self) -> ReportLayout {
        ReportLayout {
            headline: self.headline.clone(),
            sections: self.sections.clone(),
        }
    }

    /// Check cross-references the schema cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.source.delimiter_byte()?;

        if self.mail.to.addresses().is_empty() {
            return Err(ConfigError::Invalid("mail.to has no recipients".to_string()));
        }
        if self.mail.transport == MailTransport::Pickup && self.mail.pickup_dir.is_none() {
            return Err(ConfigError::Invalid(
                "mail.pickup_dir is required for the pickup transport".to_string(),
            ));
        }

        for section in &self.sections {
            if !self.source.queries.contains_key(&section.result_set) {
                return Err(ConfigError::Invalid(format!(
                    "section '{}' reads unknown query '{}'",
                    section.id, section.result_set
                )));
            }
            section
                .validate()
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }

        if let Some(headline) = &self.headline {
            for fact in [
                &headline.top_payment_type,
                &headline.top_faculty_type,
                &headline.top_client,
            ] {
                self.check_fact(fact)?;
            }
        }
        Ok(())
    }

    fn check_fact(&self, fact: &HeadlineFact) -> Result<(), ConfigError> {
        let section = self
            .sections
            .iter()
            .find(|s| s.id == fact.section)
            .ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "headline refers to unknown section '{}'",
                    fact.section
                ))
            })?;
        if section.sums(&fact.field) {
            Ok(())
        } else {
            Err(ConfigError::Invalid(format!(
                "headline reads '{}' which section '{}' does not sum",
                fact.field, fact.section
            )))
        }
    }
}

/// Load and validate a configuration file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Config::from_toml_str(&contents)
}
