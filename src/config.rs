use crate::validator::{ValidationPolicy, DEFAULT_MAX_SHIFT_HOURS};
use anyhow::{bail, Context, Result};
use chrono::FixedOffset;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_API_URL: &str = "SWAPSCHED_API_URL";
pub const ENV_UTC_OFFSET: &str = "SWAPSCHED_UTC_OFFSET";
pub const ENV_MAX_SHIFT_HOURS: &str = "SWAPSCHED_MAX_SHIFT_HOURS";
pub const ENV_TIMEOUT_SECS: &str = "SWAPSCHED_TIMEOUT_SECS";
pub const ENV_SESSION_FILE: &str = "SWAPSCHED_SESSION_FILE";

/// Réglages de la console (fichier TOML, puis variables d'environnement).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: String,
    /// Décalage de l'heure locale des stations, ex. `+07:00`.
    pub utc_offset: String,
    pub max_shift_hours: u32,
    pub page_size: u32,
    pub timeout_secs: u64,
    pub session_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".to_string(),
            utc_offset: "+07:00".to_string(),
            max_shift_hours: DEFAULT_MAX_SHIFT_HOURS,
            page_size: 20,
            timeout_secs: 15,
            session_file: PathBuf::from(".swapsched-session.json"),
        }
    }
}

impl Settings {
    /// Charge le fichier (s'il est donné) puis applique l'environnement.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Surcharges par variables ; `lookup` isole l'accès à l'environnement.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_base_url = url;
        }
        if let Some(offset) = lookup(ENV_UTC_OFFSET) {
            self.utc_offset = offset;
        }
        if let Some(hours) = lookup(ENV_MAX_SHIFT_HOURS) {
            self.max_shift_hours = hours
                .trim()
                .parse()
                .with_context(|| format!("{ENV_MAX_SHIFT_HOURS} must be an integer"))?;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("{ENV_TIMEOUT_SECS} must be an integer"))?;
        }
        if let Some(file) = lookup(ENV_SESSION_FILE) {
            self.session_file = PathBuf::from(file);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_base_url.trim().is_empty() {
            bail!("api_base_url cannot be empty");
        }
        if self.max_shift_hours == 0 {
            bail!("max_shift_hours must be > 0");
        }
        if self.page_size == 0 {
            bail!("page_size must be > 0");
        }
        self.offset()?;
        Ok(())
    }

    pub fn offset(&self) -> Result<FixedOffset> {
        self.utc_offset
            .trim()
            .parse::<FixedOffset>()
            .with_context(|| format!("invalid utc_offset: {}", self.utc_offset))
    }

    pub fn policy(&self) -> Result<ValidationPolicy> {
        Ok(ValidationPolicy {
            max_shift_hours: self.max_shift_hours,
            utc_offset: self.offset()?,
        })
    }
}
