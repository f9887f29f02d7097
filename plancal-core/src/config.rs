//! Global plancal configuration.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::edit::PostDefaults;
use crate::error::{PlanCalError, PlanCalResult};
use crate::model::{ContentType, Platform, PostStatus};
use crate::month::WeekStart;

static DEFAULT_DATA_PATH: &str = "~/plancal";
static DEFAULT_COMPANY: &str = "default";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_PATH)
}

fn is_default_data_dir(p: &PathBuf) -> bool {
    *p == default_data_dir()
}

fn default_company() -> String {
    DEFAULT_COMPANY.to_string()
}

fn is_default<T: Default + PartialEq>(v: &T) -> bool {
    *v == T::default()
}

fn parse_or_default<T>(value: &str) -> PlanCalResult<T>
where
    T: Default + std::str::FromStr<Err = PlanCalError>,
{
    if value.is_empty() {
        Ok(T::default())
    } else {
        value.parse()
    }
}

/// Global configuration at ~/.config/plancal/config.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlanCalConfig {
    #[serde(default = "default_data_dir", skip_serializing_if = "is_default_data_dir")]
    pub data_dir: PathBuf,

    /// IANA zone used to decide what "today" is. Unset means the host zone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    /// First column of the month grid. The week sheet always starts Monday.
    #[serde(default, skip_serializing_if = "is_default")]
    pub week_start: WeekStart,

    #[serde(default, skip_serializing_if = "is_default")]
    pub default_platform: Platform,

    #[serde(default, skip_serializing_if = "is_default")]
    pub default_status: PostStatus,

    #[serde(default, skip_serializing_if = "is_default")]
    pub default_content_type: ContentType,

    #[serde(default = "default_company")]
    pub company: String,

    /// Recorded as `created_by` on new rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl Default for PlanCalConfig {
    fn default() -> Self {
        PlanCalConfig {
            data_dir: default_data_dir(),
            timezone: None,
            week_start: WeekStart::default(),
            default_platform: Platform::default(),
            default_status: PostStatus::default(),
            default_content_type: ContentType::default(),
            company: default_company(),
            user: None,
        }
    }
}

impl PlanCalConfig {
    pub fn config_path() -> PlanCalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| PlanCalError::Config("Could not determine config directory".into()))?
            .join("plancal");

        Ok(config_dir.join("config.toml"))
    }

    /// Load ~/.config/plancal/config.toml, creating a commented default first
    /// if there is none.
    pub fn load() -> PlanCalResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from an explicit file. A missing file gives the defaults.
    pub fn load_from(path: &Path) -> PlanCalResult<Self> {
        let config: PlanCalConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .build()
            .map_err(|e| PlanCalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| PlanCalError::Config(e.to_string()))?;

        // Fail early on a bad zone name rather than on first use.
        config.timezone()?;

        Ok(config)
    }

    /// Set one key from its text form, as written in the config file. An
    /// empty value puts the key back to its default.
    pub fn set(&mut self, key: &str, value: &str) -> PlanCalResult<()> {
        let value = value.trim();
        let optional = || (!value.is_empty()).then(|| value.to_string());

        match key {
            "data_dir" => {
                self.data_dir = optional().map(PathBuf::from).unwrap_or_else(default_data_dir)
            }
            "timezone" => {
                let previous = std::mem::replace(&mut self.timezone, optional());
                if let Err(e) = self.timezone() {
                    self.timezone = previous;
                    return Err(e);
                }
            }
            "week_start" => self.week_start = parse_or_default(value)?,
            "default_platform" => self.default_platform = parse_or_default(value)?,
            "default_status" => self.default_status = parse_or_default(value)?,
            "default_content_type" => self.default_content_type = parse_or_default(value)?,
            "company" => self.company = optional().unwrap_or_else(default_company),
            "user" => self.user = optional(),
            other => return Err(PlanCalError::Config(format!("Unknown config key '{}'", other))),
        }
        Ok(())
    }

    /// Save the current config to ~/.config/plancal/config.toml
    pub fn save(&self) -> PlanCalResult<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> PlanCalResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| PlanCalError::Config(e.to_string()))?;

        std::fs::write(path, content)
            .map_err(|e| PlanCalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> PlanCalResult<()> {
        let contents = format!(
            "\
# plancal configuration

# Where posts, meetings and tasks are stored:
# data_dir = \"{}\"

# Time zone used for \"today\" (defaults to the system zone):
# timezone = \"Europe/Berlin\"

# First column of the month view (sunday or monday):
# week_start = \"sunday\"

# Defaults for posts created from the sheet:
# default_platform = \"facebook\"
# default_status = \"draft\"
# default_content_type = \"static\"

# Company the posts belong to:
# company = \"{}\"

# Your name, recorded on rows you create:
# user = \"\"
",
            DEFAULT_DATA_PATH, DEFAULT_COMPANY
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PlanCalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| PlanCalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    /// The configured zone, if one is set.
    pub fn timezone(&self) -> PlanCalResult<Option<Tz>> {
        match self.timezone.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(name) => name
                .parse::<Tz>()
                .map(Some)
                .map_err(|_| PlanCalError::Config(format!("Unknown timezone '{}'", name))),
        }
    }

    pub fn post_defaults(&self) -> PostDefaults {
        PostDefaults {
            company_id: self.company.clone(),
            platform: self.default_platform,
            status: self.default_status,
            content_type: self.default_content_type,
            created_by: self.user.clone(),
        }
    }
}
