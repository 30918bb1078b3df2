use std::path::PathBuf;

use stride_core::lat_lng::LatLng;

use crate::parsers::parse_lat_lng;

const OSRM_URL_ENV_VAR: &str = "STRIDE_OSRM_URL";
const OSRM_PROFILE_ENV_VAR: &str = "STRIDE_OSRM_PROFILE";
const DATA_DIR_ENV_VAR: &str = "STRIDE_DATA_DIR";
const HOME_ENV_VAR: &str = "STRIDE_HOME";

pub const DEFAULT_OSRM_URL: &str = "https://router.project-osrm.org";
pub const DEFAULT_OSRM_PROFILE: &str = "foot";
pub const DEFAULT_DATA_DIR: &str = "./data";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub osrm_url: String,
    pub osrm_profile: String,
    pub data_dir: PathBuf,

    /// Answer to the startup position lookup when `--at` is not given
    pub home: Option<LatLng>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let home = match lookup(HOME_ENV_VAR) {
            Some(value) => Some(
                parse_lat_lng(&value).map_err(|err| anyhow::anyhow!("{HOME_ENV_VAR}: {err}"))?,
            ),
            None => None,
        };

        Ok(Self {
            osrm_url: lookup(OSRM_URL_ENV_VAR).unwrap_or_else(|| DEFAULT_OSRM_URL.to_string()),
            osrm_profile: lookup(OSRM_PROFILE_ENV_VAR)
                .unwrap_or_else(|| DEFAULT_OSRM_PROFILE.to_string()),
            data_dir: lookup(DATA_DIR_ENV_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            home,
        })
    }
}
