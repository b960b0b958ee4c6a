pub mod loader;
pub mod validation;

pub use loader::ConfigLoader;
pub use validation::ConfigValidator;

use serde::{Deserialize, Serialize};

/// Settings the transform pipeline reads, loaded from an optional TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformerConfig {
    /// Version pinned on the ducati release reference
    #[serde(default = "default_release_version")]
    pub release_version: String,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub garden: GardenConfig,

    #[serde(default)]
    pub nsync: NsyncConfig,

    #[serde(default)]
    pub connet: ConnetConfig,
}

/// Placement and credentials of the ducati_db job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Existing job group the new database job is placed after
    pub anchor_job: String,
    pub persistent_disk: u32,
    pub resource_pool: String,
    pub network: String,
    pub name: String,
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub ssl_mode: String,
}

/// Values overlaid onto `properties.garden`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GardenConfig {
    pub shared_mounts: Vec<String>,
    pub network_plugin: String,
    pub network_plugin_extra_args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NsyncConfig {
    pub network_id: String,
}

/// Route registration and listener settings for connet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnetConfig {
    pub subdomain: String,
    pub port: u16,
    pub listen_host: String,
    pub registration_interval: String,
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self {
            release_version: default_release_version(),
            database: DatabaseConfig::default(),
            garden: GardenConfig::default(),
            nsync: NsyncConfig::default(),
            connet: ConnetConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            anchor_job: "database_z1".to_string(),
            persistent_disk: 256,
            resource_pool: "database_z1".to_string(),
            network: "diego1".to_string(),
            name: "ducati".to_string(),
            username: "ducati_daemon".to_string(),
            password: "some-password".to_string(),
            host: "ducati-db.service.cf.internal".to_string(),
            port: 5432,
            ssl_mode: "disable".to_string(),
        }
    }
}

impl Default for GardenConfig {
    fn default() -> Self {
        Self {
            shared_mounts: vec!["/var/vcap/data/ducati/container-netns".to_string()],
            network_plugin: "/var/vcap/packages/ducati/bin/guardian-cni-adapter".to_string(),
            network_plugin_extra_args: vec![
                "--configFile=/var/vcap/jobs/ducati/config/adapter.json".to_string(),
            ],
        }
    }
}

impl Default for NsyncConfig {
    fn default() -> Self {
        Self {
            network_id: "ducati-overlay".to_string(),
        }
    }
}

impl Default for ConnetConfig {
    fn default() -> Self {
        Self {
            subdomain: "connet".to_string(),
            port: 4002,
            listen_host: "0.0.0.0".to_string(),
            registration_interval: "20s".to_string(),
        }
    }
}

fn default_release_version() -> String {
    "latest".to_string()
}
