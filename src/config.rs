use crate::{
    error::NavError,
    properties::{LockId, TreeKind, Uuid},
};
use serde::{Deserialize, Serialize};
use std::{
    fs::{read_to_string, write},
    path::PathBuf,
};

/// Settings of a [crate::rebuild::NavigationService].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Read lock taken around every rebuild. Ids other than the known tree locks turn rebuilds
    /// into no-ops.
    pub lock_id: LockId,
    /// Source object type the rebuild fetches records for.
    pub object_type: Uuid,
    /// Empty the target forest before repopulating it. When false, records are merged over the
    /// current content and stale nodes survive.
    pub clear_before_rebuild: bool,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        NavigationConfig::content()
    }
}

impl NavigationConfig {
    pub fn for_tree(tree: TreeKind) -> Self {
        NavigationConfig {
            lock_id: tree.lock_id(),
            object_type: tree.object_type(),
            clear_before_rebuild: true,
        }
    }

    pub fn content() -> Self {
        NavigationConfig::for_tree(TreeKind::Content)
    }

    pub fn media() -> Self {
        NavigationConfig::for_tree(TreeKind::Media)
    }

    /// The tree guarded by `lock_id`, if it is a known one.
    pub fn tree(&self) -> Option<TreeKind> {
        TreeKind::from_lock(self.lock_id)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, NavError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, NavError> {
        Ok(toml::to_string(self)?)
    }
}

pub trait ConfigProvider: Send + Sync {
    fn get_config(&self) -> Result<NavigationConfig, NavError>;
    fn set_config(&self, config: &NavigationConfig) -> Result<(), NavError>;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TomlConfigProvider {
    path: PathBuf,
}

impl TomlConfigProvider {
    pub fn new(path: PathBuf) -> Self {
        TomlConfigProvider { path }
    }
}

impl ConfigProvider for TomlConfigProvider {
    fn get_config(&self) -> Result<NavigationConfig, NavError> {
        tracing::debug!("Attempting to read navigation config from: {:?}", &self.path);
        if !self.path.exists() {
            tracing::debug!("Config file not found, using the default configuration.");
            return Ok(NavigationConfig::default());
        }
        NavigationConfig::from_toml_str(&read_to_string(&self.path)?)
    }

    fn set_config(&self, config: &NavigationConfig) -> Result<(), NavError> {
        tracing::debug!("Attempting to write navigation config to: {:?}", &self.path);
        write(&self.path, config.to_toml_string()?)?;
        Ok(())
    }
}
