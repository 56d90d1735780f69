//! XDG-compliant path resolution for ngsync.

use std::path::PathBuf;

use crate::error::{ConfigError, ConfigResult};

/// Global XDG-compliant directories for ngsync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPaths {
    /// `$XDG_CONFIG_HOME/ngsync/`
    pub config_dir: PathBuf,
    /// `$XDG_DATA_HOME/ngsync/`
    pub data_dir: PathBuf,
    /// `$XDG_CACHE_HOME/ngsync/`
    pub cache_dir: PathBuf,
}

impl SyncPaths {
    /// Resolve XDG directories from the process environment.
    pub fn resolve() -> ConfigResult<Self> {
        Self::resolve_with(|key| std::env::var(key).ok())
    }

    /// Resolve XDG directories through `lookup`, with standard fallbacks.
    pub fn resolve_with(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let home = lookup("HOME").map(PathBuf::from).ok_or(ConfigError::NoHome)?;

        let config_dir = lookup("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join(".config"))
            .join("ngsync");

        let data_dir = lookup("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join(".local/share"))
            .join("ngsync");

        let cache_dir = lookup("XDG_CACHE_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| home.join(".cache"))
            .join("ngsync");

        Ok(Self {
            config_dir,
            data_dir,
            cache_dir,
        })
    }

    /// Default config file: `config_dir/config.toml`.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Default location of the local oxigraph store.
    pub fn local_store_dir(&self) -> PathBuf {
        self.data_dir.join("oxigraph")
    }

    /// Default directory for audit dumps.
    pub fn audit_dir(&self) -> PathBuf {
        self.cache_dir.join("audit")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn falls_back_to_home() {
        let paths = SyncPaths::resolve_with(env(&[("HOME", "/home/sync")])).unwrap();
        assert_eq!(paths.config_file(), PathBuf::from("/home/sync/.config/ngsync/config.toml"));
        assert_eq!(
            paths.local_store_dir(),
            PathBuf::from("/home/sync/.local/share/ngsync/oxigraph")
        );
        assert_eq!(paths.audit_dir(), PathBuf::from("/home/sync/.cache/ngsync/audit"));
    }

    #[test]
    fn xdg_variables_win() {
        let paths = SyncPaths::resolve_with(env(&[
            ("HOME", "/home/sync"),
            ("XDG_CONFIG_HOME", "/etc/xdg"),
        ]))
        .unwrap();
        assert_eq!(paths.config_dir, PathBuf::from("/etc/xdg/ngsync"));
    }

    #[test]
    fn missing_home_is_an_error() {
        assert!(matches!(
            SyncPaths::resolve_with(env(&[])),
            Err(ConfigError::NoHome)
        ));
    }
}
