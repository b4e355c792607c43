// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware lookup of the default config file and model directory.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "richtwerk";
const CONFIG_FILE: &str = "config.json";

/// Where the CLI looks when no explicit config or model is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locations {
    /// `$XDG_CONFIG_HOME/richtwerk/config.json`.
    pub config_file: PathBuf,
    /// `$XDG_DATA_HOME/richtwerk/models`.
    pub model_dir: PathBuf,
}

impl Locations {
    /// Resolve from the process environment.
    pub fn from_env() -> Self {
        let var = |name| std::env::var_os(name).map(PathBuf::from);
        Self::resolve(var("XDG_CONFIG_HOME"), var("XDG_DATA_HOME"), var("HOME"))
    }

    /// Resolve from explicit XDG / home values, falling back to
    /// `~/.config` and `~/.local/share`, then the current directory.
    pub fn resolve(config_home: Option<PathBuf>, data_home: Option<PathBuf>, home: Option<PathBuf>) -> Self {
        let under_home = |parts: &[&str]| {
            home.as_deref()
                .map(|h| parts.iter().fold(h.to_path_buf(), |acc, p| acc.join(p)))
        };
        let config_base = config_home
            .or_else(|| under_home(&[".config"]))
            .unwrap_or_else(|| PathBuf::from("."));
        let data_base = data_home
            .or_else(|| under_home(&[".local", "share"]))
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            config_file: config_base.join(APP_DIR).join(CONFIG_FILE),
            model_dir: data_base.join(APP_DIR).join("models"),
        }
    }

    /// The default config file, if one has been written.
    pub fn existing_config(&self) -> Option<&Path> {
        self.config_file.is_file().then_some(self.config_file.as_path())
    }
}
