// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::session::Session;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Kakeibo", "kakeibo"));

pub const DB_ENV: &str = "KAKEIBO_DB";
pub const USER_ENV: &str = "KAKEIBO_USER";
pub const DEFAULT_USER: &str = "default";
pub const DB_FILE: &str = "kakeibo.sqlite";

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub user: String,
}

impl Config {
    /// Flags first, then the environment, then platform defaults.
    pub fn resolve(db_flag: Option<&str>, user_flag: Option<&str>) -> Result<Self> {
        let db_path = match db_flag
            .map(str::to_string)
            .or_else(|| env::var(DB_ENV).ok())
            .filter(|s| !s.trim().is_empty())
        {
            Some(p) => PathBuf::from(p),
            None => default_db_path()?,
        };
        let user = user_flag
            .map(str::to_string)
            .or_else(|| env::var(USER_ENV).ok())
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_USER.to_string());
        Ok(Self { db_path, user })
    }

    pub fn session(&self) -> Session {
        Session::new(self.user.clone())
    }
}

pub fn default_db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join(DB_FILE))
}
