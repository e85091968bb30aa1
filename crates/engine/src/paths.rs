use std::path::PathBuf;

use crate::error::EngineError;

pub const DATABASE_FILE: &str = "zlogon.db";

/// SAP GUI's shared settings directory, `%APPDATA%\SAP\Common` on Windows.
pub fn sap_common_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("SAP").join("Common"))
}

pub fn default_database_path() -> Result<PathBuf, EngineError> {
    sap_common_dir()
        .map(|dir| dir.join(DATABASE_FILE))
        .ok_or(EngineError::NoDefaultPath)
}

