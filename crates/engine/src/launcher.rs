use std::path::{Path, PathBuf};
use std::process::{Child, Command};

use tracing::info;
use zlogon_core::{Link, NodeUuid};
use zlogon_storage::SqliteStorage;

use crate::error::EngineError;
use crate::settings::Settings;
use crate::tree::TreeService;

/// SAP GUI's shortcut launcher, looked up in the configured install directory.
pub const SHORTCUT_EXECUTABLE: &str = "sapshcut.exe";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl LaunchCommand {
    pub fn for_link(install_dir: &Path, link: &Link) -> Result<Self, EngineError> {
        if link.system.contains(' ') {
            return Err(EngineError::InvalidSystemName(link.system.clone()));
        }
        Ok(Self {
            program: install_dir.join(SHORTCUT_EXECUTABLE),
            args: vec![
                format!("-user={}", link.user),
                format!("-pw={}", link.password),
                format!("-language={}", link.language),
                "-SYSTEM=".to_string(),
                format!("-CLIENT={}", link.client),
                format!("-sysname={}", link.system),
                "-max".to_string(),
            ],
        })
    }

    /// Arguments with the password masked, for display and logs.
    pub fn redacted_args(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| {
                if arg.starts_with("-pw=") {
                    "-pw=****".to_string()
                } else {
                    arg.clone()
                }
            })
            .collect()
    }

    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

pub struct Launcher<'s> {
    storage: &'s SqliteStorage,
}

impl<'s> Launcher<'s> {
    pub fn new(storage: &'s SqliteStorage) -> Self {
        Self { storage }
    }

    pub fn prepare(&self, uuid: NodeUuid) -> Result<LaunchCommand, EngineError> {
        let link = TreeService::new(self.storage)
            .link(uuid)?
            .ok_or(EngineError::NodeNotFound(uuid))?;
        let install_dir = Settings::new(self.storage)
            .install_dir()?
            .ok_or(EngineError::InstallDirNotConfigured)?;
        let program = install_dir.join(SHORTCUT_EXECUTABLE);
        if !program.is_file() {
            return Err(EngineError::ExecutableMissing(program));
        }
        LaunchCommand::for_link(&install_dir, &link)
    }

    /// Start SAP GUI for the link and return without waiting for it.
    pub fn launch(&self, uuid: NodeUuid) -> Result<Child, EngineError> {
        let command = self.prepare(uuid)?;
        info!(program = %command.program.display(), args = ?command.redacted_args(), "launching");
        command
            .to_command()
            .spawn()
            .map_err(|source| EngineError::Launch {
                program: command.program.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link() -> Link {
        let mut link = Link::new(NodeUuid::new());
        link.system = "PRD".into();
        link.client = "100".into();
        link.user = "alice".into();
        link.password = "secret".into();
        link.language = "EN".into();
        link
    }

    #[test]
    fn arguments_follow_shortcut_flags() {
        let command = LaunchCommand::for_link(Path::new("C:/SAP/FrontEnd/SAPgui"), &link()).unwrap();
        assert_eq!(
            command.program,
            Path::new("C:/SAP/FrontEnd/SAPgui").join("sapshcut.exe")
        );
        assert_eq!(
            command.args,
            vec![
                "-user=alice",
                "-pw=secret",
                "-language=EN",
                "-SYSTEM=",
                "-CLIENT=100",
                "-sysname=PRD",
                "-max",
            ]
        );
    }

    #[test]
    fn system_with_space_is_rejected() {
        let mut link = link();
        link.system = "PRD 2".into();
        assert!(matches!(
            LaunchCommand::for_link(Path::new("/sap"), &link),
            Err(EngineError::InvalidSystemName(name)) if name == "PRD 2"
        ));
    }

    #[test]
    fn redaction_masks_only_the_password() {
        let command = LaunchCommand::for_link(Path::new("/sap"), &link()).unwrap();
        let redacted = command.redacted_args();
        assert_eq!(redacted[0], "-user=alice");
        assert_eq!(redacted[1], "-pw=****");
        assert!(!redacted.iter().any(|a| a.contains("secret")));
    }
}
