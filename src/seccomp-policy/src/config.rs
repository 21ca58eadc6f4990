// Copyright 2025 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! JSON overrides applied on top of a built-in policy.
//!
//! ```json
//! {
//!   "native_extra": [{ "name": "memfd_create", "nr": 279 }],
//!   "compat_extra": [],
//!   "mismatch_action": { "errno": 1 },
//!   "logger": { "level": "debug" }
//! }
//! ```
//!
//! Listed syscalls are appended after the built-in ones; nothing can be removed.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use crate::action::SeccompAction;
use crate::compiler::{AllowedSyscall, Policy};
use crate::logger::LoggerConfig;

/// Errors reading a policy configuration.
#[derive(Debug, thiserror::Error, displaydoc::Display)]
pub enum ConfigError {
    /// Failed to open configuration file {0}: {1}
    FileOpen(String, std::io::Error),
    /// Invalid policy configuration: {0}
    Json(#[from] serde_json::Error),
    /// Mismatch action {0} is not allowed, it would let unlisted syscalls run.
    PermissiveMismatchAction(SeccompAction),
}

/// User supplied additions to a policy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    /// Syscalls allowed for the native calling convention.
    #[serde(default)]
    pub native_extra: Vec<AllowedSyscall>,
    /// Syscalls allowed for the compat calling convention.
    #[serde(default)]
    pub compat_extra: Vec<AllowedSyscall>,
    /// Action replacing the default trap. Must not let the syscall run.
    pub mismatch_action: Option<SeccompAction>,
    /// Logger settings.
    pub logger: Option<LoggerConfig>,
}

impl PolicyConfig {
    /// Parses a configuration from a JSON reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_reader(reader)?;
        match config.mismatch_action {
            Some(action) if action.permits() => {
                Err(ConfigError::PermissiveMismatchAction(action))
            }
            _ => Ok(config),
        }
    }

    /// Parses the configuration file at `path`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path)
            .map_err(|err| ConfigError::FileOpen(path.display().to_string(), err))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Applies the syscall and action overrides to `policy`.
    pub fn apply(&self, mut policy: Policy) -> Policy {
        policy.extend_extra_syscalls(
            self.native_extra.iter().cloned(),
            self.compat_extra.iter().cloned(),
        );
        if let Some(action) = self.mismatch_action {
            policy.mismatch_action = action;
        }
        policy
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use vmm_sys_util::tempfile::TempFile;

    use super::*;
    use crate::arch::TargetArch;
    use crate::compiler::ArchPolicy;
    use crate::compiler::compile;
    use crate::interpreter::{SeccompData, run};

    fn empty_policy() -> Policy {
        Policy::new(
            ArchPolicy::new(
                TargetArch::aarch64,
                &[],
                vec![AllowedSyscall::new("read", 63)],
            ),
            ArchPolicy::new(TargetArch::arm, &[], Vec::new()),
        )
    }

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "native_extra": [{ "name": "memfd_create", "nr": 279 }],
            "mismatch_action": { "errno": 1 },
            "logger": { "level": "Debug" }
        }"#;
        let config = PolicyConfig::from_reader(json.as_bytes()).unwrap();

        assert_eq!(
            config.native_extra,
            vec![AllowedSyscall::new("memfd_create", 279)]
        );
        assert!(config.compat_extra.is_empty());
        assert_eq!(config.mismatch_action, Some(SeccompAction::Errno(1)));
        assert_eq!(config.logger.unwrap().level, Some(log::LevelFilter::Debug));

        assert_eq!(
            PolicyConfig::from_reader("{}".as_bytes()).unwrap(),
            PolicyConfig::default()
        );
    }

    #[test]
    fn test_reject_invalid_config() {
        for json in [
            r#"{ "native_extra": [{ "name": "x" }] }"#,
            r#"{ "native_extra": [{ "name": "x", "nr": 1, "args": [] }] }"#,
            r#"{ "remove": ["read"] }"#,
            r#"{ "mismatch_action": "explode" }"#,
            "not json",
        ] {
            assert!(matches!(
                PolicyConfig::from_reader(json.as_bytes()),
                Err(ConfigError::Json(_))
            ));
        }
    }

    #[test]
    fn test_reject_permissive_mismatch_action() {
        for (json, action) in [
            (r#"{ "mismatch_action": "allow" }"#, SeccompAction::Allow),
            (r#"{ "mismatch_action": "log" }"#, SeccompAction::Log),
        ] {
            match PolicyConfig::from_reader(json.as_bytes()) {
                Err(ConfigError::PermissiveMismatchAction(rejected)) => {
                    assert_eq!(rejected, action)
                }
                other => panic!("Expected PermissiveMismatchAction, got {other:?}"),
            }
        }

        // A config built in code is caught when compiling.
        let config = PolicyConfig {
            mismatch_action: Some(SeccompAction::Allow),
            ..Default::default()
        };
        assert_eq!(
            compile(&config.apply(empty_policy())).unwrap_err(),
            crate::program::FilterError::PermissiveMismatchAction(SeccompAction::Allow)
        );

        let config = PolicyConfig::from_reader(r#"{ "mismatch_action": "kill_process" }"#.as_bytes())
            .unwrap();
        let program = compile(&config.apply(empty_policy())).unwrap();
        let unknown_arch = run(&program, &SeccompData::new(0, 63)).unwrap();
        assert_eq!(unknown_arch.action, SeccompAction::KillProcess);
        let unlisted = run(
            &program,
            &SeccompData::new(TargetArch::aarch64.audit_value(), 64),
        )
        .unwrap();
        assert_eq!(unlisted.action, SeccompAction::KillProcess);
    }

    #[test]
    fn test_apply_config() {
        let config = PolicyConfig {
            native_extra: vec![AllowedSyscall::new("memfd_create", 279)],
            compat_extra: vec![AllowedSyscall::new("memfd_create", 385)],
            mismatch_action: Some(SeccompAction::KillProcess),
            logger: None,
        };
        let policy = config.apply(empty_policy());

        // Built-in entries stay first.
        assert_eq!(
            policy.native.extra_syscalls,
            vec![
                AllowedSyscall::new("read", 63),
                AllowedSyscall::new("memfd_create", 279)
            ]
        );
        assert!(policy.compat.lists(385));
        assert_eq!(policy.mismatch_action, SeccompAction::KillProcess);

        let policy = PolicyConfig::default().apply(empty_policy());
        assert_eq!(policy, empty_policy());
    }

    #[test]
    fn test_from_file() {
        let file = TempFile::new().unwrap();
        file.as_file()
            .write_all(br#"{ "compat_extra": [{ "name": "vfork", "nr": 190 }] }"#)
            .unwrap();
        let config = PolicyConfig::from_file(file.as_path()).unwrap();
        assert_eq!(config.compat_extra, vec![AllowedSyscall::new("vfork", 190)]);

        let missing = Path::new("/nonexistent/policy.json");
        match PolicyConfig::from_file(missing) {
            Err(ConfigError::FileOpen(path, _)) => assert_eq!(path, "/nonexistent/policy.json"),
            other => panic!("Expected FileOpen, got {other:?}"),
        }
    }
}
