// Copyright 2025 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Deny-by-default seccomp-BPF policy for processes that may run either a 64-bit or a 32-bit
//! calling convention.
//!
//! The filter checks the architecture of each syscall first, then dispatches to an allow-list
//! for that architecture made of a generated base table followed by explicitly listed syscall
//! numbers. Anything else, including syscalls from an unknown architecture, hits the mismatch
//! action, which traps by default.
//!
//! ```no_run
//! # fn main() -> Result<(), seccomp_policy::PolicyError> {
//! seccomp_policy::install_policy()?;
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod arch;
pub mod base_filters;
pub mod common;
pub mod compiler;
pub mod config;
pub mod install;
pub mod interpreter;
pub mod logger;
pub mod program;

pub use action::SeccompAction;
pub use arch::{ArchPair, TargetArch, TargetArchError};
pub use base_filters::{
    Arm64Filter, BaseFilter, BaseTables, DeserializationError, SerializationError, X86_64Filter,
    builtin_policy, deserialize_binary, deserialize_program, host_policy, serialize_binary,
    serialize_program,
};
#[cfg(any(target_arch = "aarch64", target_arch = "x86_64"))]
pub use base_filters::HostFilter;
pub use common::{BPF_MAX_LEN, BpfProgram, BpfProgramRef, sock_filter};
pub use compiler::{AllowedSyscall, ArchPolicy, Policy, compile};
pub use config::{ConfigError, PolicyConfig};
pub use install::{
    InstallationError, apply_filter, install_policy, install_with, set_no_new_privs,
};
pub use interpreter::{InterpreterError, SeccompData, Verdict};
pub use program::{FilterError, JumpSlot, Program};

/// Errors building or installing a policy.
#[derive(Debug, thiserror::Error, displaydoc::Display)]
pub enum PolicyError {
    /// No built-in seccomp policy for architecture {0}.
    UnsupportedHost(String),
    /// Base filter table for architecture {0} is missing.
    MissingBaseTable(String),
    /// Failed to deserialize base filter tables: {0}
    Deserialization(#[from] DeserializationError),
    /// Failed to compile seccomp filter: {0}
    Filter(#[from] FilterError),
    /// Failed to install seccomp filter: {0}
    Installation(#[from] InstallationError),
}
