// Copyright 2025 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use serde::{Deserialize, Serialize};

// Return codes for BPF programs.
// See /usr/include/linux/seccomp.h .
pub(crate) const SECCOMP_RET_ALLOW: u32 = 0x7fff_0000;
pub(crate) const SECCOMP_RET_ERRNO: u32 = 0x0005_0000;
pub(crate) const SECCOMP_RET_KILL_THREAD: u32 = 0x0000_0000;
pub(crate) const SECCOMP_RET_KILL_PROCESS: u32 = 0x8000_0000;
pub(crate) const SECCOMP_RET_LOG: u32 = 0x7ffc_0000;
pub(crate) const SECCOMP_RET_TRACE: u32 = 0x7ff0_0000;
pub(crate) const SECCOMP_RET_TRAP: u32 = 0x0003_0000;
pub(crate) const SECCOMP_RET_ACTION_FULL: u32 = 0xffff_0000;
pub(crate) const SECCOMP_RET_MASK: u32 = 0x0000_ffff;

/// Actions that `seccomp` can apply to process calling a syscall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeccompAction {
    /// Allows syscall.
    Allow,
    /// Returns from syscall with specified error number.
    Errno(u32),
    /// Kills calling thread.
    KillThread,
    /// Kills calling process.
    KillProcess,
    /// Same as allow but logs call.
    Log,
    /// Notifies tracing process of the caller with respective number.
    Trace(u32),
    /// Sends `SIGSYS` to the calling process.
    Trap,
}

impl From<SeccompAction> for u32 {
    /// Return codes of the BPF program for each action.
    fn from(action: SeccompAction) -> Self {
        match action {
            SeccompAction::Allow => SECCOMP_RET_ALLOW,
            SeccompAction::Errno(x) => SECCOMP_RET_ERRNO | (x & SECCOMP_RET_MASK),
            SeccompAction::KillThread => SECCOMP_RET_KILL_THREAD,
            SeccompAction::KillProcess => SECCOMP_RET_KILL_PROCESS,
            SeccompAction::Log => SECCOMP_RET_LOG,
            SeccompAction::Trace(x) => SECCOMP_RET_TRACE | (x & SECCOMP_RET_MASK),
            SeccompAction::Trap => SECCOMP_RET_TRAP,
        }
    }
}

impl SeccompAction {
    /// Decodes the value returned by a seccomp program.
    ///
    /// Unknown action values are treated the way the kernel treats them, as `KillProcess`.
    pub fn from_ret(ret: u32) -> Self {
        let data = ret & SECCOMP_RET_MASK;
        match ret & SECCOMP_RET_ACTION_FULL {
            SECCOMP_RET_ALLOW => SeccompAction::Allow,
            SECCOMP_RET_ERRNO => SeccompAction::Errno(data),
            SECCOMP_RET_KILL_THREAD => SeccompAction::KillThread,
            SECCOMP_RET_LOG => SeccompAction::Log,
            SECCOMP_RET_TRACE => SeccompAction::Trace(data),
            SECCOMP_RET_TRAP => SeccompAction::Trap,
            _ => SeccompAction::KillProcess,
        }
    }

    /// Whether the syscall is executed under this action.
    pub fn permits(self) -> bool {
        matches!(self, SeccompAction::Allow | SeccompAction::Log)
    }
}

impl fmt::Display for SeccompAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SeccompAction::Allow => write!(f, "allow"),
            SeccompAction::Errno(e) => write!(f, "errno({e})"),
            SeccompAction::KillThread => write!(f, "kill_thread"),
            SeccompAction::KillProcess => write!(f, "kill_process"),
            SeccompAction::Log => write!(f, "log"),
            SeccompAction::Trace(t) => write!(f, "trace({t})"),
            SeccompAction::Trap => write!(f, "trap"),
        }
    }
}
