// Copyright 2025 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::str::FromStr;

// Architecture identifier.
// See /usr/include/linux/audit.h .
const __AUDIT_ARCH_64BIT: u32 = 0x8000_0000;
const __AUDIT_ARCH_LE: u32 = 0x4000_0000;

// Defined as:
// `#define AUDIT_ARCH_AARCH64	(EM_AARCH64|__AUDIT_ARCH_64BIT|__AUDIT_ARCH_LE)`
const AUDIT_ARCH_AARCH64: u32 = 183 | __AUDIT_ARCH_64BIT | __AUDIT_ARCH_LE;

// Defined as:
// `#define AUDIT_ARCH_ARM	(EM_ARM|__AUDIT_ARCH_LE)`
const AUDIT_ARCH_ARM: u32 = 40 | __AUDIT_ARCH_LE;

// Defined as:
// `#define AUDIT_ARCH_X86_64	(EM_X86_64|__AUDIT_ARCH_64BIT|__AUDIT_ARCH_LE)`
const AUDIT_ARCH_X86_64: u32 = 62 | __AUDIT_ARCH_64BIT | __AUDIT_ARCH_LE;

// Defined as:
// `#define AUDIT_ARCH_I386	(EM_386|__AUDIT_ARCH_LE)`
const AUDIT_ARCH_I386: u32 = 3 | __AUDIT_ARCH_LE;

/// Supported target architectures.
#[allow(non_camel_case_types)]
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum TargetArch {
    /// aarch64 arch
    aarch64,
    /// 32-bit arm (EABI) arch
    arm,
    /// x86_64 arch
    x86_64,
    /// 32-bit x86 arch
    x86,
}

/// Errors related to target arch.
#[derive(Debug, PartialEq, Eq, thiserror::Error, displaydoc::Display)]
pub enum TargetArchError {
    /// Invalid target arch string: {0}
    InvalidString(String),
}

impl TargetArch {
    /// Get the arch audit value, the value the kernel stores in `seccomp_data.arch`.
    pub fn audit_value(self) -> u32 {
        match self {
            TargetArch::aarch64 => AUDIT_ARCH_AARCH64,
            TargetArch::arm => AUDIT_ARCH_ARM,
            TargetArch::x86_64 => AUDIT_ARCH_X86_64,
            TargetArch::x86 => AUDIT_ARCH_I386,
        }
    }

    /// Get the string representation.
    pub fn as_str(self) -> &'static str {
        match self {
            TargetArch::aarch64 => "aarch64",
            TargetArch::arm => "arm",
            TargetArch::x86_64 => "x86_64",
            TargetArch::x86 => "x86",
        }
    }
}

impl TryFrom<&str> for TargetArch {
    type Error = TargetArchError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "aarch64" | "arm64" => Ok(TargetArch::aarch64),
            "arm" | "arm32" => Ok(TargetArch::arm),
            "x86_64" | "amd64" => Ok(TargetArch::x86_64),
            "x86" | "i386" | "i686" => Ok(TargetArch::x86),
            _ => Err(TargetArchError::InvalidString(s.to_string())),
        }
    }
}

impl FromStr for TargetArch {
    type Err = TargetArchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TargetArch::try_from(s)
    }
}

impl fmt::Display for TargetArch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two calling conventions a process may use on a mixed 64/32-bit host.
///
/// Syscall numbers are only meaningful relative to one of these, which is why the
/// architecture is always checked before the number.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ArchPair {
    /// The native 64-bit ABI.
    pub native: TargetArch,
    /// The 32-bit compatibility ABI.
    pub compat: TargetArch,
}

impl ArchPair {
    /// Pairs a 64-bit ABI with its compatibility ABI.
    pub const fn new(native: TargetArch, compat: TargetArch) -> Self {
        Self { native, compat }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_values() {
        assert_eq!(TargetArch::aarch64.audit_value(), 0xC000_00B7);
        assert_eq!(TargetArch::arm.audit_value(), 0x4000_0028);
        assert_eq!(TargetArch::x86_64.audit_value(), 0xC000_003E);
        assert_eq!(TargetArch::x86.audit_value(), 0x4000_0003);
    }

    #[test]
    fn test_parse_arch() {
        assert_eq!("AARCH64".parse::<TargetArch>().unwrap(), TargetArch::aarch64);
        assert_eq!(TargetArch::try_from("i386").unwrap(), TargetArch::x86);
        assert_eq!(
            "riscv64".parse::<TargetArch>().unwrap_err(),
            TargetArchError::InvalidString("riscv64".to_string())
        );
        assert_eq!(
            format!("{}", TargetArchError::InvalidString("lala".to_string())),
            "Invalid target arch string: lala"
        );
    }
}
