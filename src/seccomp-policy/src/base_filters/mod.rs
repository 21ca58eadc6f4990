// Copyright 2025 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Built-in allow-lists for the supported hosts.
//!
//! Each host pairs a generated base table per calling convention with a short list of syscalls
//! the generator does not pick up, mostly ones libc issues on its own behalf.

use std::collections::HashMap;
use std::io::Read;

use bincode::config;
use bincode::config::{Configuration, Fixint, LittleEndian, Limit};

use crate::PolicyError;
use crate::arch::{ArchPair, TargetArch};
use crate::common::{BpfProgram, sock_filter};
use crate::compiler::{AllowedSyscall, ArchPolicy, Policy};

mod aarch64;
mod arm;
mod x86;
mod x86_64;

// This byte limit is passed to `bincode` to guard against a potential memory
// allocation DOS caused by binary filters that are too large.
// This limit can be safely determined since the maximum length of a BPF
// filter is 4096 instructions and only a handful of architectures are supported.
const DESERIALIZATION_BYTES_LIMIT: usize = 100_000;

const BINCODE_CONFIG: Configuration<LittleEndian, Fixint, Limit<DESERIALIZATION_BYTES_LIMIT>> =
    config::standard()
        .with_fixed_int_encoding()
        .with_limit::<DESERIALIZATION_BYTES_LIMIT>()
        .with_little_endian();

/// Base tables keyed by architecture name.
pub type BaseTables = HashMap<String, BpfProgram>;

/// Binary filter deserialization errors.
pub type DeserializationError = bincode::error::DecodeError;

/// Binary filter serialization errors.
pub type SerializationError = bincode::error::EncodeError;

/// Deserializes base tables produced by an external generator.
///
/// Architecture names are lowercased.
pub fn deserialize_binary<R: Read>(mut reader: R) -> Result<BaseTables, DeserializationError> {
    let result: BaseTables = bincode::serde::decode_from_std_read(&mut reader, BINCODE_CONFIG)?;

    Ok(result
        .into_iter()
        .map(|(k, v)| (k.to_lowercase(), v))
        .collect())
}

/// Serializes base tables in the format `deserialize_binary` reads.
pub fn serialize_binary(tables: &BaseTables) -> Result<Vec<u8>, SerializationError> {
    bincode::serde::encode_to_vec(tables, BINCODE_CONFIG)
}

/// Serializes a compiled program.
pub fn serialize_program(program: &[sock_filter]) -> Result<Vec<u8>, SerializationError> {
    bincode::serde::encode_to_vec(program, BINCODE_CONFIG)
}

/// Deserializes a program written by `serialize_program`.
pub fn deserialize_program<R: Read>(mut reader: R) -> Result<BpfProgram, DeserializationError> {
    bincode::serde::decode_from_std_read(&mut reader, BINCODE_CONFIG)
}

/// A host whose processes may use two calling conventions.
pub trait BaseFilter {
    /// The native and compat architectures.
    const ARCHS: ArchPair;

    /// Generated base table of the native calling convention.
    fn native_base() -> &'static [sock_filter];

    /// Generated base table of the compat calling convention.
    fn compat_base() -> &'static [sock_filter];

    /// Syscalls allowed for the native calling convention on top of its base table.
    fn native_extra() -> &'static [(&'static str, u32)];

    /// Syscalls allowed for the compat calling convention on top of its base table.
    fn compat_extra() -> &'static [(&'static str, u32)];

    /// The complete built-in policy of the host.
    fn policy() -> Policy {
        Policy::new(
            arch_policy(Self::ARCHS.native, Self::native_base(), Self::native_extra()),
            arch_policy(Self::ARCHS.compat, Self::compat_base(), Self::compat_extra()),
        )
    }
}

fn arch_policy(arch: TargetArch, base: &[sock_filter], extra: &[(&str, u32)]) -> ArchPolicy {
    let extra = extra
        .iter()
        .map(|(name, nr)| AllowedSyscall::new(*name, *nr))
        .collect();
    ArchPolicy::new(arch, base, extra)
}

/// 64-bit ARM host running 32-bit EABI binaries.
#[derive(Debug)]
pub struct Arm64Filter;

impl BaseFilter for Arm64Filter {
    const ARCHS: ArchPair = ArchPair::new(TargetArch::aarch64, TargetArch::arm);

    fn native_base() -> &'static [sock_filter] {
        &aarch64::BASE_FILTER
    }

    fn compat_base() -> &'static [sock_filter] {
        &arm::BASE_FILTER
    }

    fn native_extra() -> &'static [(&'static str, u32)] {
        &[
            ("pivot_root", 41),
            ("ioprio_get", 31),
            ("ioprio_set", 30),
            ("gettid", 178),
            ("futex", 98),
            ("clone", 220),
            ("rt_sigreturn", 139),
            ("rt_tgsigqueueinfo", 240),
            ("restart_syscall", 128),
            ("getrandom", 278),
            ("perf_event_open", 241),
            ("tkill", 130),
            ("syncfs", 267),
        ]
    }

    fn compat_extra() -> &'static [(&'static str, u32)] {
        &ARM_COMPAT_EXTRA
    }
}

// Syscalls used by 32-bit binaries that the generated arm table misses.
const ARM_COMPAT_EXTRA: [(&str, u32); 25] = [
    ("clone", 120),
    ("futex", 240),
    ("sigreturn", 119),
    ("rt_sigreturn", 173),
    ("rt_tgsigqueueinfo", 363),
    ("gettid", 224),
    ("seccomp", 383),
    ("getrandom", 384),
    ("vfork", 190),
    ("tkill", 238),
    ("restart_syscall", 0),
    ("pipe", 42),
    ("perf_event_open", 364),
    // Still used by older apps.
    ("access", 33),
    ("stat64", 195),
    ("open", 5),
    ("getdents", 141),
    ("getdents64", 217),
    ("eventfd", 351),
    ("epoll_wait", 252),
    ("readlink", 85),
    ("epoll_create", 250),
    ("creat", 8),
    ("unlink", 10),
    ("lstat64", 196),
];

/// x86_64 host running 32-bit x86 binaries.
#[derive(Debug)]
pub struct X86_64Filter;

impl BaseFilter for X86_64Filter {
    const ARCHS: ArchPair = ArchPair::new(TargetArch::x86_64, TargetArch::x86);

    fn native_base() -> &'static [sock_filter] {
        &x86_64::BASE_FILTER
    }

    fn compat_base() -> &'static [sock_filter] {
        &x86::BASE_FILTER
    }

    fn native_extra() -> &'static [(&'static str, u32)] {
        &[
            ("pivot_root", 155),
            ("ioprio_get", 252),
            ("ioprio_set", 251),
            ("gettid", 186),
            ("futex", 202),
            ("clone", 56),
            ("rt_sigreturn", 15),
            ("rt_tgsigqueueinfo", 297),
            ("restart_syscall", 219),
            ("getrandom", 318),
            ("perf_event_open", 298),
            ("tkill", 200),
            ("fstatfs", 138),
        ]
    }

    fn compat_extra() -> &'static [(&'static str, u32)] {
        &[
            ("clone", 120),
            ("futex", 240),
            ("sigreturn", 119),
            ("rt_sigreturn", 173),
            ("rt_tgsigqueueinfo", 335),
            ("gettid", 224),
            ("seccomp", 354),
            ("getrandom", 355),
            ("vfork", 190),
            ("tkill", 238),
            ("restart_syscall", 0),
            ("pipe", 42),
            ("perf_event_open", 336),
            ("access", 33),
            ("stat64", 195),
            ("open", 5),
            ("getdents", 141),
            ("getdents64", 220),
            ("eventfd", 323),
            ("epoll_wait", 256),
            ("readlink", 85),
            ("epoll_create", 254),
            ("creat", 8),
            ("unlink", 10),
            ("lstat64", 196),
        ]
    }
}

/// Built-in filter of the architecture this crate was compiled for.
#[cfg(target_arch = "aarch64")]
pub type HostFilter = Arm64Filter;

/// Built-in filter of the architecture this crate was compiled for.
#[cfg(target_arch = "x86_64")]
pub type HostFilter = X86_64Filter;

/// Returns the built-in policy of a 64-bit architecture.
pub fn builtin_policy(native: TargetArch) -> Result<Policy, PolicyError> {
    match native {
        TargetArch::aarch64 => Ok(Arm64Filter::policy()),
        TargetArch::x86_64 => Ok(X86_64Filter::policy()),
        other => Err(PolicyError::UnsupportedHost(other.to_string())),
    }
}

/// Returns the built-in policy of the running host.
pub fn host_policy() -> Result<Policy, PolicyError> {
    #[cfg(any(target_arch = "aarch64", target_arch = "x86_64"))]
    {
        Ok(HostFilter::policy())
    }
    #[cfg(not(any(target_arch = "aarch64", target_arch = "x86_64")))]
    {
        Err(PolicyError::UnsupportedHost(
            std::env::consts::ARCH.to_string(),
        ))
    }
}
