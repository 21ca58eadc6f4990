// Copyright 2025 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Data structures and BPF encoding constants shared by the compiler, the installer and the
//! interpreter.

use serde::{Deserialize, Serialize};

/// The maximum seccomp-BPF program length allowed by the linux kernel.
pub const BPF_MAX_LEN: usize = 4096;

/// The largest distance a conditional BPF jump can encode.
pub const BPF_MAX_JUMP: usize = u8::MAX as usize;

// BPF instruction classes.
// See /usr/include/linux/bpf_common.h .
pub(crate) const BPF_LD: u16 = 0x00;
pub(crate) const BPF_ALU: u16 = 0x04;
pub(crate) const BPF_JMP: u16 = 0x05;
pub(crate) const BPF_RET: u16 = 0x06;

// BPF ld/ldx fields.
pub(crate) const BPF_W: u16 = 0x00;
pub(crate) const BPF_ABS: u16 = 0x20;

// BPF alu fields.
pub(crate) const BPF_AND: u16 = 0x50;

// BPF jmp fields.
pub(crate) const BPF_JA: u16 = 0x00;
pub(crate) const BPF_JEQ: u16 = 0x10;
pub(crate) const BPF_JGT: u16 = 0x20;
pub(crate) const BPF_JGE: u16 = 0x30;
pub(crate) const BPF_JSET: u16 = 0x40;
pub(crate) const BPF_K: u16 = 0x00;

// `struct seccomp_data` offsets of fields in bytes:
//
// ```c
// struct seccomp_data {
//     int nr;
//     __u32 arch;
//     __u64 instruction_pointer;
//     __u64 args[6];
// };
// ```
pub(crate) const SECCOMP_DATA_NR_OFFSET: u32 = 0;
pub(crate) const SECCOMP_DATA_ARCH_OFFSET: u32 = 4;
pub(crate) const SECCOMP_DATA_IP_OFFSET: u32 = 8;
pub(crate) const SECCOMP_DATA_ARGS_OFFSET: u32 = 16;
pub(crate) const SECCOMP_DATA_ARG_SIZE: u32 = 8;
pub(crate) const SECCOMP_DATA_LEN: u32 = SECCOMP_DATA_ARGS_OFFSET + 6 * SECCOMP_DATA_ARG_SIZE;

/// BPF instruction structure definition.
/// See /usr/include/linux/filter.h .
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[allow(non_camel_case_types)]
pub struct sock_filter {
    /// Code of the instruction.
    pub code: ::std::os::raw::c_ushort,
    /// Jump if true offset.
    pub jt: ::std::os::raw::c_uchar,
    /// Jump if false offset.
    pub jf: ::std::os::raw::c_uchar,
    /// Immediate value.
    pub k: ::std::os::raw::c_uint,
}

/// Program made up of a sequence of BPF instructions.
pub type BpfProgram = Vec<sock_filter>;

/// Reference to program made up of a sequence of BPF instructions.
pub type BpfProgramRef<'a> = &'a [sock_filter];

/// Field of `struct seccomp_data` that a load instruction can examine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeccompField {
    /// The syscall number, as seen by the calling convention of `arch`.
    Nr,
    /// The `AUDIT_ARCH_*` value of the calling convention.
    Arch,
}

impl SeccompField {
    /// Byte offset of the field inside `struct seccomp_data`.
    pub const fn offset(self) -> u32 {
        match self {
            SeccompField::Nr => SECCOMP_DATA_NR_OFFSET,
            SeccompField::Arch => SECCOMP_DATA_ARCH_OFFSET,
        }
    }
}

/// Builds a `jump` BPF instruction.
///
/// # Arguments
///
/// * `code` - The operation code.
/// * `jt` - The jump offset in case the operation returns `true`.
/// * `jf` - The jump offset in case the operation returns `false`.
/// * `k` - The operand.
#[allow(non_snake_case)]
#[inline(always)]
pub const fn BPF_JUMP(code: u16, k: u32, jt: u8, jf: u8) -> sock_filter {
    sock_filter { code, jt, jf, k }
}

/// Builds a "statement" BPF instruction.
///
/// # Arguments
///
/// * `code` - The operation code.
/// * `k` - The operand.
#[allow(non_snake_case)]
#[inline(always)]
pub const fn BPF_STMT(code: u16, k: u32) -> sock_filter {
    sock_filter {
        code,
        jt: 0,
        jf: 0,
        k,
    }
}
