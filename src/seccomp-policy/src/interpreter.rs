// Copyright 2025 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Userspace evaluation of seccomp filters.
//!
//! Runs a program against a synthetic `struct seccomp_data` without installing it, covering the
//! instruction subset the policy compiler and the base tables emit. Used by the `check`
//! subcommand and by tests to assert verdicts without touching the calling thread.

use crate::action::SeccompAction;
use crate::common::{
    BPF_ABS, BPF_ALU, BPF_AND, BPF_JA, BPF_JEQ, BPF_JGE, BPF_JGT, BPF_JMP, BPF_JSET, BPF_K,
    BPF_LD, BPF_RET, BPF_W, SECCOMP_DATA_ARCH_OFFSET, SECCOMP_DATA_ARG_SIZE,
    SECCOMP_DATA_ARGS_OFFSET, SECCOMP_DATA_IP_OFFSET, SECCOMP_DATA_LEN, SECCOMP_DATA_NR_OFFSET,
    sock_filter,
};

/// Errors raised while evaluating a program.
#[derive(Debug, PartialEq, Eq, thiserror::Error, displaydoc::Display)]
pub enum InterpreterError {
    /// Unsupported instruction with opcode {code} at {pc}.
    UnsupportedInstruction {
        /// Position of the instruction.
        pc: usize,
        /// Its opcode.
        code: u16,
    },
    /// Jump at {pc} leaves the program.
    JumpOutOfBounds {
        /// Position of the jump.
        pc: usize,
    },
    /// Load at {pc} reads outside of seccomp_data: offset {offset}.
    LoadOutOfBounds {
        /// Position of the load.
        pc: usize,
        /// Offending byte offset.
        offset: u32,
    },
    /// Program ended without returning.
    FellOffEnd,
}

/// Userspace mirror of the kernel's `struct seccomp_data`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeccompData {
    /// Syscall number.
    pub nr: i32,
    /// `AUDIT_ARCH_*` value of the calling convention.
    pub arch: u32,
    /// Instruction pointer at the time of the call.
    pub instruction_pointer: u64,
    /// Raw syscall arguments.
    pub args: [u64; 6],
}

impl SeccompData {
    /// Describes a syscall without arguments.
    pub fn new(arch: u32, nr: i32) -> Self {
        Self {
            nr,
            arch,
            ..Default::default()
        }
    }

    /// Sets the syscall arguments.
    pub fn with_args(mut self, args: [u64; 6]) -> Self {
        self.args = args;
        self
    }

    // The kernel exposes the struct as native endian memory, so do the same.
    fn to_bytes(self) -> [u8; SECCOMP_DATA_LEN as usize] {
        let mut bytes = [0u8; SECCOMP_DATA_LEN as usize];
        let mut put = |offset: u32, data: &[u8]| {
            let start = offset as usize;
            bytes[start..start + data.len()].copy_from_slice(data);
        };

        put(SECCOMP_DATA_NR_OFFSET, &self.nr.to_ne_bytes());
        put(SECCOMP_DATA_ARCH_OFFSET, &self.arch.to_ne_bytes());
        put(SECCOMP_DATA_IP_OFFSET, &self.instruction_pointer.to_ne_bytes());
        for (offset, arg) in (SECCOMP_DATA_ARGS_OFFSET..)
            .step_by(SECCOMP_DATA_ARG_SIZE as usize)
            .zip(self.args)
        {
            put(offset, &arg.to_ne_bytes());
        }
        bytes
    }
}

/// Outcome of running a program.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Verdict {
    /// Raw value the program returned.
    pub ret: u32,
    /// Decoded action.
    pub action: SeccompAction,
    /// Number of instructions executed, the final return included.
    pub steps: usize,
    /// Whether the syscall number was loaded at any point.
    pub inspected_nr: bool,
}

/// Runs `program` against `data`.
pub fn run(program: &[sock_filter], data: &SeccompData) -> Result<Verdict, InterpreterError> {
    let bytes = data.to_bytes();
    let mut acc: u32 = 0;
    let mut pc: usize = 0;
    let mut steps: usize = 0;
    let mut inspected_nr = false;

    // Jumps are forward only, so every iteration strictly advances `pc`.
    while let Some(insn) = program.get(pc) {
        steps += 1;
        let unsupported = InterpreterError::UnsupportedInstruction {
            pc,
            code: insn.code,
        };

        match insn.code & 0x07 {
            BPF_LD => {
                if insn.code != BPF_LD + BPF_W + BPF_ABS {
                    return Err(unsupported);
                }
                acc = load_word(&bytes, insn.k).ok_or(InterpreterError::LoadOutOfBounds {
                    pc,
                    offset: insn.k,
                })?;
                inspected_nr |= insn.k == SECCOMP_DATA_NR_OFFSET;
                pc += 1;
            }
            BPF_ALU => {
                if insn.code != BPF_ALU + BPF_AND + BPF_K {
                    return Err(unsupported);
                }
                acc &= insn.k;
                pc += 1;
            }
            BPF_JMP => {
                let offset = match insn.code {
                    c if c == BPF_JMP + BPF_JA => usize::try_from(insn.k).unwrap_or(usize::MAX),
                    c if c == BPF_JMP + BPF_JEQ + BPF_K => branch(insn, acc == insn.k),
                    c if c == BPF_JMP + BPF_JGT + BPF_K => branch(insn, acc > insn.k),
                    c if c == BPF_JMP + BPF_JGE + BPF_K => branch(insn, acc >= insn.k),
                    c if c == BPF_JMP + BPF_JSET + BPF_K => branch(insn, acc & insn.k != 0),
                    _ => return Err(unsupported),
                };
                pc = pc
                    .checked_add(offset)
                    .and_then(|target| target.checked_add(1))
                    .filter(|target| *target < program.len())
                    .ok_or(InterpreterError::JumpOutOfBounds { pc })?;
            }
            BPF_RET => {
                if insn.code != BPF_RET + BPF_K {
                    return Err(unsupported);
                }
                return Ok(Verdict {
                    ret: insn.k,
                    action: SeccompAction::from_ret(insn.k),
                    steps,
                    inspected_nr,
                });
            }
            _ => return Err(unsupported),
        }
    }

    Err(InterpreterError::FellOffEnd)
}

fn branch(insn: &sock_filter, taken: bool) -> usize {
    usize::from(if taken { insn.jt } else { insn.jf })
}

// Loads must be 4 byte aligned and fully inside the struct.
fn load_word(bytes: &[u8], offset: u32) -> Option<u32> {
    if offset % 4 != 0 {
        return None;
    }
    let start = usize::try_from(offset).ok()?;
    let word = bytes.get(start..start.checked_add(4)?)?;
    Some(u32::from_ne_bytes(word.try_into().ok()?))
}
