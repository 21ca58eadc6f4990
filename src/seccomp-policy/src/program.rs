// Copyright 2025 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Append-only construction of seccomp-BPF programs.
//!
//! [`Program`] offers one method per instruction shape the policy needs. Jumps in classic BPF
//! are relative and forward-only, so a branch whose target has not been emitted yet is written
//! as a placeholder and tracked through a [`JumpSlot`], which is resolved exactly once by
//! [`Program::patch_jump`] after everything that sits between the branch and its target exists.

use crate::action::SeccompAction;
use crate::arch::ArchPair;
use crate::common::{
    BPF_ABS, BPF_JEQ, BPF_JMP, BPF_JUMP, BPF_K, BPF_LD, BPF_MAX_LEN, BPF_RET,
    BPF_STMT, BPF_W, BpfProgram, SeccompField, sock_filter,
};

/// Seccomp filter compilation errors.
#[derive(Debug, PartialEq, Eq, thiserror::Error, displaydoc::Display)]
pub enum FilterError {
    /// The seccomp filter contains too many BPF instructions: {0} (maximum is 4096).
    FilterTooLarge(usize),
    /// Jump of {0} instructions exceeds the maximum of 255 a BPF branch can encode.
    JumpOutOfRange(usize),
    /// Instruction {0} is not an unresolved architecture jump.
    InvalidJumpSlot(usize),
    /// Jump slot was patched before its target was emitted.
    PrematurePatch,
    /// Mismatch action {0} would let unlisted syscalls and unknown architectures through.
    PermissiveMismatchAction(SeccompAction),
}

/// A conditional jump whose on-match distance is not known yet.
///
/// Obtained from [`Program::validate_architecture`] and consumed by [`Program::patch_jump`].
/// The type is neither `Clone` nor `Copy`, so a slot is resolved at most once.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a reserved jump must be patched before the program is used"]
pub struct JumpSlot {
    /// Index of the placeholder jump.
    index: usize,
    /// Value the placeholder compares the accumulator against.
    value: u32,
    /// Program length right after the reservation was made.
    reserved_len: usize,
}

impl JumpSlot {
    /// Position of the placeholder instruction inside the program.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Ordered, append-only sequence of BPF instructions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Program {
    instructions: BpfProgram,
}

impl Program {
    /// Creates an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty program with room for `capacity` instructions.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instructions: Vec::with_capacity(capacity),
        }
    }

    /// Number of instructions emitted so far.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Whether nothing has been emitted.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// The instructions emitted so far.
    pub fn instructions(&self) -> &[sock_filter] {
        &self.instructions
    }

    /// Consumes the builder, returning the finished program.
    pub fn into_inner(self) -> BpfProgram {
        self.instructions
    }

    /// Appends an unconditional return of `action`.
    pub fn ret(&mut self, action: SeccompAction) -> &mut Self {
        self.instructions
            .push(BPF_STMT(BPF_RET + BPF_K, u32::from(action)));
        self
    }

    /// Appends `return SECCOMP_RET_ALLOW`.
    pub fn allow(&mut self) -> &mut Self {
        self.ret(SeccompAction::Allow)
    }

    /// Appends `return SECCOMP_RET_KILL`.
    pub fn kill(&mut self) -> &mut Self {
        self.ret(SeccompAction::KillThread)
    }

    /// Appends `return SECCOMP_RET_TRAP`.
    pub fn trap(&mut self) -> &mut Self {
        self.ret(SeccompAction::Trap)
    }

    /// Appends `return SECCOMP_RET_ERRNO | code`.
    pub fn errno(&mut self, code: u16) -> &mut Self {
        self.ret(SeccompAction::Errno(u32::from(code)))
    }

    /// Appends `return SECCOMP_RET_TRACE`.
    pub fn trace(&mut self) -> &mut Self {
        self.ret(SeccompAction::Trace(0))
    }

    /// Loads a 32-bit field of `struct seccomp_data` into the accumulator.
    pub fn load(&mut self, field: SeccompField) -> &mut Self {
        self.instructions
            .push(BPF_STMT(BPF_LD + BPF_W + BPF_ABS, field.offset()));
        self
    }

    /// Loads the syscall number, ahead of a run of syscall comparisons.
    pub fn examine_syscall(&mut self) -> &mut Self {
        self.load(SeccompField::Nr)
    }

    /// Appends `if (A == value) skip jt else skip jf`.
    pub fn jump_eq(&mut self, value: u32, jt: u8, jf: u8) -> &mut Self {
        self.instructions
            .push(BPF_JUMP(BPF_JMP + BPF_JEQ + BPF_K, value, jt, jf));
        self
    }

    /// Allows one syscall number.
    ///
    /// A match falls through to the `allow` return; a mismatch skips over it to whatever is
    /// emitted next.
    pub fn allow_syscall(&mut self, nr: u32) -> &mut Self {
        self.jump_eq(nr, 0, 1).allow()
    }

    /// Splices an already valid block of instructions in verbatim.
    pub fn extend_from_slice(&mut self, block: &[sock_filter]) -> &mut Self {
        self.instructions.extend_from_slice(block);
        self
    }

    /// Emits the architecture dispatch preamble.
    ///
    /// ```text
    /// ld  [arch]
    /// jeq native, 2, 0    ; over the next two instructions, into the native sub-program
    /// jeq compat, 1, 0    ; placeholder, see `patch_jump`
    /// ret mismatch
    /// ```
    ///
    /// The native sub-program must be emitted right after this call. The returned slot points
    /// at the compat branch, which must be patched to the first instruction of the compat
    /// sub-program once that position is known.
    pub fn validate_architecture(
        &mut self,
        archs: ArchPair,
        mismatch: SeccompAction,
    ) -> JumpSlot {
        let compat = archs.compat.audit_value();

        self.load(SeccompField::Arch)
            .jump_eq(archs.native.audit_value(), 2, 0)
            .jump_eq(compat, 1, 0);
        let index = self.len() - 1;
        self.ret(mismatch);

        JumpSlot {
            index,
            value: compat,
            reserved_len: self.len(),
        }
    }

    /// Resolves a reserved jump so that its match branch lands on the next instruction to be
    /// emitted.
    ///
    /// Every instruction that belongs between the slot and its target must already be in the
    /// program; the distance is computed from the current length.
    pub fn patch_jump(&mut self, slot: JumpSlot) -> Result<(), FilterError> {
        let placeholder = BPF_JUMP(BPF_JMP + BPF_JEQ + BPF_K, slot.value, 1, 0);
        if self.instructions.get(slot.index) != Some(&placeholder) {
            return Err(FilterError::InvalidJumpSlot(slot.index));
        }
        if self.len() <= slot.reserved_len {
            return Err(FilterError::PrematurePatch);
        }

        let distance = self.len() - slot.index - 1;
        let jt = u8::try_from(distance).map_err(|_| FilterError::JumpOutOfRange(distance))?;

        self.instructions[slot.index] = BPF_JUMP(BPF_JMP + BPF_JEQ + BPF_K, slot.value, jt, 0);
        Ok(())
    }

    /// Fails if the program is longer than the kernel accepts.
    pub fn check_len(&self) -> Result<(), FilterError> {
        if self.len() > BPF_MAX_LEN {
            return Err(FilterError::FilterTooLarge(self.len()));
        }
        Ok(())
    }
}

impl From<Program> for BpfProgram {
    fn from(program: Program) -> Self {
        program.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::TargetArch;

    const ARM_PAIR: ArchPair = ArchPair::new(TargetArch::aarch64, TargetArch::arm);

    #[test]
    fn test_return_emitters() {
        let mut program = Program::new();
        program.allow().kill().trap().errno(13).trace();

        let codes: Vec<u32> = program.instructions().iter().map(|i| i.k).collect();
        assert_eq!(
            codes,
            vec![0x7fff_0000, 0x0000_0000, 0x0003_0000, 0x0005_000d, 0x7ff0_0000]
        );
        assert!(program.instructions().iter().all(|i| i.code == 0x06));
    }

    #[test]
    fn test_allow_syscall() {
        let mut program = Program::new();
        program.examine_syscall().allow_syscall(123);

        assert_eq!(
            program.into_inner(),
            vec![
                sock_filter {
                    code: 0x20,
                    jt: 0,
                    jf: 0,
                    k: 0,
                },
                sock_filter {
                    code: 0x15,
                    jt: 0,
                    jf: 1,
                    k: 123,
                },
                sock_filter {
                    code: 0x06,
                    jt: 0,
                    jf: 0,
                    k: 0x7fff_0000,
                },
            ]
        );
    }

    #[test]
    fn test_validate_architecture() {
        let mut program = Program::new();
        let slot = program.validate_architecture(ARM_PAIR, SeccompAction::Trap);

        assert_eq!(slot.index(), 2);
        assert_eq!(
            program.instructions(),
            &[
                BPF_STMT(0x20, 4),
                BPF_JUMP(0x15, 0xC000_00B7, 2, 0),
                BPF_JUMP(0x15, 0x4000_0028, 1, 0),
                BPF_STMT(0x06, 0x0003_0000),
            ]
        );
    }

    #[test]
    fn test_patch_jump() {
        let mut program = Program::new();
        let slot = program.validate_architecture(ARM_PAIR, SeccompAction::Trap);
        program.examine_syscall().allow_syscall(1).trap();
        program.patch_jump(slot).unwrap();

        // Trap, load, jeq, allow and trap sit between the slot and the next instruction.
        assert_eq!(program.instructions()[2].jt, 5);
        assert_eq!(program.instructions()[2].jf, 0);
        assert_eq!(program.instructions()[2].k, TargetArch::arm.audit_value());
    }

    #[test]
    fn test_premature_patch() {
        let mut program = Program::new();
        let slot = program.validate_architecture(ARM_PAIR, SeccompAction::Trap);
        assert_eq!(program.patch_jump(slot), Err(FilterError::PrematurePatch));
    }

    #[test]
    fn test_patch_rejects_resolved_slot() {
        let mut program = Program::new();
        let slot = program.validate_architecture(ARM_PAIR, SeccompAction::Trap);
        let forged = JumpSlot {
            index: slot.index,
            value: slot.value,
            reserved_len: slot.reserved_len,
        };
        program.examine_syscall().trap();
        program.patch_jump(slot).unwrap();

        // The instruction no longer holds the placeholder.
        assert_eq!(
            program.patch_jump(forged),
            Err(FilterError::InvalidJumpSlot(2))
        );
    }

    #[test]
    fn test_patch_rejects_foreign_slot() {
        let mut program = Program::new();
        program.examine_syscall().allow_syscall(1).trap();
        let forged = JumpSlot {
            index: 7,
            value: 0,
            reserved_len: 0,
        };
        assert_eq!(
            program.patch_jump(forged),
            Err(FilterError::InvalidJumpSlot(7))
        );
    }

    #[test]
    fn test_jump_range_boundary() {
        // The slot sits at index 2, so 254 instructions after the preamble put the next
        // instruction exactly 255 away.
        let build = |filler: usize| {
            let mut program = Program::new();
            let slot = program.validate_architecture(ARM_PAIR, SeccompAction::Trap);
            for _ in 0..filler {
                program.examine_syscall();
            }
            (program, slot)
        };

        let (mut program, slot) = build(254);
        program.patch_jump(slot).unwrap();
        assert_eq!(program.instructions()[2].jt, 255);

        let (mut program, slot) = build(255);
        assert_eq!(
            program.patch_jump(slot),
            Err(FilterError::JumpOutOfRange(256))
        );
        // The placeholder is left untouched on failure.
        assert_eq!(program.instructions()[2].jt, 1);
    }

    #[test]
    fn test_check_len() {
        let mut program = Program::with_capacity(BPF_MAX_LEN + 1);
        for _ in 0..BPF_MAX_LEN {
            program.allow();
        }
        program.check_len().unwrap();
        program.allow();
        assert_eq!(
            program.check_len(),
            Err(FilterError::FilterTooLarge(BPF_MAX_LEN + 1))
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            format!("{}", FilterError::JumpOutOfRange(300)),
            "Jump of 300 instructions exceeds the maximum of 255 a BPF branch can encode."
        );
        assert_eq!(
            format!("{}", FilterError::PrematurePatch),
            "Jump slot was patched before its target was emitted."
        );
    }
}
