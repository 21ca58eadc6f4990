// Copyright 2025 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Assembly of the two-ABI allow-list filter.
//!
//! The resulting program has the following shape:
//!
//! ```text
//! preamble        ld [arch]; jeq native; jeq compat (patched); ret mismatch
//! native          ld [nr]; <native base>; <native extra allow rules>; ret mismatch
//! compat          ld [nr]; <compat base>; <compat extra allow rules>; ret mismatch
//! ```
//!
//! Rules are plain equality tests evaluated in the order given, first match wins. Order only
//! affects how many instructions a syscall walks through, never the verdict.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::PolicyError;
use crate::action::SeccompAction;
use crate::arch::{ArchPair, TargetArch};
use crate::base_filters::BaseTables;
use crate::common::{BpfProgram, sock_filter};
use crate::program::{FilterError, Program};

/// Length of the architecture dispatch preamble.
pub const PREAMBLE_LEN: usize = 4;

/// Instructions emitted for each allowed syscall: one comparison, one return.
pub const RULE_LEN: usize = 2;

/// A syscall allowed on top of an architecture's base list.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AllowedSyscall {
    /// Human readable name, only used for diagnostics.
    pub name: String,
    /// Syscall number in the calling convention of the architecture it is listed under.
    pub nr: u32,
}

impl AllowedSyscall {
    /// Creates a new entry.
    pub fn new(name: impl Into<String>, nr: u32) -> Self {
        Self {
            name: name.into(),
            nr,
        }
    }
}

/// The allow-list for one calling convention.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchPolicy {
    /// Calling convention the syscall numbers belong to.
    pub arch: TargetArch,
    /// Machine generated block, spliced in verbatim.
    pub base: BpfProgram,
    /// Hand maintained syscalls, checked after the base block in this order.
    pub extra_syscalls: Vec<AllowedSyscall>,
}

impl ArchPolicy {
    /// Creates the allow-list of one architecture.
    pub fn new(
        arch: TargetArch,
        base: &[sock_filter],
        extra_syscalls: Vec<AllowedSyscall>,
    ) -> Self {
        Self {
            arch,
            base: base.to_vec(),
            extra_syscalls,
        }
    }

    /// Number of instructions this allow-list compiles to, including the syscall number load
    /// and the trailing mismatch return.
    pub fn subprogram_len(&self) -> usize {
        1 + self.base.len() + RULE_LEN * self.extra_syscalls.len() + 1
    }

    /// Whether `nr` is one of the hand maintained syscalls.
    pub fn lists(&self, nr: u32) -> bool {
        self.extra_syscalls.iter().any(|syscall| syscall.nr == nr)
    }

    /// Emits the sub-program: load the syscall number, test the base block, then each extra
    /// syscall, and finally return `mismatch`.
    fn emit(&self, program: &mut Program, mismatch: SeccompAction) {
        program.examine_syscall().extend_from_slice(&self.base);
        for syscall in &self.extra_syscalls {
            program.allow_syscall(syscall.nr);
        }
        program.ret(mismatch);
    }
}

/// Complete policy for a host that runs both a 64-bit and a 32-bit calling convention.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Policy {
    /// 64-bit allow-list.
    pub native: ArchPolicy,
    /// 32-bit compatibility allow-list.
    pub compat: ArchPolicy,
    /// Returned for unknown architectures and for syscalls matching no rule.
    pub mismatch_action: SeccompAction,
}

impl Policy {
    /// Creates a policy that traps on anything not explicitly allowed.
    pub fn new(native: ArchPolicy, compat: ArchPolicy) -> Self {
        Self {
            native,
            compat,
            mismatch_action: SeccompAction::Trap,
        }
    }

    /// Replaces the action taken on a mismatch.
    ///
    /// Actions that let the syscall run are refused by [`compile`].
    pub fn with_mismatch_action(mut self, action: SeccompAction) -> Self {
        self.mismatch_action = action;
        self
    }

    /// The two architectures the policy dispatches on.
    pub fn archs(&self) -> ArchPair {
        ArchPair::new(self.native.arch, self.compat.arch)
    }

    /// Replaces both base blocks with externally generated ones, looked up by architecture
    /// name.
    pub fn with_base_tables(mut self, tables: &BaseTables) -> Result<Self, PolicyError> {
        for arch_policy in [&mut self.native, &mut self.compat] {
            let name = arch_policy.arch.as_str();
            let base = tables
                .get(name)
                .ok_or_else(|| PolicyError::MissingBaseTable(name.to_string()))?;
            arch_policy.base = base.clone();
        }
        Ok(self)
    }

    /// Appends syscalls to the native and compat extra lists.
    pub fn extend_extra_syscalls(
        &mut self,
        native: impl IntoIterator<Item = AllowedSyscall>,
        compat: impl IntoIterator<Item = AllowedSyscall>,
    ) {
        self.native.extra_syscalls.extend(native);
        self.compat.extra_syscalls.extend(compat);
    }

    /// Length of the native sub-program, which the compat branch has to jump over.
    pub fn native_subprogram_len(&self) -> usize {
        self.native.subprogram_len()
    }

    /// Number of instructions `compile` produces for this policy.
    pub fn compiled_len(&self) -> usize {
        PREAMBLE_LEN + self.native.subprogram_len() + self.compat.subprogram_len()
    }
}

/// Compiles a policy into a BPF program ready to be installed.
///
/// The jump into the compat sub-program is limited to 255 instructions, which bounds the size
/// of the native sub-program. Exceeding it fails the whole compilation.
pub fn compile(policy: &Policy) -> Result<BpfProgram, FilterError> {
    if policy.mismatch_action.permits() {
        return Err(FilterError::PermissiveMismatchAction(policy.mismatch_action));
    }

    let mut program = Program::with_capacity(policy.compiled_len());

    let to_compat = program.validate_architecture(policy.archs(), policy.mismatch_action);
    policy.native.emit(&mut program, policy.mismatch_action);

    // Only instructions up to here sit between the compat branch and its target.
    program.patch_jump(to_compat)?;
    policy.compat.emit(&mut program, policy.mismatch_action);

    program.check_len()?;

    debug!(
        "Compiled {}/{} seccomp filter: {} instructions ({} native, {} compat)",
        policy.native.arch,
        policy.compat.arch,
        program.len(),
        policy.native.subprogram_len(),
        policy.compat.subprogram_len()
    );
    Ok(program.into_inner())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::common::{BPF_ABS, BPF_LD, BPF_STMT, BPF_W, BPF_MAX_LEN};
    use crate::interpreter::{SeccompData, run};

    const FILLER: sock_filter = BPF_STMT(BPF_LD + BPF_W + BPF_ABS, 0);

    fn syscalls(numbers: &[u32]) -> Vec<AllowedSyscall> {
        numbers
            .iter()
            .map(|nr| AllowedSyscall::new(format!("sys_{nr}"), *nr))
            .collect()
    }

    fn policy(native_base: usize, native: &[u32], compat: &[u32]) -> Policy {
        Policy::new(
            ArchPolicy::new(
                TargetArch::aarch64,
                &vec![FILLER; native_base],
                syscalls(native),
            ),
            ArchPolicy::new(TargetArch::arm, &[], syscalls(compat)),
        )
    }

    fn verdict(program: &[sock_filter], arch: u32, nr: i32) -> SeccompAction {
        run(program, &SeccompData::new(arch, nr)).unwrap().action
    }

    #[test]
    fn test_compile_layout() {
        let policy = policy(0, &[41, 31], &[120]);
        let program = compile(&policy).unwrap();

        let mut expected = Program::new();
        expected
            .load(crate::common::SeccompField::Arch)
            .jump_eq(TargetArch::aarch64.audit_value(), 2, 0)
            // trap, load nr, 2 rules, trap
            .jump_eq(TargetArch::arm.audit_value(), 7, 0)
            .trap()
            .examine_syscall()
            .allow_syscall(41)
            .allow_syscall(31)
            .trap()
            .examine_syscall()
            .allow_syscall(120)
            .trap();
        assert_eq!(program, expected.into_inner());
        assert_eq!(program.len(), policy.compiled_len());
    }

    #[test]
    fn test_subprogram_len() {
        for n in [0usize, 1, 5, 40] {
            let numbers: Vec<u32> = (0..n).map(|nr| u32::try_from(nr).unwrap()).collect();
            let policy = policy(3, &numbers, &numbers);
            assert_eq!(policy.native_subprogram_len(), 2 * n + 5);
            assert_eq!(compile(&policy).unwrap().len(), 4 + (2 * n + 5) + (2 * n + 2));
        }
    }

    #[test]
    fn test_verdicts() {
        let policy = policy(0, &[41, 31, 178], &[120, 240]);
        let program = compile(&policy).unwrap();
        let aarch64 = TargetArch::aarch64.audit_value();
        let arm = TargetArch::arm.audit_value();

        assert_eq!(verdict(&program, aarch64, 41), SeccompAction::Allow);
        assert_eq!(verdict(&program, aarch64, 178), SeccompAction::Allow);
        assert_eq!(verdict(&program, aarch64, 999_999), SeccompAction::Trap);
        // Numbers are only valid for the architecture they are listed under.
        assert_eq!(verdict(&program, aarch64, 120), SeccompAction::Trap);
        assert_eq!(verdict(&program, arm, 120), SeccompAction::Allow);
        assert_eq!(verdict(&program, arm, 240), SeccompAction::Allow);
        assert_eq!(verdict(&program, arm, 41), SeccompAction::Trap);

        let unknown = TargetArch::x86_64.audit_value();
        for nr in [41, 120, 999_999] {
            let verdict = run(&program, &SeccompData::new(unknown, nr)).unwrap();
            assert_eq!(verdict.action, SeccompAction::Trap);
            assert!(!verdict.inspected_nr);
        }
    }

    #[test]
    fn test_mismatch_action() {
        let policy = policy(0, &[1], &[2]).with_mismatch_action(SeccompAction::Errno(1000));
        let program = compile(&policy).unwrap();

        assert_eq!(
            verdict(&program, TargetArch::aarch64.audit_value(), 3),
            SeccompAction::Errno(1000)
        );
        assert_eq!(verdict(&program, 0, 1), SeccompAction::Errno(1000));
        assert_eq!(
            verdict(&program, TargetArch::arm.audit_value(), 2),
            SeccompAction::Allow
        );
    }

    #[test]
    fn test_permissive_mismatch_action() {
        for action in [SeccompAction::Allow, SeccompAction::Log] {
            let policy = policy(0, &[1], &[2]).with_mismatch_action(action);
            assert_eq!(
                compile(&policy).unwrap_err(),
                FilterError::PermissiveMismatchAction(action)
            );
        }
        assert_eq!(
            format!(
                "{}",
                FilterError::PermissiveMismatchAction(SeccompAction::Allow)
            ),
            "Mismatch action allow would let unlisted syscalls and unknown architectures through."
        );

        for action in [SeccompAction::KillProcess, SeccompAction::Trace(1)] {
            let policy = policy(0, &[1], &[2]).with_mismatch_action(action);
            let program = compile(&policy).unwrap();
            assert_eq!(verdict(&program, 0, 1), action);
        }
    }

    #[test]
    fn test_native_jump_boundary() {
        // Distance from the compat branch (index 2) to the compat sub-program is
        // 1 (trap) + 1 (load) + base + 2 * rules + 1 (trap).
        let policy_at = |base: usize| policy(base, &[7; 10], &[120]);

        let program = compile(&policy_at(252 - 20)).unwrap();
        assert_eq!(program[2].jt, 255);
        let arm = TargetArch::arm.audit_value();
        assert_eq!(verdict(&program, arm, 120), SeccompAction::Allow);

        assert_eq!(
            compile(&policy_at(253 - 20)).unwrap_err(),
            FilterError::JumpOutOfRange(256)
        );
    }

    #[test]
    fn test_filter_too_large() {
        let mut policy = policy(0, &[], &[]);
        policy.compat.base = vec![FILLER; BPF_MAX_LEN];
        assert_eq!(
            compile(&policy).unwrap_err(),
            FilterError::FilterTooLarge(BPF_MAX_LEN + 4 + 2 + 2)
        );
    }

    #[test]
    fn test_rule_order_is_kept() {
        let policy = policy(0, &[5, 3, 5, 1], &[]);
        let program = compile(&policy).unwrap();
        let compared: Vec<u32> = program[5..13].iter().step_by(2).map(|i| i.k).collect();
        assert_eq!(compared, vec![5, 3, 5, 1]);
    }

    #[test]
    fn test_with_base_tables() {
        let mut tables: BaseTables = HashMap::new();
        tables.insert("aarch64".to_string(), vec![FILLER; 2]);

        match policy(0, &[], &[]).with_base_tables(&tables) {
            Err(PolicyError::MissingBaseTable(arch)) => assert_eq!(arch, "arm"),
            other => panic!("Expected MissingBaseTable, got {other:?}"),
        }

        tables.insert("arm".to_string(), vec![FILLER; 3]);
        let policy = policy(0, &[], &[]).with_base_tables(&tables).unwrap();
        assert_eq!(policy.native.base.len(), 2);
        assert_eq!(policy.compat.base.len(), 3);
    }
}
