// Copyright 2025 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![allow(clippy::undocumented_unsafe_blocks)]

use seccomp_policy::interpreter::run;
use seccomp_policy::{
    AllowedSyscall, Arm64Filter, BaseFilter, FilterError, Policy, PolicyConfig, SeccompAction,
    SeccompData, TargetArch, X86_64Filter, compile, sock_filter,
};

fn verdict(program: &[sock_filter], arch: TargetArch, nr: u32) -> SeccompAction {
    let data = SeccompData::new(arch.audit_value(), i32::try_from(nr).unwrap());
    run(program, &data).unwrap().action
}

fn end_to_end<F: BaseFilter>() {
    let program = compile(&F::policy()).unwrap();
    let native = F::ARCHS.native;
    let compat = F::ARCHS.compat;

    assert_eq!(
        verdict(&program, native, F::native_extra()[0].1),
        SeccompAction::Allow
    );
    assert_eq!(verdict(&program, native, 999_999), SeccompAction::Trap);
    assert_eq!(
        verdict(&program, compat, F::compat_extra()[0].1),
        SeccompAction::Allow
    );
    assert_eq!(verdict(&program, compat, 999_999), SeccompAction::Trap);

    for nr in [0, 1, 56, 120, 999_999] {
        let data = SeccompData::new(0x1234_5678, nr);
        let result = run(&program, &data).unwrap();
        assert_eq!(result.action, SeccompAction::Trap);
        assert!(!result.inspected_nr);
    }
}

#[test]
fn test_arm64_end_to_end() {
    end_to_end::<Arm64Filter>();
}

#[test]
fn test_x86_64_end_to_end() {
    end_to_end::<X86_64Filter>();
}

#[test]
fn test_config_extends_builtin_policy() {
    let config = PolicyConfig::from_reader(
        r#"{
            "native_extra": [{ "name": "memfd_create", "nr": 319 }],
            "mismatch_action": "kill_process"
        }"#
        .as_bytes(),
    )
    .unwrap();
    let program = compile(&config.apply(X86_64Filter::policy())).unwrap();

    assert_eq!(
        verdict(&program, TargetArch::x86_64, 319),
        SeccompAction::Allow
    );
    assert_eq!(
        verdict(&program, TargetArch::x86_64, 999_999),
        SeccompAction::KillProcess
    );
}

#[test]
fn test_oversized_native_list_fails() {
    let mut policy: Policy = Arm64Filter::policy();
    // Grow the native sub-program until the compat branch cannot reach past it.
    while policy.native_subprogram_len() < 255 {
        let nr = 1000 + u32::try_from(policy.native.extra_syscalls.len()).unwrap();
        policy
            .native
            .extra_syscalls
            .push(AllowedSyscall::new("filler", nr));
    }

    assert!(matches!(
        compile(&policy),
        Err(FilterError::JumpOutOfRange(distance)) if distance > 255
    ));

    // One entry less fits.
    policy.native.extra_syscalls.pop();
    compile(&policy).unwrap();
}

#[cfg(any(target_arch = "aarch64", target_arch = "x86_64"))]
#[test]
fn test_installed_host_policy() {
    use std::thread;

    use seccomp_policy::{host_policy, install_with};

    thread::spawn(|| {
        let policy = host_policy()
            .unwrap()
            .with_mismatch_action(SeccompAction::Errno(1000));
        install_with(&policy, true).unwrap();

        let rc = unsafe { libc::syscall(999_999) };
        assert_eq!(rc, -1);
        assert_eq!(std::io::Error::last_os_error().raw_os_error(), Some(1000));

        let pid = unsafe { libc::getpid() };
        assert!(pid > 0);
    })
    .join()
    .unwrap();
}
