// Copyright 2025 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use log::{error, info};

use crate::PolicyError;
use crate::base_filters::host_policy;
use crate::common::{BPF_MAX_LEN, BpfProgramRef, sock_filter};
use crate::compiler::{Policy, compile};

/// Filter installation errors.
#[derive(Debug, thiserror::Error, displaydoc::Display)]
pub enum InstallationError {
    /// Refusing to install an empty filter.
    EmptyFilter,
    /// Filter length {0} exceeds the maximum size of {BPF_MAX_LEN:} instructions.
    FilterTooLarge(usize),
    /// `prctl` syscall failed with error code: {0}
    Prctl(std::io::Error),
}

/// BPF structure definition for filter array.
/// See /usr/include/linux/filter.h .
#[repr(C)]
#[derive(Debug)]
struct SockFprog {
    len: u16,
    filter: *const sock_filter,
}

/// Installs a finished program on the calling thread with a single `prctl(PR_SET_SECCOMP)`.
///
/// Nothing about the thread changes when the kernel rejects the program. Once installed, the
/// filter applies to every syscall the thread makes, including the ones needed to return from
/// here, and is inherited by threads and processes it creates. Failures are reported once and
/// never retried.
pub fn apply_filter(bpf_filter: BpfProgramRef) -> Result<(), InstallationError> {
    if bpf_filter.is_empty() {
        return Err(InstallationError::EmptyFilter);
    }

    // If the program length is greater than the limit allowed by the kernel,
    // fail quickly. Otherwise, `prctl` will give a more cryptic error code.
    if BPF_MAX_LEN < bpf_filter.len() {
        return Err(InstallationError::FilterTooLarge(bpf_filter.len()));
    }
    let bpf_filter_len = u16::try_from(bpf_filter.len())
        .map_err(|_| InstallationError::FilterTooLarge(bpf_filter.len()))?;

    let bpf_prog = SockFprog {
        len: bpf_filter_len,
        filter: bpf_filter.as_ptr(),
    };
    // SAFETY: `bpf_prog` points to `bpf_filter_len` valid instructions which outlive the call.
    // The kernel copies the program before returning.
    let rc = unsafe {
        libc::prctl(
            libc::PR_SET_SECCOMP,
            libc::SECCOMP_MODE_FILTER,
            &bpf_prog as *const SockFprog,
        )
    };
    if rc != 0 {
        let err = std::io::Error::last_os_error();
        error!("Failed to install seccomp filter: {err}");
        return Err(InstallationError::Prctl(err));
    }

    info!("Global filter of size {} installed", bpf_filter.len());
    Ok(())
}

/// Sets `no_new_privs` on the calling thread, which lets processes without `CAP_SYS_ADMIN`
/// install filters.
///
/// The flag cannot be cleared again.
pub fn set_no_new_privs() -> Result<(), InstallationError> {
    // SAFETY: Safe because the parameters are valid.
    let rc = unsafe { libc::prctl(libc::PR_SET_NO_NEW_PRIVS, 1, 0, 0, 0) };
    if rc != 0 {
        let err = std::io::Error::last_os_error();
        error!("Failed to set no_new_privs: {err}");
        return Err(InstallationError::Prctl(err));
    }
    Ok(())
}

/// Compiles and installs a caller supplied policy.
///
/// With `no_new_privs` the flag is set after the policy compiled and right before the filter is
/// handed to the kernel, so it stays set if the kernel then rejects the filter.
pub fn install_with(policy: &Policy, no_new_privs: bool) -> Result<(), PolicyError> {
    let program = compile(policy)?;
    if no_new_privs {
        set_no_new_privs()?;
    }
    apply_filter(&program)?;
    Ok(())
}

/// Compiles and installs the built-in policy of the running host.
///
/// Meant to run once during process bootstrap, before any other thread is spawned, by a process
/// that may install filters without `no_new_privs`. An error leaves the process unfiltered and
/// callers are expected to terminate.
pub fn install_policy() -> Result<(), PolicyError> {
    install_with(&host_policy()?, false)
}
