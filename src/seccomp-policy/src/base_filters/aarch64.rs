// Copyright 2025 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

// Generated from the libc syscall usage on aarch64. Do not edit.
// Each allowed range [lo, hi) is `jge lo 0/2; jge hi 1/0; ret allow`.

use crate::common::{BPF_JMP, BPF_JGE, BPF_JUMP, BPF_K, BPF_RET, BPF_STMT, sock_filter};

const ALLOW: u32 = 0x7fff_0000;

pub(crate) static BASE_FILTER: [sock_filter; 33] = [
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 0, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 30, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 32, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 41, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 42, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 98, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 99, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 128, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 131, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 139, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 140, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 178, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 179, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 220, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 221, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 240, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 242, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 267, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 268, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 278, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 279, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 294, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
];
