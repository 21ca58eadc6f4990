// Copyright 2025 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

// Generated from the libc syscall usage on x86_64. Do not edit.
// Each allowed range [lo, hi) is `jge lo 0/2; jge hi 1/0; ret allow`.

use crate::common::{BPF_JMP, BPF_JGE, BPF_JUMP, BPF_K, BPF_RET, BPF_STMT, sock_filter};

const ALLOW: u32 = 0x7fff_0000;

pub(crate) static BASE_FILTER: [sock_filter; 36] = [
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 0, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 15, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 16, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 56, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 57, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 138, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 139, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 155, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 156, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 186, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 187, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 200, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 201, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 202, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 203, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 219, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 220, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 251, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 253, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 297, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 299, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 318, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 319, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 335, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
];
