// Copyright 2025 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

// Generated from the libc syscall usage on x86 (i386). Do not edit.
// Each allowed range [lo, hi) is `jge lo 0/2; jge hi 1/0; ret allow`.

use crate::common::{BPF_JMP, BPF_JGE, BPF_JUMP, BPF_K, BPF_RET, BPF_STMT, sock_filter};

const ALLOW: u32 = 0x7fff_0000;

pub(crate) static BASE_FILTER: [sock_filter; 63] = [
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 1, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 5, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 6, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 8, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 9, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 10, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 11, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 33, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 34, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 42, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 43, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 85, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 86, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 119, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 121, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 141, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 142, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 173, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 174, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 190, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 191, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 195, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 197, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 220, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 221, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 224, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 225, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 238, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 239, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 240, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 241, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 254, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 255, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 256, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 257, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 323, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 324, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 335, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 337, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 354, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 356, 0, 2),
    BPF_JUMP(BPF_JMP + BPF_JGE + BPF_K, 385, 1, 0),
    BPF_STMT(BPF_RET + BPF_K, ALLOW),
];
