// Copyright (c) 2025-2026 Revu Contributors
//
// SPDX-License-Identifier: MIT
mod schema;

pub use schema::*;
