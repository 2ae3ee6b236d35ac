// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod backend;
pub mod document;
pub mod search;
pub mod version;
