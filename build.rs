// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

// Embeds SEARCH_API_VERSION at compile time; composition rules live in
// src/version.rs so the library can test them.

#[path = "src/version.rs"]
mod version;

use std::env;

fn main() {
    let package_version = env::var("CARGO_PKG_VERSION").expect("CARGO_PKG_VERSION not set");
    let patch_override = env::var(version::PATCH_OVERRIDE_VAR).ok();

    let full_version = version::compose_version(&package_version, patch_override.as_deref())
        .unwrap_or_else(|e| panic!("{e}"));

    println!("cargo:rustc-env=SEARCH_API_VERSION={full_version}");
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-changed=src/version.rs");
    println!("cargo:rerun-if-env-changed={}", version::PATCH_OVERRIDE_VAR);
}
