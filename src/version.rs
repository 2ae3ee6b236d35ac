// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Version string composition, shared with `build.rs`.

/// Env var CI sets to stamp a build number into the patch segment.
pub const PATCH_OVERRIDE_VAR: &str = "SEARCH_API_PATCH_VERSION";

/// Build `major.minor.patch` from the package version, replacing the patch
/// segment with `patch_override` when it is set and non-blank.
///
/// Pre-release or build suffixes on the package version are rejected, as is a
/// non-numeric override.
pub fn compose_version(
    package_version: &str,
    patch_override: Option<&str>,
) -> Result<String, String> {
    let parts: Vec<&str> = package_version.split('.').collect();
    let [major, minor, patch] = parts.as_slice() else {
        return Err(format!("Invalid version format in Cargo.toml: {package_version}"));
    };

    if !parts.iter().all(|p| is_numeric(p)) {
        return Err(format!("Invalid version format in Cargo.toml: {package_version}"));
    }

    let patch = match patch_override.map(str::trim) {
        Some(stamp) if !stamp.is_empty() => {
            if !is_numeric(stamp) {
                return Err(format!("{PATCH_OVERRIDE_VAR} must be numeric, got '{stamp}'"));
            }
            stamp
        }
        _ => patch,
    };

    Ok(format!("{major}.{minor}.{patch}"))
}

fn is_numeric(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}
