// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! ## Module Organization
//!
//! - `manufacturers` — manufacturer lookups and listing
//! - `cars` — car lookups, listing, and Car↔Driver membership
//! - `drivers` — driver lookups, listing, and credentials
//! - `sessions` — session lookups
//! - `counts` — aggregate counts

pub mod cars;
pub mod counts;
pub mod drivers;
pub mod manufacturers;
pub mod sessions;

/// Builds a `LIKE` pattern matching `needle` anywhere in a value.
///
/// `%`, `_` and the escape character itself are matched literally; callers
/// must pair the pattern with `.escape('\\')`.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut pattern: String = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
