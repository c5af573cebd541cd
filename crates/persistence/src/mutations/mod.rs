// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! ## Module Organization
//!
//! - `manufacturers` — manufacturer create, update and delete
//! - `cars` — car create and delete, and Car↔Driver assignment
//! - `drivers` — driver accounts and password hashing
//! - `sessions` — login session lifecycle
//!
//! Row IDs of new records come from `PersistenceBackend::get_last_insert_rowid`.

pub mod cars;
pub mod drivers;
pub mod manufacturers;
pub mod sessions;
