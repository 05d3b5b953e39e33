// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for persistence layer.
//!
//! This module contains all read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `users` — User directory lookups
//! - `sections` — Sections, listings and memberships
//! - `events` — Candidate event sets and display-name hydration
//! - `audit` — Audit trail queries

pub mod audit;
pub mod events;
pub mod sections;
pub mod users;
