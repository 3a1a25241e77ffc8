// ABOUTME: Domain service layer between HTTP routes and the store
// ABOUTME: Re-exports the user service
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer for the users resource

/// Users CRUD façade with fail-soft read semantics
pub mod users;

pub use users::UserService;
