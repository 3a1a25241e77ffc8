// ABOUTME: Common data models shared across routes, services, and the store
// ABOUTME: Re-exports the user resource types
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data models for the users resource

/// User row and its create/update payloads
pub mod user;

pub use user::{NewUser, User, UserUpdate};
