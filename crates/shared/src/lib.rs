//! Shared utilities for the Edu Center backend.
//!
//! This crate contains:
//! - JWT access-token validation
//! - Common validation helpers
//! - Pagination types

pub mod jwt;
pub mod pagination;
pub mod validation;
