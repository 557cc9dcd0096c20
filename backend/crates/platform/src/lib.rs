//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, constant-time comparison)
//! - Password policy and hashing (Argon2id)
//! - Bearer credential extraction from HTTP headers

pub mod bearer;
pub mod crypto;
pub mod password;
