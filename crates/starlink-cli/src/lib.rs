//! # Starlink CLI
//!
//! Administrative utilities for the Starlink Platform API.
//!
//! This library crate provides the seed-file generation used by the CLI
//! binary. The binary also drives the session client (`login`, `whoami`,
//! `logout`) against a running server.
//!
//! ## Usage
//!
//! ```ignore
//! use starlink_cli::seed::{SeedOptions, generate_seed, write_seed_file};
//!
//! let users = generate_seed(&SeedOptions::new(50))?;
//! write_seed_file("storage/seed/users.json", &users)?;
//! ```

pub mod seed;
