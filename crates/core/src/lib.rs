//! Core business logic for Till.
//!
//! This crate contains pure business logic with ZERO file, network or
//! terminal dependencies. All domain types, validation rules, and
//! calculations live here.
//!
//! # Modules
//!
//! - `exchange` - Breaking cash amounts into bills under proportional bands
//!   and summarizing the results across locations

pub mod exchange;
