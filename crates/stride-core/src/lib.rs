//! # stride-core
//!
//! Core types, ID generation, clocks, and error types for Stride.
//!
//! This crate provides the foundational types shared across all Stride crates:
//! - Entity structs (tasks, history entries, preferences, notifications)
//! - Status enums with state machine transitions
//! - ID prefix constants and generation
//! - Local-calendar helpers and the injectable [`clock::Clock`]
//! - Cross-cutting error types

pub mod calendar;
pub mod clock;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
