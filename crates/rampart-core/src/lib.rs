//! Core types and definitions for the RAMPART simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! identifiers, enums, constants, configuration records, errors, events,
//! commands and state snapshots. It has no dependency on the ECS or any
//! runtime framework.

pub mod commands;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;
