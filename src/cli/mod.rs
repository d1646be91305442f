//! CLI infrastructure for the pennies toolkit
//!
//! This module provides the command-line interface for playing against the
//! expert ensemble, sweeping learning rates, and inspecting worst-case input.

pub mod commands;
pub mod output;
