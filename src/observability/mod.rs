// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and operational
//! logging throughout the circuitboard. Message types follow a struct-based pattern
//! with `Display` trait implementation so that log text lives in one place and every
//! event carries the same structured fields wherever it is emitted.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::circuit` - Circuit execution, ordering and serialization events
//! * `messages::conversion` - Linear/graph view conversion events
//! * `messages::config` - Configuration loading events
//! * `messages::variables` - Variable store events
//!
//! # Usage
//!
//! ```rust
//! use the_circuitboard::observability::messages::circuit::SourceInputIgnored;
//! use the_circuitboard::observability::messages::StructuredLog;
//!
//! SourceInputIgnored { node_id: "not_a_source" }.log();
//! ```

pub mod messages;
