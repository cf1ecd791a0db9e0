// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] to emit it through `tracing` at its fixed level, with the
//! message fields attached as structured key/value pairs.
//!
//! # Organization
//!
//! * `circuit` - Execution lifecycle, node execution and graph events
//! * `conversion` - Dual-view initialization and conversion events
//! * `config` - Configuration loading events
//! * `variables` - Variable store events
//!
//! # Usage Pattern
//!
//! ```rust
//! use the_circuitboard::observability::messages::circuit::ExecutionStarted;
//! use the_circuitboard::observability::messages::StructuredLog;
//!
//! let msg = ExecutionStarted {
//!     strategy: "sequential",
//!     node_count: 3,
//!     connection_count: 2,
//! };
//!
//! msg.log();
//! let _span = msg.span("circuit_execution");
//! ```

use tracing::Span;

pub mod circuit;
pub mod config;
pub mod conversion;
pub mod variables;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a tracing event.
    fn log(&self);

    /// Open a span carrying the message's fields. Messages that never
    /// delimit a unit of work keep the default, a disabled span.
    fn span(&self, _name: &str) -> Span {
        Span::none()
    }
}
