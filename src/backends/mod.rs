// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Operation backends for the circuit engine.
//!
//! The transforms themselves live outside the engine; a node only ever sees an
//! [`Operation`](crate::traits::Operation). This module carries the small set of
//! in-process operations used by the demo binary and the tests.
//!
//! ## Local Backend
//! - **Text Transformation**: case conversion, reversal
//! - **Encoding**: base64 encode/decode (standard and URL-safe alphabets)
//! - **Multi-port**: `join_text` (many inputs), `text_statistics` (many outputs)
//!
//! # Examples
//!
//! ```rust
//! use the_circuitboard::backends::local::LocalOperationFactory;
//!
//! let upper = LocalOperationFactory::create_operation("to_upper_case").unwrap();
//! assert_eq!(upper.name(), "to_upper_case");
//! ```

pub mod local;
