// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod circuit;
mod config;
mod conversion;
mod operation;
mod variable;

pub use circuit::CircuitError;
pub use config::ConfigError;
pub use conversion::{BlockReason, ConversionError};
pub use operation::OperationError;
pub use variable::VariableError;
