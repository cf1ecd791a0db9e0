// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod loader;
mod operation_registry;
mod runtime;

pub mod consts;

pub use loader::{load_and_validate_config, load_config, Config, ConversionConfig, Strategy};
pub use operation_registry::OperationRegistry;
pub use runtime::RuntimeBuilder;
