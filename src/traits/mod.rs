pub mod operation;

pub use crate::config::OperationRegistry;
pub use operation::{Operation, OperationInput, Parameters};
