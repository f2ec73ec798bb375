#![allow(clippy::missing_errors_doc)]
#![allow(clippy::wildcard_imports)]

pub mod curve;
pub mod depeg;
pub mod error;
pub mod fees;
pub mod math;
pub mod pool;
pub mod slippage;
pub mod vault;
