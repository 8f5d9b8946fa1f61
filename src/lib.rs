//! Band radiances of MODTRAN simulations as seen through sensor spectral
//! response functions, and the cross-sensor regression between them.

pub mod batch;
pub mod config;
pub mod convolve;
pub mod data;
pub mod error;
pub mod regression;

pub use error::{Result, SrfError};
