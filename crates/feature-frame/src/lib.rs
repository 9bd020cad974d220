//! Tabular Record Frame
//!
//! Provides the column-oriented frame shared by every transformation stage,
//! with CSV loading and saving.

mod codec;
mod error;
mod frame;
mod value;

pub use error::FrameError;
pub use frame::{Column, ColumnKind, Frame};
pub use value::Value;
