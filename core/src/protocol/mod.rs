//! Protocol frame types and constants

pub mod constants;
mod frame;

pub use frame::{Command, Frame};
