//! Interactive fireworks show for the terminal.
//!
//! Taps launch rockets; after enough of them the sky spells out a greeting,
//! then a series of wishes, then the credits.

pub mod collab;
pub mod config;
pub mod effects;
pub mod error;
pub mod point;
pub mod raster;
pub mod sim;

pub use error::{Error, Result};
