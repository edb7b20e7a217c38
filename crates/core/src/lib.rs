//! Core replay logic. Keep this crate free of IO and platform concerns.

pub mod cards;
pub mod decode;
pub mod error;
pub mod replay;
pub mod state;
pub mod trace;

pub use cards::*;
pub use decode::*;
pub use error::*;
pub use replay::*;
pub use state::*;
pub use trace::*;
