//! IO layer: the safetensors episode reader, the logging-constants
//! tables, and the raw tensor dump.

pub mod constants;
pub mod dataset;
pub mod dump;

pub use constants::*;
pub use dataset::*;
pub use dump::*;
