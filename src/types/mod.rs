//! Data types shared by the scanner, probe and sizer.

mod column;
mod measurement;
mod options;
mod row;

pub use column::*;
pub use measurement::*;
pub use options::*;
pub use row::*;
