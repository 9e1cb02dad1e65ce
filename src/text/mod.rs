pub mod keywords;
pub mod sentences;
pub mod windows;

pub use keywords::*;
pub use sentences::*;
pub use windows::*;
