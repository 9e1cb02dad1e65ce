pub mod artifact;
pub mod export;
pub mod input;
pub mod transcript;

pub use artifact::*;
pub use export::*;
pub use input::*;
pub use transcript::*;
