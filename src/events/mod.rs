pub mod keyboard;
pub mod keys;

pub use keyboard::*;
