pub mod batch;
pub mod constants;
pub mod error;
pub mod gesture;
pub mod layout;
pub mod morph;
pub mod population;
pub mod scene;
pub mod state;
pub mod task;

#[cfg(feature = "gpu")]
pub mod gpu;

pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");

pub use batch::*;
pub use constants::*;
pub use error::*;
pub use gesture::*;
pub use layout::*;
pub use morph::*;
pub use population::*;
pub use scene::*;
pub use state::*;
pub use task::*;
