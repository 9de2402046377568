pub mod helpers;
pub mod local_bus;

pub use helpers::*;
pub use local_bus::{LinkConditions, LocalBus};
pub use test_scene::TestScene;
