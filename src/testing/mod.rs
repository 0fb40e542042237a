pub mod fixtures;
pub mod mock_upstream;

pub use fixtures::{spawn_gateway, test_settings};
pub use mock_upstream::MockUpstream;
