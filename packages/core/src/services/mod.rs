pub mod mock_youtube;
pub mod youtube;
