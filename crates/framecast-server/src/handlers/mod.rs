pub mod health;
pub mod process_video;
pub mod videos;
