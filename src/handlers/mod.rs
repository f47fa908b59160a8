pub mod health;
pub mod read;
pub mod write;

pub use health::health_handler;
pub use read::read_handler;
pub use write::write_handler;
