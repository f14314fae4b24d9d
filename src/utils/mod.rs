pub mod bot_wall;
pub mod error;
pub mod price;

pub use bot_wall::BotWallDetector;
pub use error::AppError;
