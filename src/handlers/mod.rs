pub mod messages;
pub mod utils;

pub use messages::message_handler;
pub use utils::TelegramReplies;
