pub mod event;
pub mod favorites;
pub mod session;

pub use event::{InboundEvent, Keyboard};
pub use favorites::Favorites;
pub use session::{ChatSession, SessionState};
