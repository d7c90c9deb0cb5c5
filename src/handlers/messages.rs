use teloxide::prelude::*;
use std::error::Error;

use crate::models::InboundEvent;
use crate::session::{DispatchError, SessionRegistry};

pub async fn message_handler(
    msg: Message,
    registry: SessionRegistry,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    // Стикеры, фото и прочее без текста не обрабатываем
    let Some(text) = msg.text() else {
        log::debug!("Chat {}: non-text message ignored", msg.chat.id);
        return Ok(());
    };

    match registry.dispatch(InboundEvent::new(msg.chat.id, text)).await {
        Ok(()) => {}
        Err(DispatchError::ShuttingDown) => {
            log::debug!("Chat {}: message dropped during shutdown", msg.chat.id);
        }
    }

    Ok(())
}
