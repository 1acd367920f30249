use teloxide::{requests::Requester, types::ChatId, Bot};

pub(crate) type Error = Box<dyn std::error::Error + Send + Sync>;
pub(crate) type HandlerResult<R = ()> = Result<R, Error>;

pub(crate) async fn send_message<T>(bot: &Bot, chat_id: ChatId, message: T) -> HandlerResult
where
    T: Into<String>,
{
    // Plain text: replies echo user-supplied ids and game nicknames.
    bot.send_message(chat_id, message.into()).await?;
    Ok(())
}
