use teloxide::{
    dispatching::UpdateHandler,
    prelude::*,
    utils::command::{BotCommands, ParseError},
};

use crate::{
    gateway::Gateway,
    handlers,
    models::Game,
    store::SharedStore,
    utils::{send_message, Error, HandlerResult},
};

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
pub(crate) enum Command {
    #[command(description = "display this text.")]
    Help,
    #[command(description = "display this text.")]
    Start,
    #[command(
        description = "store your HoYoLAB cookies: /setcookies <ltoken_v2> <ltuid_v2>",
        parse_with = parse_credentials
    )]
    SetCookies { ltoken: String, ltuid: String },
    #[command(description = "forget your stored cookies.")]
    RemoveCookies,
    #[command(
        description = "show your battle chronicle: /chronicles [genshin|hsr]",
        parse_with = parse_game
    )]
    Chronicles(Game),
    #[command(
        description = "show your resin and realm currency: /dailynote [genshin|hsr]",
        parse_with = parse_game
    )]
    DailyNote(Game),
    #[command(
        description = "show your record card stats: /stats [genshin|hsr]",
        parse_with = parse_game
    )]
    Stats(Game),
    #[command(description = "show which account is registered.")]
    Me,
}

/// Exactly two whitespace-separated tokens.
fn parse_credentials(input: String) -> Result<(String, String), ParseError> {
    let args: Vec<&str> = input.split_whitespace().collect();

    match args.as_slice() {
        [ltoken, ltuid] => Ok((ltoken.to_string(), ltuid.to_string())),
        _ if args.len() < 2 => Err(ParseError::TooFewArguments {
            expected: 2,
            found: args.len(),
            message: "expected <ltoken_v2> <ltuid_v2>".to_owned(),
        }),
        _ => Err(ParseError::TooManyArguments {
            expected: 2,
            found: args.len(),
            message: "expected <ltoken_v2> <ltuid_v2>".to_owned(),
        }),
    }
}

/// No argument means Genshin Impact.
fn parse_game(input: String) -> Result<(Game,), ParseError> {
    match input.trim() {
        "" | "genshin" | "gi" => Ok((Game::Genshin,)),
        "hsr" | "starrail" => Ok((Game::StarRail,)),
        other => Err(ParseError::IncorrectFormat(
            format!("unknown game {:?}", other).into(),
        )),
    }
}

/// Channel posts and anonymous admins have no sender to store cookies for.
fn sender(msg: Message) -> Option<UserId> {
    msg.from().map(|user| user.id)
}

pub(crate) fn schema() -> UpdateHandler<Error> {
    use dptree::case;

    Update::filter_message()
        .filter_map(sender)
        .filter_command::<Command>()
        .branch(case![Command::Help].endpoint(command_help))
        .branch(case![Command::Start].endpoint(command_help))
        .branch(case![Command::SetCookies { ltoken, ltuid }].endpoint(command_set_cookies))
        .branch(case![Command::RemoveCookies].endpoint(command_remove_cookies))
        .branch(case![Command::Chronicles(game)].endpoint(command_chronicles))
        .branch(case![Command::DailyNote(game)].endpoint(command_daily_note))
        .branch(case![Command::Stats(game)].endpoint(command_stats))
        .branch(case![Command::Me].endpoint(command_me))
}

async fn command_help(bot: Bot, msg: Message) -> HandlerResult {
    send_message(&bot, msg.chat.id, Command::descriptions().to_string()).await?;
    Ok(())
}

async fn command_set_cookies(
    bot: Bot,
    msg: Message,
    user: UserId,
    store: SharedStore,
    (ltoken, ltuid): (String, String),
) -> HandlerResult {
    let reply = handlers::set_credentials(&store, user, ltoken, ltuid).await;
    send_message(&bot, msg.chat.id, reply).await?;
    Ok(())
}

async fn command_remove_cookies(
    bot: Bot,
    msg: Message,
    user: UserId,
    store: SharedStore,
) -> HandlerResult {
    let reply = handlers::remove_credentials(&store, user).await;
    send_message(&bot, msg.chat.id, reply).await?;
    Ok(())
}

async fn command_chronicles(
    bot: Bot,
    msg: Message,
    user: UserId,
    store: SharedStore,
    gateway: Gateway,
    game: Game,
) -> HandlerResult {
    let reply = handlers::chronicles(&store, gateway.as_ref(), user, game).await;
    send_message(&bot, msg.chat.id, reply).await?;
    Ok(())
}

async fn command_daily_note(
    bot: Bot,
    msg: Message,
    user: UserId,
    store: SharedStore,
    gateway: Gateway,
    game: Game,
) -> HandlerResult {
    let reply = handlers::daily_note(&store, gateway.as_ref(), user, game).await;
    send_message(&bot, msg.chat.id, reply).await?;
    Ok(())
}

async fn command_stats(
    bot: Bot,
    msg: Message,
    user: UserId,
    store: SharedStore,
    gateway: Gateway,
    game: Game,
) -> HandlerResult {
    let reply = handlers::stats(&store, gateway.as_ref(), user, game).await;
    send_message(&bot, msg.chat.id, reply).await?;
    Ok(())
}

async fn command_me(bot: Bot, msg: Message, user: UserId, store: SharedStore) -> HandlerResult {
    let reply = handlers::whoami(&store, user).await;
    send_message(&bot, msg.chat.id, reply).await?;
    Ok(())
}
