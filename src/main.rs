use std::sync::Arc;

use cs_score_bot::{
    config::Config,
    flash::FlashTimers,
    quiz::{BonusDelta, Progress, QuizEngine},
    render::{self, Action},
};
use dotenv::dotenv;
use log::{debug, error, info, warn};
use teloxide::{
    dispatching::dialogue::{ErasedStorage, InMemStorage, Storage},
    prelude::*,
    types::MessageId,
    utils::command::BotCommands,
};

type QuizDialogue = Dialogue<State, ErasedStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
type QuizStorage = Arc<ErasedStorage<State>>;
type BonusFlashes = Arc<FlashTimers<ChatId, MessageId>>;

#[derive(Clone, Default)]
pub enum State {
    #[default]
    Start,
    Quiz {
        engine: QuizEngine,
    },
}

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
enum Command {
    #[command(description = "start the quiz.")]
    Start,
    #[command(description = "take the test again from the first question.")]
    Restart,
    #[command(description = "switch between light and dark mode.")]
    Theme,
    #[command(description = "show this text.")]
    Help,
}

#[tokio::main]
async fn main() {
    // A missing .env is fine, the variables may come from the environment
    let dotenv_loaded = dotenv().is_ok();

    pretty_env_logger::init();
    if !dotenv_loaded {
        debug!("No .env file found, using the process environment");
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            std::process::exit(1);
        }
    };
    info!("Starting CS score bot...");

    let bot = Bot::from_env();
    let storage: QuizStorage = InMemStorage::<State>::new().erase();
    let flashes: BonusFlashes = Arc::new(FlashTimers::new());

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, ErasedStorage<State>, State>()
            .branch(
                dptree::entry()
                    .filter_command::<Command>()
                    .endpoint(command),
            )
            .branch(dptree::case![State::Start].endpoint(start))
            .branch(dptree::case![State::Quiz { engine }].endpoint(quiz_input)),
    )
    .dependencies(dptree::deps![storage, flashes, config])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;
}

const GREETING_TEXT: &str =
    "Hi! Answer 18 quick yes/no questions and find out how much of a CS student you really are.";
const USE_BUTTONS_TEXT: &str = "Please answer with the buttons below.";

async fn command(
    bot: Bot,
    dialogue: QuizDialogue,
    flashes: BonusFlashes,
    config: Config,
    msg: Message,
    cmd: Command,
) -> HandlerResult {
    let current = match dialogue.get().await? {
        Some(State::Quiz { engine }) => engine,
        _ => QuizEngine::default(),
    };

    match cmd {
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
            Ok(())
        }
        Command::Start => {
            bot.send_message(msg.chat.id, GREETING_TEXT).await?;
            run_action(bot, dialogue, flashes, config, current, Action::Restart, msg).await
        }
        Command::Restart => {
            run_action(bot, dialogue, flashes, config, current, Action::Restart, msg).await
        }
        Command::Theme => {
            run_action(bot, dialogue, flashes, config, current, Action::ToggleTheme, msg).await
        }
    }
}

async fn start(bot: Bot, dialogue: QuizDialogue, msg: Message) -> HandlerResult {
    let engine = QuizEngine::default();
    dialogue.update(State::Quiz { engine: engine.clone() }).await?;

    bot.send_message(msg.chat.id, GREETING_TEXT).await?;
    show_screen(&bot, msg.chat.id, &engine).await
}

async fn quiz_input(
    bot: Bot,
    dialogue: QuizDialogue,
    flashes: BonusFlashes,
    config: Config,
    engine: QuizEngine,
    msg: Message,
) -> HandlerResult {
    match msg.text().and_then(Action::from_text) {
        Some(action) => run_action(bot, dialogue, flashes, config, engine, action, msg).await,
        None => {
            bot.send_message(msg.chat.id, USE_BUTTONS_TEXT).await?;
            show_screen(&bot, msg.chat.id, &engine).await
        }
    }
}

/// Applies the action and stores the engine before anything is sent, so a
/// failed send never leaves the stored state behind the chat.
async fn run_action(
    bot: Bot,
    dialogue: QuizDialogue,
    flashes: BonusFlashes,
    config: Config,
    mut engine: QuizEngine,
    action: Action,
    msg: Message,
) -> HandlerResult {
    let chat_id = msg.chat.id;
    let outcome = action.apply(&mut engine);
    let flash = engine.take_bonus_flash();
    dialogue.update(State::Quiz { engine: engine.clone() }).await?;

    match outcome {
        Ok(Progress::Finished) if matches!(action, Action::Answer(_)) => {
            info!(
                "Chat {} finished the quiz with score {}",
                chat_id.0,
                engine.score()
            );
        }
        Ok(_) => {}
        Err(err) => {
            // Stale YES/NO keyboards can still send answers after the result is shown
            bot.send_message(chat_id, err.to_string()).await?;
        }
    }

    if action == Action::Restart {
        if let Some(visible) = flashes.cancel(&chat_id) {
            delete_flash(&bot, chat_id, visible).await;
        }
    }

    show_screen(&bot, chat_id, &engine).await?;
    if let Some(delta) = flash {
        flash_bonus(&bot, &flashes, &config, chat_id, delta).await?;
    }
    Ok(())
}

async fn show_screen(bot: &Bot, chat_id: ChatId, engine: &QuizEngine) -> HandlerResult {
    bot.send_message(chat_id, render::screen_text(engine))
        .reply_markup(render::keyboard(engine))
        .await?;
    Ok(())
}

/// Posts the bonus change and removes it again after the configured delay.
/// A newer flash replaces the visible one right away.
async fn flash_bonus(
    bot: &Bot,
    flashes: &BonusFlashes,
    config: &Config,
    chat_id: ChatId,
    delta: BonusDelta,
) -> HandlerResult {
    let sent = bot
        .send_message(chat_id, render::flash_text(delta))
        .await?;
    debug!("Showing bonus {} in chat {}", delta, chat_id.0);

    let task_bot = bot.clone();
    let replaced = flashes.schedule(chat_id, sent.id, config.bonus_flash, move |message_id| {
        async move { delete_flash(&task_bot, chat_id, message_id).await }
    });
    if let Some(previous) = replaced {
        delete_flash(bot, chat_id, previous).await;
    }
    Ok(())
}

async fn delete_flash(bot: &Bot, chat_id: ChatId, message_id: MessageId) {
    // The user may have deleted it already, nothing else depends on it
    if let Err(err) = bot.delete_message(chat_id, message_id).await {
        warn!("Failed to remove bonus message in chat {}: {}", chat_id.0, err);
    }
}
