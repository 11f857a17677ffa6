//! House driver: prompt the current explorer, auto-pass idle turns.

use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{error, info, instrument};

use crate::core::{GameKind, GameSummary};
use crate::games::{HouseAction, HouseGame};

use super::{DriverContext, Inbox};

/// Run a started house game until nobody is left (or cancellation).
///
/// An idle turn is auto-passed without penalty after the configured
/// window - the rotation simply moves on and the next explorer is
/// prompted. Unparsable commands re-prompt the same actor; the turn is
/// only spent on an accepted action or a timeout.
#[instrument(skip_all, fields(scope = %ctx.scope))]
pub async fn run_house(
    ctx: DriverContext,
    game: Arc<AsyncMutex<HouseGame>>,
    mut inbox: Inbox,
) -> GameSummary {
    loop {
        if ctx.cancel.is_cancelled() {
            break;
        }

        let (actor, window) = {
            let game = game.lock().await;
            if game.is_over() {
                break;
            }
            let Some(actor) = game.current_player() else {
                error!("turn rotation empty while the game reports players");
                break;
            };
            (actor, game.turn_window())
        };
        ctx.emit_text(format!(
            "{actor}, your move: search, explore, move <dir>, or use <item>"
        ));

        let input = tokio::select! {
            () = ctx.cancel.cancelled() => break,
            input = inbox.next_from(actor, window) => input,
        };

        let mut game = game.lock().await;
        match input {
            None => {
                game.auto_pass();
                ctx.emit_text(format!(
                    "{actor} hesitates too long; the house grows impatient. Turn passes."
                ));
            }
            Some(input) => match HouseAction::parse(&input.text) {
                None => ctx.emit_text(
                    "Try: search, explore, move <up|down|left|right>, or use <item>",
                ),
                Some(action) => match game.act(actor, &action) {
                    Ok(events) => {
                        for event in events {
                            ctx.emit(event);
                        }
                    }
                    Err(e) => ctx.emit_text(e.to_string()),
                },
            },
        }
    }

    let duration = {
        let mut game = game.lock().await;
        game.finish();
        game.elapsed()
    };
    ctx.registry.unregister(ctx.scope, GameKind::House);
    ctx.emit_text("The house falls silent.");
    info!("house over");

    GameSummary {
        winner: None,
        duration,
    }
}
