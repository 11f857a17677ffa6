//! Word-chain driver: prompt, wait, judge, repeat.

use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{error, info, instrument};

use crate::core::{GameKind, GameSummary, NarrationEvent};
use crate::games::WordChainGame;
use crate::ledger::award;

use super::{DriverContext, Inbox};

/// Run a started word-chain game to completion (or cancellation).
///
/// Each turn prompts the current actor, then waits up to the configured
/// timeout for a word from that actor specifically. Silence costs a
/// life, exactly like a rejected word, and the turn index moves one
/// slot either way.
#[instrument(skip_all, fields(scope = %ctx.scope))]
pub async fn run_word_chain(
    ctx: DriverContext,
    game: Arc<AsyncMutex<WordChainGame>>,
    mut inbox: Inbox,
) -> GameSummary {
    loop {
        if ctx.cancel.is_cancelled() {
            break;
        }

        let (actor, window, prompt) = {
            let mut game = game.lock().await;
            if game.is_over() {
                break;
            }
            let Some(actor) = game.next_player_id() else {
                // The roster is non-empty here, so a failed scan is a
                // bug; kill the instance rather than spin forever.
                error!("current-actor scan failed with players alive");
                break;
            };
            let prompt = match game.current_word().and_then(|word| word.chars().last()) {
                Some(last) => format!("{actor}, your word must start with '{last}'!"),
                None => format!("{actor}, start the chain with any word!"),
            };
            (actor, game.turn_timeout(), prompt)
        };
        ctx.emit_text(prompt);

        let input = tokio::select! {
            () = ctx.cancel.cancelled() => break,
            input = inbox.next_from(actor, window) => input,
        };

        let mut game = game.lock().await;
        match input {
            Some(input) => match game.play_word(actor, &input.text) {
                Ok((_, message)) => {
                    ctx.emit_text(message);
                    if game.lives_of(actor) == 0 {
                        ctx.emit_text(format!("{actor} is out of the game!"));
                    }
                }
                Err(e) => ctx.emit_text(e.to_string()),
            },
            None => {
                let remaining = game.penalize_timeout(actor);
                ctx.emit_text(format!(
                    "⏰ {actor} ran out of time and loses a life ({remaining} left)"
                ));
                if remaining == 0 {
                    ctx.emit_text(format!("{actor} is out of the game!"));
                }
            }
        }
        game.advance_turn();
    }

    let (winner, duration, amount) = {
        let mut game = game.lock().await;
        let winner = if ctx.cancel.is_cancelled() {
            None
        } else {
            game.winner()
        };
        let amount = game.award_amount();
        game.finish();
        (winner, game.elapsed(), amount)
    };

    ctx.registry.unregister(ctx.scope, GameKind::WordChain);

    if let Some(survivor) = winner {
        award(&*ctx.ledger, &*ctx.exemptions, survivor, amount);
        ctx.emit(NarrationEvent::text(format!(
            "👑 {survivor} survives the word chain and earns {amount} ghosts!"
        )));
    }
    info!(?winner, "word chain over");

    GameSummary { winner, duration }
}
