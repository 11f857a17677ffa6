//! Tournament driver: battle rounds paced by a randomized delay.

use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;
use tokio::time::sleep;
use tracing::{info, instrument};

use crate::core::{GameKind, GameSummary};
use crate::games::EliminationTournament;
use crate::ledger::award;

use super::DriverContext;

/// Run a started tournament to completion (or cancellation).
///
/// Produces battle rounds until one participant remains, pausing a
/// randomized few seconds between rounds so the narration reads at a
/// human pace. The winner's award is computed once and credited once.
#[instrument(skip_all, fields(scope = %ctx.scope))]
pub async fn run_tournament(
    ctx: DriverContext,
    game: Arc<AsyncMutex<EliminationTournament>>,
) -> GameSummary {
    loop {
        if ctx.cancel.is_cancelled() {
            break;
        }

        let round = { game.lock().await.run_battle_round() };
        let Some(round) = round else {
            break;
        };
        for event in round.events {
            ctx.emit(event);
        }

        let delay = { game.lock().await.pacing_delay() };
        tokio::select! {
            () = ctx.cancel.cancelled() => break,
            () = sleep(delay) => {}
        }
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

    ctx.registry.unregister(ctx.scope, GameKind::Tournament);

    if let Some(champion) = winner {
        award(&*ctx.ledger, &*ctx.exemptions, champion, amount);
        ctx.emit_text(format!(
            "🏆 {champion} wins the tournament and {amount} ghosts!"
        ));
    }
    info!(?winner, "tournament over");

    GameSummary { winner, duration }
}
