//! Drawing and guessing: one player draws a secret word, the rest race to
//! name it.

use std::collections::HashSet;

use parlor_protocol::{ClientEvent, GameMode, PlayerId, ServerEvent};
use parlor_timer::RoundTimer;
use rand::seq::IndexedRandom;
use tracing::{debug, info};

use super::{Flow, ModeCtx, ModeEngine};
use crate::Scoreboard;

const FIRST_GUESS_POINTS: u32 = 100;
const GUESS_POINTS_STEP: u32 = 20;
const MIN_GUESS_POINTS: u32 = 20;

/// Points for the `rank`-th correct guesser of a round (1-based):
/// 100, 80, 60, 40, 20, 20, …
pub(crate) fn guess_award(rank: usize) -> u32 {
    let steps = u32::try_from(rank.saturating_sub(1)).unwrap_or(u32::MAX);
    FIRST_GUESS_POINTS
        .saturating_sub(GUESS_POINTS_STEP.saturating_mul(steps))
        .max(MIN_GUESS_POINTS)
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

#[derive(Debug)]
struct DrawTurn {
    drawer: PlayerId,
    word: String,
    guessed: HashSet<PlayerId>,
    /// Correct guesses awarded this round. Kept apart from `guessed` so a
    /// leaver does not move later guessers up the award ladder.
    awarded: usize,
}

#[derive(Debug)]
pub(crate) struct GuessingGame {
    round: usize,
    scores: Scoreboard,
    turn: Option<DrawTurn>,
    timer: RoundTimer,
}

impl GuessingGame {
    pub fn start(epoch: u64, ctx: &mut ModeCtx<'_>) -> (Self, Flow) {
        let mut game = Self {
            round: 0,
            scores: Scoreboard::for_players(ctx.roster.ids()),
            turn: None,
            timer: RoundTimer::new(epoch),
        };
        let flow = game.advance(ctx);
        (game, flow)
    }

    /// Closes the current round and opens the next, or finishes the game
    /// after `players × draw_rounds_per_player` rounds.
    fn advance(&mut self, ctx: &mut ModeCtx<'_>) -> Flow {
        self.timer.cancel();
        self.turn = None;
        self.round += 1;

        let players = ctx.roster.players();
        let total = players.len() * ctx.config.draw_rounds_per_player;
        if self.round > total {
            info!(rounds = total, "drawing game finished");
            return Flow::Finished(std::mem::take(&mut self.scores));
        }
        let drawer = &players[(self.round - 1) % players.len()];
        let Some(word) = ctx.content.words.choose(ctx.rng) else {
            return Flow::Finished(std::mem::take(&mut self.scores));
        };

        let time = ctx.config.draw_round.as_secs();
        let word_length = word.chars().count();
        ctx.out.to_all_except(
            drawer.id,
            ServerEvent::NewRound {
                drawer: drawer.id,
                drawer_name: drawer.name.clone(),
                word: None,
                word_length,
                time,
            },
        );
        ctx.out.to_player(
            drawer.id,
            ServerEvent::NewRound {
                drawer: drawer.id,
                drawer_name: drawer.name.clone(),
                word: Some(word.clone()),
                word_length,
                time,
            },
        );
        info!(round = self.round, total, drawer = %drawer.id, "drawing round started");

        self.turn = Some(DrawTurn {
            drawer: drawer.id,
            word: word.clone(),
            guessed: HashSet::new(),
            awarded: 0,
        });
        self.timer.arm(ctx.config.draw_round);
        Flow::Continue
    }

    fn guess(&mut self, sender: PlayerId, text: String, ctx: &mut ModeCtx<'_>) -> Flow {
        let (Some(player), Some(turn)) = (ctx.roster.get(sender), self.turn.as_mut()) else {
            return Flow::Continue;
        };
        let name = player.name.clone();
        let correct = normalize(&text) == normalize(&turn.word);

        if correct && sender == turn.drawer {
            debug!(%sender, "drawer typed the secret word, dropping");
            return Flow::Continue;
        }
        if correct && turn.guessed.insert(sender) {
            turn.awarded += 1;
            let points = guess_award(turn.awarded);
            self.scores.add(sender, points);
            debug!(%sender, points, rank = turn.awarded, "correct guess");
            ctx.out.to_all(ServerEvent::CorrectGuess {
                player: name,
                points,
                scores: self.scores.entries(),
            });
            if self.everyone_guessed(ctx) {
                return self.advance(ctx);
            }
            return Flow::Continue;
        }

        ctx.out.to_all(ServerEvent::ChatMessage {
            player: name,
            message: text,
        });
        Flow::Continue
    }

    /// Every roster member other than the drawer has guessed this round.
    fn everyone_guessed(&self, ctx: &ModeCtx<'_>) -> bool {
        let Some(turn) = &self.turn else {
            return false;
        };
        ctx.roster
            .ids()
            .filter(|id| *id != turn.drawer)
            .all(|id| turn.guessed.contains(&id))
    }
}

impl ModeEngine for GuessingGame {
    fn kind(&self) -> GameMode {
        GameMode::QuickDraw
    }

    fn handle(&mut self, sender: PlayerId, event: ClientEvent, ctx: &mut ModeCtx<'_>) -> Flow {
        match event {
            ClientEvent::Draw(stroke) => {
                ctx.out.to_all_except(sender, ServerEvent::Draw(stroke));
                Flow::Continue
            }
            ClientEvent::ClearCanvas => {
                ctx.out.to_all_except(sender, ServerEvent::ClearCanvas);
                Flow::Continue
            }
            ClientEvent::Guess { guess } => self.guess(sender, guess, ctx),
            other => {
                debug!(%sender, event = ?other, "not a drawing-game event, dropping");
                Flow::Continue
            }
        }
    }

    fn on_timer(&mut self, ctx: &mut ModeCtx<'_>) -> Flow {
        debug!(round = self.round, "drawing round timed out");
        self.advance(ctx)
    }

    fn on_player_joined(&mut self, player_id: PlayerId, _ctx: &mut ModeCtx<'_>) {
        self.scores.ensure(player_id);
    }

    fn on_player_left(&mut self, player_id: PlayerId, ctx: &mut ModeCtx<'_>) -> Flow {
        self.scores.remove(player_id);
        let drawer_left = match self.turn.as_mut() {
            Some(turn) => {
                turn.guessed.remove(&player_id);
                turn.drawer == player_id
            }
            None => false,
        };
        if drawer_left {
            info!(drawer = %player_id, "drawer left, skipping to next round");
            return self.advance(ctx);
        }
        if self.everyone_guessed(ctx) {
            return self.advance(ctx);
        }
        Flow::Continue
    }

    fn timer(&self) -> &RoundTimer {
        &self.timer
    }

    fn timer_mut(&mut self) -> &mut RoundTimer {
        &mut self.timer
    }
}
