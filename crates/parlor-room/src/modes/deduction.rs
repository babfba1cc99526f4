//! Hidden-role deduction. One random player is the spy and does not know
//! the location; everyone else does. After a timed discussion the room
//! votes, and the game ends as soon as every player has voted.

use parlor_protocol::{ClientEvent, GameMode, PlayerId, ServerEvent};
use parlor_timer::RoundTimer;
use rand::seq::IndexedRandom;
use tracing::{debug, info};

use super::{Flow, ModeCtx, ModeEngine};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Discussion,
    Voting,
}

#[derive(Debug)]
pub(crate) struct Deduction {
    phase: Phase,
    spy: PlayerId,
    /// Captured at setup so the result can name a spy who already left.
    spy_name: String,
    location: String,
    /// `(voter, accused)` in first-vote order. A revote overwrites in place.
    votes: Vec<(PlayerId, PlayerId)>,
    timer: RoundTimer,
}

impl Deduction {
    /// Deals the roles and opens discussion. `None` when there is nobody
    /// to deal to or nowhere to be.
    pub fn start(epoch: u64, ctx: &mut ModeCtx<'_>) -> Option<Self> {
        let spy = ctx.roster.players().choose(ctx.rng)?;
        let location = ctx.content.locations.choose(ctx.rng)?;

        for player in ctx.roster.players() {
            let is_spy = player.id == spy.id;
            ctx.out.to_player(
                player.id,
                ServerEvent::SpyRole {
                    is_spy,
                    location: (!is_spy).then(|| location.clone()),
                },
            );
        }

        let mut timer = RoundTimer::new(epoch);
        timer.arm(ctx.config.discussion);
        info!(spy = %spy.id, players = ctx.roster.count(), "roles dealt, discussion open");

        Some(Self {
            phase: Phase::Discussion,
            spy: spy.id,
            spy_name: spy.name.clone(),
            location: location.clone(),
            votes: Vec::new(),
            timer,
        })
    }

    fn vote(&mut self, voter: PlayerId, accused: PlayerId, ctx: &mut ModeCtx<'_>) -> Flow {
        if self.phase != Phase::Voting {
            debug!(%voter, "vote before voting opened, dropping");
            return Flow::Continue;
        }
        if !ctx.roster.contains(accused) {
            debug!(%voter, %accused, "vote for unknown player, dropping");
            return Flow::Continue;
        }
        match self.votes.iter_mut().find(|(v, _)| *v == voter) {
            Some(slot) => slot.1 = accused,
            None => self.votes.push((voter, accused)),
        }
        self.resolve_if_everyone_voted(ctx)
    }

    fn resolve_if_everyone_voted(&mut self, ctx: &mut ModeCtx<'_>) -> Flow {
        if self.phase != Phase::Voting || self.votes.len() < ctx.roster.count() {
            return Flow::Continue;
        }
        self.timer.cancel();
        let most_voted = self.tally();
        let spy_caught = most_voted == Some(self.spy);
        info!(spy_caught, accused = ?most_voted, "votes tallied");
        ctx.out.to_all(ServerEvent::VoteResults {
            spy_caught,
            spy_name: self.spy_name.clone(),
            location: self.location.clone(),
        });
        Flow::Resolved
    }

    /// The accused with the most votes. On a tie, whoever first received a
    /// vote (in vote order) wins.
    fn tally(&self) -> Option<PlayerId> {
        let mut counts: Vec<(PlayerId, usize)> = Vec::new();
        for &(_, accused) in &self.votes {
            match counts.iter_mut().find(|(id, _)| *id == accused) {
                Some(entry) => entry.1 += 1,
                None => counts.push((accused, 1)),
            }
        }
        counts
            .into_iter()
            .fold(None, |best: Option<(PlayerId, usize)>, (id, n)| match best {
                Some((_, top)) if top >= n => best,
                _ => Some((id, n)),
            })
            .map(|(id, _)| id)
    }
}

impl ModeEngine for Deduction {
    fn kind(&self) -> GameMode {
        GameMode::Spy
    }

    fn handle(&mut self, sender: PlayerId, event: ClientEvent, ctx: &mut ModeCtx<'_>) -> Flow {
        match event {
            ClientEvent::SpyChat { message } => {
                if let Some(player) = ctx.roster.get(sender) {
                    let player = player.name.clone();
                    ctx.out.to_all(ServerEvent::SpyChat { player, message });
                }
                Flow::Continue
            }
            ClientEvent::Vote { player_id } => self.vote(sender, player_id, ctx),
            other => {
                debug!(%sender, event = ?other, "not a deduction event, dropping");
                Flow::Continue
            }
        }
    }

    fn on_timer(&mut self, ctx: &mut ModeCtx<'_>) -> Flow {
        if self.phase == Phase::Discussion {
            self.phase = Phase::Voting;
            info!("discussion over, voting open");
            ctx.out.to_all(ServerEvent::VotingTime);
        }
        Flow::Continue
    }

    fn on_player_joined(&mut self, player_id: PlayerId, ctx: &mut ModeCtx<'_>) {
        ctx.out.to_player(
            player_id,
            ServerEvent::SpyRole {
                is_spy: false,
                location: Some(self.location.clone()),
            },
        );
    }

    fn on_player_left(&mut self, player_id: PlayerId, ctx: &mut ModeCtx<'_>) -> Flow {
        self.votes.retain(|(voter, _)| *voter != player_id);
        self.resolve_if_everyone_voted(ctx)
    }

    fn timer(&self) -> &RoundTimer {
        &self.timer
    }

    fn timer_mut(&mut self) -> &mut RoundTimer {
        &mut self.timer
    }
}
