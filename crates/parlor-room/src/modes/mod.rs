//! The three mini-games and the tagged session that holds the live one.
//!
//! Engines never touch the roster or the connections. They read the roster
//! through [`ModeCtx`], queue events on its outbox, and report back to the
//! room with a [`Flow`].

mod deduction;
mod guessing;
mod quiz;

use parlor_protocol::{ClientEvent, GameMode, PlayerId};
use parlor_timer::RoundTimer;
use rand::rngs::StdRng;

use crate::outbox::Outbox;
use crate::{ContentPack, RoomConfig, Roster, Scoreboard};

pub(crate) use deduction::Deduction;
pub(crate) use guessing::GuessingGame;
pub(crate) use quiz::Quiz;

/// Everything an engine may read or write besides its own state.
pub(crate) struct ModeCtx<'a> {
    pub roster: &'a Roster,
    pub content: &'a ContentPack,
    pub config: &'a RoomConfig,
    pub rng: &'a mut StdRng,
    pub out: &'a mut Outbox,
}

/// What the room should do after an engine call.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    /// Keep going.
    Continue,
    /// A scored mode ran out of rounds. The room announces the winner.
    Finished(Scoreboard),
    /// An unscored mode already broadcast its outcome.
    Resolved,
}

/// Per-mode behaviour the room dispatches to.
///
/// Every call runs on the room actor, so engines own their state outright
/// and never synchronize. Leave notifications arrive after the player is
/// already gone from `ctx.roster`.
pub(crate) trait ModeEngine {
    fn kind(&self) -> GameMode;

    /// A game-specific event from a roster member.
    fn handle(&mut self, sender: PlayerId, event: ClientEvent, ctx: &mut ModeCtx<'_>) -> Flow;

    /// The engine's round timer fired (already checked as current).
    fn on_timer(&mut self, ctx: &mut ModeCtx<'_>) -> Flow;

    fn on_player_joined(&mut self, player_id: PlayerId, ctx: &mut ModeCtx<'_>);

    /// Only called while the roster is still at or above the minimum.
    fn on_player_left(&mut self, player_id: PlayerId, ctx: &mut ModeCtx<'_>) -> Flow;

    fn timer(&self) -> &RoundTimer;

    fn timer_mut(&mut self) -> &mut RoundTimer;
}

/// At most one live mode. Replacing or dropping a session drops its timer.
#[derive(Debug, Default)]
pub(crate) enum ModeSession {
    #[default]
    Idle,
    Guessing(GuessingGame),
    Quiz(Quiz),
    Deduction(Deduction),
}

impl ModeSession {
    /// Builds the engine for `mode` and plays its opening move.
    pub fn start(mode: GameMode, epoch: u64, ctx: &mut ModeCtx<'_>) -> (Self, Flow) {
        match mode {
            GameMode::QuickDraw => {
                let (engine, flow) = GuessingGame::start(epoch, ctx);
                (Self::Guessing(engine), flow)
            }
            GameMode::Trivia => {
                let (engine, flow) = Quiz::start(epoch, ctx);
                (Self::Quiz(engine), flow)
            }
            GameMode::Spy => match Deduction::start(epoch, ctx) {
                Some(engine) => (Self::Deduction(engine), Flow::Continue),
                None => (Self::Idle, Flow::Resolved),
            },
        }
    }

    pub fn kind(&self) -> Option<GameMode> {
        self.engine().map(|e| e.kind())
    }

    pub fn timer(&self) -> Option<&RoundTimer> {
        self.engine().map(|e| e.timer())
    }

    pub fn engine(&self) -> Option<&dyn ModeEngine> {
        match self {
            Self::Idle => None,
            Self::Guessing(g) => Some(g),
            Self::Quiz(q) => Some(q),
            Self::Deduction(d) => Some(d),
        }
    }

    pub fn engine_mut(&mut self) -> Option<&mut dyn ModeEngine> {
        match self {
            Self::Idle => None,
            Self::Guessing(g) => Some(g),
            Self::Quiz(q) => Some(q),
            Self::Deduction(d) => Some(d),
        }
    }
}
