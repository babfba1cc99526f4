//! The room aggregate: roster, live mode, and everything they emit.
//!
//! [`Room`] is plain synchronous state. Every operation mutates it and
//! queues addressed [`ServerEvent`]s; the actor in [`crate::actor`] owns one
//! `Room`, feeds it commands and timer expiries one at a time, and drains
//! the queue after each step.

use parlor_protocol::{ClientEvent, GameMode, PlayerId, Recipient, ServerEvent};
use parlor_timer::Expiry;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::modes::{Flow, ModeCtx, ModeSession};
use crate::outbox::Outbox;
use crate::{ContentPack, RoomConfig, RoomError, Roster};

/// Sent to everyone when a game is cut short for lack of players.
pub const LOBBY_RETURN_MESSAGE: &str = "Not enough players, returning to lobby";

/// The single shared room.
///
/// Lobby and game state in one place: `Idle` until the host starts a mode,
/// back to `Idle` when the mode ends or the roster drops below
/// [`RoomConfig::min_players`].
#[derive(Debug)]
pub struct Room {
    config: RoomConfig,
    content: ContentPack,
    roster: Roster,
    mode: ModeSession,
    /// Bumped on every game start; stamps that game's timer.
    generation: u64,
    rng: StdRng,
    outbox: Outbox,
}

impl Room {
    /// Creates an empty, idle room.
    ///
    /// The config is clamped with [`RoomConfig::validated`]. A fixed
    /// [`RoomConfig::seed`] makes every random draw reproducible.
    ///
    /// # Errors
    /// [`RoomError::InvalidContent`] if the content pack cannot be sampled.
    pub fn new(config: RoomConfig, content: ContentPack) -> Result<Self, RoomError> {
        let config = config.validated();
        content.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Ok(Self {
            config,
            content,
            roster: Roster::new(),
            mode: ModeSession::Idle,
            generation: 0,
            rng,
            outbox: Outbox::default(),
        })
    }

    /// Adds `id` to the roster under `name`.
    ///
    /// The joiner gets `playerJoined`, everyone gets the new roster, and a
    /// running mode is told about the newcomer.
    pub fn join(&mut self, id: PlayerId, name: &str) -> Result<(), RoomError> {
        let player = self
            .roster
            .join(id, name, self.config.min_name_chars, self.config.max_name_chars)?
            .clone();
        info!(
            player_id = %id,
            name = %player.name,
            is_host = player.is_host,
            players = self.roster.count(),
            "player joined"
        );

        self.outbox.to_player(
            id,
            ServerEvent::PlayerJoined {
                player_id: id,
                player_name: player.name,
                is_host: player.is_host,
            },
        );
        self.broadcast_roster();

        let (session, mut ctx) = self.split();
        if let Some(engine) = session.engine_mut() {
            engine.on_player_joined(id, &mut ctx);
        }
        Ok(())
    }

    /// Removes `id` from the roster. Returns `false` if it was not there.
    ///
    /// A running mode is aborted if the roster falls below the minimum;
    /// otherwise it is told about the departure.
    pub fn leave(&mut self, id: PlayerId) -> bool {
        let Some(player) = self.roster.leave(id) else {
            return false;
        };
        info!(
            player_id = %id,
            name = %player.name,
            players = self.roster.count(),
            new_host = ?self.roster.find_host().map(|p| p.id),
            "player left"
        );
        self.broadcast_roster();

        let Some(active) = self.mode.kind() else {
            return true;
        };
        if self.roster.count() < self.config.min_players {
            self.abort(active);
            return true;
        }
        let (session, mut ctx) = self.split();
        let flow = match session.engine_mut() {
            Some(engine) => engine.on_player_left(id, &mut ctx),
            None => Flow::Continue,
        };
        self.apply(flow);
        true
    }

    /// Starts `game` on behalf of `requester`.
    ///
    /// # Errors
    /// In check order: [`RoomError::NotJoined`], [`RoomError::UnknownMode`],
    /// [`RoomError::NotHost`], [`RoomError::AlreadyRunning`],
    /// [`RoomError::NotEnoughPlayers`]. A failed start changes nothing and
    /// emits nothing.
    pub fn start_game(&mut self, requester: PlayerId, game: &str) -> Result<GameMode, RoomError> {
        if !self.roster.contains(requester) {
            return Err(RoomError::NotJoined(requester));
        }
        let mode: GameMode = game
            .parse()
            .map_err(|_| RoomError::UnknownMode(game.to_string()))?;
        if !self.roster.is_host(requester) {
            return Err(RoomError::NotHost(requester));
        }
        if let Some(active) = self.mode.kind() {
            return Err(RoomError::AlreadyRunning(active));
        }
        let have = self.roster.count();
        if have < self.config.min_players {
            return Err(RoomError::NotEnoughPlayers {
                have,
                need: self.config.min_players,
            });
        }

        self.generation += 1;
        info!(%mode, generation = self.generation, players = have, "game started");
        self.outbox.to_all(ServerEvent::GameStarted { game: mode });

        let generation = self.generation;
        let (session, mut ctx) = self.split();
        let (started, flow) = ModeSession::start(mode, generation, &mut ctx);
        *session = started;
        self.apply(flow);
        Ok(mode)
    }

    /// Inbound dispatch table for one client event.
    ///
    /// Lobby events are handled here; everything else goes to the live
    /// mode, and is dropped when there is none or the sender never joined.
    /// Rejections reach the sender only if [`RoomError::is_user_facing`].
    pub fn handle(&mut self, sender: PlayerId, event: ClientEvent) {
        let result = match event {
            ClientEvent::JoinGame { player_name } => self.join(sender, &player_name),
            ClientEvent::LeaveGame => {
                self.leave(sender);
                Ok(())
            }
            ClientEvent::StartGame { game } => self.start_game(sender, &game).map(|_| ()),
            event => {
                self.route(sender, event);
                Ok(())
            }
        };
        if let Err(err) = result {
            self.reject(sender, err);
        }
    }

    /// Runs the live mode's round timer callback if `expiry` is still the
    /// pending one for the current game. Anything else is stale and ignored.
    pub fn on_timer(&mut self, expiry: Expiry) {
        if expiry.epoch != self.generation {
            debug!(
                stale = expiry.epoch,
                current = self.generation,
                "timer from a previous game, ignoring"
            );
            return;
        }
        let (session, mut ctx) = self.split();
        let Some(engine) = session.engine_mut() else {
            return;
        };
        if !engine.timer_mut().fire(expiry) {
            return;
        }
        let flow = engine.on_timer(&mut ctx);
        self.apply(flow);
    }

    /// Resolves when the live mode's timer is due. Pends forever while idle
    /// or disarmed, so it can sit in a `select!` loop.
    pub async fn next_expiry(&self) -> Expiry {
        match self.mode.timer() {
            Some(timer) => timer.expired().await,
            None => std::future::pending().await,
        }
    }

    /// The expiry the live mode is waiting on, if any.
    pub fn pending_expiry(&self) -> Option<Expiry> {
        self.mode.timer().and_then(|t| t.current())
    }

    /// Takes every event queued since the last drain, in emission order.
    pub fn drain_outbox(&mut self) -> Vec<(Recipient, ServerEvent)> {
        self.outbox.drain()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn active_mode(&self) -> Option<GameMode> {
        self.mode.kind()
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Number of games started so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn route(&mut self, sender: PlayerId, event: ClientEvent) {
        if !self.roster.contains(sender) {
            debug!(%sender, "game event from a connection that has not joined, dropping");
            return;
        }
        let (session, mut ctx) = self.split();
        let Some(engine) = session.engine_mut() else {
            debug!(%sender, "game event with no game running, dropping");
            return;
        };
        let flow = engine.handle(sender, event, &mut ctx);
        self.apply(flow);
    }

    fn reject(&mut self, sender: PlayerId, err: RoomError) {
        if err.is_user_facing() {
            debug!(%sender, error = %err, "request rejected");
            self.outbox.to_player(
                sender,
                ServerEvent::Error {
                    message: err.to_string(),
                },
            );
        } else {
            debug!(%sender, error = %err, "request dropped");
        }
    }

    /// Ends a mode whose roster fell below the minimum. No winner.
    fn abort(&mut self, active: GameMode) {
        warn!(
            mode = %active,
            players = self.roster.count(),
            min_players = self.config.min_players,
            "not enough players, game aborted"
        );
        self.mode = ModeSession::Idle;
        self.outbox.to_all(ServerEvent::Error {
            message: LOBBY_RETURN_MESSAGE.to_string(),
        });
    }

    fn apply(&mut self, flow: Flow) {
        match flow {
            Flow::Continue => {}
            Flow::Finished(scores) => {
                let (winner, score) = scores
                    .leader()
                    .map_or((None, 0), |e| (Some(e.player_id), e.score));
                info!(mode = ?self.mode.kind(), ?winner, score, "game over");
                self.outbox.to_all(ServerEvent::GameOver {
                    winner,
                    score,
                    scores: scores.entries(),
                });
                self.mode = ModeSession::Idle;
            }
            Flow::Resolved => {
                info!(mode = ?self.mode.kind(), "game resolved");
                self.mode = ModeSession::Idle;
            }
        }
    }

    fn broadcast_roster(&mut self) {
        self.outbox.to_all(ServerEvent::UpdatePlayers {
            players: self.roster.players().to_vec(),
        });
    }

    /// Splits the live session from the context its engine borrows.
    fn split(&mut self) -> (&mut ModeSession, ModeCtx<'_>) {
        (
            &mut self.mode,
            ModeCtx {
                roster: &self.roster,
                content: &self.content,
                config: &self.config,
                rng: &mut self.rng,
                out: &mut self.outbox,
            },
        )
    }
}
