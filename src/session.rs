//! Game session management for the browser shell.
//!
//! A session is one browser's game: the current round's board, whose turn it
//! is, the mode, and the running scoreboard. The rules themselves live in
//! `noughts_rules`; this module only sequences turns and keeps score.

use derive_getters::Getters;
use noughts_rules::{Advice, Board, Mark, MoveAdvisor, Outcome, Position, RulesError, evaluate};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Unique identifier for a game session.
pub type SessionId = String;

/// Mark played by the human in computer mode. X always opens a round.
pub const HUMAN_MARK: Mark = Mark::X;

/// Mark played by the computer in computer mode.
pub const COMPUTER_MARK: Mark = Mark::O;

/// Sessions untouched for this long are dropped on the next create.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Most sessions held at once before the least recently used is evicted.
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

/// Who sits on the O side of the board.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameMode {
    /// Two people share the board.
    HumanVsHuman,
    /// The human plays X against the move advisor.
    #[default]
    HumanVsComputer,
}

impl GameMode {
    /// The mark the computer plays in this mode, if any.
    pub fn computer_mark(self) -> Option<Mark> {
        match self {
            GameMode::HumanVsHuman => None,
            GameMode::HumanVsComputer => Some(COMPUTER_MARK),
        }
    }
}

/// Round results since the last reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    /// Rounds won by X.
    pub x: u32,
    /// Rounds won by O.
    pub o: u32,
    /// Drawn rounds.
    pub draws: u32,
}

impl Scoreboard {
    /// Counts a decided outcome. In-progress outcomes are ignored.
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Win { mark: Mark::X, .. } => self.x += 1,
            Outcome::Win { mark: Mark::O, .. } => self.o += 1,
            Outcome::Draw => self.draws += 1,
            Outcome::InProgress => {}
        }
    }
}

/// Why a session refused an action.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum SessionError {
    /// The round is decided; start a new one first.
    #[display("Round is over, start a new round")]
    RoundOver,

    /// The computer's move is scheduled and has not landed yet.
    #[display("Computer is thinking")]
    AdvisorThinking,

    /// The human tried to move for the computer.
    #[display("Not your turn, waiting for {}", _0)]
    NotYourTurn(Mark),

    /// The cell already holds a mark.
    #[display("Cell {} is already occupied", _0)]
    CellOccupied(Position),

    /// An advisor move was requested when none is due.
    #[display("No computer move is due")]
    NoAdvisorTurn,

    /// The advisor found no empty cell.
    #[display("No move available")]
    NoMoveAvailable,

    /// The rules engine rejected the board.
    #[display("{}", _0)]
    Rules(RulesError),
}

impl std::error::Error for SessionError {}

impl From<RulesError> for SessionError {
    fn from(err: RulesError) -> Self {
        match err {
            RulesError::CellOccupied(pos) => SessionError::CellOccupied(pos),
            other => SessionError::Rules(other),
        }
    }
}

/// A game session: one board, one scoreboard, many rounds.
#[derive(Debug, Clone, Getters)]
pub struct GameSession {
    /// Session ID.
    id: SessionId,
    /// Current round's board.
    board: Board,
    /// Mark to move next.
    to_move: Mark,
    /// Human-vs-human or human-vs-computer.
    mode: GameMode,
    /// Results since the last reset.
    scores: Scoreboard,
    /// Set while the computer's reply is scheduled.
    advisor_pending: bool,
    /// Bumped on every new round so stale computer moves can be dropped.
    round: u64,
    /// Outcome of the current board.
    outcome: Outcome,
    /// Last time a request read or changed this session.
    last_active: Instant,
}

impl GameSession {
    /// Creates a new game session with an empty board.
    #[instrument]
    pub fn new(id: SessionId, mode: GameMode) -> Self {
        info!(session_id = %id, %mode, "Creating new game session");
        Self {
            id,
            board: Board::new(),
            to_move: Mark::X,
            mode,
            scores: Scoreboard::default(),
            advisor_pending: false,
            round: 1,
            outcome: Outcome::InProgress,
            last_active: Instant::now(),
        }
    }

    /// Whether the computer owns the mark to move.
    pub fn is_computer_turn(&self) -> bool {
        self.mode.computer_mark() == Some(self.to_move)
    }

    /// Plays the human's mark at `position`.
    ///
    /// In computer mode an undecided round leaves the advisor pending; the
    /// caller schedules [`GameSession::play_advisor`].
    #[instrument(skip(self), fields(session_id = %self.id, round = self.round))]
    pub fn play(&mut self, position: Position) -> Result<Outcome, SessionError> {
        if self.outcome.is_decided() {
            warn!("Move after round ended");
            return Err(SessionError::RoundOver);
        }
        if self.advisor_pending {
            warn!("Move while computer is thinking");
            return Err(SessionError::AdvisorThinking);
        }
        if self.is_computer_turn() {
            return Err(SessionError::NotYourTurn(self.to_move));
        }
        self.apply(position, self.to_move)
    }

    /// Lets the advisor play the computer's mark.
    #[instrument(skip(self, rng), fields(session_id = %self.id, round = self.round))]
    pub fn play_advisor<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Advice, SessionError> {
        if !self.advisor_pending || !self.is_computer_turn() {
            return Err(SessionError::NoAdvisorTurn);
        }
        let advisor = MoveAdvisor::for_mark(self.to_move);
        let Some(advice) = advisor.advise(&self.board, rng) else {
            self.advisor_pending = false;
            return Err(SessionError::NoMoveAvailable);
        };
        self.advisor_pending = false;
        self.apply(advice.position, advisor.advisor())?;
        Ok(advice)
    }

    /// Clears the board for a new round. X moves first.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn new_round(&mut self) {
        self.board = Board::new();
        self.to_move = Mark::X;
        self.advisor_pending = false;
        self.outcome = Outcome::InProgress;
        self.round += 1;
        info!(round = self.round, "Started new round");
    }

    /// Switches mode and starts a fresh round.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
        self.new_round();
    }

    /// Zeroes the scoreboard. The board is left as is.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn reset_scores(&mut self) {
        self.scores = Scoreboard::default();
        info!("Scores reset");
    }

    fn apply(&mut self, position: Position, mark: Mark) -> Result<Outcome, SessionError> {
        self.board.place(position, mark)?;
        self.outcome = evaluate(&self.board);

        if self.outcome.is_decided() {
            self.scores.record(&self.outcome);
            info!(outcome = ?self.outcome, scores = ?self.scores, "Round decided");
        } else {
            self.to_move = mark.opponent();
            self.advisor_pending = self.is_computer_turn();
        }

        debug!(
            %position,
            %mark,
            board = %self.board,
            advisor_pending = self.advisor_pending,
            "Move applied"
        );
        Ok(self.outcome)
    }
}

/// Manages all game sessions.
///
/// Sessions live in memory only. Idle ones are pruned when a new session is
/// created, and the registry never holds more than `max_sessions`.
#[derive(Debug, Clone)]
pub struct SessionManager {
    sessions: Arc<Mutex<HashMap<SessionId, GameSession>>>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::with_limits(DEFAULT_IDLE_TIMEOUT, DEFAULT_MAX_SESSIONS)
    }
}

impl SessionManager {
    /// Creates a new session manager with the default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session manager with explicit eviction limits.
    ///
    /// A `max_sessions` of zero is treated as one.
    pub fn with_limits(idle_timeout: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            idle_timeout,
            max_sessions: max_sessions.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, GameSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drops idle sessions, then the least recently active ones until there
    /// is room for one more.
    fn evict(&self, sessions: &mut HashMap<SessionId, GameSession>) {
        let before = sessions.len();
        sessions.retain(|_, session| session.last_active.elapsed() < self.idle_timeout);

        while sessions.len() >= self.max_sessions {
            let Some(oldest) = sessions
                .values()
                .min_by_key(|session| session.last_active)
                .map(|session| session.id.clone())
            else {
                break;
            };
            sessions.remove(&oldest);
        }

        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(evicted, remaining = sessions.len(), "Evicted sessions");
        }
    }

    /// Creates a new game session under a fresh random ID.
    #[instrument(skip(self))]
    pub fn create_session(&self, mode: GameMode) -> SessionId {
        let mut sessions = self.lock();
        self.evict(&mut sessions);
        let id = loop {
            let candidate = format!("{:016x}", rand::random::<u64>());
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };
        sessions.insert(id.clone(), GameSession::new(id.clone(), mode));
        info!(session_id = %id, count = sessions.len(), "Created new session");
        id
    }

    /// Gets a snapshot of a session by ID.
    #[instrument(skip(self))]
    pub fn get_session(&self, id: &str) -> Option<GameSession> {
        let session = self.lock().get_mut(id).map(|session| {
            session.last_active = Instant::now();
            session.clone()
        });
        if session.is_none() {
            debug!(session_id = id, "Session not found");
        }
        session
    }

    /// Runs `f` on a session while holding the lock.
    ///
    /// Every mutation goes through here, so a human move and a scheduled
    /// computer move can never interleave on the same board.
    pub fn with_session<T>(&self, id: &str, f: impl FnOnce(&mut GameSession) -> T) -> Option<T> {
        let mut sessions = self.lock();
        match sessions.get_mut(id) {
            Some(session) => {
                session.last_active = Instant::now();
                Some(f(session))
            }
            None => {
                debug!(session_id = id, "Session not found");
                None
            }
        }
    }

    /// Removes a session, returning its last state.
    #[instrument(skip(self))]
    pub fn remove_session(&self, id: &str) -> Option<GameSession> {
        let removed = self.lock().remove(id);
        if removed.is_some() {
            info!(session_id = id, "Removed session");
        }
        removed
    }

    /// Lists all active session IDs.
    #[instrument(skip(self))]
    pub fn list_sessions(&self) -> Vec<SessionId> {
        let ids: Vec<_> = self.lock().keys().cloned().collect();
        debug!(count = ids.len(), "Listed sessions");
        ids
    }
}
