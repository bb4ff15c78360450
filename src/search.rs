use std::fmt::Display;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{thread_rng, SeedableRng};
use tracing::{debug, error, info};

use crate::evaluation::{Evaluation, Score};
use crate::movelist::MoveList;
use crate::position::Position;
use crate::r#move::Move;

pub const DEFAULT_DEPTH: u32 = 2;

/// Groups together the knobs a search can be tuned with
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOptions {
    pub depth: u32,
    /// Seed for the root move shuffle, `None` draws a fresh one every search
    pub seed: Option<u64>,
}
impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            depth: DEFAULT_DEPTH,
            seed: None,
        }
    }
}
impl SearchOptions {
    /// Depths below one are raised to one
    pub fn set_depth(&mut self, value: u32) -> &mut Self {
        self.depth = value.max(1);
        self
    }
    pub fn set_seed(&mut self, value: Option<u64>) -> &mut Self {
        self.seed = value;
        self
    }
}

/// Outcome of a single search
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    /// `None` when the position had no legal move or the search was cancelled
    pub best_move: Option<Move>,
    /// From the point of view of the side to move
    pub score: Score,
    pub depth: u32,
    pub nodes_searched: u64,
    pub time: Duration,
    pub cancelled: bool,
}
impl Default for SearchResult {
    fn default() -> Self {
        SearchResult {
            best_move: None,
            score: -Evaluation::MATE_SCORE,
            depth: 0,
            nodes_searched: 0,
            time: Duration::ZERO,
            cancelled: false,
        }
    }
}
impl Display for SearchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mate_score = self.score.abs() >= Evaluation::MATE_SCORE;
        write!(
            f,
            "depth {} time {} nodes {} nps {} score {} {} bestmove {}",
            self.depth,
            self.time.as_millis(),
            self.nodes_searched,
            ((self.nodes_searched as f64) / self.time.as_secs_f64().max(f64::EPSILON)) as u64,
            if mate_score { "mate" } else { "cp" },
            if mate_score {
                self.score.signum()
            } else {
                self.score
            },
            self.best_move
                .map_or(String::from("(none)"), |m| m.to_string())
        )
    }
}

struct SearchContext<'a> {
    nodes_searched: u64,
    cancelled: bool,
    should_stop: &'a dyn Fn() -> bool,
}

/// Searches `legal_moves`, which must be the legal moves of `position`, at the
/// depth given in `options`.
/// The root moves are shuffled once, so equally scored moves vary from one
/// search to the next while the score itself does not.
/// The position is left as it was given, even if `stop` was raised midway.
pub fn search(
    position: &mut Position,
    legal_moves: &MoveList,
    options: &SearchOptions,
    stop: &AtomicBool,
) -> SearchResult {
    let start = Instant::now();
    let depth = options.depth.max(1);
    let sign = position.side_to_move().sign();

    let mut root_moves = legal_moves.clone();
    match options.seed {
        Some(seed) => root_moves.shuffle(&mut StdRng::seed_from_u64(seed)),
        None => root_moves.shuffle(&mut thread_rng()),
    }
    debug!(
        moves = root_moves.len(),
        depth,
        seed = ?options.seed,
        "starting search"
    );

    let stop_func = || stop.load(Ordering::Relaxed);
    let mut context = SearchContext {
        nodes_searched: 0,
        cancelled: false,
        should_stop: &stop_func,
    };

    let mut best_move = None;
    let mut max_score = Score::NEG_INFINITY;
    let (mut alpha, beta) = (-Evaluation::MATE_SCORE, Evaluation::MATE_SCORE);
    for mv in &root_moves {
        position.apply_move(*mv);
        let score = -negamax(position, depth - 1, -beta, -alpha, -sign, &mut context);
        position.undo_move();
        if context.cancelled {
            break;
        }

        if score > max_score {
            max_score = score;
            best_move = Some(*mv);
        }
        alpha = alpha.max(max_score);
        if alpha >= beta {
            break;
        }
    }

    let result = if context.cancelled {
        debug!(nodes = context.nodes_searched, "search cancelled");
        SearchResult {
            depth,
            nodes_searched: context.nodes_searched,
            time: start.elapsed(),
            cancelled: true,
            ..Default::default()
        }
    } else if best_move.is_none() {
        // Nothing to play, the score is the terminal one
        SearchResult {
            score: sign * Evaluation::positional(position),
            depth,
            time: start.elapsed(),
            ..Default::default()
        }
    } else {
        SearchResult {
            best_move,
            score: max_score,
            depth,
            nodes_searched: context.nodes_searched,
            time: start.elapsed(),
            cancelled: false,
        }
    };
    info!("{}", result);
    result
}

/// Best move for the side to move at the default depth, `None` if the game is over
pub fn find_best_move(position: &mut Position, legal_moves: &MoveList) -> Option<Move> {
    let stop = AtomicBool::new(false);
    search(position, legal_moves, &SearchOptions::default(), &stop).best_move
}

/// Negamax with alpha-beta pruning.
/// `sign` is 1 when white is to move and -1 otherwise, so that the returned score
/// is always from the side to move's point of view.
fn negamax(
    position: &mut Position,
    depth: u32,
    mut alpha: Score,
    beta: Score,
    sign: Score,
    context: &mut SearchContext,
) -> Score {
    if (context.should_stop)() {
        context.cancelled = true;
        return 0.0;
    }
    context.nodes_searched += 1;

    // Also refreshes the terminal flags the evaluation relies on
    let moves = position.legal_moves();
    if depth == 0 || moves.is_empty() {
        return sign * Evaluation::positional(position);
    }

    let mut max_score = Score::NEG_INFINITY;
    for mv in &moves {
        position.apply_move(*mv);
        let score = -negamax(position, depth - 1, -beta, -alpha, -sign, context);
        position.undo_move();
        if context.cancelled {
            return 0.0;
        }

        max_score = max_score.max(score);
        alpha = alpha.max(max_score);
        if alpha >= beta {
            break;
        }
    }
    max_score
}

/// Runs searches on a background thread, handing the result over once
pub struct SearchFramework {
    result: Arc<Mutex<Option<SearchResult>>>,
    worker: Option<Worker>,
}
impl Default for SearchFramework {
    fn default() -> Self {
        Self::new()
    }
}
impl SearchFramework {
    pub fn new() -> SearchFramework {
        SearchFramework {
            result: Arc::new(Mutex::new(None)),
            worker: None,
        }
    }

    /// Starts searching a copy of `position`.
    /// Does nothing if a search is already underway or its result has not
    /// been collected yet.
    pub fn run_search(&mut self, position: &Position, options: &SearchOptions) {
        if self.worker.is_some() {
            return;
        }
        self.worker = Some(new_worker(position, options, &self.result));
    }

    pub fn is_searching(&self) -> bool {
        self.worker
            .as_ref()
            .map_or(false, |w| !w.handle.is_finished())
    }

    /// Returns a result if and only if the current search is finished.
    /// A given result is only ever returned once.
    pub fn probe_search(&mut self) -> Option<SearchResult> {
        let result = self.take_result();
        if result.is_some() {
            self.join_worker();
        }
        result
    }

    /// Blocks until the current search is over
    pub fn wait(&mut self) -> Option<SearchResult> {
        self.join_worker();
        self.take_result()
    }

    /// Cancels the current search, its result is thrown away
    pub fn stop_search(&mut self) {
        if let Some(worker) = &self.worker {
            worker.stop_handle.store(true, Ordering::Relaxed);
        }
        self.join_worker();
        self.take_result();
    }

    fn take_result(&self) -> Option<SearchResult> {
        self.result
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    fn join_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.handle.join().is_err() {
                error!("search thread panicked");
            }
        }
    }
}
impl Drop for SearchFramework {
    fn drop(&mut self) {
        self.stop_search()
    }
}

struct Worker {
    handle: JoinHandle<()>,
    stop_handle: Arc<AtomicBool>,
}
fn new_worker(
    position: &Position,
    options: &SearchOptions,
    result: &Arc<Mutex<Option<SearchResult>>>,
) -> Worker {
    let stop_handle = Arc::new(AtomicBool::new(false));

    let mut internal_position = position.clone();
    let internal_options = options.clone();
    let thread_result = Arc::clone(result);
    let stop_signal = Arc::clone(&stop_handle);
    let handle = thread::spawn(move || {
        let legal_moves = internal_position.legal_moves();
        let res = search(
            &mut internal_position,
            &legal_moves,
            &internal_options,
            &stop_signal,
        );
        if !res.cancelled {
            *thread_result
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = Some(res);
        }
    });

    Worker {
        handle,
        stop_handle,
    }
}
