use crate::error::ChessError;
use crate::movelist::MoveList;
use crate::piece::Color;
use crate::position::Position;
use crate::r#move::Move;
use crate::search::{SearchFramework, SearchOptions, SearchResult};

use rand::thread_rng;
use regex::Regex;
use rustyline::config::Configurer;
use rustyline::Editor;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

// How often the engine is checked on while waiting for input
const POLL_INTERVAL: Duration = Duration::from_millis(20);

const HELP: &str = "\
commands:
  show                     print the board
  moves                    list the legal moves
  move <e2e4>              play a move, the keyword can be left out
  undo                     take back your last move, cancelling the engine if it is thinking
  go                       let the engine play the side to move
  auto <n>                 let the engine play n plies, waiting for each
  players <white> <black>  who plays each side, human or engine
  log                      print the moves played so far
  depth <n>                set the search depth
  seed <n|none>            fix the root move shuffle, or draw it at random
  new                      start a new game
  perft <n>                count the leaf nodes n plies down from here
  help                     print this message
  quit                     leave";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Player {
    Human,
    Engine,
}
impl FromStr for Player {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "human" => Ok(Player::Human),
            "engine" => Ok(Player::Engine),
            _ => Err(format!("expected human or engine, got {}", s)),
        }
    }
}
impl Display for Player {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::Human => write!(f, "human"),
            Player::Engine => write!(f, "engine"),
        }
    }
}

/// Interactive text front end driving a game between humans and the engine.
/// Engine searches run in the background; their answer is picked up by
/// [`Driver::poll_engine`] between commands.
pub struct Driver {
    position: Position,
    legal_moves: MoveList,
    search_framework: SearchFramework,
    options: SearchOptions,
    /// Indexed by color
    players: [Player; 2],
    thinking: bool,
}
impl Default for Driver {
    fn default() -> Self {
        Self::new(SearchOptions::default())
    }
}

impl Driver {
    /// A human playing white against the engine
    pub fn new(options: SearchOptions) -> Driver {
        let mut position = Position::new();
        let legal_moves = position.legal_moves();
        Driver {
            position,
            legal_moves,
            search_framework: SearchFramework::new(),
            options,
            players: [Player::Human, Player::Engine],
            thinking: false,
        }
    }

    pub fn run(&mut self) {
        // Lines are read on their own thread so that the engine's answer can be
        // played while the prompt waits
        let (line_sender, line_receiver) = mpsc::channel::<String>();
        thread::spawn(move || {
            let mut editor = Editor::<()>::new();
            editor.set_auto_add_history(true);
            editor.set_check_cursor_position(true);
            while let Ok(line) = editor.readline("negachess> ") {
                let quitting = line.trim() == "quit";
                if line_sender.send(line).is_err() || quitting {
                    break;
                }
            }
        });

        println!("{}\n", self.position);
        self.start_engine_if_needed();
        loop {
            self.poll_engine();
            let line = match line_receiver.recv_timeout(POLL_INTERVAL) {
                Ok(line) => line,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            };
            match self.handle_command(&line) {
                Ok(OkCode::ShouldQuit) => break,
                Err(ErrCode::BadCommand(cmd)) => {
                    eprintln!("Unknown or badly formed command: {} (try help)", cmd)
                }
                Err(ErrCode::BadMove(e)) => eprintln!("{}", e),
                Err(ErrCode::BadArg(arg)) => {
                    eprintln!("Invalid argument: {} {} <- here", line.trim(), arg)
                }
                Err(ErrCode::MissingArg(arg)) => {
                    eprintln!("Missing an argument: {} {} <- here", line.trim(), arg)
                }
                Err(ErrCode::GameOver) => eprintln!("The game is over, try undo or new"),
                Err(ErrCode::EngineToMove) => {
                    eprintln!("The engine plays this side, wait for it or try undo")
                }
                _ => (),
            }
        }
        self.stop_thinking();
    }

    fn handle_command(&mut self, line: &str) -> Result<OkCode, ErrCode> {
        let args_regex = Self::args_regex();
        let mut args = args_regex.find_iter(line).map(|m| m.as_str());
        let cmd = if let Some(c) = args.next() {
            c
        } else {
            return Err(ErrCode::NoCommand);
        };
        match cmd {
            "show" => println!("{}", self.position),
            "moves" => println!("{}", self.legal_moves),
            "move" => {
                let mv = args.next().ok_or(ErrCode::MissingArg("<move>"))?;
                self.play_str(mv)?;
            }
            "undo" => self.undo(),
            "go" => {
                if self.position.is_game_over() {
                    return Err(ErrCode::GameOver);
                }
                self.start_search();
            }
            "auto" => {
                let plies = Self::parse_arg::<u32>(args.next(), "<plies>")?;
                for _ in 0..plies {
                    if self.position.is_game_over() {
                        break;
                    }
                    self.engine_move_blocking();
                }
            }
            "players" => {
                let white = Self::parse_arg::<Player>(args.next(), "<white>")?;
                let black = Self::parse_arg::<Player>(args.next(), "<black>")?;
                self.stop_thinking();
                self.players = [white, black];
                println!("white: {}, black: {}", white, black);
            }
            "log" => {
                let log = self.move_log();
                println!("{}", if log.is_empty() { "(no moves yet)" } else { log.as_str() });
            }
            "depth" => {
                let depth = Self::parse_arg::<u32>(args.next(), "<depth>")?;
                self.options.set_depth(depth);
                println!("depth set to {}", self.options.depth);
            }
            "seed" => match args.next() {
                Some("none") => {
                    self.options.set_seed(None);
                    println!("seed cleared");
                }
                arg => {
                    let seed = Self::parse_arg::<u64>(arg, "<seed>")?;
                    self.options.set_seed(Some(seed));
                    println!("seed set to {}", seed);
                }
            },
            "new" => self.new_game(),
            "perft" => {
                let depth = Self::parse_arg::<u32>(args.next(), "<depth>")?;
                crate::perft_report(&mut self.position.clone(), depth);
            }
            "help" => println!("{}", HELP),
            "quit" => return Ok(OkCode::ShouldQuit),
            // A bare move such as e2e4
            _ if Move::parse(cmd).is_some() => {
                self.play_str(cmd)?;
            }
            _ => return Err(ErrCode::BadCommand(String::from(cmd))),
        }

        self.start_engine_if_needed();
        Ok(OkCode::OkCommand)
    }

    fn parse_arg<T: FromStr>(arg: Option<&str>, name: &'static str) -> Result<T, ErrCode> {
        let arg = arg.ok_or(ErrCode::MissingArg(name))?;
        arg.parse::<T>()
            .map_err(|_| ErrCode::BadArg(String::from(arg)))
    }

    fn play_str(&mut self, move_str: &str) -> Result<Move, ErrCode> {
        if self.position.is_game_over() {
            return Err(ErrCode::GameOver);
        }
        if self.thinking || self.player_to_move() == Player::Engine {
            return Err(ErrCode::EngineToMove);
        }
        let (start, end) = Move::parse(move_str)
            .ok_or_else(|| ErrCode::BadMove(ChessError::InvalidNotation(move_str.to_string())))?;
        let mv = self
            .legal_moves
            .find(start, end)
            .ok_or_else(|| ErrCode::BadMove(ChessError::IllegalMove(move_str.to_string())))?;
        self.play(mv);
        Ok(mv)
    }

    fn player_to_move(&self) -> Player {
        self.players[self.position.side_to_move() as usize]
    }

    /// Starts a background search for the side to move, unless one is running
    fn start_search(&mut self) {
        if self.thinking {
            return;
        }
        debug!(side = %self.position.side_to_move(), "engine thinking");
        self.search_framework
            .run_search(&self.position, &self.options);
        self.thinking = true;
    }

    fn start_engine_if_needed(&mut self) {
        if self.player_to_move() == Player::Engine && !self.position.is_game_over() {
            self.start_search();
        }
    }

    /// Cancels the running search, if any. Its result is thrown away.
    fn stop_thinking(&mut self) {
        if self.thinking {
            debug!("search cancelled");
        }
        self.search_framework.stop_search();
        self.thinking = false;
    }

    /// Plays the engine's move if its search is over, without waiting for it
    pub fn poll_engine(&mut self) -> Option<Move> {
        if !self.thinking {
            return None;
        }
        // Checked first: a finished worker has already deposited its result
        let finished = !self.search_framework.is_searching();
        let result = self.search_framework.probe_search();
        if result.is_none() {
            if !finished {
                return None;
            }
            warn!("search ended without a result");
            self.search_framework.stop_search();
        }
        self.thinking = false;
        let mv = self.play_search_result(result);
        self.start_engine_if_needed();
        mv
    }

    /// Searches and plays a move for the side to move, waiting for the answer
    fn engine_move_blocking(&mut self) -> Option<Move> {
        self.start_search();
        let result = self.search_framework.wait();
        self.thinking = false;
        self.play_search_result(result)
    }

    /// Plays the searched move, or a random legal move if the search came
    /// back empty handed
    fn play_search_result(&mut self, result: Option<SearchResult>) -> Option<Move> {
        let best_move = result.and_then(|r| {
            println!("info {}", r);
            r.best_move
        });
        let mv = match best_move {
            Some(mv) => mv,
            None => {
                warn!("search returned no move, playing a random one");
                self.legal_moves.choose(&mut thread_rng())?
            }
        };
        self.play(mv);
        Some(mv)
    }

    fn play(&mut self, mv: Move) {
        let notation = mv.notation();
        self.position.apply_move(mv);
        self.legal_moves = self.position.legal_moves();
        debug!(%mv, "move played");
        println!("{}. {} ({})", (self.position.history_len() + 1) / 2, notation, mv);
        self.report_game_over();
    }

    /// Takes back the last move. Against the engine, keeps going until it is a
    /// human's turn again.
    fn undo(&mut self) {
        self.stop_thinking();
        if self.position.last_move().is_none() {
            return;
        }
        self.position.undo_move();
        let has_human = self.players.contains(&Player::Human);
        if has_human && self.player_to_move() == Player::Engine && self.position.last_move().is_some()
        {
            self.position.undo_move();
        }
        self.legal_moves = self.position.legal_moves();
        debug!(ply = self.position.history_len(), "moves taken back");
    }

    fn new_game(&mut self) {
        self.stop_thinking();
        self.position = Position::new();
        self.legal_moves = self.position.legal_moves();
        info!("new game");
        println!("{}\n", self.position);
    }

    /// The game so far in move-log form, "1. e4 e5 2. Nf3"
    fn move_log(&self) -> String {
        let mut log = String::new();
        for (ply, mv) in self.position.moves_played().enumerate() {
            if ply % 2 == 0 {
                if ply > 0 {
                    log.push(' ');
                }
                log.push_str(&format!("{}. ", ply / 2 + 1));
            } else {
                log.push(' ');
            }
            log.push_str(&mv.notation());
        }
        log
    }

    fn report_game_over(&self) {
        if self.position.is_checkmate() {
            println!(
                "{}\ncheckmate, {} wins",
                self.position,
                match self.position.side_to_move().opposite() {
                    Color::White => "white",
                    Color::Black => "black",
                }
            );
        } else if self.position.is_stalemate() {
            println!("{}\nstalemate", self.position);
        } else if self.position.is_in_check() {
            println!("check");
        }
    }

    fn args_regex() -> Regex {
        Regex::new(r#"(".*?"|[^"\s]+)"#).unwrap()
    }
}

#[derive(Debug, PartialEq)]
enum OkCode {
    OkCommand,
    ShouldQuit,
}

#[derive(Debug, PartialEq)]
enum ErrCode {
    NoCommand,
    MissingArg(&'static str),
    BadArg(String),
    BadCommand(String),
    BadMove(ChessError),
    GameOver,
    EngineToMove,
}
