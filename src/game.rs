use std::{collections::VecDeque, io, thread::sleep, time::Instant};

use crate::{Coords, TermInt};
use crate::config::Config;
use crate::signals::Shutdown;
use crate::term::TermManager;
use crate::snake::{CellKind, Snake, StepResult, Direction::{*, self}};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Colors};
use log::{debug, info, warn};

pub const BOARD_WIDTH: u16 = 30;
pub const BOARD_HEIGHT: u16 = 20;

// Terminal columns per board cell, so cells come out roughly square.
const CELL_WIDTH: TermInt = 2;
const MAX_PENDING_TURNS: usize = 2;
const OUTSIDE_CHAR: char = '~';

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameState {
    Playing,
    Paused,
    Lost,
    Won,
}

impl GameState {
    pub fn toggle_pause(self) -> Self {
        match self {
            GameState::Playing => GameState::Paused,
            GameState::Paused => GameState::Playing,
            other => other,
        }
    }

    pub fn after_step(self, result: StepResult) -> Self {
        match (self, result) {
            (GameState::Playing, StepResult::Blocked) => GameState::Lost,
            (GameState::Playing, StepResult::Won) => GameState::Won,
            (state, _) => state,
        }
    }

    pub fn is_over(self) -> bool {
        matches!(self, GameState::Lost | GameState::Won)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Steer(Direction),
    Pause,
    Quit,
}

pub fn action_for(ev: &KeyEvent) -> Option<Action> {
    if ev.kind == KeyEventKind::Release {
        return None;
    }

    if is_ctrl_c(ev) {
        return Some(Action::Quit);
    }

    match ev.code {
        KeyCode::Up => Some(Action::Steer(Up)),
        KeyCode::Down => Some(Action::Steer(Down)),
        KeyCode::Left => Some(Action::Steer(Left)),
        KeyCode::Right => Some(Action::Steer(Right)),
        KeyCode::Esc => Some(Action::Pause),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => Some(Action::Steer(Up)),
            'a' => Some(Action::Steer(Left)),
            's' => Some(Action::Steer(Down)),
            'd' => Some(Action::Steer(Right)),
            'p' => Some(Action::Pause),
            'q' => Some(Action::Quit),
            _ => None,
        },
        _ => None,
    }
}

/// Turns queued key presses into one direction per tick.
///
/// Two quick turns inside a single tick are both kept and applied on
/// consecutive ticks. Presses that repeat or reverse the direction in effect
/// at that point are dropped, which is what stops the snake biting its neck.
pub struct Steering {
    current: Direction,
    pending: VecDeque<Direction>,
}

impl Steering {
    pub fn new(initial: Direction) -> Self {
        Steering { current: initial, pending: VecDeque::with_capacity(MAX_PENDING_TURNS) }
    }

    pub fn push(&mut self, dir: Direction) {
        let last = self.pending.back().copied().unwrap_or(self.current);

        if dir == last || dir == last.opposite() || self.pending.len() >= MAX_PENDING_TURNS {
            return;
        }

        self.pending.push_back(dir);
    }

    pub fn next(&mut self) -> Direction {
        if let Some(dir) = self.pending.pop_front() {
            self.current = dir;
        }
        self.current
    }
}

pub struct SnakeGame {
    config: Config,
    term: TermManager,
    snake: Snake,
    steering: Steering,
    state: GameState,
    shutdown: Shutdown,
}

impl SnakeGame {
    pub fn new(config: Config, term: TermManager, shutdown: Shutdown) -> Self {
        SnakeGame {
            config,
            term,
            shutdown,
            snake: Snake::new(BOARD_WIDTH, BOARD_HEIGHT),
            steering: Steering::new(Right),
            state: GameState::Playing,
        }
    }

    /// Runs until the game is won, lost, the player quits or a terminating
    /// signal arrives.
    pub fn play(&mut self) -> io::Result<()> {
        self.draw_frame()?;

        loop {
            let tick_start = Instant::now();

            if self.shutdown.requested() {
                info!("Terminated by signal, size {}", self.snake.size());
                return Ok(());
            }

            for key_ev in self.term.read_key_events_queue()? {
                match action_for(&key_ev) {
                    Some(Action::Quit) => {
                        info!("Quit requested, size {}", self.snake.size());
                        return Ok(());
                    }
                    Some(Action::Pause) => self.toggle_pause()?,
                    Some(Action::Steer(dir)) if self.state == GameState::Playing => {
                        self.steering.push(dir)
                    }
                    _ => {}
                }
            }

            if self.term.take_resized() {
                self.draw_frame()?;
            }

            if self.state == GameState::Playing {
                let size = self.snake.size();
                let result = self.snake.step(self.steering.next());

                if self.snake.size() > size {
                    debug!(
                        "Ate food, size {} -> {}, next food at {:?}",
                        size,
                        self.snake.size(),
                        self.snake.food()
                    );
                }

                self.state = self.state.after_step(result);
                self.draw_board()?;
            }

            if self.state.is_over() {
                self.game_over()?;
                return Ok(());
            }

            sleep(self.config.tick.saturating_sub(tick_start.elapsed()));
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn game_over(&mut self) -> io::Result<()> {
        let won = self.state == GameState::Won;
        let line = if won {"YOU WON!  :D"} else {"GAME OVER! :("};

        info!("{} with size {}", if won {"Won"} else {"Lost"}, self.snake.size());

        self.term.show_message(&[line], board_center())?;
        sleep(self.config.end_delay);
        Ok(())
    }

    fn toggle_pause(&mut self) -> io::Result<()> {
        self.state = self.state.toggle_pause();
        info!("State is now {:?}", self.state);

        match self.state {
            GameState::Paused => self.term.show_message(&["PAUSE"], board_center()),
            _ => self.draw_board(),
        }
    }

    fn draw_frame(&mut self) -> io::Result<()> {
        let (width, height) = self.term.get_terminal_size();
        if width < BOARD_WIDTH * CELL_WIDTH || height <= BOARD_HEIGHT {
            warn!("Terminal {}x{} is smaller than the board", width, height);
        }

        self.term.fill(OUTSIDE_CHAR)?;
        self.draw_board()?;

        if self.state == GameState::Paused {
            self.term.show_message(&["PAUSE"], board_center())?;
        }

        Ok(())
    }

    fn draw_board(&mut self) -> io::Result<()> {
        let lost = self.state == GameState::Lost;

        for y in 0..self.snake.height() {
            for x in 0..self.snake.width() {
                let (text, colors) = glyph(&self.snake, x, y, lost);
                let pos = (x as TermInt * CELL_WIDTH, y as TermInt);
                self.term.print_at(pos, text, colors)?;
            }
        }

        let status = format!(
            "{:<w$}",
            status_line(self.snake.size()),
            w = (BOARD_WIDTH * CELL_WIDTH) as usize
        );
        self.term.print_at((0, BOARD_HEIGHT), &status, None)?;

        self.term.flush()
    }
}

/// Text and colours for one board cell.
pub fn glyph<R>(snake: &Snake<R>, x: i32, y: i32, lost: bool) -> (&'static str, Option<Colors>) {
    match snake.cell_at(x, y) {
        CellKind::Head => {
            let face = if lost {
                ":("
            } else if snake.head_near_food() {
                ":D"
            } else {
                ":)"
            };
            (face, Some(Colors::new(Color::Yellow, Color::DarkRed)))
        }
        CellKind::Body => ("  ", Some(Colors::new(Color::White, Color::DarkGreen))),
        CellKind::Food => ("^^", Some(Colors::new(Color::Black, Color::White))),
        CellKind::Empty => ("  ", None),
    }
}

fn status_line(size: u32) -> String {
    format!("Score: {}  arrows/WASD move, p pause, q quit", size.saturating_sub(2))
}

fn board_center() -> Coords {
    (BOARD_WIDTH * CELL_WIDTH / 2, BOARD_HEIGHT / 2)
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(action_for(&press(KeyCode::Up)), Some(Action::Steer(Up)));
        assert_eq!(action_for(&press(KeyCode::Char('a'))), Some(Action::Steer(Left)));
        assert_eq!(action_for(&press(KeyCode::Char('S'))), Some(Action::Steer(Down)));
        assert_eq!(action_for(&press(KeyCode::Char('d'))), Some(Action::Steer(Right)));
        assert_eq!(action_for(&press(KeyCode::Char('p'))), Some(Action::Pause));
        assert_eq!(action_for(&press(KeyCode::Esc)), Some(Action::Pause));
        assert_eq!(action_for(&press(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(action_for(&press(KeyCode::Char('x'))), None);
        assert_eq!(
            action_for(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
        assert_eq!(action_for(&press(KeyCode::Char('c'))), None);
    }

    #[test]
    fn key_releases_are_ignored() {
        let ev = KeyEvent::new_with_kind(KeyCode::Up, KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(action_for(&ev), None);
    }

    #[test]
    fn steering_keeps_going_without_input() {
        let mut steering = Steering::new(Right);
        assert_eq!(steering.next(), Right);
        assert_eq!(steering.next(), Right);
    }

    #[test]
    fn steering_ignores_reversal() {
        let mut steering = Steering::new(Right);
        steering.push(Left);
        assert_eq!(steering.next(), Right);

        steering.push(Up);
        steering.push(Down);
        assert_eq!(steering.next(), Up);
        assert_eq!(steering.next(), Up);
    }

    #[test]
    fn two_quick_turns_are_both_kept() {
        let mut steering = Steering::new(Right);
        steering.push(Up);
        steering.push(Left);
        assert_eq!(steering.next(), Up);
        assert_eq!(steering.next(), Left);
        assert_eq!(steering.next(), Left);
    }

    #[test]
    fn steering_buffer_is_bounded() {
        let mut steering = Steering::new(Right);
        steering.push(Up);
        steering.push(Left);
        steering.push(Down);
        assert_eq!(steering.next(), Up);
        assert_eq!(steering.next(), Left);
        assert_eq!(steering.next(), Left);
    }

    #[test]
    fn repeated_direction_does_not_use_a_slot() {
        let mut steering = Steering::new(Right);
        steering.push(Right);
        steering.push(Up);
        steering.push(Up);
        steering.push(Left);
        assert_eq!(steering.next(), Up);
        assert_eq!(steering.next(), Left);
    }

    #[test]
    fn state_transitions() {
        use GameState::*;

        assert_eq!(Playing.after_step(StepResult::Continue), Playing);
        assert_eq!(Playing.after_step(StepResult::Blocked), Lost);
        assert_eq!(Playing.after_step(StepResult::Won), Won);

        assert_eq!(Playing.toggle_pause(), Paused);
        assert_eq!(Paused.toggle_pause(), Playing);
        assert_eq!(Lost.toggle_pause(), Lost);
        assert_eq!(Won.toggle_pause(), Won);

        assert_eq!(Lost.after_step(StepResult::Continue), Lost);
        assert!(Lost.is_over() && Won.is_over());
        assert!(!Playing.is_over() && !Paused.is_over());
    }

    #[test]
    fn glyphs_follow_cell_kind() {
        let mut snake = Snake::with_rng(BOARD_WIDTH, BOARD_HEIGHT, StdRng::seed_from_u64(1));
        let (hx, hy) = snake.head();

        assert_eq!(glyph(&snake, hx, hy, true).0, ":(");

        snake.place_food((hx + 1, hy));
        assert_eq!(glyph(&snake, hx + 1, hy, false).0, "^^");
        assert_eq!(glyph(&snake, hx, hy, false).0, ":D");

        snake.place_food((0, 0));
        assert_eq!(glyph(&snake, hx, hy, false).0, ":)");
        assert_eq!(glyph(&snake, 0, 0, false).0, "^^");

        assert_eq!(snake.step(Right), StepResult::Continue);
        let body = Colors::new(Color::White, Color::DarkGreen);
        assert_eq!(glyph(&snake, hx, hy, false), ("  ", Some(body)));
        assert_eq!(glyph(&snake, 5, 5, false), ("  ", None));
    }

    #[test]
    fn score_counts_food_eaten() {
        assert!(status_line(2).starts_with("Score: 0 "));
        assert!(status_line(7).starts_with("Score: 5 "));
    }
}
