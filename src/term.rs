use crate::{TermInt, Coords};
use std::{io::{self, Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::style::{Attribute, Colors};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};
use log::{info, warn};

// Used when the very first size query fails.
const FALLBACK_SIZE: Coords = (80, 24);

/// Owns the terminal for as long as the game runs. Raw mode and the alternate
/// screen are entered on construction and left again on drop.
pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    resized: bool,
}

impl TermManager {
    pub fn new() -> io::Result<Self> {
        let (width, height) = terminal::size().unwrap_or_else(|e| {
            warn!("Could not read terminal size ({}), assuming {:?}", e, FALLBACK_SIZE);
            FALLBACK_SIZE
        });

        terminal::enable_raw_mode()?;

        // From here on the guard exists, so a failure below still restores.
        let mut term = TermManager { width, height, stdout: stdout(), resized: false };
        execute!(term.stdout, EnterAlternateScreen, cursor::Hide, cursor::DisableBlinking)?;

        info!("Terminal ready at {}x{}", width, height);
        Ok(term)
    }

    /// Drains every pending event without blocking and keeps the key presses.
    pub fn read_key_events_queue(&mut self) -> io::Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::ZERO)? {
            match read()? {
                Event::Key(ev) => events.push(ev),
                Event::Resize(w, h) => self.set_size(w, h),
                _ => {}
            }
        }

        Ok(events)
    }

    /// Re-reads the terminal size and reports whether it changed since the
    /// last call. A failed query keeps the last known size.
    pub fn take_resized(&mut self) -> bool {
        match terminal::size() {
            Ok((w, h)) => self.set_size(w, h),
            Err(e) => warn!(
                "Could not read terminal size ({}), keeping {}x{}",
                e, self.width, self.height
            ),
        }

        std::mem::replace(&mut self.resized, false)
    }

    pub fn get_terminal_size(&self) -> Coords {
        (self.width, self.height)
    }

    /// Paints every cell of the screen with `filler`.
    pub fn fill(&mut self, filler: char) -> io::Result<()> {
        queue!(self.stdout, style::ResetColor, terminal::Clear(ClearType::All))?;

        let row: String = std::iter::repeat(filler).take(self.width as usize).collect();
        for y in 0..self.height {
            queue!(self.stdout, cursor::MoveTo(0, y), style::Print(&row))?;
        }

        Ok(())
    }

    pub fn print_at(&mut self, pos: Coords, text: &str, colors: Option<Colors>) -> io::Result<()> {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1))?;

        match colors {
            Some(c) => queue!(
                self.stdout,
                style::SetAttribute(Attribute::Bold),
                style::SetColors(c),
                style::Print(text),
                style::SetAttribute(Attribute::Reset)
            ),
            None => queue!(self.stdout, style::Print(text)),
        }
    }

    /// Draws a framed banner centred on `center`.
    pub fn show_message(&mut self, lines: &[&str], center: Coords) -> io::Result<()> {
        let inner = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 2;
        let msg_width = (inner + 2) as TermInt;
        let msg_height = (lines.len() + 2) as TermInt;
        let top_left = (
            center.0.saturating_sub(msg_width / 2),
            center.1.saturating_sub(msg_height / 2),
        );

        let border = "=".repeat(msg_width as usize);
        self.print_at(top_left, &border, None)?;

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("={line: ^width$}=", line = line, width = inner);
            self.print_at((top_left.0, top_left.1 + 1 + i as TermInt), &padded_line, None)?;
        }

        self.print_at((top_left.0, top_left.1 + msg_height - 1), &border, None)?;
        self.flush()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn set_size(&mut self, width: TermInt, height: TermInt) {
        if (width, height) != (self.width, self.height) {
            info!("Terminal resized to {}x{}", width, height);
            self.width = width;
            self.height = height;
            self.resized = true;
        }
    }
}

impl Drop for TermManager {
    fn drop(&mut self) {
        restore_terminal();
    }
}

/// Puts the terminal back the way the shell expects it. Errors are ignored:
/// this runs on the way out, often while something else already went wrong.
pub fn restore_terminal() {
    let mut out = stdout();
    let _ = execute!(
        out,
        style::ResetColor,
        cursor::Show,
        cursor::EnableBlinking,
        LeaveAlternateScreen
    );
    let _ = terminal::disable_raw_mode();
}
