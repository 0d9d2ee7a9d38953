/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Screen layout:
///   row 0        header (title, score, level, difficulty)
///   rows 2..     body for the current screen
///   row h-2      key help
///   row h-1      message bar (notices, rejected actions)

use std::io::{self, BufWriter, Write};
use std::time::Instant;

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::app::App;
use crate::domain::catalog::{ColorTag, ARENAS, CHARACTERS};
use crate::domain::role::{HidingSpot, Role};
use crate::domain::rules::Difficulty;
use crate::sim::session::{Screen, Session};
use crate::ui::view::{MenuItem, RoundEndItem, SettingsItem, MENU_ITEMS, ROUND_END_ITEMS, SETTINGS_ITEMS};

// ── Cell: the unit of the back-buffer ──

const CELL_BYTES: usize = 8;

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: [u8; CELL_BYTES],
    ch_len: u8,
    fg: Color,
    bg: Color,
    wide: bool,    // occupies 2 terminal columns
    cont: bool,    // right half of a wide char (never printed)
}

impl Cell {
    /// Explicit background for every cell, matching the initial Clear so
    /// VTE terminals show no seams between rows.
    const BASE_BG: Color = Color::Rgb { r: 30, g: 22, b: 40 };

    const BLANK: Cell = Cell {
        ch: [b' ', 0, 0, 0, 0, 0, 0, 0],
        ch_len: 1,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: false,
    };

    const WIDE_CONT: Cell = Cell {
        ch: [0; CELL_BYTES],
        ch_len: 0,
        fg: Color::White,
        bg: Cell::BASE_BG,
        wide: false,
        cont: true,
    };

    /// Differs from any real cell, so a back buffer full of these forces
    /// a full repaint.
    const INVALID: Cell = Cell {
        ch: [b'?', 0, 0, 0, 0, 0, 0, 0],
        ch_len: 1,
        fg: Color::Magenta,
        bg: Color::Magenta,
        wide: false,
        cont: false,
    };

    fn norm_bg(bg: Color) -> Color {
        match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        }
    }

    fn from_char(c: char, fg: Color, bg: Color) -> Self {
        let mut cell = Self::BLANK;
        cell.ch_len = c.encode_utf8(&mut cell.ch).len() as u8;
        cell.fg = fg;
        cell.bg = Self::norm_bg(bg);
        cell.wide = char_width(c) == 2;
        cell
    }

    fn as_str(&self) -> &str {
        std::str::from_utf8(&self.ch[..self.ch_len as usize]).unwrap_or(" ")
    }
}

/// Terminal columns a char takes. Emoji from the supplementary planes are wide.
fn char_width(c: char) -> usize {
    if c as u32 >= 0x1F000 { 2 } else { 1 }
}

fn text_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y). Wide chars take two columns; a wide char
    /// that would straddle the right edge is dropped.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            let w = char_width(ch);
            if cx + w > self.width {
                break;
            }
            self.set(cx, y, Cell::from_char(ch, fg, bg));
            if w == 2 {
                self.set(cx + 1, y, Cell { bg: Cell::norm_bg(bg), ..Cell::WIDE_CONT });
            }
            cx += w;
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::from_char(' ', Color::Black, bg));
        }
    }

    fn put_centered(&mut self, y: usize, s: &str, fg: Color) {
        let x = self.width.saturating_sub(text_width(s)) / 2;
        self.put_str(x, y, s, fg, Color::Reset);
    }
}

// ── Palette ──

const GOLD: Color = Color::Rgb { r: 255, g: 200, b: 60 };
const PINK: Color = Color::Rgb { r: 255, g: 120, b: 190 };
const HI: Color = Color::Rgb { r: 120, g: 255, b: 140 };
const DIM: Color = Color::DarkGrey;
const HEADER_BG: Color = Color::Rgb { r: 120, g: 50, b: 140 };
const MSG_BG: Color = Color::Rgb { r: 200, g: 180, b: 50 };
const DANGER: Color = Color::Rgb { r: 255, g: 90, b: 90 };

fn tag_color(tag: ColorTag) -> Color {
    match tag {
        ColorTag::Pink   => PINK,
        ColorTag::Yellow => Color::Rgb { r: 255, g: 230, b: 80 },
        ColorTag::Purple => Color::Rgb { r: 190, g: 130, b: 255 },
        ColorTag::Orange => Color::Rgb { r: 255, g: 160, b: 60 },
        ColorTag::Green  => Color::Rgb { r: 110, g: 220, b: 120 },
        ColorTag::Blue   => Color::Rgb { r: 100, g: 180, b: 255 },
    }
}

// ── Renderer ──

const HEADER_ROW: usize = 0;
const BODY_ROW: usize = 2;
const LIST_X: usize = 6;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_screen: Option<Screen>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_screen: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(Cell::INVALID);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, app: &App, now: Instant) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        let session = app.session();
        let screen = session.screen();
        if self.last_screen != Some(screen) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_screen = Some(screen);
        }

        self.front.clear();
        self.compose_header(session);

        let cursor = app.view().cursor();
        match screen {
            Screen::Menu => self.compose_menu(session, cursor),
            Screen::SelectingCharacter => self.compose_character_select(session, cursor),
            Screen::SelectingArena => self.compose_arena_select(session, cursor),
            Screen::SelectingRole => self.compose_role_select(session, cursor),
            Screen::InRound => self.compose_round(session, cursor),
            Screen::RoundEnded => self.compose_round_end(session, cursor),
            Screen::Leaderboard => self.compose_leaderboard(session),
            Screen::Settings => self.compose_settings(session, cursor),
        }

        self.compose_help(screen, session);
        if let Some(msg) = app.view().message(now) {
            self.compose_message(msg);
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors; ResetColor would fall back to the terminal default.
        queue!(self.writer, SetForegroundColor(Color::White), SetBackgroundColor(Cell::BASE_BG))?;

        for y in 0..self.front.height {
            let mut x = 0;
            while x < self.front.width {
                let cell = self.front.get(x, y);
                let prev = self.back.get(x, y);

                if cell.cont {
                    if cell != prev { need_move = true; }
                    x += 1;
                    continue;
                }

                let cont_changed = cell.wide
                    && x + 1 < self.front.width
                    && self.front.get(x + 1, y) != self.back.get(x + 1, y);

                if cell == prev && !cont_changed {
                    need_move = true;
                    x += 1;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }

                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.as_str()))?;

                if cell.wide {
                    last_x = x + 1;
                    x += 2;
                } else {
                    last_x = x;
                    x += 1;
                }
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: shared chrome ──

    fn compose_header(&mut self, s: &Session) {
        self.front.fill_row(HEADER_ROW, HEADER_BG);
        self.front.put_str(1, HEADER_ROW, "🎭 Hide & Seek: Labubu Edition", Color::White, HEADER_BG);

        let p = s.progression();
        let stats = format!(
            "Score {}  Level {}  {} ",
            p.score(),
            p.level(),
            s.difficulty().label()
        );
        let x = self.front.width.saturating_sub(text_width(&stats));
        self.front.put_str(x, HEADER_ROW, &stats, GOLD, HEADER_BG);
    }

    fn compose_help(&mut self, screen: Screen, s: &Session) {
        let help = match screen {
            Screen::Menu => "↑↓ Move   Enter Select   R Reset   Q Quit",
            Screen::SelectingCharacter | Screen::SelectingArena | Screen::SelectingRole => {
                "↑↓ Move   Enter Choose   Esc Back"
            }
            Screen::InRound if s.selection().role() == Some(Role::Seeker) => {
                "F / Space Found one!   Esc Leave round"
            }
            Screen::InRound => "1 2 3 / ↑↓ Enter Hide   Esc Leave round",
            Screen::RoundEnded => "P Play again   M Menu   ↑↓ Enter",
            Screen::Leaderboard => "R Reset progress   Esc Back",
            Screen::Settings => "←→ Difficulty   ↑↓ Enter Select   R Reset   Esc Back",
        };
        let row = self.front.height.saturating_sub(2);
        if row > BODY_ROW {
            self.front.put_str(2, row, help, DIM, Color::Reset);
        }
    }

    fn compose_message(&mut self, msg: &str) {
        let row = self.front.height.saturating_sub(1);
        if row <= BODY_ROW {
            return;
        }
        self.front.fill_row(row, MSG_BG);
        self.front.put_str(0, row, &format!(" ◈ {msg} "), Color::Black, MSG_BG);
    }

    /// One selectable row with a cursor marker.
    fn put_item(&mut self, row: usize, selected: bool, text: &str, fg: Color) {
        let marker = if selected { "▶ " } else { "  " };
        self.front.put_str(LIST_X - 2, row, marker, HI, Color::Reset);
        self.front.put_str(LIST_X, row, text, if selected { HI } else { fg }, Color::Reset);
    }

    // ── Compose: screens ──

    fn compose_menu(&mut self, s: &Session, cursor: usize) {
        self.front.put_centered(BODY_ROW, "😈 Who will Labubu find? 😈", PINK);

        let sel = s.selection();
        let base = BODY_ROW + 2;
        for (i, item) in MENU_ITEMS.iter().enumerate() {
            let detail = match item {
                MenuItem::Character => sel
                    .character()
                    .map(|c| format!("{} {}", c.emoji, c.name))
                    .unwrap_or_else(|| "(none)".into()),
                MenuItem::Arena => sel
                    .arena()
                    .map(|a| format!("{} {}", a.emoji, a.name))
                    .unwrap_or_else(|| "(none)".into()),
                MenuItem::Role => sel
                    .role()
                    .map(|r| format!("{} {}", r.emoji(), r.label()))
                    .unwrap_or_else(|| "(none)".into()),
                _ => String::new(),
            };
            let fg = match item {
                MenuItem::Play if !s.can_start() => DIM,
                MenuItem::Play => GOLD,
                _ => Color::White,
            };
            let text = if detail.is_empty() {
                item.label().to_string()
            } else {
                format!("{:<12} {}", item.label(), detail)
            };
            self.put_item(base + i * 2, cursor == i, &text, fg);
        }
    }

    fn compose_character_select(&mut self, s: &Session, cursor: usize) {
        self.front.put_str(LIST_X, BODY_ROW, "Choose your character", GOLD, Color::Reset);
        let current = s.selection().character().map(|c| c.id);
        for (i, c) in CHARACTERS.iter().enumerate() {
            let mark = if current == Some(c.id) { " ✓" } else { "" };
            let text = format!("{} {}{}", c.emoji, c.name, mark);
            self.put_item(BODY_ROW + 2 + i * 2, cursor == i, &text, tag_color(c.color_tag));
        }
    }

    fn compose_arena_select(&mut self, s: &Session, cursor: usize) {
        self.front.put_str(LIST_X, BODY_ROW, "Choose the arena", GOLD, Color::Reset);
        let current = s.selection().arena().map(|a| a.id);
        for (i, a) in ARENAS.iter().enumerate() {
            let row = BODY_ROW + 2 + i * 3;
            let mark = if current == Some(a.id) { " ✓" } else { "" };
            self.put_item(row, cursor == i, &format!("{} {}{}", a.emoji, a.name, mark), Color::White);
            self.front.put_str(LIST_X + 3, row + 1, a.description, DIM, Color::Reset);
        }
    }

    fn compose_role_select(&mut self, s: &Session, cursor: usize) {
        self.front.put_str(LIST_X, BODY_ROW, "Choose your role", GOLD, Color::Reset);
        for (i, r) in Role::ALL.iter().enumerate() {
            let row = BODY_ROW + 2 + i * 3;
            let mark = if s.selection().role() == Some(*r) { " ✓" } else { "" };
            self.put_item(row, cursor == i, &format!("{} {}{}", r.emoji(), r.label(), mark), Color::White);
            self.front.put_str(LIST_X + 3, row + 1, r.goal(), DIM, Color::Reset);
        }
    }

    fn compose_round(&mut self, s: &Session, cursor: usize) {
        let sel = s.selection();
        let (Some(role), Some(arena)) = (sel.role(), sel.arena()) else {
            return;
        };
        let who = sel.character().map(|c| format!("{} {}", c.emoji, c.name)).unwrap_or_default();
        self.front.put_str(LIST_X, BODY_ROW, &format!("{} {}   {}", arena.emoji, arena.name, who), GOLD, Color::Reset);
        self.front.put_str(LIST_X, BODY_ROW + 1, &format!("{} {}", role.emoji(), role.goal()), PINK, Color::Reset);

        // Countdown with a shrinking bar.
        let timer = s.timer();
        let remaining = timer.remaining();
        let duration = timer.duration().max(1);
        let fg = if remaining <= 10 { DANGER } else { HI };
        self.front.put_str(
            LIST_X,
            BODY_ROW + 3,
            &format!("Time left  {:02}:{:02}", remaining / 60, remaining % 60),
            fg,
            Color::Reset,
        );
        let bar_w = self.front.width.saturating_sub(LIST_X * 2).min(40);
        let filled = bar_w * remaining as usize / duration as usize;
        let bar: String = "█".repeat(filled) + &"░".repeat(bar_w - filled);
        self.front.put_str(LIST_X, BODY_ROW + 4, &bar, fg, Color::Reset);

        let base = BODY_ROW + 6;
        match role {
            Role::Seeker => {
                let found = s.round().found_count();
                let required = s.required_targets();
                self.front.put_str(
                    LIST_X,
                    base,
                    &format!("🔍 Found {found} / {required}"),
                    if found >= required { HI } else { Color::White },
                    Color::Reset,
                );
                let dots: String = (0..required)
                    .map(|i| if i < found { '●' } else { '○' })
                    .collect();
                self.front.put_str(LIST_X, base + 1, &dots, GOLD, Color::Reset);
            }
            Role::Hider => {
                let spot = s.round().hiding_spot();
                self.front.put_str(LIST_X, base, "Where do you hide?", Color::White, Color::Reset);
                for (i, h) in HidingSpot::ALL.iter().enumerate() {
                    let mark = if spot == Some(*h) { "  ← hiding here" } else { "" };
                    let text = format!("{} {} {}{}", i + 1, h.emoji(), h.label(), mark);
                    self.put_item(base + 2 + i, cursor == i, &text, Color::White);
                }
            }
        }
    }

    fn compose_round_end(&mut self, s: &Session, cursor: usize) {
        if let Some(result) = s.last_result() {
            let (banner, fg) = if result.passed { ("🏆 You did it! 🏆", GOLD) } else { ("Time's up!", DANGER) };
            self.front.put_centered(BODY_ROW + 1, banner, fg);
            self.front.put_centered(BODY_ROW + 3, &result.notice.text(), Color::White);
            self.front.put_centered(
                BODY_ROW + 4,
                &format!("+{} points (round played at level {})", result.score_delta, result.level),
                HI,
            );
        }
        let p = s.progression();
        self.front.put_centered(
            BODY_ROW + 6,
            &format!("Total score {}   Next level {}", p.score(), p.level()),
            GOLD,
        );

        for (i, item) in ROUND_END_ITEMS.iter().enumerate() {
            let label = match item {
                RoundEndItem::PlayAgain => "Play again",
                RoundEndItem::Menu => "Back to menu (saves to leaderboard)",
            };
            self.put_item(BODY_ROW + 9 + i * 2, cursor == i, label, Color::White);
        }
    }

    fn compose_leaderboard(&mut self, s: &Session) {
        self.front.put_str(LIST_X, BODY_ROW, "🏆 Leaderboard", GOLD, Color::Reset);
        let table = s.leaderboard().table();
        if table.is_empty() {
            self.front.put_str(LIST_X, BODY_ROW + 2, "No rounds recorded yet.", DIM, Color::Reset);
            return;
        }
        self.front.put_str(
            LIST_X,
            BODY_ROW + 2,
            &format!("{:>3}  {:<12} {:>7} {:>6}  {}", "#", "Name", "Score", "Level", "Date"),
            DIM,
            Color::Reset,
        );
        for (i, e) in table.entries().iter().enumerate() {
            let fg = if i == 0 { GOLD } else { Color::White };
            let line = format!(
                "{:>3}  {:<12} {:>7} {:>6}  {}",
                i + 1,
                e.display_name,
                e.score,
                e.level,
                e.date_label
            );
            self.front.put_str(LIST_X, BODY_ROW + 3 + i, &line, fg, Color::Reset);
        }
    }

    fn compose_settings(&mut self, s: &Session, cursor: usize) {
        self.front.put_str(LIST_X, BODY_ROW, "Settings", GOLD, Color::Reset);
        for (i, item) in SETTINGS_ITEMS.iter().enumerate() {
            let text = match item {
                SettingsItem::Difficulty => {
                    let d = s.difficulty();
                    let choices: Vec<String> = Difficulty::ALL
                        .iter()
                        .map(|x| if *x == d { format!("[{}]", x.label()) } else { x.label().to_string() })
                        .collect();
                    format!("Difficulty  ◀ {} ▶  ({}s rounds)", choices.join(" "), d.duration_secs())
                }
                SettingsItem::ResetProgress => "Reset progress and leaderboard".to_string(),
                SettingsItem::Back => "Back".to_string(),
            };
            let fg = if *item == SettingsItem::ResetProgress { DANGER } else { Color::White };
            self.put_item(BODY_ROW + 2 + i * 2, cursor == i, &text, fg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &FrameBuffer, y: usize) -> String {
        (0..buf.width)
            .map(|x| buf.get(x, y))
            .filter(|c| !c.cont)
            .map(|c| c.as_str().to_string())
            .collect()
    }

    #[test]
    fn wide_chars_take_two_columns() {
        let mut buf = FrameBuffer::new(10, 1);
        buf.put_str(0, 0, "🐱ab", Color::White, Color::Reset);
        assert!(buf.get(0, 0).wide);
        assert!(buf.get(1, 0).cont);
        assert_eq!(buf.get(2, 0).as_str(), "a");
        assert_eq!(text_width("🐱ab"), 4);
    }

    #[test]
    fn put_str_clips_at_edge() {
        let mut buf = FrameBuffer::new(3, 1);
        buf.put_str(1, 0, "a🐶", Color::White, Color::Reset);
        assert_eq!(row_text(&buf, 0), " a ");
    }

    #[test]
    fn centered_text_is_centered() {
        let mut buf = FrameBuffer::new(10, 1);
        buf.put_centered(0, "abcd", Color::White);
        assert_eq!(row_text(&buf, 0), "   abcd   ");
    }

    #[test]
    fn reset_bg_is_normalized() {
        let c = Cell::from_char('x', Color::White, Color::Reset);
        assert_eq!(c.bg, Cell::BASE_BG);
    }
}
