//! Text drawn on top of the sky: hints, counters and credits.

use super::canvas::Rgb;
use crate::collab::Overlay;
use std::io::Write;

const TEXT_COLOR: Rgb = (255, 255, 255);
const DIM_COLOR: Rgb = (170, 170, 190);
const GOLD_COLOR: Rgb = (255, 210, 90);

/// Terminal overlay state. The effect renders it after each frame.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Hud {
    pub hint: Option<String>,
    pub clicks: u32,
    pub clicks_visible: bool,
    pub wishes_shown: usize,
    pub wishes_total: usize,
    pub credits: Option<(String, Option<String>)>,
}

impl Overlay for Hud {
    fn show_hint(&mut self, text: &str) {
        self.hint = Some(text.to_string());
    }

    fn hide_hint(&mut self) {
        self.hint = None;
    }

    fn set_click_count(&mut self, total: u32) {
        self.clicks = total;
    }

    fn reveal_click_count(&mut self) {
        self.clicks_visible = true;
    }

    fn set_wish_progress(&mut self, shown: usize, total: usize) {
        self.wishes_shown = shown;
        self.wishes_total = total;
    }

    fn show_credits(&mut self, text: &str, link: Option<&str>) {
        self.credits = Some((text.to_string(), link.map(str::to_string)));
    }
}

impl Hud {
    /// Writes the overlay for a `cols` x `rows` terminal into `out`.
    pub fn render(
        &self,
        out: &mut Vec<u8>,
        cols: usize,
        rows: usize,
        bg: Rgb,
        paused: bool,
    ) -> std::io::Result<()> {
        if cols == 0 || rows == 0 {
            return Ok(());
        }

        if self.clicks_visible {
            let counter = format!(" CLICKS {} ", self.clicks);
            put(out, 0, 0, &counter, TEXT_COLOR, bg, cols)?;
            if self.wishes_total > 0 {
                let progress = format!(" WISHES {}/{} ", self.wishes_shown, self.wishes_total);
                let col = cols.saturating_sub(progress.chars().count());
                put(out, 0, col, &progress, TEXT_COLOR, bg, cols)?;
            }
        }

        if let Some(hint) = &self.hint {
            put_centered(out, rows.saturating_sub(3), hint, DIM_COLOR, bg, cols)?;
        }

        if let Some((text, link)) = &self.credits {
            let row = rows * 4 / 5;
            put_centered(out, row, text, GOLD_COLOR, bg, cols)?;
            if let Some(link) = link {
                put_centered(out, row + 1, link, DIM_COLOR, bg, cols)?;
            }
        }

        if paused {
            put_centered(out, rows / 2, "PAUSED", TEXT_COLOR, bg, cols)?;
        }
        Ok(())
    }
}

fn put_centered(
    out: &mut Vec<u8>,
    row: usize,
    text: &str,
    fg: Rgb,
    bg: Rgb,
    cols: usize,
) -> std::io::Result<()> {
    let len = text.chars().count().min(cols);
    put(out, row, (cols - len) / 2, text, fg, bg, cols)
}

fn put(
    out: &mut Vec<u8>,
    row: usize,
    col: usize,
    text: &str,
    fg: Rgb,
    bg: Rgb,
    cols: usize,
) -> std::io::Result<()> {
    let room = cols.saturating_sub(col);
    if room == 0 {
        return Ok(());
    }
    write!(
        out,
        "\x1b[{};{}H\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m",
        row + 1,
        col + 1,
        fg.0,
        fg.1,
        fg.2,
        bg.0,
        bg.1,
        bg.2
    )?;
    // Newlines in hints become spaces; the overlay is one row per item.
    let line: String = text
        .chars()
        .map(|c| if c == '\n' { ' ' } else { c })
        .take(room)
        .collect();
    out.extend_from_slice(line.as_bytes());
    out.extend_from_slice(b"\x1b[0m");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(hud: &Hud, paused: bool) -> String {
        let mut out = Vec::new();
        hud.render(&mut out, 40, 12, (0, 0, 0), paused).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn counter_hidden_until_revealed() {
        let mut hud = Hud::default();
        hud.set_click_count(5);
        assert!(!rendered(&hud, false).contains("CLICKS"));

        hud.reveal_click_count();
        hud.set_click_count(6);
        assert!(rendered(&hud, false).contains("CLICKS 6"));
    }

    #[test]
    fn hint_comes_and_goes() {
        let mut hud = Hud::default();
        hud.show_hint("CLICK THE SKY");
        assert!(rendered(&hud, false).contains("CLICK THE SKY"));
        hud.hide_hint();
        assert_eq!(rendered(&hud, false), "");
    }

    #[test]
    fn credits_with_link() {
        let mut hud = Hud::default();
        hud.show_credits("THANKS", Some("example.org"));
        let text = rendered(&hud, true);
        assert!(text.contains("THANKS"));
        assert!(text.contains("example.org"));
        assert!(text.contains("PAUSED"));
    }

    #[test]
    fn long_text_is_clipped_to_width() {
        let mut hud = Hud::default();
        hud.show_hint(&"X".repeat(100));
        let text = rendered(&hud, false);
        assert_eq!(text.matches('X').count(), 40);
    }
}
