//! Terminal implementations of the presenter and chime seams.

use std::io::Write;

use colored::{Color, Colorize};
use metronomo_core::{BeatColor, BeatEvent, BeatPresenter, Chime};

fn display_color(color: BeatColor) -> Color {
    let [r, g, b, _] = color.rgba();
    Color::TrueColor {
        r: (r * 255.0) as u8,
        g: (g * 255.0) as u8,
        b: (b * 255.0) as u8,
    }
}

/// Prints one line per beat; breath beats render with the neutral style
/// and a "respiro" label instead of a numbered color.
pub struct TerminalPresenter {
    json: bool,
}

impl TerminalPresenter {
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

impl BeatPresenter for TerminalPresenter {
    fn show(&mut self, beat: &BeatEvent) {
        if self.json {
            if let Ok(line) = serde_json::to_string(beat) {
                println!("{line}");
            }
            return;
        }
        let label = if beat.is_breath {
            "respiro".to_string()
        } else {
            beat.beat.to_string()
        };
        let color = display_color(BeatColor::for_event(beat));
        println!(
            "{:>8}  cycle {}/{}  {:.1}s",
            label.color(color).bold(),
            beat.cycle,
            beat.total_cycles,
            beat.interval_secs
        );
    }

    fn dismiss(&mut self) {
        // Line-oriented output; the next line naturally replaces the
        // previous beat.
    }
}

/// Audible cue via the terminal bell. Writing is best-effort; a console
/// without a bell simply stays quiet.
pub struct BellChime;

impl Chime for BellChime {
    fn play(&self) {
        let mut out = std::io::stdout();
        let _ = out.write_all(b"\x07");
        let _ = out.flush();
    }
}
