//! Prompts displayed to the user to gather input.

use anyhow::Result;
use anyhow::bail;
use std::io::Write;
use std::io::stdin;
use std::io::stdout;
use termion::clear;
use termion::event::Event;
use termion::event::Key;
use termion::input::TermRead;
use termion::raw::IntoRawMode;
use vocab_srs::ReviewQuality;

/// Shows the card's back once any key is pressed.
pub fn reveal() -> Result<()> {
    read_key("Press any key to show answer", |_| Some(()), |out, _| {
        write!(out, "\r{}", clear::AfterCursor)
    })
}

/// Asks how well the answer was recalled. Keys 1 to 4 map to again, hard, good and easy.
pub fn grade() -> Result<ReviewQuality> {
    read_key(
        "[1] again  [2] hard  [3] good  [4] easy ",
        quality_for,
        |out, quality| write!(out, "{}\r\n", label(*quality)),
    )
}

/// Reads keys in raw mode until `select` accepts one. `q` and Ctrl-C abandon the session.
fn read_key<T>(
    prompt: &str,
    select: impl Fn(Key) -> Option<T>,
    done: impl Fn(&mut dyn Write, &T) -> std::io::Result<()>,
) -> Result<T> {
    let mut stdout = stdout().into_raw_mode()?;
    write!(stdout, "{prompt}")?;
    stdout.flush()?;

    for event in stdin().events() {
        let key = match event? {
            Event::Key(Key::Char('q')) | Event::Key(Key::Ctrl('c')) => {
                write!(stdout, "\r\n")?;
                stdout.flush()?;

                bail!("Session abandoned, nothing was saved")
            }
            Event::Key(key) => key,
            _ => continue,
        };

        if let Some(selection) = select(key) {
            done(&mut stdout, &selection)?;
            stdout.flush()?;

            return Ok(selection);
        }
    }

    bail!("Input closed before answering")
}

fn quality_for(key: Key) -> Option<ReviewQuality> {
    match key {
        Key::Char('1') => Some(ReviewQuality::Again),
        Key::Char('2') => Some(ReviewQuality::Hard),
        Key::Char('3') => Some(ReviewQuality::Good),
        Key::Char('4') => Some(ReviewQuality::Easy),
        _ => None,
    }
}

fn label(quality: ReviewQuality) -> &'static str {
    match quality {
        ReviewQuality::Again => "again",
        ReviewQuality::Hard => "hard",
        ReviewQuality::Good => "good",
        ReviewQuality::Easy => "easy",
    }
}
