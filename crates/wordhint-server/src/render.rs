//! HTML rendering for the landing and game pages
//!
//! Pages are written straight into a `String`. All dynamic text goes through
//! [`escape`].

use crate::error::RenderError;
use std::fmt::Write;
use wordhint_core::GameView;

/// Landing page content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPage {
    pub title: String,
    pub business_name: String,
    pub slogan: String,
}

impl Default for IndexPage {
    fn default() -> Self {
        Self {
            title: "Word Guessing Game".to_string(),
            business_name: "Welcome to the Word Guessing Game!".to_string(),
            slogan: "Test your vocabulary and have fun!".to_string(),
        }
    }
}

/// Escape text for use in HTML element content and quoted attributes
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn open_document(out: &mut String, title: &str) -> std::fmt::Result {
    write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<link rel=\"stylesheet\" href=\"/public/style.css\">\n\
         </head>\n<body>\n<main>\n",
        escape(title)
    )
}

fn close_document(out: &mut String) -> std::fmt::Result {
    out.write_str("</main>\n</body>\n</html>\n")
}

fn write_list(out: &mut String, class: &str, items: &[String]) -> std::fmt::Result {
    writeln!(out, "<ol class=\"{class}\">")?;
    for item in items {
        writeln!(out, "<li>{}</li>", escape(item))?;
    }
    writeln!(out, "</ol>")
}

/// Render the landing page
///
/// # Errors
/// Returns `RenderError` if writing the page fails.
pub fn index_page(page: &IndexPage) -> Result<String, RenderError> {
    let mut out = String::new();
    open_document(&mut out, &page.title)?;
    writeln!(out, "<h1>{}</h1>", escape(&page.business_name))?;
    writeln!(out, "<p class=\"slogan\">{}</p>", escape(&page.slogan))?;
    writeln!(out, "<a class=\"button\" href=\"/game\">Start playing</a>")?;
    close_document(&mut out)?;
    Ok(out)
}

/// Render the game page for a session view
///
/// # Errors
/// Returns `RenderError` if writing the page fails.
pub fn game_page(view: &GameView) -> Result<String, RenderError> {
    let mut out = String::new();
    open_document(&mut out, &view.title)?;
    writeln!(out, "<h1>{}</h1>", escape(&view.title))?;

    writeln!(
        out,
        "<p class=\"current-hint\">Hint #{}: <strong>{}</strong></p>",
        view.all_hints.len(),
        escape(&view.current_hint)
    )?;

    writeln!(out, "<section class=\"hints\">\n<h2>Hints so far</h2>")?;
    write_list(&mut out, "hint-list", &view.all_hints)?;
    if !view.extra_hints.is_empty() {
        write_list(&mut out, "extra-hints", &view.extra_hints)?;
    }
    writeln!(out, "</section>")?;

    writeln!(
        out,
        "<p class=\"attempts\">Attempts: {} / {}</p>",
        view.attempts, view.max_attempts
    )?;
    if !view.guesses.is_empty() {
        writeln!(out, "<section class=\"guesses\">\n<h2>Your guesses</h2>")?;
        write_list(&mut out, "guess-list", &view.guesses)?;
        writeln!(out, "</section>")?;
    }

    if let Some(keyword) = view.keyword.as_deref().filter(|_| view.won) {
        writeln!(
            out,
            "<p class=\"result won\">Congratulations! The word was <strong>{}</strong>.</p>",
            escape(keyword)
        )?;
    } else if view.exhausted {
        writeln!(out, "<p class=\"result lost\">Out of attempts. Better luck next time!</p>")?;
    }

    if view.accepts_guesses() {
        writeln!(
            out,
            "<form method=\"post\" action=\"/game\">\n\
             <label for=\"guess\">Your guess ({} left)</label>\n\
             <input id=\"guess\" name=\"guess\" type=\"text\" autocomplete=\"off\" required autofocus>\n\
             <button type=\"submit\">Guess</button>\n</form>",
            view.attempts_remaining
        )?;
    } else {
        writeln!(out, "<a class=\"button\" href=\"/game\">Play again</a>")?;
    }

    close_document(&mut out)?;
    Ok(out)
}
