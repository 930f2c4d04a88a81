use crate::events::{CharState, TokenState};
use crate::session::{Session, TokenOutcome, SEPARATOR};

/// A raw key event, as opposed to a whole-buffer update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keystroke {
    Backspace,
    Separator,
    Char(char),
}

impl Keystroke {
    /// Map a key name (`"Backspace"`, `"Space"`, or a single character).
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "Backspace" | "Delete" => Some(Keystroke::Backspace),
            "Space" => Some(Keystroke::Separator),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(SEPARATOR), None) => Some(Keystroke::Separator),
                    (Some(c), None) if !c.is_control() => Some(Keystroke::Char(c)),
                    _ => None,
                }
            }
        }
    }
}

/// What a buffer update did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Committed,
    Buffered,
}

/// Number of characters `value` adds on top of the current buffer.
pub fn buffer_growth(previous: &str, value: &str) -> usize {
    value.chars().count().saturating_sub(previous.chars().count())
}

/// Positional comparison of a committed token against its target.
pub fn score_commit(target: &str, typed: &str) -> TokenOutcome {
    if typed == target {
        return TokenOutcome {
            target: target.to_string(),
            typed: typed.to_string(),
            // full credit includes the separator
            correct_count: target.chars().count() + 1,
            is_exact_match: true,
        };
    }

    let correct_count = target
        .chars()
        .zip(typed.chars())
        .filter(|(expected, actual)| expected == actual)
        .count();

    TokenOutcome {
        target: target.to_string(),
        typed: typed.to_string(),
        correct_count,
        is_exact_match: false,
    }
}

/// Apply a whole-buffer update for the active token.
///
/// A trailing separator commits the token. Characters are counted as typed
/// once, when they first enter the buffer; deletions never give them back.
pub fn apply_input(session: &mut Session, value: &str) -> Applied {
    match value.strip_suffix(SEPARATOR) {
        Some(typed) => {
            let typed_len = typed.chars().count();
            let already_counted = session.current_input.chars().count().min(typed_len);
            session.typed_chars += typed_len + 1 - already_counted;

            let outcome = score_commit(session.current_target(), typed);
            session.correct_chars += outcome.correct_count;
            session.token_history.push(outcome);

            session.current_index = (session.current_index + 1).min(session.words.len());
            session.current_input.clear();
            Applied::Committed
        }
        None => {
            session.typed_chars += buffer_growth(&session.current_input, value);
            session.current_input = value.to_string();
            Applied::Buffered
        }
    }
}

pub fn push_char(session: &mut Session, c: char) {
    session.current_input.push(c);
    session.typed_chars += 1;
}

/// Record an uncommitted buffer with no correctness credit.
pub fn abandon_input(session: &mut Session) -> Option<TokenOutcome> {
    if session.current_input.is_empty() {
        return None;
    }
    let outcome = TokenOutcome {
        target: session.current_target().to_string(),
        typed: std::mem::take(&mut session.current_input),
        correct_count: 0,
        is_exact_match: false,
    };
    session.token_history.push(outcome.clone());
    Some(outcome)
}

pub fn token_state(target: &str, typed: &str) -> TokenState {
    let target_chars: Vec<char> = target.chars().collect();
    let typed_chars: Vec<char> = typed.chars().collect();
    let width = target_chars.len().max(typed_chars.len());

    let per_char = (0..width)
        .map(|idx| match (target_chars.get(idx), typed_chars.get(idx)) {
            (Some(expected), Some(actual)) if expected == actual => CharState::Correct,
            (Some(_), Some(_)) => CharState::Incorrect,
            (None, Some(_)) => CharState::Extra,
            _ => CharState::Pending,
        })
        .collect();

    TokenState {
        target: target.to_string(),
        typed: typed.to_string(),
        per_char,
        is_complete: typed == target,
    }
}
