//! The grammar of the CSV reader, as data.
//!
//! Each [`State`] owns an ordered list of [`Transition`]s. The reader fetches
//! one byte, scans the list of its current state, applies the [`Action`] of the
//! first entry whose [`Match`] succeeds and moves to the entry's next state. An
//! entry matching on [`Match::None`] is a lambda transition: it consumes no
//! input and the same byte is tested again against the next state.

use std::fmt;

/// States of the parsing automaton.
///
/// The declaration order matters: the reader drives the automaton until the
/// current state reaches or passes a requested stopping point, so
/// `EndField < EndLine < EndFile`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum State {
    /// Beginning of a field.
    Start,
    /// Inside an unquoted field.
    Field,
    /// Inside a quoted field.
    Quoted,
    /// A quote was read inside a quoted field: either an escaped quote or the
    /// closing one.
    DoubleQuote,
    /// A separator ended a field.
    EndField,
    /// A line terminator ended a record.
    EndLine,
    /// End of stream. Absorbing.
    EndFile,
}

/// Conditions tested against the current byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match {
    /// Always matches and consumes nothing.
    None,
    /// End of stream.
    Eof,
    /// The configured separator.
    Separator,
    /// CR, CR LF or LF. A CR LF pair is a single event.
    LineFeed,
    /// The configured quote.
    Quote,
    /// Any byte.
    Any,
}

/// Side effects of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    /// Move the field being built to the pending fields.
    SaveField,
    /// Save the field, then move all pending fields into a new record.
    SaveLine,
    /// Append the current byte to the field being built.
    AppendToField,
    /// Append the current line terminator, both bytes of a CR LF pair
    /// included, to the field being built.
    AppendLineFeedToField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub on: Match,
    pub next: State,
    pub action: Action,
}

const fn on(on: Match, next: State, action: Action) -> Transition {
    Transition { on, next, action }
}

static START: [Transition; 5] = [
    on(Match::Separator, State::EndField, Action::SaveField),
    on(Match::LineFeed, State::EndLine, Action::SaveLine),
    on(Match::Quote, State::Quoted, Action::None),
    on(Match::Eof, State::EndFile, Action::SaveLine),
    on(Match::Any, State::Field, Action::AppendToField),
];

static FIELD: [Transition; 4] = [
    on(Match::Separator, State::EndField, Action::SaveField),
    on(Match::LineFeed, State::EndLine, Action::SaveLine),
    on(Match::Eof, State::EndFile, Action::SaveLine),
    on(Match::Any, State::Field, Action::AppendToField),
];

static QUOTED: [Transition; 4] = [
    on(Match::Quote, State::DoubleQuote, Action::None),
    on(Match::LineFeed, State::Quoted, Action::AppendLineFeedToField),
    on(Match::Eof, State::EndFile, Action::SaveLine),
    on(Match::Any, State::Quoted, Action::AppendToField),
];

// No catch-all: anything but these four after a closing quote is an error.
static DOUBLE_QUOTE: [Transition; 4] = [
    on(Match::Quote, State::Quoted, Action::AppendToField),
    on(Match::Separator, State::EndField, Action::SaveField),
    on(Match::LineFeed, State::EndLine, Action::SaveLine),
    on(Match::Eof, State::EndFile, Action::SaveLine),
];

static END_FIELD: [Transition; 1] = [on(Match::None, State::Start, Action::None)];

// A stream ending right after a line terminator holds no further record.
static END_LINE: [Transition; 2] = [
    on(Match::Eof, State::EndFile, Action::None),
    on(Match::None, State::Start, Action::None),
];

static END_FILE: [Transition; 0] = [];

static TABLE: [&[Transition]; 7] = [
    &START,
    &FIELD,
    &QUOTED,
    &DOUBLE_QUOTE,
    &END_FIELD,
    &END_LINE,
    &END_FILE,
];

impl State {
    /// The ordered transitions leaving this state.
    pub fn transitions(self) -> &'static [Transition] {
        TABLE[self as usize]
    }

    /// Whether the automaton is at a record boundary.
    pub fn is_record_end(self) -> bool {
        matches!(self, State::EndLine | State::EndFile)
    }

    pub fn name(self) -> &'static str {
        match self {
            State::Start => "Start",
            State::Field => "Field",
            State::Quoted => "Quoted",
            State::DoubleQuote => "DoubleQuote",
            State::EndField => "EndField",
            State::EndLine => "EndLine",
            State::EndFile => "EndFile",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
