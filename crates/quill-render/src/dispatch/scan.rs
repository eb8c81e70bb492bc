//! Span recognition inside plain text runs.
//!
//! The parser has no notion of `==highlight==`, `"quote"` or bare URLs, so the
//! dispatcher splits text runs itself when those extensions are on. Highlight
//! and quote delimiters are only reported here; pairing them up happens in the
//! dispatcher, since the content between them may hold other constructs.

use std::borrow::Cow;

use crate::extensions::Extensions;

/// Delimiter of a span the dispatcher pairs up across events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Delimiter {
    Highlight,
    Quote,
}

impl Delimiter {
    pub(super) fn marker(self) -> &'static str {
        match self {
            Self::Highlight => "==",
            Self::Quote => "\"",
        }
    }
}

/// A piece of a text run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum Segment<'t> {
    Text(&'t str),
    /// A delimiter at byte offset `at` that may open and/or close a span.
    Marker {
        delimiter: Delimiter,
        at: usize,
        opens: bool,
        closes: bool,
    },
    Url { link: Cow<'t, str>, raw: &'t str },
}

const URL_PREFIXES: [&str; 3] = ["http://", "https://", "www."];

/// Split `text` into plain runs, delimiters and bare URLs.
pub(super) fn segments(text: &str, extensions: Extensions) -> Vec<Segment<'_>> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut plain_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let (found, end) = if extensions.contains(Extensions::HIGHLIGHT) && bytes[i] == b'=' {
            let run = bytes[i..].iter().take_while(|&&b| b == b'=').count();
            (highlight_at(text, i, run), i + run)
        } else if extensions.contains(Extensions::QUOTE) && bytes[i] == b'"' {
            let marker = Segment::Marker {
                delimiter: Delimiter::Quote,
                at: i,
                opens: true,
                closes: true,
            };
            (Some(marker), i + 1)
        } else if extensions.contains(Extensions::AUTOLINK) && at_word_start(bytes, i) {
            match url_at(text, i) {
                Some((segment, end)) => (Some(segment), end),
                None => (None, i + 1),
            }
        } else {
            (None, i + 1)
        };

        if let Some(segment) = found {
            if plain_start < i {
                out.push(Segment::Text(&text[plain_start..i]));
            }
            out.push(segment);
            plain_start = end;
        }
        i = end;
    }
    if plain_start < bytes.len() {
        out.push(Segment::Text(&text[plain_start..]));
    }
    out
}

// Every delimiter is ASCII, so every index sliced below is a char boundary.

/// A run of exactly two `=` opens when followed by non-whitespace and closes
/// when preceded by it. Run edges count as non-whitespace: the neighbour is
/// another construct.
fn highlight_at(text: &str, start: usize, run: usize) -> Option<Segment<'static>> {
    if run != 2 {
        return None;
    }
    let opens = text[start + 2..].chars().next().is_none_or(|c| !c.is_whitespace());
    let closes = text[..start].chars().next_back().is_none_or(|c| !c.is_whitespace());
    (opens || closes).then_some(Segment::Marker {
        delimiter: Delimiter::Highlight,
        at: start,
        opens,
        closes,
    })
}

fn at_word_start(bytes: &[u8], i: usize) -> bool {
    i == 0 || bytes[i - 1].is_ascii_whitespace() || bytes[i - 1] == b'('
}

fn url_at(text: &str, start: usize) -> Option<(Segment<'_>, usize)> {
    let rest = &text[start..];
    let prefix = URL_PREFIXES.iter().find(|prefix| rest.starts_with(**prefix))?;
    let len = rest
        .find(|c: char| c.is_whitespace() || c == '<')
        .unwrap_or(rest.len());
    let raw = rest[..len].trim_end_matches(['.', ',', ':', ';', '!', '?', '"', '\'', ')']);
    if raw.len() <= prefix.len() {
        return None;
    }
    let link = if *prefix == "www." {
        Cow::Owned(format!("http://{raw}"))
    } else {
        Cow::Borrowed(raw)
    };
    Some((Segment::Url { link, raw }, start + raw.len()))
}
