//! Sentence-aware text chunking.
//!
//! Long inputs are split into bounded chunks before being handed to the
//! translator. Splitting happens on sentence boundaries so no sentence is
//! ever broken mid-way; texts with no sentence-terminal punctuation fall
//! back to whitespace boundaries. The units form an exact partition of the
//! input, so concatenating the produced chunks reproduces it byte-for-byte.

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Partition `text` into sentence-like units. A unit ends after a run of
/// terminal punctuation plus any whitespace that follows it. Any remainder
/// with no terminal punctuation — the whole text, or a tail after the last
/// sentence — falls back to whitespace-delimited runs, each keeping its
/// trailing whitespace (leading whitespace stays with the first unit).
fn split_units(text: &str) -> Vec<&str> {
    let mut units = Vec::new();
    if text.is_empty() {
        return units;
    }

    let mut start = 0;
    let mut iter = text.char_indices().peekable();
    while let Some((_, c)) = iter.next() {
        if !is_terminal(c) {
            continue;
        }
        while let Some(&(_, next)) = iter.peek() {
            if is_terminal(next) {
                iter.next();
            } else {
                break;
            }
        }
        while let Some(&(_, next)) = iter.peek() {
            if next.is_whitespace() {
                iter.next();
            } else {
                break;
            }
        }
        let end = iter.peek().map_or(text.len(), |&(j, _)| j);
        units.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        push_word_units(&text[start..], &mut units);
    }
    units
}

/// Append whitespace-delimited units covering all of `text`, which contains
/// no terminal punctuation.
fn push_word_units<'a>(text: &'a str, units: &mut Vec<&'a str>) {
    let mut start = 0;
    let mut after_gap = false;
    let mut seen_word = false;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            after_gap = seen_word;
        } else {
            if after_gap {
                units.push(&text[start..i]);
                start = i;
                after_gap = false;
            }
            seen_word = true;
        }
    }
    if start < text.len() {
        units.push(&text[start..]);
    }
}

/// Split `text` into chunks of at most `max_chunk_chars` characters by
/// greedily accumulating consecutive units. A single unit longer than the
/// limit is emitted whole as its own oversized chunk rather than truncated.
pub fn split_text_into_chunks(text: &str, max_chunk_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0;

    for unit in split_units(text) {
        let unit_chars = unit.chars().count();
        if current_chars > 0 && current_chars + unit_chars > max_chunk_chars {
            chunks.push(std::mem::take(&mut current));
            current_chars = 0;
        }
        current.push_str(unit);
        current_chars += unit_chars;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
