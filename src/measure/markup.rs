//! Plain-text extraction from formatter markup.
//!
//! Formatters may return HTML fragments (`<span class="null">NULL</span>`,
//! links, badges). Measuring the markup source would count tags as glyphs, so
//! the text nodes are pulled out first, the way a browser's `textContent`
//! would read them.

use std::borrow::Cow;

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use crate::error::Result;

/// Concatenated text nodes of an HTML fragment.
///
/// The fragment is wrapped in a `<span>` so bare text and sibling elements
/// both parse. End tag names are not checked, so void elements such as
/// `<br>` don't fail the parse. Entities XML doesn't know are kept verbatim,
/// and a `<` that cannot open a tag (`a < b`) is text.
///
/// Like a browser, a malformed tail (an unterminated comment or tag) is
/// dropped and the text read up to that point is kept.
pub fn text_content(markup: &str) -> String {
    let wrapped = format!("<span>{}</span>", escape_stray_lt(markup));
    let mut text = String::new();
    if let Err(err) = read_text(&wrapped, &mut text) {
        debug!(%err, "malformed formatter markup, keeping text read so far");
    }
    text
}

fn read_text(wrapped: &str, text: &mut String) -> Result<()> {
    let mut reader = Reader::from_str(wrapped);
    reader.check_end_names(false);

    loop {
        match reader.read_event()? {
            Event::Text(e) => match e.unescape() {
                Ok(t) => text.push_str(&t),
                Err(_) => text.push_str(&String::from_utf8_lossy(&e)),
            },
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e)),
            Event::Eof => return Ok(()),
            _ => {}
        }
    }
}

/// HTML only opens a tag when `<` is followed by a letter, `/`, `!` or `?`.
/// Any other `<` is escaped so the XML reader keeps it as text.
fn escape_stray_lt(markup: &str) -> Cow<'_, str> {
    let opens_tag = |next: Option<char>| {
        next.is_some_and(|c| c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?'))
    };

    let mut chars = markup.chars().peekable();
    let mut escaped: Option<String> = None;
    let mut consumed = 0;
    while let Some(c) = chars.next() {
        if c == '<' && !opens_tag(chars.peek().copied()) {
            let out = escaped.get_or_insert_with(|| {
                let mut s = String::with_capacity(markup.len() + 8);
                s.push_str(markup.get(..consumed).unwrap_or_default());
                s
            });
            out.push_str("&lt;");
        } else if let Some(out) = escaped.as_mut() {
            out.push(c);
        }
        consumed += c.len_utf8();
    }

    match escaped {
        Some(s) => Cow::Owned(s),
        None => Cow::Borrowed(markup),
    }
}
