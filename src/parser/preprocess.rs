//! Line-break repair for pasted event text
//!
//! Browsers often collapse the line breaks of a copied calendar listing into
//! plain spaces. The passes below put them back at likely event boundaries
//! and push embedded HTML descriptions onto lines of their own. They run in
//! the order of [`PREPROCESS_PASSES`], each one over the previous output.
//! The heuristics are tuned for calendar exports and can over- or
//! under-split unusual input.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

/// Clock time ending in AM/PM, or the word "noon".
const TIME_TOKEN: &str = r"(?:\b\d{1,2}(?::\d{2})?[ \t]*(?i:[ap]\.?m\b\.?)|(?i:\bnoon\b))";

const BLOCK_TAGS: &str = r"(?:p|ul|ol|li|div|span|h[1-6])";

static TIME_THEN_NON_ASCII_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"({})[ \t]*([^\x00-\x7F])", TIME_TOKEN)).unwrap());

static TIME_THEN_CAPITAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"({})[ \t]+([A-Z])", TIME_TOKEN)).unwrap());

static YEAR_THEN_SPACES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})[ \t]{2,}").unwrap());

static BLOCK_OPEN_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"(?i)<{}\b[^>]*>", BLOCK_TAGS)).unwrap());

static TAG_END_THEN_NON_ASCII_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r">[ \t]+([^\x00-\x7F])").unwrap());

static BLOCK_CLOSE_THEN_TEXT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i:(</{}>))[ \t]+([A-Z0-9]|[^\x00-\x7F])", BLOCK_TAGS)).unwrap()
});

static CARRIAGE_RETURN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n?").unwrap());

/// One named rewrite step of the preprocessor.
#[derive(Debug, Clone, Copy)]
pub struct PreprocessPass {
    pub name: &'static str,
    pub apply: fn(&str) -> String,
}

/// Rewrite passes in the order they are applied.
pub const PREPROCESS_PASSES: [PreprocessPass; 7] = [
    PreprocessPass { name: "time-before-non-ascii", apply: break_after_time_before_non_ascii },
    PreprocessPass { name: "time-before-capital", apply: break_after_time_before_capital },
    PreprocessPass { name: "year-before-spaces", apply: break_after_year },
    PreprocessPass { name: "before-block-tag", apply: break_before_block_tags },
    PreprocessPass { name: "tag-end-before-non-ascii", apply: break_after_tag_before_non_ascii },
    PreprocessPass { name: "block-close-before-text", apply: break_after_block_close },
    PreprocessPass { name: "normalize-newlines", apply: normalize_newlines },
];

/// Reconstruct line breaks in pasted text by running every pass in order.
pub fn preprocess_event_text(text: &str) -> String {
    PREPROCESS_PASSES.iter().fold(text.to_string(), |current, pass| {
        let next = (pass.apply)(&current);
        if next != current {
            debug!("Preprocess pass '{}' rewrote the text", pass.name);
        }
        next
    })
}

/// `"... 4 PM 🎉 Party"` -> break before the emoji.
pub fn break_after_time_before_non_ascii(text: &str) -> String {
    TIME_THEN_NON_ASCII_RE.replace_all(text, "${1}\n${2}").into_owned()
}

/// `"... 4 PM Team Sync on ..."` -> break before the capitalized name.
pub fn break_after_time_before_capital(text: &str) -> String {
    TIME_THEN_CAPITAL_RE.replace_all(text, "${1}\n${2}").into_owned()
}

/// `"Jan 5, 2025   Next"` -> break after the year.
pub fn break_after_year(text: &str) -> String {
    YEAR_THEN_SPACES_RE.replace_all(text, "${1}\n").into_owned()
}

/// Put each opening block-level tag at the start of a line.
pub fn break_before_block_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut last = 0;
    for tag in BLOCK_OPEN_TAG_RE.find_iter(text) {
        out.push_str(&text[last..tag.start()]);
        if tag.start() > 0 && !text[..tag.start()].ends_with('\n') {
            out.push('\n');
        }
        out.push_str(tag.as_str());
        last = tag.end();
    }
    out.push_str(&text[last..]);
    out
}

/// `"</b> 🎉 Party"` -> break after the tag.
pub fn break_after_tag_before_non_ascii(text: &str) -> String {
    TAG_END_THEN_NON_ASCII_RE.replace_all(text, ">\n${1}").into_owned()
}

/// `"</p> Next on ..."` -> break after the closing block tag.
pub fn break_after_block_close(text: &str) -> String {
    BLOCK_CLOSE_THEN_TEXT_RE.replace_all(text, "${1}\n${2}").into_owned()
}

pub fn normalize_newlines(text: &str) -> String {
    CARRIAGE_RETURN_RE.replace_all(text, "\n").into_owned()
}
