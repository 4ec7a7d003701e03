//! Selector expressions for locating page elements
//!
//! Scenarios address elements with one of four forms:
//!
//! - a plain CSS selector: `#confirmation-confirm`, `form button.submit`
//! - a text selector: `text=my lovely index` (innermost visible elements
//!   whose text contains the string)
//! - a CSS selector with a substring text filter:
//!   `button:has-text("Add new index")`
//! - a CSS selector with an exact text filter: `button:text-is("Edit")`
//!
//! Resolution is strict: a selector must match exactly one element.
//! Matching zero elements and matching several are distinct failures
//! (`ElementNotFound` vs `AmbiguousSelector`); there is no first-match
//! fallback. The exact form exists precisely for pages where a substring
//! filter would be ambiguous ("Edit" vs "Edit index values").

use std::fmt;
use std::str::FromStr;

use crate::common::{Error, Result};

/// Attribute used to mark the resolved element so it can be retrieved
/// with a plain CSS query afterwards.
pub const MARK_ATTR: &str = "data-uitest-match";

/// A parsed selector expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Plain CSS selector
    Css(String),
    /// Innermost visible elements whose text contains the string
    Text(String),
    /// CSS selector filtered by element text
    CssWithText {
        css: String,
        text: String,
        /// Exact trimmed-text equality instead of substring containment
        exact: bool,
    },
}

impl Selector {
    /// Parse a selector expression from its scenario-file form
    pub fn parse(raw: &str) -> Result<Selector> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(Error::InvalidSelector(raw.to_string()));
        }

        if let Some(text) = raw.strip_prefix("text=") {
            if text.is_empty() {
                return Err(Error::InvalidSelector(raw.to_string()));
            }
            return Ok(Selector::Text(text.to_string()));
        }

        for (marker, exact) in [(":has-text(", false), (":text-is(", true)] {
            if let Some(idx) = raw.rfind(marker) {
                let css = &raw[..idx];
                let arg = &raw[idx + marker.len()..];
                let arg = arg
                    .strip_suffix(')')
                    .ok_or_else(|| Error::InvalidSelector(raw.to_string()))?;
                let text = strip_quotes(arg)
                    .ok_or_else(|| Error::InvalidSelector(raw.to_string()))?;
                if css.is_empty() || text.is_empty() {
                    return Err(Error::InvalidSelector(raw.to_string()));
                }
                return Ok(Selector::CssWithText {
                    css: css.to_string(),
                    text: text.to_string(),
                    exact,
                });
            }
        }

        Ok(Selector::Css(raw.to_string()))
    }

    /// Build the JavaScript expression that marks the unique match
    ///
    /// The script clears any previous marks, collects visible candidates,
    /// applies the text filter (keeping only innermost matches for
    /// substring filters, since every ancestor of a text match also
    /// contains the text), marks the element when exactly one candidate
    /// remains, and returns the match count. An invalid CSS expression
    /// returns -1.
    pub fn resolution_js(&self) -> String {
        let (css, text, exact) = match self {
            Selector::Css(css) => (Some(css.as_str()), None, false),
            Selector::Text(text) => (None, Some(text.as_str()), false),
            Selector::CssWithText { css, text, exact } => {
                (Some(css.as_str()), Some(text.as_str()), *exact)
            }
        };

        // serde_json produces valid JS string literals, including quotes
        // and control characters inside selector text.
        let css_lit = css
            .map(|s| serde_json::to_string(s).unwrap_or_else(|_| "null".into()))
            .unwrap_or_else(|| "null".into());
        let text_lit = text
            .map(|s| serde_json::to_string(s).unwrap_or_else(|_| "null".into()))
            .unwrap_or_else(|| "null".into());

        format!(
            r#"(() => {{
    const css = {css_lit};
    const text = {text_lit};
    const exact = {exact};
    for (const n of document.querySelectorAll('[{mark}]')) {{
        n.removeAttribute('{mark}');
    }}
    let nodes;
    try {{
        nodes = Array.from(document.querySelectorAll(css || '*'));
    }} catch (e) {{
        return -1;
    }}
    nodes = nodes.filter(n => n.getClientRects().length > 0);
    if (text !== null) {{
        if (exact) {{
            nodes = nodes.filter(n => (n.innerText || '').trim() === text);
        }} else {{
            nodes = nodes.filter(n => (n.innerText || '').includes(text));
            nodes = nodes.filter(n => !nodes.some(m => m !== n && n.contains(m)));
        }}
    }}
    if (nodes.length === 1) {{
        nodes[0].setAttribute('{mark}', '');
    }}
    return nodes.length;
}})()"#,
            css_lit = css_lit,
            text_lit = text_lit,
            exact = exact,
            mark = MARK_ATTR,
        )
    }

    /// CSS query for the element marked by [`Selector::resolution_js`]
    pub fn marked_query() -> String {
        format!("[{}]", MARK_ATTR)
    }
}

fn strip_quotes(s: &str) -> Option<&str> {
    let s = s.trim();
    if s.len() >= 2 {
        let bytes = s.as_bytes();
        if (bytes[0] == b'"' && bytes[s.len() - 1] == b'"')
            || (bytes[0] == b'\'' && bytes[s.len() - 1] == b'\'')
        {
            return Some(&s[1..s.len() - 1]);
        }
    }
    None
}

impl FromStr for Selector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Selector::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Css(css) => write!(f, "{}", css),
            Selector::Text(text) => write!(f, "text={}", text),
            Selector::CssWithText {
                css,
                text,
                exact: false,
            } => write!(f, "{}:has-text(\"{}\")", css, text),
            Selector::CssWithText {
                css,
                text,
                exact: true,
            } => write!(f, "{}:text-is(\"{}\")", css, text),
        }
    }
}
