//! Text styling shared by the table and viewport widgets.
//!
//! JSON lines are split into tokens once when content is set; styles are
//! applied at render time so the theme never has to be stored with the text.

use std::ops::Range;

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::Theme;
use crate::search::match_ranges;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Key,
    String,
    Number,
    Bool,
    Null,
    Punctuation,
    Plain,
}

impl TokenKind {
    fn style(self, theme: &Theme) -> Style {
        let fg = match self {
            Self::Key => theme.json_key(),
            Self::String => theme.json_string(),
            Self::Number => theme.json_number(),
            Self::Bool => theme.json_bool(),
            Self::Null => theme.json_null(),
            Self::Punctuation => theme.json_punctuation(),
            Self::Plain => theme.text(),
        };
        let style = Style::default().fg(fg);
        if self == Self::Null {
            style.add_modifier(Modifier::ITALIC)
        } else {
            style
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub range: Range<usize>,
    pub kind: TokenKind,
}

/// Byte index just past the string literal opening at `start`.
fn string_end(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn followed_by_colon(bytes: &[u8], from: usize) -> bool {
    bytes[from..]
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b':')
}

/// Split one line of pretty printed JSON into styled tokens covering the
/// whole line.
pub fn tokenize_json_line(line: &str) -> Vec<Token> {
    let bytes = line.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let start = i;
        let kind = match bytes[i] {
            b'"' => {
                i = string_end(bytes, i).min(bytes.len());
                if followed_by_colon(bytes, i) {
                    TokenKind::Key
                } else {
                    TokenKind::String
                }
            }
            b'-' | b'0'..=b'9' => {
                i += 1;
                while i < bytes.len() && matches!(bytes[i], b'0'..=b'9' | b'.' | b'e' | b'E' | b'+' | b'-') {
                    i += 1;
                }
                TokenKind::Number
            }
            b't' if line[i..].starts_with("true") => {
                i += 4;
                TokenKind::Bool
            }
            b'f' if line[i..].starts_with("false") => {
                i += 5;
                TokenKind::Bool
            }
            b'n' if line[i..].starts_with("null") => {
                i += 4;
                TokenKind::Null
            }
            b'{' | b'}' | b'[' | b']' | b',' | b':' => {
                i += 1;
                TokenKind::Punctuation
            }
            _ => {
                i += 1;
                while i < bytes.len() && !line.is_char_boundary(i) {
                    i += 1;
                }
                TokenKind::Plain
            }
        };

        match tokens.last_mut() {
            Some(Token { range, kind: last }) if *last == kind && range.end == start => range.end = i,
            _ => tokens.push(Token { range: start..i, kind }),
        }
    }
    tokens
}

/// Build a line from styled segments, laying `match_style` over every search
/// hit. Hits may straddle segment boundaries.
fn overlay_matches(text: &str, segments: &[(Range<usize>, Style)], query: &str, match_style: Style) -> Line<'static> {
    let hits = match_ranges(text, query);
    if hits.is_empty() {
        return Line::from(
            segments
                .iter()
                .map(|(range, style)| Span::styled(text[range.clone()].to_string(), *style))
                .collect::<Vec<_>>(),
        );
    }

    let mut cuts: Vec<usize> = segments
        .iter()
        .flat_map(|(r, _)| [r.start, r.end])
        .chain(hits.iter().flat_map(|&(s, e)| [s, e]))
        .collect();
    cuts.sort_unstable();
    cuts.dedup();

    let mut spans = Vec::new();
    for pair in cuts.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let base = segments
            .iter()
            .find(|(r, _)| r.start <= start && end <= r.end)
            .map_or_else(Style::default, |(_, s)| *s);
        let style = if hits.iter().any(|&(s, e)| s <= start && end <= e) {
            base.patch(match_style)
        } else {
            base
        };
        spans.push(Span::styled(text[start..end].to_string(), style));
    }
    Line::from(spans)
}

/// A plain cell or line with search hits highlighted.
pub fn search_line(text: &str, query: &str, style: Style, theme: &Theme) -> Line<'static> {
    overlay_matches(text, &[(0..text.len(), style)], query, theme.search_match())
}

/// A tokenized JSON line with search hits highlighted.
pub fn json_line(text: &str, tokens: &[Token], query: &str, theme: &Theme) -> Line<'static> {
    let segments: Vec<(Range<usize>, Style)> = tokens
        .iter()
        .map(|t| (t.range.clone(), t.kind.style(theme)))
        .collect();
    overlay_matches(text, &segments, query, theme.search_match())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(line: &str) -> Vec<(String, TokenKind)> {
        tokenize_json_line(line)
            .into_iter()
            .filter(|t| !line[t.range.clone()].trim().is_empty())
            .map(|t| (line[t.range].to_string(), t.kind))
            .collect()
    }

    #[test]
    fn test_key_and_string_value() {
        assert_eq!(
            kinds(r#"  "InstanceId": "i-bp1","#),
            vec![
                (r#""InstanceId""#.to_string(), TokenKind::Key),
                (":".to_string(), TokenKind::Punctuation),
                (r#""i-bp1""#.to_string(), TokenKind::String),
                (",".to_string(), TokenKind::Punctuation),
            ]
        );
    }

    #[test]
    fn test_scalars() {
        let found = kinds(r#""a": -1.5e3, "b": true, "c": null"#);
        assert!(found.contains(&("-1.5e3".to_string(), TokenKind::Number)));
        assert!(found.contains(&("true".to_string(), TokenKind::Bool)));
        assert!(found.contains(&("null".to_string(), TokenKind::Null)));
    }

    #[test]
    fn test_escaped_quote_stays_in_string() {
        let line = r#""msg": "say \"hi\"""#;
        let found = kinds(line);
        assert_eq!(found.last().unwrap(), &(r#""say \"hi\"""#.to_string(), TokenKind::String));
    }

    #[test]
    fn test_tokens_cover_whole_line() {
        let line = r#"    "名前": "値","#;
        let tokens = tokenize_json_line(line);
        assert_eq!(tokens.first().unwrap().range.start, 0);
        assert_eq!(tokens.last().unwrap().range.end, line.len());
        for pair in tokens.windows(2) {
            assert_eq!(pair[0].range.end, pair[1].range.start);
        }
    }

    #[test]
    fn test_search_hit_spanning_tokens_is_split() {
        let theme = Theme::default();
        let line = r#""ip": "10.0.0.1""#;
        let tokens = tokenize_json_line(line);
        let rendered = json_line(line, &tokens, "\": \"10", &theme);
        let text: String = rendered.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, line);
        let highlighted: String = rendered
            .spans
            .iter()
            .filter(|s| s.style.bg == theme.search_match().bg)
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(highlighted, "\": \"10");
    }

    #[test]
    fn test_search_line_without_query_is_one_span() {
        let theme = Theme::default();
        let line = search_line("web-01", "", Style::default(), &theme);
        assert_eq!(line.spans.len(), 1);
    }
}
