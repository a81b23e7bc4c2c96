//! Inline pass: left-to-right delimiter scanning.
//!
//! The scanner walks a block's raw text once. At each delimiter-capable
//! character it looks ahead for the matching closer (innermost/most-recent
//! open wins by construction: the content between opener and closer is
//! parsed recursively). Unmatched delimiters degrade to literal text, so
//! the pass is total.
//!
//! Code spans bind tightest: closer searches jump over them, and their
//! content is taken verbatim.

use crate::ast::inline::{strip_linebreaks, Inline};
use crate::parser::ParseOptions;
use url::Url;

/// Tokenize a block's raw text into inline nodes.
pub(crate) fn parse_inlines(text: &str, options: &ParseOptions) -> Vec<Inline> {
    InlineParser::new(text, options).run()
}

struct InlineParser<'a> {
    chars: Vec<char>,
    pos: usize,
    options: &'a ParseOptions,
    out: Vec<Inline>,
    text: String,
}

impl<'a> InlineParser<'a> {
    fn new(text: &str, options: &'a ParseOptions) -> Self {
        InlineParser {
            chars: text.chars().collect(),
            pos: 0,
            options,
            out: Vec::new(),
            text: String::new(),
        }
    }

    fn run(mut self) -> Vec<Inline> {
        while self.pos < self.chars.len() {
            let ch = self.chars[self.pos];
            match ch {
                '\\' => self.scan_escape(),
                '`' => self.scan_code_span(),
                '!' => self.scan_image(),
                '[' => {
                    if !self.scan_link(false) {
                        self.literal('[');
                    }
                }
                '<' => self.scan_angle(),
                '*' | '_' => self.scan_emphasis(ch),
                '~' => self.scan_pair('~'),
                '=' => self.scan_pair('='),
                '|' => self.scan_pair('|'),
                '$' => self.scan_latex(),
                ':' => self.scan_emoji(),
                '\n' => self.scan_newline(),
                _ => {
                    if !self.scan_bare_url() {
                        self.literal(ch);
                    }
                }
            }
        }
        // Trailing spaces on the last line carry no meaning.
        while self.text.ends_with(' ') {
            self.text.pop();
        }
        self.flush();
        self.out
    }

    fn literal(&mut self, ch: char) {
        self.text.push(ch);
        self.pos += 1;
    }

    fn flush(&mut self) {
        if !self.text.is_empty() {
            self.out.push(Inline::Text(std::mem::take(&mut self.text)));
        }
    }

    fn rest_starts_with(&self, needle: &str) -> bool {
        needle
            .chars()
            .enumerate()
            .all(|(offset, ch)| self.chars.get(self.pos + offset) == Some(&ch))
    }

    fn run_len(&self, ch: char) -> usize {
        self.chars[self.pos..]
            .iter()
            .take_while(|&&c| c == ch)
            .count()
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }

    fn parse_range(&self, start: usize, end: usize) -> Vec<Inline> {
        parse_inlines(&self.slice(start, end), self.options)
    }

    /// Backslash before ASCII punctuation emits the punctuation literally.
    fn scan_escape(&mut self) {
        match self.chars.get(self.pos + 1) {
            Some(&next) if next.is_ascii_punctuation() => {
                self.text.push(next);
                self.pos += 2;
            }
            _ => self.literal('\\'),
        }
    }

    /// Backtick run; content is verbatim up to a run of the same length.
    /// One space is stripped from each side when both sides have one, so
    /// `` ` `` can be quoted as a span.
    fn scan_code_span(&mut self) {
        let fence = self.run_len('`');
        match self.find_code_close(fence) {
            Some(close) => {
                let mut content = self.slice(self.pos + fence, close);
                if content.starts_with(' ')
                    && content.ends_with(' ')
                    && content.trim() != ""
                    && content.len() > 1
                {
                    content = content[1..content.len() - 1].to_string();
                }
                self.flush();
                self.out.push(Inline::Code(content));
                self.pos = close + fence;
            }
            None => {
                for _ in 0..fence {
                    self.text.push('`');
                }
                self.pos += fence;
            }
        }
    }

    fn find_code_close(&self, fence: usize) -> Option<usize> {
        let mut i = self.pos + fence;
        while i < self.chars.len() {
            if self.chars[i] == '`' {
                let run = self.chars[i..].iter().take_while(|&&c| c == '`').count();
                if run == fence {
                    return Some(i);
                }
                i += run;
            } else {
                i += 1;
            }
        }
        None
    }

    /// `![...]` image; a lone `!` is literal.
    fn scan_image(&mut self) {
        if self.chars.get(self.pos + 1) == Some(&'[') {
            self.pos += 1;
            if self.scan_link(true) {
                return;
            }
            self.pos -= 1;
        }
        self.literal('!');
    }

    /// `[text](url "title")`, `[text][ref]` or `[ref][]`. Returns false
    /// (position unchanged) when the construct does not complete.
    fn scan_link(&mut self, image: bool) -> bool {
        let open = self.pos;
        let Some(close_bracket) = self.find_bracket_close(open) else {
            return false;
        };
        let after = close_bracket + 1;

        match self.chars.get(after).copied() {
            Some('(') => {
                let Some((url, tooltip, end)) = self.scan_link_destination(after) else {
                    return false;
                };
                let content = self.parse_range(open + 1, close_bracket);
                self.flush();
                self.out.push(if image {
                    Inline::image(&url, content, tooltip, "")
                } else {
                    Inline::link(&url, content, tooltip, "")
                });
                self.pos = end;
                true
            }
            Some('[') => {
                let mut i = after + 1;
                while i < self.chars.len() && self.chars[i] != ']' && self.chars[i] != '[' {
                    i += 1;
                }
                if self.chars.get(i) != Some(&']') {
                    return false;
                }
                let content = self.parse_range(open + 1, close_bracket);
                let named = self.slice(after + 1, i);
                let ref_name = if named.trim().is_empty() {
                    crate::ast::inline::plain_text(&content)
                } else {
                    named.trim().to_string()
                };
                if ref_name.is_empty() {
                    return false;
                }
                self.flush();
                self.out.push(if image {
                    Inline::image("", content, None, &ref_name)
                } else {
                    Inline::link("", content, None, &ref_name)
                });
                self.pos = i + 1;
                true
            }
            _ => false,
        }
    }

    /// Matching `]` for the bracket at `open`, honoring nesting and
    /// escapes.
    fn find_bracket_close(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = open;
        while i < self.chars.len() {
            match self.chars[i] {
                '\\' => i += 1,
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
            i += 1;
        }
        None
    }

    /// `(url "title")` with an optionally `<>`-bracketed URL. Returns the
    /// url, tooltip and the position just past the closing paren.
    fn scan_link_destination(&self, open_paren: usize) -> Option<(String, Option<String>, usize)> {
        let mut i = open_paren + 1;
        self.skip_spaces(&mut i);

        let url = if self.chars.get(i) == Some(&'<') {
            let start = i + 1;
            while i < self.chars.len() && self.chars[i] != '>' {
                i += 1;
            }
            if self.chars.get(i) != Some(&'>') {
                return None;
            }
            let url = self.slice(start, i);
            i += 1;
            url
        } else {
            let start = i;
            while i < self.chars.len() && !self.chars[i].is_whitespace() && self.chars[i] != ')' {
                i += 1;
            }
            self.slice(start, i)
        };

        self.skip_spaces(&mut i);
        let tooltip = if self.chars.get(i) == Some(&'"') {
            let start = i + 1;
            i += 1;
            while i < self.chars.len() && self.chars[i] != '"' {
                i += 1;
            }
            if self.chars.get(i) != Some(&'"') {
                return None;
            }
            let tooltip = self.slice(start, i);
            i += 1;
            self.skip_spaces(&mut i);
            Some(tooltip)
        } else {
            None
        };

        if self.chars.get(i) != Some(&')') {
            return None;
        }
        Some((url, tooltip, i + 1))
    }

    fn skip_spaces(&self, i: &mut usize) {
        while self.chars.get(*i).is_some_and(|ch| *ch == ' ') {
            *i += 1;
        }
    }

    /// `<!-- comment -->` or `<scheme://...>` autolink; otherwise `<` is
    /// literal (inline HTML tags are not modeled in inline position).
    fn scan_angle(&mut self) {
        if self.rest_starts_with("<!--") {
            let body_start = self.pos + 4;
            let mut i = body_start;
            while i + 2 < self.chars.len() {
                if self.chars[i] == '-' && self.chars[i + 1] == '-' && self.chars[i + 2] == '>' {
                    self.flush();
                    self.out.push(Inline::Comment(self.slice(body_start, i)));
                    self.pos = i + 3;
                    return;
                }
                i += 1;
            }
            self.literal('<');
            return;
        }

        let mut i = self.pos + 1;
        while i < self.chars.len() && self.chars[i] != '>' && !self.chars[i].is_whitespace() {
            i += 1;
        }
        if self.chars.get(i) == Some(&'>') {
            let target = self.slice(self.pos + 1, i);
            if is_autolink_target(&target) {
                self.flush();
                self.out.push(Inline::Autolink(target));
                self.pos = i + 1;
                return;
            }
        }
        self.literal('<');
    }

    /// `*`/`_` emphasis: single -> italic, double -> bold (`*`) or
    /// underline (`_`), triple -> bold(italic). Surplus opener characters
    /// degrade to literal text in front of the construct.
    fn scan_emphasis(&mut self, ch: char) {
        let run = self.run_len(ch);
        let opener_ok = self
            .chars
            .get(self.pos + run)
            .is_some_and(|next| !next.is_whitespace());
        let intra_word = ch == '_'
            && self.pos > 0
            && self
                .chars
                .get(self.pos - 1)
                .is_some_and(|prev| prev.is_alphanumeric());

        if opener_ok && !intra_word {
            if run >= 3 {
                if let Some(close) = self.find_delim(ch, 3, self.pos + run) {
                    let inner = self.parse_range(self.pos + run, close);
                    self.emit_emphasis(ch, run - 3, wrap_double(ch, vec![wrap_single(inner)]));
                    self.pos = close + 3;
                    return;
                }
            }
            if run >= 2 {
                if let Some(close) = self.find_delim(ch, 2, self.pos + run) {
                    let inner = self.parse_range(self.pos + run, close);
                    self.emit_emphasis(ch, run - 2, wrap_double(ch, inner));
                    self.pos = close + 2;
                    return;
                }
            }
            if let Some(close) = self.find_delim(ch, 1, self.pos + run) {
                let inner = self.parse_range(self.pos + run, close);
                self.emit_emphasis(ch, run - 1, wrap_single(inner));
                self.pos = close + 1;
                return;
            }
        }

        for _ in 0..run {
            self.text.push(ch);
        }
        self.pos += run;
    }

    fn emit_emphasis(&mut self, ch: char, surplus: usize, node: Inline) {
        for _ in 0..surplus {
            self.text.push(ch);
        }
        self.flush();
        self.out.push(node);
    }

    /// `~~`, `==`, `||` containers; these forbid hard linebreaks.
    fn scan_pair(&mut self, ch: char) {
        let run = self.run_len(ch);
        if run >= 2 {
            if let Some(close) = self.find_delim(ch, 2, self.pos + run) {
                let inner = strip_linebreaks(self.parse_range(self.pos + run, close));
                let node = match ch {
                    '~' => Inline::Strikethrough(inner),
                    '=' => Inline::Highlight(inner),
                    _ => Inline::Spoiler(inner),
                };
                self.emit_emphasis(ch, run - 2, node);
                self.pos = close + 2;
                return;
            }
        }
        for _ in 0..run {
            self.text.push(ch);
        }
        self.pos += run;
    }

    /// Look ahead for a closing delimiter run of `ch`. Skips escapes and
    /// code spans. A run of the wrong length is skipped whole, except that
    /// a 3+ run can close shorter delimiters. The closer must not follow
    /// whitespace, and `_` closers may not end inside a word.
    fn find_delim(&self, ch: char, width: usize, from: usize) -> Option<usize> {
        let mut i = from;
        while i < self.chars.len() {
            match self.chars[i] {
                '\\' => i += 2,
                '`' => {
                    let run = self.chars[i..].iter().take_while(|&&c| c == '`').count();
                    let mut j = i + run;
                    let mut closed = false;
                    while j < self.chars.len() {
                        if self.chars[j] == '`' {
                            let inner = self.chars[j..].iter().take_while(|&&c| c == '`').count();
                            if inner == run {
                                i = j + inner;
                                closed = true;
                                break;
                            }
                            j += inner;
                        } else {
                            j += 1;
                        }
                    }
                    if !closed {
                        i += run;
                    }
                }
                c if c == ch => {
                    let run = self.chars[i..].iter().take_while(|&&c| c == ch).count();
                    let usable = run == width || run >= 3;
                    let after_word = ch == '_'
                        && self
                            .chars
                            .get(i + width)
                            .is_some_and(|next| next.is_alphanumeric());
                    let prev_space = i == from
                        || self
                            .chars
                            .get(i - 1)
                            .is_some_and(|prev| prev.is_whitespace());
                    if usable && !prev_space && !after_word {
                        return Some(i);
                    }
                    i += run;
                }
                _ => i += 1,
            }
        }
        None
    }

    /// `$...$` inline LaTeX: the opener may not be followed by whitespace,
    /// the closer may not be preceded by whitespace, and a digit right
    /// after the closer aborts the match (`$5 and $7` stays text).
    fn scan_latex(&mut self) {
        if !self.options.latex {
            self.literal('$');
            return;
        }
        let opener_ok = self
            .chars
            .get(self.pos + 1)
            .is_some_and(|next| !next.is_whitespace() && *next != '$');
        if !opener_ok {
            self.literal('$');
            return;
        }
        let mut i = self.pos + 1;
        while i < self.chars.len() {
            match self.chars[i] {
                '\\' => i += 2,
                '$' => break,
                _ => i += 1,
            }
        }
        if self.chars.get(i) != Some(&'$') {
            self.literal('$');
            return;
        }
        let closer_ok = !self.chars[i - 1].is_whitespace()
            && !self
                .chars
                .get(i + 1)
                .is_some_and(|next| next.is_ascii_digit());
        if !closer_ok {
            self.literal('$');
            return;
        }
        let raw = self.slice(self.pos + 1, i);
        self.flush();
        self.out.push(Inline::Latex { raw, display: false });
        self.pos = i + 1;
    }

    /// `:name:` with an optional `:skin-tone-N:` suffix; only shortcodes in
    /// the configured dictionary match.
    fn scan_emoji(&mut self) {
        if self.options.emoji_dictionary.is_empty() {
            self.literal(':');
            return;
        }
        let mut i = self.pos + 1;
        while self
            .chars
            .get(i)
            .is_some_and(|&ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '+' | '-'))
        {
            i += 1;
        }
        if i == self.pos + 1 || self.chars.get(i) != Some(&':') {
            self.literal(':');
            return;
        }
        let id = self.slice(self.pos + 1, i);
        if !self.options.emoji_dictionary.contains(&id) {
            self.literal(':');
            return;
        }
        self.flush();
        let mut end = i + 1;
        let mut skin_tone = None;
        if let Some(tone) = self.scan_skin_tone(end) {
            skin_tone = Some(tone);
            // ":skin-tone-N:" is 13 characters.
            end += 13;
        }
        self.out.push(Inline::Emoji { id, skin_tone });
        self.pos = end;
    }

    fn scan_skin_tone(&self, from: usize) -> Option<u8> {
        let suffix: String = self
            .chars
            .get(from..from + 13)?
            .iter()
            .collect();
        let digit = suffix.strip_prefix(":skin-tone-")?.strip_suffix(':')?;
        match digit.parse::<u8>() {
            Ok(tone) if (1..=5).contains(&tone) => Some(tone),
            _ => None,
        }
    }

    /// Bare `http(s)://` URL at a word boundary, only with `auto_link`.
    fn scan_bare_url(&mut self) -> bool {
        if !self.options.auto_link {
            return false;
        }
        let at_boundary = self.pos == 0
            || self
                .chars
                .get(self.pos - 1)
                .is_some_and(|prev| prev.is_whitespace() || *prev == '(');
        if !at_boundary {
            return false;
        }
        if !self.rest_starts_with("http://") && !self.rest_starts_with("https://") {
            return false;
        }
        let mut i = self.pos;
        while i < self.chars.len() && !self.chars[i].is_whitespace() && self.chars[i] != '<' {
            i += 1;
        }
        let mut end = i;
        while end > self.pos
            && matches!(self.chars[end - 1], '.' | ',' | ';' | ':' | '!' | '?' | ')')
        {
            end -= 1;
        }
        let candidate = self.slice(self.pos, end);
        if Url::parse(&candidate).is_err() {
            return false;
        }
        self.flush();
        self.out.push(Inline::Autolink(candidate));
        self.pos = end;
        true
    }

    /// Two+ trailing spaces make a hard linebreak; otherwise the newline
    /// joins with a single space (or a linebreak when configured).
    fn scan_newline(&mut self) {
        let mut trailing = 0;
        while self.text.ends_with(' ') {
            self.text.pop();
            trailing += 1;
        }
        if trailing >= 2 || self.options.newline_as_linebreaks {
            self.flush();
            self.out.push(Inline::Linebreak);
        } else if !self.text.is_empty() || !self.out.is_empty() {
            self.text.push(' ');
        }
        self.pos += 1;
        // Continuation-line indentation is noise.
        while self.chars.get(self.pos) == Some(&' ') {
            self.pos += 1;
        }
    }
}

fn wrap_single(inner: Vec<Inline>) -> Inline {
    Inline::Italic(inner)
}

fn wrap_double(ch: char, inner: Vec<Inline>) -> Inline {
    if ch == '_' {
        Inline::Underline(inner)
    } else {
        Inline::Bold(inner)
    }
}

fn is_autolink_target(target: &str) -> bool {
    if let Some(scheme_end) = target.find("://") {
        if scheme_end == 0 || target.len() == scheme_end + 3 {
            return false;
        }
        let scheme = &target[..scheme_end];
        let mut chars = scheme.chars();
        chars
            .next()
            .is_some_and(|first| first.is_ascii_alphabetic())
            && chars.all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '+' | '.' | '-'))
    } else {
        target
            .strip_prefix("mailto:")
            .is_some_and(|rest| !rest.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_plain(text: &str) -> Vec<Inline> {
        parse_inlines(text, &ParseOptions::default())
    }

    fn text(content: &str) -> Inline {
        Inline::Text(content.to_string())
    }

    #[test]
    fn test_emphasis_basic() {
        assert_eq!(
            parse_plain("hello *world* and **bold**"),
            vec![
                text("hello "),
                Inline::Italic(vec![text("world")]),
                text(" and "),
                Inline::Bold(vec![text("bold")]),
            ]
        );
    }

    #[test]
    fn test_triple_emphasis_nests() {
        assert_eq!(
            parse_plain("***a***"),
            vec![Inline::Bold(vec![Inline::Italic(vec![text("a")])])]
        );
    }

    #[test]
    fn test_underscore_double_is_underline() {
        assert_eq!(
            parse_plain("__u__ and _i_"),
            vec![
                Inline::Underline(vec![text("u")]),
                text(" and "),
                Inline::Italic(vec![text("i")]),
            ]
        );
    }

    #[test]
    fn test_underscore_not_intra_word() {
        assert_eq!(parse_plain("snake_case_name"), vec![text("snake_case_name")]);
    }

    #[test]
    fn test_unmatched_delimiters_degrade() {
        assert_eq!(parse_plain("*open"), vec![text("*open")]);
        assert_eq!(parse_plain("a ** b"), vec![text("a ** b")]);
    }

    #[test]
    fn test_nested_mixed_emphasis() {
        assert_eq!(
            parse_plain("*a **b** c*"),
            vec![Inline::Italic(vec![
                text("a "),
                Inline::Bold(vec![text("b")]),
                text(" c"),
            ])]
        );
    }

    #[test]
    fn test_code_span() {
        assert_eq!(
            parse_plain("run `cargo build` now"),
            vec![
                text("run "),
                Inline::Code("cargo build".to_string()),
                text(" now"),
            ]
        );
    }

    #[test]
    fn test_code_span_backtick_content() {
        assert_eq!(
            parse_plain("`` a`b ``"),
            vec![Inline::Code("a`b".to_string())]
        );
    }

    #[test]
    fn test_emphasis_not_matched_inside_code() {
        assert_eq!(
            parse_plain("*a `*` b*"),
            vec![Inline::Italic(vec![
                text("a "),
                Inline::Code("*".to_string()),
                text(" b"),
            ])]
        );
    }

    #[test]
    fn test_strikethrough_highlight_spoiler() {
        assert_eq!(
            parse_plain("~~s~~ ==h== ||sp||"),
            vec![
                Inline::Strikethrough(vec![text("s")]),
                text(" "),
                Inline::Highlight(vec![text("h")]),
                text(" "),
                Inline::Spoiler(vec![text("sp")]),
            ]
        );
    }

    #[test]
    fn test_inline_link() {
        assert_eq!(
            parse_plain("[site](https://ex.com \"Home\")"),
            vec![Inline::Link {
                url: "https://ex.com".to_string(),
                content: vec![text("site")],
                tooltip: Some("Home".to_string()),
                ref_name: String::new(),
            }]
        );
    }

    #[test]
    fn test_bracketed_url_link() {
        assert_eq!(
            parse_plain("[a](<https://ex.com/x y>)"),
            vec![Inline::Link {
                url: "https://ex.com/x y".to_string(),
                content: vec![text("a")],
                tooltip: None,
                ref_name: String::new(),
            }]
        );
    }

    #[test]
    fn test_reference_link_forms() {
        assert_eq!(
            parse_plain("[site][Home]"),
            vec![Inline::Link {
                url: String::new(),
                content: vec![text("site")],
                tooltip: None,
                ref_name: "home".to_string(),
            }]
        );
        assert_eq!(
            parse_plain("[Home][]"),
            vec![Inline::Link {
                url: String::new(),
                content: vec![text("Home")],
                tooltip: None,
                ref_name: "home".to_string(),
            }]
        );
    }

    #[test]
    fn test_image() {
        assert_eq!(
            parse_plain("![alt](pic.png)"),
            vec![Inline::Image {
                url: "pic.png".to_string(),
                content: vec![text("alt")],
                tooltip: None,
                ref_name: String::new(),
            }]
        );
    }

    #[test]
    fn test_bare_brackets_stay_literal() {
        assert_eq!(parse_plain("[not a link]"), vec![text("[not a link]")]);
    }

    #[test]
    fn test_angle_autolink() {
        assert_eq!(
            parse_plain("<https://ex.com> and <not a link>"),
            vec![
                Inline::Autolink("https://ex.com".to_string()),
                text(" and <not a link>"),
            ]
        );
    }

    #[test]
    fn test_bare_url_needs_option() {
        assert_eq!(
            parse_plain("see https://ex.com."),
            vec![text("see https://ex.com.")]
        );
        let options = ParseOptions::default().with_auto_link(true);
        assert_eq!(
            parse_inlines("see https://ex.com.", &options),
            vec![
                text("see "),
                Inline::Autolink("https://ex.com".to_string()),
                text("."),
            ]
        );
    }

    #[test]
    fn test_inline_comment() {
        assert_eq!(
            parse_plain("a<!-- note -->b"),
            vec![text("a"), Inline::Comment(" note ".to_string()), text("b")]
        );
    }

    #[test]
    fn test_latex_inline() {
        let options = ParseOptions::default().with_latex(true);
        assert_eq!(
            parse_inlines("$x^2$", &options),
            vec![Inline::Latex {
                raw: "x^2".to_string(),
                display: false,
            }]
        );
    }

    #[test]
    fn test_latex_dollar_amounts_stay_text() {
        let options = ParseOptions::default().with_latex(true);
        assert_eq!(
            parse_inlines("$5 and $10", &options),
            vec![text("$5 and $10")]
        );
    }

    #[test]
    fn test_latex_disabled_is_text() {
        assert_eq!(parse_plain("$x^2$"), vec![text("$x^2$")]);
    }

    #[test]
    fn test_emoji_requires_dictionary() {
        assert_eq!(parse_plain(":smile:"), vec![text(":smile:")]);
        let options = ParseOptions::default().with_emoji_dictionary(["smile", "wave"]);
        assert_eq!(
            parse_inlines("hi :smile:", &options),
            vec![
                text("hi "),
                Inline::Emoji {
                    id: "smile".to_string(),
                    skin_tone: None,
                },
            ]
        );
    }

    #[test]
    fn test_emoji_skin_tone() {
        let options = ParseOptions::default().with_emoji_dictionary(["wave"]);
        assert_eq!(
            parse_inlines(":wave::skin-tone-3:", &options),
            vec![Inline::Emoji {
                id: "wave".to_string(),
                skin_tone: Some(3),
            }]
        );
    }

    #[test]
    fn test_unknown_emoji_stays_text() {
        let options = ParseOptions::default().with_emoji_dictionary(["wave"]);
        assert_eq!(
            parse_inlines(":frown:", &options),
            vec![text(":frown:")]
        );
    }

    #[test]
    fn test_hard_linebreak() {
        assert_eq!(
            parse_plain("a  \nb"),
            vec![text("a"), Inline::Linebreak, text("b")]
        );
    }

    #[test]
    fn test_soft_newline_joins_with_space() {
        assert_eq!(parse_plain("a\nb"), vec![text("a b")]);
    }

    #[test]
    fn test_newline_as_linebreaks_option() {
        let options = ParseOptions::default().with_newline_as_linebreaks(true);
        assert_eq!(
            parse_inlines("a\nb", &options),
            vec![text("a"), Inline::Linebreak, text("b")]
        );
    }

    #[test]
    fn test_escapes() {
        assert_eq!(parse_plain(r"\*not em\*"), vec![text("*not em*")]);
        assert_eq!(parse_plain(r"a\\b"), vec![text(r"a\b")]);
    }

    #[test]
    fn test_spoiler_drops_linebreaks() {
        let options = ParseOptions::default().with_newline_as_linebreaks(true);
        let nodes = parse_inlines("||a\nb||", &options);
        assert_eq!(
            nodes,
            vec![Inline::Spoiler(vec![text("a"), text("b")])]
        );
    }
}
