//! Inline AST nodes.
//!
//! These are intentionally lightweight: plain enums with `Vec` children,
//! no parent pointers, no shared state. Containers that forbid hard
//! linebreaks (strikethrough, highlight, spoiler, link content, headings)
//! are built through [`strip_linebreaks`] so a `Linebreak` never survives
//! insertion into them.

/// Inline node variants.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    /// Plain text segment with no formatting.
    Text(String),
    /// Hard line break; serializes as two spaces and a newline.
    Linebreak,
    /// Emoji shortcode with an optional skin tone modifier (1..=5).
    Emoji { id: String, skin_tone: Option<u8> },
    /// Inline code span; content is verbatim.
    Code(String),
    /// Autolink: the URL is both target and visible text.
    Autolink(String),
    /// Link with inline content as its visible text.
    ///
    /// `ref_name` is empty for inline links and holds the lowercased
    /// reference name otherwise; unresolved references stay unresolved
    /// until render time.
    Link {
        url: String,
        content: Vec<Inline>,
        tooltip: Option<String>,
        ref_name: String,
    },
    /// Image; same shape as [`Inline::Link`], content is the alt text.
    Image {
        url: String,
        content: Vec<Inline>,
        tooltip: Option<String>,
        ref_name: String,
    },
    Italic(Vec<Inline>),
    Bold(Vec<Inline>),
    Underline(Vec<Inline>),
    Strikethrough(Vec<Inline>),
    Highlight(Vec<Inline>),
    Spoiler(Vec<Inline>),
    /// Inline LaTeX; `display` is true only for `$$` blocks lifted to
    /// block position.
    Latex { raw: String, display: bool },
    /// HTML comment encountered in inline position.
    Comment(String),
}

/// Drop `Linebreak` nodes for containers that forbid them.
pub fn strip_linebreaks(content: Vec<Inline>) -> Vec<Inline> {
    content
        .into_iter()
        .filter(|inline| !matches!(inline, Inline::Linebreak))
        .collect()
}

impl Inline {
    /// Build a link, lowercasing the reference name and dropping linebreaks
    /// from the visible text.
    pub fn link(url: &str, content: Vec<Inline>, tooltip: Option<String>, ref_name: &str) -> Self {
        Inline::Link {
            url: url.to_string(),
            content: strip_linebreaks(content),
            tooltip,
            ref_name: ref_name.to_ascii_lowercase(),
        }
    }

    /// Build an image; same normalization as [`Inline::link`].
    pub fn image(url: &str, content: Vec<Inline>, tooltip: Option<String>, ref_name: &str) -> Self {
        Inline::Image {
            url: url.to_string(),
            content: strip_linebreaks(content),
            tooltip,
            ref_name: ref_name.to_ascii_lowercase(),
        }
    }

    /// Concatenated plain text of this node, formatting stripped.
    pub fn plain_text(&self) -> String {
        match self {
            Inline::Text(content) => content.clone(),
            Inline::Linebreak => " ".to_string(),
            Inline::Emoji { id, skin_tone } => match skin_tone {
                Some(tone) => format!(":{id}::skin-tone-{tone}:"),
                None => format!(":{id}:"),
            },
            Inline::Code(content) => content.clone(),
            Inline::Autolink(url) => url.clone(),
            Inline::Link { content, .. } | Inline::Image { content, .. } => plain_text(content),
            Inline::Italic(content)
            | Inline::Bold(content)
            | Inline::Underline(content)
            | Inline::Strikethrough(content)
            | Inline::Highlight(content)
            | Inline::Spoiler(content) => plain_text(content),
            Inline::Latex { raw, .. } => raw.clone(),
            Inline::Comment(_) => String::new(),
        }
    }

    /// Canonical Markdown form.
    pub fn to_markdown(&self) -> String {
        match self {
            Inline::Text(content) => content.clone(),
            Inline::Linebreak => "  \n".to_string(),
            Inline::Emoji { id, skin_tone } => match skin_tone {
                Some(tone) => format!(":{id}::skin-tone-{tone}:"),
                None => format!(":{id}:"),
            },
            Inline::Code(content) => {
                // Pick a backtick run longer than any inside the content.
                let longest = longest_backtick_run(content);
                let fence = "`".repeat(longest + 1);
                if longest == 0 {
                    format!("{fence}{content}{fence}")
                } else {
                    format!("{fence} {content} {fence}")
                }
            }
            Inline::Autolink(url) => format!("<{url}>"),
            Inline::Link {
                url,
                content,
                tooltip,
                ref_name,
            } => {
                let text = to_markdown(content);
                if ref_name.is_empty() {
                    match tooltip {
                        Some(tooltip) => format!("[{text}]({url} \"{tooltip}\")"),
                        None => format!("[{text}]({url})"),
                    }
                } else if text.eq_ignore_ascii_case(ref_name) {
                    format!("[{text}][]")
                } else {
                    format!("[{text}][{ref_name}]")
                }
            }
            Inline::Image {
                url,
                content,
                tooltip,
                ref_name,
            } => {
                let text = to_markdown(content);
                if ref_name.is_empty() {
                    match tooltip {
                        Some(tooltip) => format!("![{text}]({url} \"{tooltip}\")"),
                        None => format!("![{text}]({url})"),
                    }
                } else {
                    format!("![{text}][{ref_name}]")
                }
            }
            Inline::Italic(content) => format!("*{}*", to_markdown(content)),
            Inline::Bold(content) => format!("**{}**", to_markdown(content)),
            Inline::Underline(content) => format!("__{}__", to_markdown(content)),
            Inline::Strikethrough(content) => format!("~~{}~~", to_markdown(content)),
            Inline::Highlight(content) => format!("=={}==", to_markdown(content)),
            Inline::Spoiler(content) => format!("||{}||", to_markdown(content)),
            Inline::Latex { raw, display } => {
                if *display {
                    format!("$$\n{raw}\n$$")
                } else {
                    format!("${raw}$")
                }
            }
            Inline::Comment(content) => format!("<!--{content}-->"),
        }
    }
}

/// Concatenated plain text of a sequence of inlines.
pub fn plain_text(content: &[Inline]) -> String {
    content.iter().map(Inline::plain_text).collect()
}

/// Canonical Markdown of a sequence of inlines.
pub fn to_markdown(content: &[Inline]) -> String {
    content.iter().map(Inline::to_markdown).collect()
}

fn longest_backtick_run(content: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for ch in content.chars() {
        if ch == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}
