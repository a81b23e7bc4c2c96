//! Render options and extension capability records.
//!
//! Every option group has a default; callers override by field or through
//! `with_*` builders. Extension points are function objects:
//!
//! - [`LatexRenderer`] gets the raw source and display flag and returns an
//!   HTML fragment; an `Err` is absorbed into a fallback element carrying
//!   [`LatexOptions::error_classes`].
//! - [`BlockCodeHighlighter`] populates the `<code>` element's children;
//!   an `Err` propagates to the `render` caller.
//! - [`EmojiRenderer`] maps a shortcode (plus optional skin tone) to a
//!   node; without one, emoji render as their literal shortcode.
//! - [`TablePostProcessor`] runs over every finished `<table>` element.
//! - [`InlineCodeProcessor`] replaces the default `<code>` wrapping of
//!   inline code spans.
//!
//! The renderer treats the options as immutable; callbacks receiving
//! `&mut Element` own only that subtree.

use marq_html::{Element, Node};

pub type LatexRenderer = Box<dyn Fn(&str, bool) -> Result<String, String>>;
pub type BlockCodeHighlighter = Box<dyn Fn(&str, Option<&str>, &mut Element) -> Result<(), String>>;
pub type EmojiRenderer = Box<dyn Fn(&str, Option<u8>) -> Result<Node, String>>;
pub type TablePostProcessor = Box<dyn Fn(&mut Element) -> Result<(), String>>;
pub type InlineCodeProcessor = Box<dyn Fn(&str) -> Node>;

#[derive(Default)]
pub struct RenderOptions {
    pub block_code: BlockCodeOptions,
    pub checkbox: CheckboxOptions,
    pub code: CodeOptions,
    pub emoji: Option<EmojiRenderer>,
    pub highlight: HighlightOptions,
    pub inline_html: InlineHtmlOptions,
    pub image: ImageOptions,
    pub latex: LatexOptions,
    pub strikethrough: StrikethroughOptions,
    pub underline: UnderlineOptions,
    pub spoiler: SpoilerOptions,
    pub table: TableOptions,
    /// Root element to append into; a fresh `<div>` otherwise.
    pub parent: Option<Element>,
}

impl RenderOptions {
    pub fn new() -> Self {
        RenderOptions::default()
    }

    pub fn with_parent(mut self, parent: Element) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_latex_renderer(mut self, renderer: LatexRenderer) -> Self {
        self.latex.render = Some(renderer);
        self
    }

    pub fn with_emoji_renderer(mut self, renderer: EmojiRenderer) -> Self {
        self.emoji = Some(renderer);
        self
    }

    pub fn with_block_code_highlighter(mut self, highlighter: BlockCodeHighlighter) -> Self {
        self.block_code.highlighter = Some(highlighter);
        self
    }

    pub fn with_table_post_processor(mut self, processor: TablePostProcessor) -> Self {
        self.table.process = Some(processor);
        self
    }
}

pub struct BlockCodeOptions {
    /// Class of the wrapper `<div>` around `<pre><code>`; empty disables
    /// the wrapper.
    pub class_name: String,
    pub highlighter: Option<BlockCodeHighlighter>,
}

impl Default for BlockCodeOptions {
    fn default() -> Self {
        BlockCodeOptions {
            class_name: String::new(),
            highlighter: None,
        }
    }
}

pub struct CheckboxOptions {
    /// Emit `<input type="checkbox">` for task items.
    pub enable: bool,
    /// Emit the checkboxes disabled.
    pub disabled: bool,
}

impl Default for CheckboxOptions {
    fn default() -> Self {
        CheckboxOptions {
            enable: true,
            disabled: true,
        }
    }
}

#[derive(Default)]
pub struct CodeOptions {
    /// Inline code mapper; the default wraps content in `<code>` with the
    /// code text mode.
    pub process: Option<InlineCodeProcessor>,
}

pub struct HighlightOptions {
    /// When false, highlights render as literal `==...==`.
    pub enable: bool,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        HighlightOptions { enable: true }
    }
}

pub struct InlineHtmlOptions {
    /// When false, raw HTML is escaped and wrapped in `<p>`.
    pub enable: bool,
    /// Tag blocklist handed to the sanitizer; `None` keeps its default.
    pub disallowed_tags: Option<Vec<String>>,
}

impl Default for InlineHtmlOptions {
    fn default() -> Self {
        InlineHtmlOptions {
            enable: true,
            disallowed_tags: None,
        }
    }
}

#[derive(Default)]
pub struct ImageOptions {
    /// Class applied to every `<img>`; empty adds none.
    pub class_name: String,
}

pub struct LatexOptions {
    pub render: Option<LatexRenderer>,
    /// Classes on the fallback element when the renderer fails.
    pub error_classes: Vec<String>,
}

impl Default for LatexOptions {
    fn default() -> Self {
        LatexOptions {
            render: None,
            error_classes: vec!["latex-error".to_string()],
        }
    }
}

pub struct StrikethroughOptions {
    /// Class of the `<span>` wrapping struck text.
    pub class_name: String,
}

impl Default for StrikethroughOptions {
    fn default() -> Self {
        StrikethroughOptions {
            class_name: "strikethrough".to_string(),
        }
    }
}

pub struct UnderlineOptions {
    /// When false, underline renders as `<b>`.
    pub enable: bool,
    pub class_name: String,
}

impl Default for UnderlineOptions {
    fn default() -> Self {
        UnderlineOptions {
            enable: true,
            class_name: String::new(),
        }
    }
}

pub struct SpoilerOptions {
    /// When false, spoilers render as literal `||...||` inside a `<span>`.
    pub enable: bool,
    pub class_name: String,
    /// Class of the wrapper around a spoilered image; the hidden class
    /// gates reveal.
    pub image_class_name: String,
    pub hidden_class_name: String,
}

impl Default for SpoilerOptions {
    fn default() -> Self {
        SpoilerOptions {
            enable: true,
            class_name: "spoiler".to_string(),
            image_class_name: "spoiler-image".to_string(),
            hidden_class_name: "spoiler-hidden".to_string(),
        }
    }
}

#[derive(Default)]
pub struct TableOptions {
    pub process: Option<TablePostProcessor>,
}
