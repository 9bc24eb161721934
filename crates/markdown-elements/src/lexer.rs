//! Markdown lexer producing the token forest.
//!
//! Builds marked-style [`Token`]s from pulldown-cmark events. Block tokens
//! nest inline content under `tokens`; tight list items wrap their inline
//! content in a `text` block token. Extension tokenizers are run over text
//! runs (inline level) or paragraphs (block level). Backslash escapes become
//! `escape` tokens and are never offered to inline tokenizers. Tight list
//! items have no paragraph, so block tokenizers never see their content.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use markdown_elements_core::{Align, TableCellToken, Token};
use pulldown_cmark::{Alignment, CodeBlockKind, Event, Options, Parser, Tag};

use crate::extension::{Extension, ExtensionLevel, Tokenizer};

/// Lexer configured with grammar options and extension tokenizers.
#[derive(Clone)]
pub struct Lexer {
    gfm: bool,
    breaks: bool,
    inline_hooks: Vec<Arc<dyn Tokenizer>>,
    block_hooks: Vec<Arc<dyn Tokenizer>>,
}

enum FrameKind {
    Root,
    Paragraph,
    Heading(u8),
    BlockQuote,
    CodeBlock(Option<String>),
    HtmlBlock,
    List(bool),
    Item,
    Table {
        align: Vec<Option<Align>>,
        header: Vec<TableCellToken>,
        rows: Vec<Vec<TableCellToken>>,
    },
    TableHead(Vec<TableCellToken>),
    TableRow(Vec<TableCellToken>),
    TableCell,
    Emphasis,
    Strong,
    Strikethrough,
    Link {
        href: String,
        title: Option<String>,
    },
    Image {
        href: String,
        title: Option<String>,
    },
    /// Construct without a dedicated token type
    Other { kind: &'static str, inline: bool },
}

struct Frame {
    kind: FrameKind,
    start: usize,
    children: Vec<Token>,
    /// Inline tokens of a tight list item not yet wrapped in a `text` token
    pending: Vec<Token>,
    task: Option<bool>,
}

impl Frame {
    fn new(kind: FrameKind, start: usize) -> Self {
        Self {
            kind,
            start,
            children: Vec::new(),
            pending: Vec::new(),
            task: None,
        }
    }

    fn inline_slot(&mut self) -> &mut Vec<Token> {
        match self.kind {
            FrameKind::Item => &mut self.pending,
            _ => &mut self.children,
        }
    }

    fn is_inline(&self) -> bool {
        !matches!(self.kind, FrameKind::CodeBlock(_) | FrameKind::HtmlBlock)
    }

    fn push_inline(&mut self, token: Token) {
        self.inline_slot().push(token);
    }

    /// Append literal text, merging with a preceding text run
    fn push_text(&mut self, text: &str) {
        let slot = self.inline_slot();
        match slot.last_mut() {
            Some(last) if last.kind == "text" && last.tokens.is_none() => {
                last.raw.push_str(text);
                if let Some(existing) = last.text.as_mut() {
                    existing.push_str(text);
                }
            }
            _ => slot.push(Token::new("text", text).with_text(text)),
        }
    }

    fn literal(&self) -> String {
        self.children.iter().map(Token::text_or_raw).collect()
    }
}

/// Open frames above the document root
struct Frames {
    root: Frame,
    open: Vec<Frame>,
}

impl Frames {
    fn new() -> Self {
        Self {
            root: Frame::new(FrameKind::Root, 0),
            open: Vec::new(),
        }
    }

    fn top(&mut self) -> &mut Frame {
        match self.open.last_mut() {
            Some(frame) => frame,
            None => &mut self.root,
        }
    }

    /// Column alignment of the innermost open table
    fn table_align(&self, column: usize) -> Option<Align> {
        self.open.iter().rev().find_map(|frame| match &frame.kind {
            FrameKind::Table { align, .. } => Some(align.get(column).copied().flatten()),
            _ => None,
        })?
    }

    /// Mark the innermost open list item as a task item
    fn mark_task(&mut self, checked: bool) {
        if let Some(item) = self
            .open
            .iter_mut()
            .rev()
            .find(|frame| matches!(frame.kind, FrameKind::Item))
        {
            item.task = Some(checked);
        }
    }
}

impl Lexer {
    pub fn new() -> Self {
        Self {
            gfm: true,
            breaks: false,
            inline_hooks: Vec::new(),
            block_hooks: Vec::new(),
        }
    }

    /// Enable tables, strikethrough, task lists and footnotes
    pub fn with_gfm(mut self, gfm: bool) -> Self {
        self.gfm = gfm;
        self
    }

    /// Turn single newlines inside paragraphs into `br` tokens
    pub fn with_breaks(mut self, breaks: bool) -> Self {
        self.breaks = breaks;
        self
    }

    /// Register the tokenizer hooks of `extensions`
    pub fn with_extensions(mut self, extensions: &[Extension]) -> Self {
        for extension in extensions {
            if let Some(tokenizer) = extension.tokenizer() {
                let hooks = match extension.level() {
                    ExtensionLevel::Inline => &mut self.inline_hooks,
                    ExtensionLevel::Block => &mut self.block_hooks,
                };
                hooks.push(Arc::clone(tokenizer));
            }
        }
        self
    }

    fn options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_FOOTNOTES
        } else {
            Options::empty()
        }
    }

    /// Lex a document into block tokens
    pub fn lex(&self, src: &str) -> Vec<Token> {
        let tokens = self.build(src);
        tracing::trace!(tokens = tokens.len(), bytes = src.len(), "Lexed markdown");
        tokens
    }

    /// Lex a fragment as inline content
    pub fn lex_inline(&self, src: &str) -> Vec<Token> {
        self.build(src)
            .into_iter()
            .flat_map(|block| {
                if block.kind == "paragraph" {
                    block.tokens.unwrap_or_default()
                } else {
                    vec![block]
                }
            })
            .collect()
    }

    fn build(&self, src: &str) -> Vec<Token> {
        let parser = Parser::new_ext(src, self.options()).into_offset_iter();
        let mut frames = Frames::new();

        for (event, range) in parser {
            match event {
                Event::Start(tag) => frames.open.push(Frame::new(frame_kind(tag), range.start)),
                Event::End(_) => {
                    if let Some(frame) = frames.open.pop() {
                        self.close(frame, range.end, src, &mut frames);
                    }
                }
                Event::Text(text) => {
                    let frame = frames.top();
                    match escaped_char(src, &range, &text) {
                        Some(escaped) if frame.is_inline() => {
                            let token = Token::new("escape", format!("\\{escaped}")).with_text(escaped);
                            frame.push_inline(token);
                            let rest = &text[escaped.len_utf8()..];
                            if !rest.is_empty() {
                                frame.push_text(rest);
                            }
                        }
                        _ => frame.push_text(&text),
                    }
                }
                Event::Code(code) => {
                    let token = Token::new("codespan", slice(src, &range)).with_text(&*code);
                    frames.top().push_inline(token);
                }
                Event::Html(html) => frames.top().push_text(&html),
                Event::InlineHtml(html) => {
                    let token = Token::new("html", &*html).with_text(&*html);
                    frames.top().push_inline(token);
                }
                Event::SoftBreak => {
                    if self.breaks {
                        frames.top().push_inline(Token::new("br", "\n"));
                    } else {
                        frames.top().push_text("\n");
                    }
                }
                Event::HardBreak => frames.top().push_inline(Token::new("br", slice(src, &range))),
                Event::Rule => self.push_block(frames.top(), Token::new("hr", slice(src, &range))),
                Event::TaskListMarker(checked) => frames.mark_task(checked),
                Event::FootnoteReference(label) => {
                    let token = Token::new("footnote", slice(src, &range)).with_text(&*label);
                    frames.top().push_inline(token);
                }
                Event::InlineMath(math) | Event::DisplayMath(math) => {
                    let token = Token::new("math", slice(src, &range)).with_text(&*math);
                    frames.top().push_inline(token);
                }
            }
        }

        let mut root = frames.root;
        self.flush_pending(&mut root);
        root.children
    }

    fn close(&self, mut frame: Frame, end: usize, src: &str, frames: &mut Frames) {
        let raw = src.get(frame.start..end).unwrap_or_default().to_string();

        if !matches!(frame.kind, FrameKind::Item | FrameKind::CodeBlock(_) | FrameKind::HtmlBlock) {
            frame.children = self.split_inline(std::mem::take(&mut frame.children));
        }
        self.flush_pending(&mut frame);
        let literal = frame.literal();

        let parent = frames.top();
        match frame.kind {
            FrameKind::Root => {}
            FrameKind::Paragraph => {
                let paragraph = Token::new("paragraph", raw.as_str())
                    .with_text(raw.trim_end())
                    .with_tokens(frame.children);
                for token in self.claim_block(paragraph) {
                    self.push_block(parent, token);
                }
            }
            FrameKind::Heading(depth) => {
                let token = Token {
                    depth: Some(u32::from(depth)),
                    ..Token::new("heading", raw).with_tokens(frame.children)
                };
                self.push_block(parent, token);
            }
            FrameKind::BlockQuote => {
                self.push_block(parent, Token::new("blockquote", raw).with_tokens(frame.children));
            }
            FrameKind::CodeBlock(lang) => {
                let mut text = literal;
                if text.ends_with('\n') {
                    text.pop();
                }
                let token = Token {
                    lang,
                    ..Token::new("code", raw).with_text(text)
                };
                self.push_block(parent, token);
            }
            FrameKind::HtmlBlock => {
                self.push_block(parent, Token::new("html", raw).with_text(literal));
            }
            FrameKind::List(ordered) => {
                let token = Token {
                    ordered: Some(ordered),
                    items: Some(frame.children),
                    ..Token::new("list", raw)
                };
                self.push_block(parent, token);
            }
            FrameKind::Item => {
                let token = Token {
                    task: Some(frame.task.is_some()),
                    checked: frame.task,
                    ..Token::new("list_item", raw).with_tokens(frame.children)
                };
                parent.children.push(token);
            }
            FrameKind::Table { align, header, rows } => {
                let token = Token {
                    align: Some(align),
                    header: Some(header),
                    rows: Some(rows),
                    ..Token::new("table", raw)
                };
                self.push_block(parent, token);
            }
            FrameKind::TableHead(cells) => {
                if let FrameKind::Table { header, .. } = &mut parent.kind {
                    *header = cells;
                }
            }
            FrameKind::TableRow(cells) => {
                if let FrameKind::Table { rows, .. } = &mut parent.kind {
                    rows.push(cells);
                }
            }
            FrameKind::TableCell => {
                let header = matches!(parent.kind, FrameKind::TableHead(_));
                let column = match &parent.kind {
                    FrameKind::TableHead(cells) | FrameKind::TableRow(cells) => cells.len(),
                    _ => 0,
                };
                let cell = TableCellToken {
                    text: literal,
                    tokens: frame.children,
                    header,
                    align: frames.table_align(column),
                };
                if let FrameKind::TableHead(cells) | FrameKind::TableRow(cells) = &mut frames.top().kind {
                    cells.push(cell);
                }
            }
            FrameKind::Emphasis => parent.push_inline(Token::new("em", raw).with_tokens(frame.children)),
            FrameKind::Strong => parent.push_inline(Token::new("strong", raw).with_tokens(frame.children)),
            FrameKind::Strikethrough => parent.push_inline(Token::new("del", raw).with_tokens(frame.children)),
            FrameKind::Link { href, title } => {
                let token = Token {
                    href: Some(href),
                    title,
                    text: Some(literal),
                    ..Token::new("link", raw).with_tokens(frame.children)
                };
                parent.push_inline(token);
            }
            FrameKind::Image { href, title } => {
                let token = Token {
                    href: Some(href),
                    title,
                    text: Some(literal),
                    ..Token::new("image", raw).with_tokens(frame.children)
                };
                parent.push_inline(token);
            }
            FrameKind::Other { kind, inline } => {
                let token = Token::new(kind, raw).with_tokens(frame.children);
                if inline {
                    parent.push_inline(token);
                } else {
                    self.push_block(parent, token);
                }
            }
        }
    }

    fn push_block(&self, frame: &mut Frame, token: Token) {
        self.flush_pending(frame);
        frame.children.push(token);
    }

    /// Wrap a tight list item's pending inline run in a `text` block token
    fn flush_pending(&self, frame: &mut Frame) {
        if frame.pending.is_empty() {
            return;
        }
        let inline = self.split_inline(std::mem::take(&mut frame.pending));
        let raw: String = inline.iter().map(|t| t.raw.as_str()).collect();
        let text: String = inline.iter().map(Token::text_or_raw).collect();
        frame
            .children
            .push(Token::new("text", raw).with_text(text).with_tokens(inline));
    }

    /// Run inline extension tokenizers over plain text runs
    fn split_inline(&self, tokens: Vec<Token>) -> Vec<Token> {
        if self.inline_hooks.is_empty() {
            return tokens;
        }
        let mut out = Vec::with_capacity(tokens.len());
        for token in tokens {
            if token.kind == "text" && token.tokens.is_none() {
                out.extend(self.split_text(token.text_or_raw()));
            } else {
                out.push(token);
            }
        }
        out
    }

    fn split_text(&self, text: &str) -> Vec<Token> {
        let mut out = Vec::new();
        let mut plain = String::new();
        let mut rest = text;

        while !rest.is_empty() {
            let Some(at) = self
                .inline_hooks
                .iter()
                .filter_map(|hook| hook.start(rest))
                .filter(|&at| rest.is_char_boundary(at) && at < rest.len())
                .min()
            else {
                break;
            };

            let candidate = &rest[at..];
            let claimed = self
                .inline_hooks
                .iter()
                .filter_map(|hook| hook.tokenize(candidate, self))
                .find(|token| !token.raw.is_empty() && candidate.starts_with(&token.raw));

            match claimed {
                Some(token) => {
                    plain.push_str(&rest[..at]);
                    if !plain.is_empty() {
                        let run = std::mem::take(&mut plain);
                        out.push(Token::new("text", run.as_str()).with_text(run));
                    }
                    rest = &rest[at + token.raw.len()..];
                    out.push(token);
                }
                None => {
                    let step = at + candidate.chars().next().map_or(1, char::len_utf8);
                    plain.push_str(&rest[..step]);
                    rest = &rest[step..];
                }
            }
        }

        plain.push_str(rest);
        if !plain.is_empty() {
            out.push(Token::new("text", plain.as_str()).with_text(plain));
        }
        out
    }

    /// Offer a paragraph to block extension tokenizers
    fn claim_block(&self, paragraph: Token) -> Vec<Token> {
        let source = paragraph.raw.as_str();
        let claimed = self
            .block_hooks
            .iter()
            .filter(|hook| hook.start(source) == Some(0))
            .filter_map(|hook| hook.tokenize(source, self))
            .find(|token| !token.raw.is_empty() && source.starts_with(&token.raw));

        let Some(token) = claimed else {
            return vec![paragraph];
        };

        let remainder = source[token.raw.len()..].trim_start_matches(['\n', '\r']);
        let mut tokens = vec![token];
        if !remainder.trim().is_empty() {
            tokens.extend(self.build(remainder));
        }
        tokens
    }
}

impl fmt::Debug for Lexer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lexer")
            .field("gfm", &self.gfm)
            .field("breaks", &self.breaks)
            .field("inline_hooks", &self.inline_hooks.len())
            .field("block_hooks", &self.block_hooks.len())
            .finish()
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

/// The punctuation character a text event starts with, if the source
/// escapes it with a backslash
fn escaped_char(src: &str, range: &Range<usize>, text: &str) -> Option<char> {
    let first = text.chars().next().filter(char::is_ascii_punctuation)?;
    let source = slice(src, range);

    let escaped = match source.strip_prefix('\\') {
        Some(rest) => rest.starts_with(first),
        None => {
            let backslashes = src
                .get(..range.start)
                .unwrap_or_default()
                .chars()
                .rev()
                .take_while(|&c| c == '\\')
                .count();
            source.starts_with(first) && backslashes % 2 == 1
        }
    };
    escaped.then_some(first)
}

fn slice<'s>(src: &'s str, range: &Range<usize>) -> &'s str {
    src.get(range.clone()).unwrap_or_default()
}

fn frame_kind(tag: Tag<'_>) -> FrameKind {
    match tag {
        Tag::Paragraph => FrameKind::Paragraph,
        Tag::Heading { level, .. } => FrameKind::Heading(level as u8),
        Tag::BlockQuote(_) => FrameKind::BlockQuote,
        Tag::CodeBlock(kind) => {
            let lang = match kind {
                CodeBlockKind::Fenced(info) => info
                    .split_whitespace()
                    .next()
                    .map(str::to_string),
                CodeBlockKind::Indented => None,
            };
            FrameKind::CodeBlock(lang)
        }
        Tag::HtmlBlock => FrameKind::HtmlBlock,
        Tag::List(start) => FrameKind::List(start.is_some()),
        Tag::Item => FrameKind::Item,
        Tag::Table(alignments) => FrameKind::Table {
            align: alignments.into_iter().map(column_align).collect(),
            header: Vec::new(),
            rows: Vec::new(),
        },
        Tag::TableHead => FrameKind::TableHead(Vec::new()),
        Tag::TableRow => FrameKind::TableRow(Vec::new()),
        Tag::TableCell => FrameKind::TableCell,
        Tag::Emphasis => FrameKind::Emphasis,
        Tag::Strong => FrameKind::Strong,
        Tag::Strikethrough => FrameKind::Strikethrough,
        Tag::Link { dest_url, title, .. } => FrameKind::Link {
            href: dest_url.to_string(),
            title: non_empty(&title),
        },
        Tag::Image { dest_url, title, .. } => FrameKind::Image {
            href: dest_url.to_string(),
            title: non_empty(&title),
        },
        Tag::FootnoteDefinition(_) => FrameKind::Other {
            kind: "footnote_definition",
            inline: false,
        },
        _ => FrameKind::Other {
            kind: "block",
            inline: false,
        },
    }
}

fn column_align(alignment: Alignment) -> Option<Align> {
    match alignment {
        Alignment::None => None,
        Alignment::Left => Some(Align::Left),
        Alignment::Center => Some(Align::Center),
        Alignment::Right => Some(Align::Right),
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
