// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// The target surface for a render (spec §3 "Render context").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextType {
    /// An interactive terminal session: LF line endings, ANSI output.
    Terminal,
    /// A raw telnet-style byte stream: CRLF line endings, ANSI output.
    Stream,
    /// The HTML control panel: LF line endings, HTML output.
    Web,
}

/// `{type, width}` (spec §3). Determines line-ending discipline,
/// HTML-vs-ANSI output, and maximum allowed line width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    pub context_type: ContextType,
    pub width: usize,
}

impl RenderContext {
    #[must_use]
    pub fn new(context_type: ContextType, width: usize) -> Self { Self { context_type, width } }

    /// Terminal/stream default width of 80 columns (spec §6.2).
    #[must_use]
    pub fn terminal(width: usize) -> Self { Self::new(ContextType::Terminal, width) }

    #[must_use]
    pub fn stream(width: usize) -> Self { Self::new(ContextType::Stream, width) }

    #[must_use]
    pub fn web(width: usize) -> Self { Self::new(ContextType::Web, width) }

    #[must_use]
    pub fn is_web(self) -> bool { self.context_type == ContextType::Web }
}

/// `getLineEnding(ctx)` (spec §4.E): telnet-style (stream) contexts use
/// CRLF; terminal and web use LF.
#[must_use]
pub fn line_ending(ctx: RenderContext) -> &'static str {
    match ctx.context_type {
        ContextType::Stream => "\r\n",
        ContextType::Terminal | ContextType::Web => "\n",
    }
}
