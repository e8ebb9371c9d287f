//! The stack of in-flight block contexts.

use crate::style::StyleBlock;

/// Narrowest width the stack will hand out while wrapping is enabled.
pub const MIN_BLOCK_WIDTH: usize = 10;

/// One in-flight block: its style and the output of its descendants.
#[derive(Debug, Clone, Default)]
pub struct BlockElement {
    /// Accumulated output of everything rendered inside this block.
    pub block: String,
    /// The block's resolved style.
    pub style: StyleBlock,
    /// Whether the buffer is wrapped and margin-written on finish.
    pub margin: bool,
    /// Whether a newline is written after the block on finish.
    pub newline: bool,
}

impl BlockElement {
    /// Creates a frame with an empty buffer.
    pub fn new(style: StyleBlock) -> Self {
        Self {
            block: String::new(),
            style,
            margin: false,
            newline: false,
        }
    }

    /// Sets whether the frame wraps and margin-writes on finish.
    #[must_use]
    pub const fn with_margin(mut self, margin: bool) -> Self {
        self.margin = margin;
        self
    }

    /// Sets whether the frame ends with a newline.
    #[must_use]
    pub const fn with_newline(mut self, newline: bool) -> Self {
        self.newline = newline;
        self
    }
}

/// A stack of [`BlockElement`]s.
///
/// `current` and `parent` never fail: past the bottom of the stack they
/// return an empty sentinel frame.
#[derive(Debug, Default)]
pub struct BlockStack {
    frames: Vec<BlockElement>,
    sentinel: BlockElement,
}

impl BlockStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if no frame is active.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Pushes a frame.
    pub fn push(&mut self, frame: BlockElement) {
        tracing::trace!(depth = self.frames.len() + 1, "push block");
        self.frames.push(frame);
    }

    /// Pops the top frame.
    pub fn pop(&mut self) -> Option<BlockElement> {
        tracing::trace!(depth = self.frames.len(), "pop block");
        self.frames.pop()
    }

    /// The top frame, or the sentinel.
    pub fn current(&self) -> &BlockElement {
        self.frames.last().unwrap_or(&self.sentinel)
    }

    /// The frame below the top, or the sentinel.
    pub fn parent(&self) -> &BlockElement {
        match self.frames.len() {
            0 | 1 => &self.sentinel,
            n => &self.frames[n - 2],
        }
    }

    /// Mutable buffer of the top frame (the sentinel's when empty).
    pub fn current_buffer(&mut self) -> &mut String {
        match self.frames.last_mut() {
            Some(frame) => &mut frame.block,
            None => &mut self.sentinel.block,
        }
    }

    /// The top frame together with its parent's buffer.
    ///
    /// The parent of the bottom frame is the sentinel. Returns `None` when
    /// the stack is empty.
    pub fn current_and_parent_buffer(&mut self) -> Option<(&BlockElement, &mut String)> {
        match self.frames.split_last_mut() {
            Some((current, [.., parent])) => Some((current, &mut parent.block)),
            Some((current, [])) => Some((current, &mut self.sentinel.block)),
            None => None,
        }
    }

    /// Takes whatever was written past the bottom of the stack.
    pub fn take_root(&mut self) -> String {
        std::mem::take(&mut self.sentinel.block)
    }

    /// Sum of indents over every frame.
    pub fn indent(&self) -> usize {
        self.frames.iter().map(|f| f.style.indent_width()).sum()
    }

    /// Sum of left and right margins over every frame.
    pub fn margin(&self) -> usize {
        self.frames
            .iter()
            .map(|f| f.style.left_margin() + f.style.right_margin())
            .sum()
    }

    /// Width available to the top frame's content.
    ///
    /// A `total` of zero disables wrapping and yields zero. Otherwise the
    /// result never drops below [`MIN_BLOCK_WIDTH`] (or `total` itself when
    /// that is smaller).
    pub fn width(&self, total: usize) -> usize {
        if total == 0 {
            return 0;
        }
        let consumed = self.indent() + self.margin();
        let floor = MIN_BLOCK_WIDTH.min(total);
        if consumed + floor > total {
            tracing::warn!(total, consumed, floor, "nesting exceeds wrap width, using floor");
            return floor;
        }
        total - consumed
    }
}
