/*!
 * Free-text selection bridge.
 *
 * A selection inside the reading text that does not line up with token
 * boundaries is offered for translation. The bridge is a small state machine
 * fed with pointer events; activating the offer yields a lookup request
 * positioned at the selection's anchor.
 */

/// Bounding rectangle of a selection, in view coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    /// A collapsed selection has no extent
    pub fn is_collapsed(&self) -> bool {
        self.width <= 0.0 && self.height <= 0.0
    }

    /// Horizontal centre, top edge
    pub fn anchor(&self) -> Anchor {
        Anchor { x: self.left + self.width / 2.0, y: self.top }
    }
}

/// Point the lookup popover is positioned from
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

/// The selection as reported on mouse-up
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSnapshot {
    pub text: String,
    pub rect: Rect,
    /// Whether the selection lies entirely inside the reading text
    pub within_text: bool,
}

/// A selection offered for translation
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSelection {
    pub text: String,
    pub anchor: Anchor,
}

/// A lookup to run, with the position to show the result at
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionLookup {
    pub text: String,
    pub position: Anchor,
}

#[derive(Debug, Default)]
pub struct SelectionBridge {
    pending: Option<PendingSelection>,
}

impl SelectionBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mouse button released with the given selection (or none)
    pub fn on_mouse_up(&mut self, selection: Option<SelectionSnapshot>) -> Option<&PendingSelection> {
        self.pending = selection
            .filter(|s| s.within_text && !s.text.trim().is_empty() && !s.rect.is_collapsed())
            .map(|s| PendingSelection { text: s.text, anchor: s.rect.anchor() });
        self.pending.as_ref()
    }

    /// A click anywhere; clears the offer unless it hit the text or the popover
    pub fn on_click(&mut self, in_text: bool, in_popover: bool) {
        if !in_text && !in_popover {
            self.pending = None;
        }
    }

    /// A token was clicked, starting its own lookup
    pub fn on_token_lookup(&mut self) {
        self.pending = None;
    }

    /// Accept the offer, turning the selection into a lookup
    pub fn activate(&mut self) -> Option<SelectionLookup> {
        self.pending.take().map(|pending| SelectionLookup {
            text: pending.text,
            position: pending.anchor,
        })
    }

    pub fn pending(&self) -> Option<&PendingSelection> {
        self.pending.as_ref()
    }
}
