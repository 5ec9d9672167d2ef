//! Page geometry and the vertical cursor.
//!
//! A [`Cursor`] is a value, not shared state: every section takes the cursor
//! it starts at and returns the one the next section starts at. The only
//! place two cursors exist at once is a side-by-side block, and those are
//! merged back with [`reconcile_columns`].

/// Fixed page frame: size and uniform margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl PageGeometry {
    pub fn new(width: f64, height: f64, margin: f64) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }

    pub fn left(&self) -> f64 {
        self.margin
    }

    pub fn right(&self) -> f64 {
        self.width - self.margin
    }

    pub fn content_width(&self) -> f64 {
        self.right() - self.left()
    }

    /// A cursor spanning the content width at `y`.
    pub fn cursor_at(&self, y: f64) -> Cursor {
        Cursor::new(y, self.left(), self.right())
    }
}

/// The top of the free space on the page, with the horizontal bounds it
/// spans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub y: f64,
    pub left: f64,
    pub right: f64,
}

/// One column of a side-by-side block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub x: f64,
    pub width: f64,
}

impl Cursor {
    pub fn new(y: f64, left: f64, right: f64) -> Self {
        Self { y, left, right }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Move down by `dy`. Negative moves are clamped to zero.
    #[must_use]
    pub fn advance(self, dy: f64) -> Self {
        Self {
            y: self.y + dy.max(0.0),
            ..self
        }
    }

    /// Jump to `y`, never above the current position.
    #[must_use]
    pub fn at(self, y: f64) -> Self {
        Self {
            y: y.max(self.y),
            ..self
        }
    }

    /// Two equal columns separated by `gutter`.
    pub fn split_columns(&self, gutter: f64) -> (Column, Column) {
        let width = (self.width() - gutter) / 2.0;
        (
            Column {
                x: self.left,
                width,
            },
            Column {
                x: self.left + width + gutter,
                width,
            },
        )
    }
}

/// Where single-column flow resumes after a side-by-side block.
///
/// The columns are laid out independently and can end at different depths
/// (a client with an address next to a company without one). Flow resumes
/// below the deeper of the two, so neither column can run into what follows.
pub fn reconcile_columns(left_y: f64, right_y: f64, gap: f64) -> f64 {
    left_y.max(right_y) + gap
}
