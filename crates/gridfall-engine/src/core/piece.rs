use serde::{Deserialize, Serialize};

/// The seven tetromino shapes.
///
/// A `BlockKind` serves two roles: it identifies a falling [`Piece`], and it
/// is the value stored in an occupied [`Grid`](super::grid::Grid) cell, so a
/// renderer can style each locked block by the kind that filled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum BlockKind {
    /// The line piece.
    Straight,
    /// The 2x2 cube. The only kind with no meaningful rotation.
    Square,
    /// Upside-down T.
    TShape,
    /// L facing left.
    JShape,
    /// L facing right (mirror of J).
    LShape,
    /// Stairs going up to the right.
    SSkew,
    /// Stairs going up to the left (mirror of S).
    ZSkew,
}

impl BlockKind {
    /// Number of kinds (7).
    pub const LEN: usize = 7;

    /// All kinds, in declaration order. One shuffled copy of this array is a
    /// bag segment of the 7-bag randomizer.
    pub const ALL: [BlockKind; Self::LEN] = [
        BlockKind::Straight,
        BlockKind::Square,
        BlockKind::TShape,
        BlockKind::JShape,
        BlockKind::LShape,
        BlockKind::SSkew,
        BlockKind::ZSkew,
    ];

    /// Canonical block offsets of this kind, relative to the piece anchor.
    ///
    /// The offsets share a single pivot at the offset origin `(0, 0)`, which
    /// is what makes [`Piece::rotated_offsets`] a plain 90-degree rotation
    /// about that origin.
    #[must_use]
    pub const fn spawn_offsets(self) -> [Offset; 4] {
        const fn o(x: i32, y: i32) -> Offset {
            Offset { x, y }
        }
        match self {
            BlockKind::Straight => [o(0, -1), o(0, 0), o(0, 1), o(0, 2)],
            BlockKind::Square => [o(0, 0), o(1, 0), o(0, 1), o(1, 1)],
            BlockKind::TShape => [o(-1, 0), o(0, 0), o(1, 0), o(0, 1)],
            BlockKind::JShape => [o(-1, -1), o(0, -1), o(0, 0), o(0, 1)],
            BlockKind::LShape => [o(1, -1), o(0, -1), o(0, 0), o(0, 1)],
            BlockKind::SSkew => [o(0, -1), o(0, 0), o(1, 0), o(1, 1)],
            BlockKind::ZSkew => [o(0, -1), o(0, 0), o(-1, 0), o(-1, 1)],
        }
    }
}

/// Offset of a single block relative to the piece anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

/// Absolute cell coordinate on the board grid.
///
/// `(0, 0)` is the top-left cell; x grows rightward, y grows downward.
/// Coordinates are signed so that out-of-bounds probe positions can be
/// represented and rejected by the collision test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A falling piece: an immutable kind plus a mutable anchor and block
/// offsets.
///
/// All geometry queries ([`cells`](Self::cells),
/// [`translated_cells`](Self::translated_cells),
/// [`rotated_offsets`](Self::rotated_offsets)) are pure - they return new
/// coordinate sets and never touch the piece. The board probes a prospective
/// position with one of them, checks it for collisions, and only then commits
/// via [`set_anchor`](Self::set_anchor) / [`set_offsets`](Self::set_offsets).
///
/// `Piece` is `Copy`; duplicating one (for the shadow preview) is a plain
/// copy with no aliasing back to the original.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: BlockKind,
    anchor: GridPos,
    offsets: [Offset; 4],
}

impl Piece {
    /// Creates a piece of the given kind at anchor `(0, 0)` with its
    /// canonical offsets. The board assigns the real spawn anchor after the
    /// spawn collision check passes.
    #[must_use]
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            anchor: GridPos::new(0, 0),
            offsets: kind.spawn_offsets(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    #[must_use]
    pub fn anchor(&self) -> GridPos {
        self.anchor
    }

    #[must_use]
    pub fn offsets(&self) -> [Offset; 4] {
        self.offsets
    }

    /// Absolute coordinates of the four blocks: `anchor + offsets[i]`.
    #[must_use]
    pub fn cells(&self) -> [GridPos; 4] {
        Self::cells_at(self.anchor, &self.offsets)
    }

    /// Coordinates the blocks would occupy after moving by `(dx, dy)`.
    ///
    /// Pure probe - the piece itself is unchanged.
    #[must_use]
    pub fn translated_cells(&self, dx: i32, dy: i32) -> [GridPos; 4] {
        let anchor = GridPos::new(self.anchor.x + dx, self.anchor.y + dy);
        Self::cells_at(anchor, &self.offsets)
    }

    /// Offsets after a 90-degree rotation about the offset origin.
    ///
    /// Each offset `(x, y)` maps to `(y * sx, x * sy)` with `(sx, sy) =
    /// (-1, 1)` clockwise and `(1, -1)` counter-clockwise. Pure - the caller
    /// decides whether to commit the result.
    #[must_use]
    pub fn rotated_offsets(&self, clockwise: bool) -> [Offset; 4] {
        let (sx, sy) = if clockwise { (-1, 1) } else { (1, -1) };
        self.offsets.map(|Offset { x, y }| Offset {
            x: y * sx,
            y: x * sy,
        })
    }

    /// Resolves an anchor plus offset set into absolute coordinates.
    #[must_use]
    pub fn cells_at(anchor: GridPos, offsets: &[Offset; 4]) -> [GridPos; 4] {
        offsets.map(|offset| GridPos::new(anchor.x + offset.x, anchor.y + offset.y))
    }

    pub fn set_anchor(&mut self, anchor: GridPos) {
        self.anchor = anchor;
    }

    pub fn set_offsets(&mut self, offsets: [Offset; 4]) {
        self.offsets = offsets;
    }
}
