use derive_more::IsVariant;
use rand::Rng as _;

use crate::{
    core::{
        grid::Grid,
        piece::{BlockKind, GridPos, Piece},
    },
    engine::piece_bag::{BagSeed, PieceBag},
};

/// Each of the `n` rows cleared by one lock is worth
/// `ROW_CLEAR_BASE + ROW_CLEAR_PER_ROW * n` points.
const ROW_CLEAR_BASE: usize = 100;
const ROW_CLEAR_PER_ROW: usize = 50;

/// Horizontal anchor adjustments tried in order when a rotation collides:
/// in place, one cell right, one cell left.
const KICK_OFFSETS: [i32; 3] = [0, 1, -1];

/// Lifecycle of a game.
///
/// `Stopped` is terminal: once a spawn is blocked the board rejects all
/// further mutation, and a driver starts over by constructing a new
/// [`Board`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum GameState {
    Playing,
    Paused,
    Stopped,
}

/// Complete game state: the grid of locked blocks, the falling piece, the
/// piece bag, the held piece, the score and the lifecycle state.
///
/// All mutation goes through the public methods, which keep the board's
/// central invariant: the falling piece never overlaps a locked block and
/// never leaves the grid. Every move is probed against a candidate cell set
/// first and committed only when the probe stays clear.
///
/// While the state is [`Paused`](GameState::Paused) or
/// [`Stopped`](GameState::Stopped), all movement, rotation and hold methods
/// are no-ops.
#[derive(Debug, Clone)]
pub struct Board {
    grid: Grid,
    bag: PieceBag,
    current: Option<Piece>,
    held: Option<BlockKind>,
    hold_locked: bool,
    score: usize,
    state: GameState,
}

impl Board {
    /// Creates a board with a randomly seeded bag and spawns the first
    /// piece.
    ///
    /// # Panics
    ///
    /// Panics if `width` or `height` is not positive.
    #[must_use]
    pub fn new(width: i32, height: i32) -> Self {
        Self::with_seed(width, height, rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific bag seed for a deterministic
    /// piece sequence.
    #[must_use]
    pub fn with_seed(width: i32, height: i32, seed: BagSeed) -> Self {
        let mut board = Self {
            grid: Grid::new(width, height),
            bag: PieceBag::with_seed(seed),
            current: None,
            held: None,
            hold_locked: false,
            score: 0,
            state: GameState::Playing,
        };
        board.spawn_next_piece();
        board
    }

    #[must_use]
    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    #[must_use]
    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    /// The locked block at a cell, or `None` when the cell is empty or out
    /// of bounds. The falling piece is not part of the grid; renderers draw
    /// it from [`current_piece`](Self::current_piece).
    #[must_use]
    pub fn block_at(&self, pos: GridPos) -> Option<BlockKind> {
        self.grid.cell(pos)
    }

    #[must_use]
    pub fn current_piece(&self) -> Option<&Piece> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<BlockKind> {
        self.held
    }

    /// Upcoming kinds from the bag, in draw order.
    pub fn next_pieces(&self) -> impl Iterator<Item = BlockKind> + '_ {
        self.bag.next_pieces()
    }

    /// Where the falling piece would come to rest if dropped straight down.
    #[must_use]
    pub fn shadow_piece(&self) -> Option<Piece> {
        let piece = self.current?;
        let mut dy = 0;
        while !self.does_collide(&piece.translated_cells(0, dy + 1)) {
            dy += 1;
        }
        let mut shadow = piece;
        shadow.set_anchor(GridPos::new(piece.anchor().x, piece.anchor().y + dy));
        Some(shadow)
    }

    /// Whether any of the cells is outside the grid or already occupied by a
    /// locked block.
    #[must_use]
    pub fn does_collide(&self, cells: &[GridPos; 4]) -> bool {
        cells
            .iter()
            .any(|&pos| !self.grid.contains(pos) || self.grid.is_occupied(pos))
    }

    /// Toggles between playing and paused. A stopped game stays stopped.
    pub fn pause(&mut self) {
        self.state = match self.state {
            GameState::Playing => GameState::Paused,
            GameState::Paused => GameState::Playing,
            GameState::Stopped => GameState::Stopped,
        };
    }

    /// Applies one step of gravity, or a soft drop when `forced`.
    ///
    /// Returns `true` when the falling piece can no longer move down: it hit
    /// the floor or a locked block and has been locked in place (clearing
    /// rows and spawning the next piece), or the board is not playing. A
    /// successful forced step scores one point.
    pub fn move_down(&mut self, forced: bool) -> bool {
        self.move_current(0, 1, forced)
    }

    pub fn move_left(&mut self) {
        self.move_current(-1, 0, false);
    }

    pub fn move_right(&mut self) {
        self.move_current(1, 0, false);
    }

    /// Drops the falling piece straight down and locks it, scoring one point
    /// per cell descended.
    pub fn hard_drop(&mut self) {
        while !self.move_down(true) {}
    }

    /// Rotates the falling piece a quarter turn, kicking off walls.
    ///
    /// The rotated offsets are tried at the current anchor first, then one
    /// cell to the right, then one cell to the left; the first placement
    /// that fits is committed. Returns `false` when all three collide, which
    /// leaves the piece untouched.
    pub fn rotate(&mut self, clockwise: bool) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        let Some(mut piece) = self.current else {
            return false;
        };
        // The square is rotation-symmetric, but its offsets are not centered
        // on the pivot; rotating them would shift it sideways.
        if piece.kind() == BlockKind::Square {
            return false;
        }
        let rotated = piece.rotated_offsets(clockwise);
        for dx in KICK_OFFSETS {
            let anchor = GridPos::new(piece.anchor().x + dx, piece.anchor().y);
            if !self.does_collide(&Piece::cells_at(anchor, &rotated)) {
                piece.set_anchor(anchor);
                piece.set_offsets(rotated);
                self.current = Some(piece);
                return true;
            }
        }
        false
    }

    /// Swaps the falling piece with the held one.
    ///
    /// The falling piece's kind goes into the hold slot and the previously
    /// held kind respawns at the top; when the slot was empty the next bag
    /// piece spawns instead. Allowed once per piece: the slot relocks until
    /// the current piece locks. Returns `false` when the swap is not allowed
    /// right now.
    pub fn switch_with_held(&mut self) -> bool {
        if !self.state.is_playing() || self.hold_locked {
            return false;
        }
        let Some(piece) = self.current.take() else {
            return false;
        };
        self.hold_locked = true;
        match self.held.replace(piece.kind()) {
            Some(previous) => self.place_at_spawn(previous),
            None => self.spawn_next_piece(),
        }
        true
    }

    /// Moves the falling piece by `(dx, dy)` if the target cells are free.
    ///
    /// A blocked downward move locks the piece instead; a blocked sideways
    /// move does nothing. Returns `true` when the piece is no longer
    /// movable.
    fn move_current(&mut self, dx: i32, dy: i32, add_score: bool) -> bool {
        if !self.state.is_playing() {
            return true;
        }
        let Some(mut piece) = self.current else {
            return true;
        };

        if !self.does_collide(&piece.translated_cells(dx, dy)) {
            let anchor = piece.anchor();
            piece.set_anchor(GridPos::new(anchor.x + dx, anchor.y + dy));
            self.current = Some(piece);
            if add_score && dy > 0 {
                self.score += 1;
            }
            return false;
        }

        if dy > 0 {
            self.lock_current(piece);
            return true;
        }
        false
    }

    /// Writes the piece's blocks into the grid, clears any completed rows,
    /// re-arms the hold slot and spawns the next piece.
    fn lock_current(&mut self, piece: Piece) {
        for pos in piece.cells() {
            self.grid.set(pos, piece.kind());
        }
        self.current = None;
        self.cleanup_rows();
        self.hold_locked = false;
        self.spawn_next_piece();
    }

    fn cleanup_rows(&mut self) {
        let full = self.grid.full_rows();
        if full.is_empty() {
            return;
        }
        let bonus = ROW_CLEAR_BASE + ROW_CLEAR_PER_ROW * full.len();
        // Collapse topmost-first so the lower rows' indices stay valid.
        for &row in full.iter().rev() {
            self.score += bonus;
            self.grid.collapse_row(row);
        }
    }

    fn spawn_next_piece(&mut self) {
        let kind = self.bag.pop_next();
        self.place_at_spawn(kind);
    }

    /// Puts a fresh piece of the given kind at the spawn anchor. A blocked
    /// spawn ends the game.
    fn place_at_spawn(&mut self, kind: BlockKind) {
        let mut piece = Piece::new(kind);
        piece.set_anchor(GridPos::new(self.grid.width() / 2, 1));
        if self.does_collide(&piece.cells()) {
            self.state = GameState::Stopped;
            self.current = None;
        } else {
            self.current = Some(piece);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_board(grid: Grid, kind: BlockKind) -> Board {
        let mut board = Board {
            grid,
            bag: PieceBag::with_seed(BagSeed::from_bytes([7; 16])),
            current: None,
            held: None,
            hold_locked: false,
            score: 0,
            state: GameState::Playing,
        };
        board.place_at_spawn(kind);
        board
    }

    fn board_with(kind: BlockKind) -> Board {
        seeded_board(Grid::new(10, 20), kind)
    }

    fn current_anchor(board: &Board) -> GridPos {
        board.current_piece().unwrap().anchor()
    }

    #[test]
    fn test_piece_spawns_centered_near_top() {
        let board = board_with(BlockKind::Square);
        assert_eq!(
            board.current_piece().unwrap().cells(),
            [
                GridPos::new(5, 1),
                GridPos::new(6, 1),
                GridPos::new(5, 2),
                GridPos::new(6, 2),
            ]
        );
    }

    #[test]
    fn test_gravity_moves_piece_down_one_cell() {
        let mut board = board_with(BlockKind::Square);
        assert!(!board.move_down(false));
        assert_eq!(current_anchor(&board), GridPos::new(5, 2));
        assert_eq!(board.score(), 0);
    }

    #[test]
    fn test_piece_locks_on_the_floor() {
        let mut board = board_with(BlockKind::Square);

        // Anchor can descend from row 1 to row 18 (blocks reach row 19).
        for _ in 0..17 {
            assert!(!board.move_down(false));
        }
        assert!(board.move_down(false));

        for pos in [
            GridPos::new(5, 18),
            GridPos::new(6, 18),
            GridPos::new(5, 19),
            GridPos::new(6, 19),
        ] {
            assert!(board.grid.is_occupied(pos));
        }
        // Unforced gravity steps score nothing.
        assert_eq!(board.score(), 0);
        // The next piece has already spawned.
        assert!(board.current_piece().is_some());
        assert!(board.state().is_playing());
    }

    #[test]
    fn test_soft_drop_scores_per_cell() {
        let mut board = board_with(BlockKind::Square);
        for _ in 0..3 {
            board.move_down(true);
        }
        assert_eq!(board.score(), 3);
    }

    #[test]
    fn test_hard_drop_scores_descended_cells_and_locks() {
        let mut board = board_with(BlockKind::Square);
        board.hard_drop();
        assert_eq!(board.score(), 17);
        assert!(board.grid.is_occupied(GridPos::new(5, 19)));
    }

    #[test]
    fn test_blocked_sideways_move_does_not_lock() {
        let mut board = board_with(BlockKind::Square);
        for _ in 0..5 {
            board.move_left();
        }
        assert_eq!(current_anchor(&board), GridPos::new(0, 1));

        // Pressed against the wall: nothing moves, nothing locks.
        board.move_left();
        assert_eq!(current_anchor(&board), GridPos::new(0, 1));
        assert!(!board.grid.is_occupied(GridPos::new(0, 19)));
        assert_eq!(board.score(), 0);
    }

    #[test]
    fn test_move_right_stops_at_the_wall() {
        let mut board = board_with(BlockKind::Square);
        for _ in 0..10 {
            board.move_right();
        }
        // Rightmost block sits at x = 9.
        assert_eq!(current_anchor(&board), GridPos::new(8, 1));
    }

    #[test]
    fn test_rotation_kicks_one_cell_off_the_left_wall() {
        let mut board = board_with(BlockKind::Straight);
        board.current.as_mut().unwrap().set_anchor(GridPos::new(1, 2));

        // Clockwise turns the vertical line into (1,0)(0,0)(-1,0)(-2,0); at
        // x = 1 that pokes out to x = -1, so the piece kicks one cell right.
        assert!(board.rotate(true));
        assert_eq!(current_anchor(&board), GridPos::new(2, 2));
        assert_eq!(
            board.current_piece().unwrap().cells(),
            [
                GridPos::new(3, 2),
                GridPos::new(2, 2),
                GridPos::new(1, 2),
                GridPos::new(0, 2),
            ]
        );
    }

    #[test]
    fn test_rotation_kicks_one_cell_off_the_right_wall() {
        let mut board = board_with(BlockKind::Straight);
        board.current.as_mut().unwrap().set_anchor(GridPos::new(8, 2));

        // Counter-clockwise offsets span x -1..=2; both the in-place trial
        // and the rightward kick stick out past x = 9, the leftward one fits.
        assert!(board.rotate(false));
        assert_eq!(current_anchor(&board), GridPos::new(7, 2));
    }

    #[test]
    fn test_square_never_rotates() {
        let mut board = board_with(BlockKind::Square);
        assert!(!board.rotate(true));
        assert!(!board.rotate(false));
        assert_eq!(
            board.current_piece().unwrap().offsets(),
            BlockKind::Square.spawn_offsets()
        );
        assert_eq!(current_anchor(&board), GridPos::new(5, 1));
    }

    #[test]
    fn test_rotation_blocked_on_all_trials_is_a_no_op() {
        let mut board = board_with(BlockKind::Straight);
        board.current = None;
        board.grid = Grid::from_ascii(
            10,
            20,
            "
            ..........
            ..........
            #.########
            ",
        );
        let mut piece = Piece::new(BlockKind::Straight);
        piece.set_anchor(GridPos::new(1, 2));
        board.current = Some(piece);

        // Every horizontal placement in row 2 hits a locked block or a wall.
        assert!(!board.rotate(true));
        assert_eq!(current_anchor(&board), GridPos::new(1, 2));
        assert_eq!(
            board.current_piece().unwrap().offsets(),
            BlockKind::Straight.spawn_offsets()
        );
    }

    #[test]
    fn test_single_row_clear_scores_and_shifts() {
        let mut grid = Grid::new(10, 20);
        for x in 0..10 {
            if x != 5 && x != 6 {
                grid.set(GridPos::new(x, 19), BlockKind::LShape);
            }
        }
        // Marker in the row above the gap; it must land in row 19.
        grid.set(GridPos::new(0, 18), BlockKind::TShape);

        let mut board = seeded_board(grid, BlockKind::Square);
        board.hard_drop();

        // 17 drop points plus one cleared row at 100 + 50 * 1.
        assert_eq!(board.score(), 17 + 150);
        assert_eq!(board.block_at(GridPos::new(0, 19)), Some(BlockKind::TShape));
        // The square's upper half also shifted down into row 19.
        assert!(board.grid.is_occupied(GridPos::new(5, 19)));
        assert!(board.grid.is_occupied(GridPos::new(6, 19)));
        assert!(!board.grid.is_occupied(GridPos::new(1, 19)));
    }

    #[test]
    fn test_double_row_clear_pays_the_higher_bonus() {
        let mut grid = Grid::new(10, 20);
        for y in [18, 19] {
            for x in 0..10 {
                if x != 5 && x != 6 {
                    grid.set(GridPos::new(x, y), BlockKind::JShape);
                }
            }
        }

        let mut board = seeded_board(grid, BlockKind::Square);
        board.hard_drop();

        // 17 drop points plus two rows at 100 + 50 * 2 each.
        assert_eq!(board.score(), 17 + 2 * 200);
        for x in 0..10 {
            assert!(!board.grid.is_occupied(GridPos::new(x, 19)));
        }
    }

    #[test]
    fn test_lock_without_full_rows_changes_nothing_but_the_drop() {
        let mut board = board_with(BlockKind::TShape);
        board.hard_drop();
        // Only the drop itself scored.
        assert_eq!(board.score(), 17);

        // No row was full, so the locked cells sit exactly where the piece
        // came to rest and nothing shifted.
        for pos in [
            GridPos::new(4, 18),
            GridPos::new(5, 18),
            GridPos::new(6, 18),
            GridPos::new(5, 19),
        ] {
            assert!(board.grid.is_occupied(pos));
        }
        for x in [0, 1, 2, 3, 7, 8, 9] {
            assert!(!board.grid.is_occupied(GridPos::new(x, 19)));
            assert!(!board.grid.is_occupied(GridPos::new(x, 18)));
        }
        assert!(!board.grid.is_occupied(GridPos::new(4, 19)));
        assert!(!board.grid.is_occupied(GridPos::new(6, 19)));
    }

    #[test]
    fn test_hold_is_one_shot_until_lock() {
        let mut board = board_with(BlockKind::Square);

        assert!(board.switch_with_held());
        assert_eq!(board.held_piece(), Some(BlockKind::Square));
        let replacement = board.current_piece().unwrap().kind();

        // Second swap before the piece locks is rejected.
        assert!(!board.switch_with_held());
        assert_eq!(board.held_piece(), Some(BlockKind::Square));
        assert_eq!(board.current_piece().unwrap().kind(), replacement);

        // Locking re-arms the hold slot and swapping returns the square.
        board.hard_drop();
        let next = board.current_piece().unwrap().kind();
        assert!(board.switch_with_held());
        assert_eq!(board.held_piece(), Some(next));
        assert_eq!(board.current_piece().unwrap().kind(), BlockKind::Square);
        assert_eq!(current_anchor(&board), GridPos::new(5, 1));
    }

    #[test]
    fn test_pause_toggles_between_playing_and_paused() {
        let mut board = board_with(BlockKind::Square);
        assert!(board.state().is_playing());
        board.pause();
        assert!(board.state().is_paused());
        board.pause();
        assert!(board.state().is_playing());
    }

    #[test]
    fn test_pause_does_not_revive_a_stopped_game() {
        let mut board = board_with(BlockKind::Square);
        board.state = GameState::Stopped;
        board.pause();
        assert!(board.state().is_stopped());
    }

    #[test]
    fn test_moves_are_ignored_while_paused() {
        let mut board = board_with(BlockKind::Square);
        board.pause();

        board.move_left();
        board.move_right();
        assert!(board.move_down(true));
        assert!(!board.rotate(true));
        assert!(!board.switch_with_held());
        board.hard_drop();

        assert_eq!(current_anchor(&board), GridPos::new(5, 1));
        assert_eq!(board.score(), 0);
        assert!(board.held_piece().is_none());
    }

    #[test]
    fn test_blocked_spawn_stops_the_game() {
        let mut grid = Grid::new(10, 20);
        grid.set(GridPos::new(5, 2), BlockKind::ZSkew);

        let board = seeded_board(grid, BlockKind::Square);
        assert!(board.state().is_stopped());
        assert!(board.current_piece().is_none());
    }

    #[test]
    fn test_shadow_piece_rests_on_obstacles() {
        let mut board = board_with(BlockKind::Square);

        let shadow = board.shadow_piece().unwrap();
        assert_eq!(shadow.anchor(), GridPos::new(5, 18));
        // The falling piece itself has not moved.
        assert_eq!(current_anchor(&board), GridPos::new(5, 1));

        board.grid.set(GridPos::new(5, 10), BlockKind::SSkew);
        let shadow = board.shadow_piece().unwrap();
        assert_eq!(shadow.anchor(), GridPos::new(5, 8));
    }

    #[test]
    fn test_does_collide_rejects_walls_and_blocks() {
        let mut board = board_with(BlockKind::Square);
        board.grid.set(GridPos::new(3, 10), BlockKind::Straight);

        let free = [
            GridPos::new(0, 0),
            GridPos::new(9, 0),
            GridPos::new(0, 19),
            GridPos::new(9, 19),
        ];
        assert!(!board.does_collide(&free));

        let out_left = [GridPos::new(-1, 5); 4];
        let out_bottom = [GridPos::new(5, 20); 4];
        let occupied = [GridPos::new(3, 10); 4];
        assert!(board.does_collide(&out_left));
        assert!(board.does_collide(&out_bottom));
        assert!(board.does_collide(&occupied));
    }

    #[test]
    fn test_same_seed_gives_the_same_game() {
        let seed = BagSeed::from_bytes([0x21; 16]);
        let mut a = Board::with_seed(10, 20, seed);
        let mut b = Board::with_seed(10, 20, seed);

        for _ in 0..10 {
            assert_eq!(
                a.current_piece().unwrap().kind(),
                b.current_piece().unwrap().kind()
            );
            a.hard_drop();
            b.hard_drop();
            assert_eq!(a.score(), b.score());
        }
    }
}
