//! The chess board: pieces, squares, and move legality.
//!
//! Row 0 is rank 8 (Black's back rank) and row 7 is rank 1 (White's).
//! Column 0 is file `a`. Pieces are addressed by label (`P5W`, `QB`, ...)
//! rather than by origin square, so a move names *which* piece and *where*.

use std::fmt;

// ---------------------------------------------------------------------------
// Pieces
// ---------------------------------------------------------------------------

/// The six kinds of chess piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

/// Which army a piece belongs to. White moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    White,
    Black,
}

impl Side {
    /// The opposing side.
    pub fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// `W` or `B`, as used in piece labels and move announcements.
    pub fn letter(self) -> char {
        match self {
            Self::White => 'W',
            Self::Black => 'B',
        }
    }
}

/// A piece on the board. Held by value; copying a board copies its pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
    pub label: &'static str,
}

const WHITE_BACK: [(PieceKind, &str); 8] = [
    (PieceKind::Rook, "R1W"),
    (PieceKind::Knight, "K1W"),
    (PieceKind::Bishop, "B1W"),
    (PieceKind::Queen, "QW"),
    (PieceKind::King, "KW"),
    (PieceKind::Bishop, "B2W"),
    (PieceKind::Knight, "K2W"),
    (PieceKind::Rook, "R2W"),
];

const BLACK_BACK: [(PieceKind, &str); 8] = [
    (PieceKind::Rook, "R1B"),
    (PieceKind::Knight, "K1B"),
    (PieceKind::Bishop, "B1B"),
    (PieceKind::Queen, "QB"),
    (PieceKind::King, "KB"),
    (PieceKind::Bishop, "B2B"),
    (PieceKind::Knight, "K2B"),
    (PieceKind::Rook, "R2B"),
];

const WHITE_PAWNS: [&str; 8] = ["P1W", "P2W", "P3W", "P4W", "P5W", "P6W", "P7W", "P8W"];
const BLACK_PAWNS: [&str; 8] = ["P1B", "P2B", "P3B", "P4B", "P5B", "P6B", "P7B", "P8B"];

// ---------------------------------------------------------------------------
// Squares
// ---------------------------------------------------------------------------

/// A board coordinate. `row` 0 is rank 8; `col` 0 is file `a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Square {
    pub row: usize,
    pub col: usize,
}

impl Square {
    /// Parses algebraic notation such as `e4`.
    ///
    /// # Errors
    /// - [`MoveError::BadDestination`]: not exactly two characters.
    /// - [`MoveError::OutOfBounds`]: file outside `a..=h` or rank outside `1..=8`.
    pub fn parse(s: &str) -> Result<Self, MoveError> {
        let &[file, rank] = s.as_bytes() else {
            return Err(MoveError::BadDestination);
        };
        let col = i32::from(file) - i32::from(b'a');
        let row = 8 - (i32::from(rank) - i32::from(b'0'));
        if !(0..8).contains(&col) || !(0..8).contains(&row) {
            return Err(MoveError::OutOfBounds);
        }
        Ok(Self {
            row: row as usize,
            col: col as usize,
        })
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", char::from(b'a' + self.col as u8), 8 - self.row)
    }
}

// ---------------------------------------------------------------------------
// MoveError
// ---------------------------------------------------------------------------

/// Why a move was refused. The `Display` text is sent to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("Piece not found or not yours!")]
    PieceNotFound,

    #[error("Invalid destination format! Use e.g., 'e5'")]
    BadDestination,

    #[error("Destination out of bounds!")]
    OutOfBounds,

    #[error("Invalid move! Cannot move to the same square.")]
    SameSquare,

    #[error("Invalid move! Cannot capture your own piece.")]
    OwnPiece,

    #[error("{}", pawn_rule(.0))]
    IllegalPawn(Side),

    #[error("Invalid knight move! Knights move in an L-shape (2x1 or 1x2).")]
    IllegalKnight,

    #[error("Invalid bishop move! Bishops move diagonally any distance.")]
    IllegalBishop,

    #[error("Invalid rook move! Rooks move horizontally or vertically any distance.")]
    IllegalRook,

    #[error("Invalid queen move! Queens move diagonally, horizontally, or vertically any distance.")]
    IllegalQueen,

    #[error("Invalid king move! Kings move one square in any direction.")]
    IllegalKing,
}

fn pawn_rule(side: &Side) -> &'static str {
    match side {
        Side::White => {
            "Invalid pawn move! White pawns move up one (or two from row 2) or capture diagonally."
        }
        Side::Black => {
            "Invalid pawn move! Black pawns move down one (or two from row 7) or capture diagonally."
        }
    }
}

/// What a legal move did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The piece moved (possibly capturing something other than a king).
    Moved,

    /// The piece landed on the opposing king.
    CapturedKing { by: PieceKind },
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// An 8×8 board holding pieces by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// A board with no pieces on it.
    pub fn empty() -> Self {
        Self {
            squares: [[None; 8]; 8],
        }
    }

    /// The standard starting position with labelled pieces.
    pub fn standard() -> Self {
        let mut board = Self::empty();
        for col in 0..8 {
            let (kind, label) = BLACK_BACK[col];
            board.squares[0][col] = Some(Piece { kind, side: Side::Black, label });
            board.squares[1][col] = Some(Piece {
                kind: PieceKind::Pawn,
                side: Side::Black,
                label: BLACK_PAWNS[col],
            });
            board.squares[6][col] = Some(Piece {
                kind: PieceKind::Pawn,
                side: Side::White,
                label: WHITE_PAWNS[col],
            });
            let (kind, label) = WHITE_BACK[col];
            board.squares[7][col] = Some(Piece { kind, side: Side::White, label });
        }
        board
    }

    /// Returns the piece on `sq`, if any.
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.row][sq.col]
    }

    /// Puts `piece` on `sq` (or clears it), replacing whatever was there.
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.squares[sq.row][sq.col] = piece;
    }

    /// Finds `side`'s piece with this label.
    pub fn find(&self, side: Side, label: &str) -> Option<Square> {
        self.squares.iter().enumerate().find_map(|(row, rank)| {
            rank.iter().enumerate().find_map(|(col, cell)| {
                cell.filter(|p| p.side == side && p.label == label)
                    .map(|_| Square { row, col })
            })
        })
    }

    /// Moves `side`'s piece `label` to `dest` (algebraic) if legal.
    ///
    /// On error the board is unchanged.
    pub fn apply(&mut self, side: Side, label: &str, dest: &str) -> Result<MoveOutcome, MoveError> {
        let from = self.find(side, label).ok_or(MoveError::PieceNotFound)?;
        let to = Square::parse(dest)?;
        self.check_legal(from, to)?;

        let captured = self.get(to);
        let moving = self.get(from);
        self.set(to, moving);
        self.set(from, None);

        match (captured, moving) {
            (Some(target), Some(piece)) if target.kind == PieceKind::King => {
                Ok(MoveOutcome::CapturedKing { by: piece.kind })
            }
            _ => Ok(MoveOutcome::Moved),
        }
    }

    /// Returns the side whose king is no longer on the board, if any.
    pub fn missing_king(&self) -> Option<Side> {
        let has_king = |side: Side| {
            self.squares
                .iter()
                .flatten()
                .flatten()
                .any(|p| p.kind == PieceKind::King && p.side == side)
        };
        [Side::White, Side::Black]
            .into_iter()
            .find(|&side| !has_king(side))
    }

    /// Checks movement rules for the piece on `from`. No check detection,
    /// castling, en passant, or promotion.
    fn check_legal(&self, from: Square, to: Square) -> Result<(), MoveError> {
        let Some(piece) = self.get(from) else {
            return Err(MoveError::PieceNotFound);
        };
        if from == to {
            return Err(MoveError::SameSquare);
        }
        let target = self.get(to);
        if target.is_some_and(|t| t.side == piece.side) {
            return Err(MoveError::OwnPiece);
        }

        let dr = to.row as i32 - from.row as i32;
        let dc = to.col as i32 - from.col as i32;
        let (adr, adc) = (dr.abs(), dc.abs());

        let legal = match piece.kind {
            PieceKind::Pawn => {
                // White advances toward row 0, Black toward row 7.
                let (dir, home) = match piece.side {
                    Side::White => (-1, 6),
                    Side::Black => (1, 1),
                };
                let single = dr == dir && dc == 0 && target.is_none();
                let double = from.row == home
                    && dr == 2 * dir
                    && dc == 0
                    && target.is_none()
                    && self.squares[(from.row as i32 + dir) as usize][from.col].is_none();
                let capture = dr == dir && adc == 1 && target.is_some();
                single || double || capture
            }
            PieceKind::Knight => (adr == 2 && adc == 1) || (adr == 1 && adc == 2),
            PieceKind::Bishop => adr == adc && self.path_clear(from, to),
            PieceKind::Rook => (dr == 0 || dc == 0) && self.path_clear(from, to),
            PieceKind::Queen => (adr == adc || dr == 0 || dc == 0) && self.path_clear(from, to),
            PieceKind::King => adr <= 1 && adc <= 1,
        };

        if legal {
            return Ok(());
        }
        Err(match piece.kind {
            PieceKind::Pawn => MoveError::IllegalPawn(piece.side),
            PieceKind::Knight => MoveError::IllegalKnight,
            PieceKind::Bishop => MoveError::IllegalBishop,
            PieceKind::Rook => MoveError::IllegalRook,
            PieceKind::Queen => MoveError::IllegalQueen,
            PieceKind::King => MoveError::IllegalKing,
        })
    }

    /// `true` if every square strictly between `from` and `to` is empty.
    /// Only meaningful for straight or diagonal lines.
    fn path_clear(&self, from: Square, to: Square) -> bool {
        let dr = (to.row as i32 - from.row as i32).signum();
        let dc = (to.col as i32 - from.col as i32).signum();
        let steps = (to.row as i32 - from.row as i32)
            .abs()
            .max((to.col as i32 - from.col as i32).abs());
        (1..steps).all(|i| {
            let row = (from.row as i32 + i * dr) as usize;
            let col = (from.col as i32 + i * dc) as usize;
            self.squares[row][col].is_none()
        })
    }

    /// Renders the board as plain text, rank 8 at the top.
    pub fn render(&self) -> String {
        const FILES: &str = "    a   b   c   d   e   f   g   h";
        const RULE: &str = "  +---+---+---+---+---+---+---+---+";

        let mut out = String::new();
        out.push_str(FILES);
        out.push('\n');
        out.push_str(RULE);
        out.push('\n');
        for (row, rank) in self.squares.iter().enumerate() {
            out.push_str(&format!("{} |", 8 - row));
            for cell in rank {
                match cell {
                    Some(p) => out.push_str(&format!("{:<3}|", p.label)),
                    None => out.push_str(" . |"),
                }
            }
            out.push('\n');
            out.push_str(RULE);
            out.push('\n');
        }
        out.push_str(FILES);
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}
