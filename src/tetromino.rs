use std::sync::LazyLock;

use rand::Rng;

use crate::grid::Grid;

// ============================================================================
// Kinds
// ============================================================================

/// The seven tetromino kinds. The discriminant is the id stamped into
/// playfield cells.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum TetrominoKind {
    I = 1,
    J = 2,
    L = 3,
    O = 4,
    S = 5,
    T = 6,
    Z = 7,
}

const LABELS: [char; 7] = ['I', 'J', 'L', 'O', 'S', 'T', 'Z'];

const COLORS: [&str; 7] = [
    "#0ff", "#00f", "#ffa500", "#ff0", "#0f0", "#800080", "#f00",
];

impl TetrominoKind {
    pub const ALL: [TetrominoKind; 7] = [
        TetrominoKind::I,
        TetrominoKind::J,
        TetrominoKind::L,
        TetrominoKind::O,
        TetrominoKind::S,
        TetrominoKind::T,
        TetrominoKind::Z,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> char {
        LABELS[self.slot()]
    }

    pub fn color(self) -> &'static str {
        COLORS[self.slot()]
    }

    /// Looks up a kind by cell value; `None` outside `1..=7`.
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(usize::from(id).checked_sub(1)?).copied()
    }

    pub fn from_label(label: char) -> Option<Self> {
        let slot = LABELS.iter().position(|&l| l == label)?;
        Some(Self::ALL[slot])
    }

    /// Uniform draw over all seven kinds.
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    fn slot(self) -> usize {
        usize::from(self.id()) - 1
    }

    fn template(self) -> Grid {
        match self {
            TetrominoKind::I => Grid::from_rows([
                [0, 0, 0, 0],
                [1, 1, 1, 1],
                [0, 0, 0, 0],
                [0, 0, 0, 0],
            ]),
            TetrominoKind::J => Grid::from_rows([
                [2, 0, 0],
                [2, 2, 2],
                [0, 0, 0],
            ]),
            TetrominoKind::L => Grid::from_rows([
                [0, 0, 3],
                [3, 3, 3],
                [0, 0, 0],
            ]),
            TetrominoKind::O => Grid::from_rows([
                [4, 4],
                [4, 4],
            ]),
            TetrominoKind::S => Grid::from_rows([
                [0, 5, 5],
                [5, 5, 0],
                [0, 0, 0],
            ]),
            TetrominoKind::T => Grid::from_rows([
                [0, 6, 0],
                [6, 6, 6],
                [0, 0, 0],
            ]),
            TetrominoKind::Z => Grid::from_rows([
                [7, 7, 0],
                [0, 7, 7],
                [0, 0, 0],
            ]),
        }
    }
}

/// Display colour of a playfield cell value, `None` for empty or unknown cells.
///
/// This is the only mapping a renderer should use to colour cells.
pub fn color_of(cell: u8) -> Option<&'static str> {
    TetrominoKind::from_id(cell).map(TetrominoKind::color)
}

// ============================================================================
// Tetromino
// ============================================================================

static CANONICAL: LazyLock<[Tetromino; 7]> = LazyLock::new(|| {
    TetrominoKind::ALL.map(|kind| Tetromino {
        kind,
        shape: kind.template(),
    })
});

/// A tetromino shape in some orientation.
///
/// The canonical spawn orientations are shared read-only values; rotating
/// always happens on an owned copy.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Tetromino {
    kind: TetrominoKind,
    shape: Grid,
}

impl Tetromino {
    pub fn canonical(kind: TetrominoKind) -> &'static Tetromino {
        &CANONICAL[kind.slot()]
    }

    pub fn by_id(id: u8) -> Option<&'static Tetromino> {
        TetrominoKind::from_id(id).map(Self::canonical)
    }

    pub fn by_label(label: char) -> Option<&'static Tetromino> {
        TetrominoKind::from_label(label).map(Self::canonical)
    }

    pub fn random() -> &'static Tetromino {
        Self::canonical(TetrominoKind::random())
    }

    pub fn kind(&self) -> TetrominoKind {
        self.kind
    }

    pub fn id(&self) -> u8 {
        self.kind.id()
    }

    pub fn label(&self) -> char {
        self.kind.label()
    }

    pub fn color(&self) -> &'static str {
        self.kind.color()
    }

    pub fn shape(&self) -> &Grid {
        &self.shape
    }

    pub fn width(&self) -> usize {
        self.shape.width()
    }

    pub fn height(&self) -> usize {
        self.shape.height()
    }

    pub fn rotate_cw(&mut self) {
        self.shape.rotate_cw();
    }

    pub fn rotate_ccw(&mut self) {
        self.shape.rotate_ccw();
    }

    /// A clockwise-rotated working copy; `self` is unchanged.
    pub fn rotated_cw(&self) -> Self {
        let mut copy = self.clone();
        copy.rotate_cw();
        copy
    }

    /// A counter-clockwise-rotated working copy; `self` is unchanged.
    pub fn rotated_ccw(&self) -> Self {
        let mut copy = self.clone();
        copy.rotate_ccw();
        copy
    }
}
