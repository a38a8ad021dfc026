use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{SeedableRng, thread_rng};
use serde::{Deserialize, Serialize};
use tsify::Tsify;

use crate::shape::Tetromino;

/// Source of the next piece kind.
pub trait Randomizer {
    fn next(&mut self) -> Tetromino;
}

#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq, Tsify)]
pub enum RandomizerKind {
    #[default]
    TrueRandom,
    Seeded { seed: u64 },
    Sequence { pieces: Vec<Tetromino> },
    SinglePiece { piece: Tetromino },
}

/// Uniform pick from the seven kinds on the thread-local generator.
pub struct TrueRandom;

impl Randomizer for TrueRandom {
    fn next(&mut self) -> Tetromino {
        pick_uniform(&mut thread_rng())
    }
}

/// Uniform pick from a seeded generator, for reproducible games.
pub struct Seeded {
    rng: StdRng,
}

impl Seeded {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Randomizer for Seeded {
    fn next(&mut self) -> Tetromino {
        pick_uniform(&mut self.rng)
    }
}

/// Cycles through a fixed order of pieces.
pub struct Sequence {
    pieces: Vec<Tetromino>,
    cursor: usize,
}

impl Sequence {
    pub fn new(pieces: Vec<Tetromino>) -> Self {
        Self { pieces, cursor: 0 }
    }
}

impl Randomizer for Sequence {
    fn next(&mut self) -> Tetromino {
        let Some(&piece) = self.pieces.get(self.cursor % self.pieces.len().max(1)) else {
            return Tetromino::I;
        };
        self.cursor += 1;
        piece
    }
}

pub struct SinglePiece {
    piece: Tetromino,
}

impl Randomizer for SinglePiece {
    fn next(&mut self) -> Tetromino {
        self.piece
    }
}

fn pick_uniform<R: rand::Rng>(rng: &mut R) -> Tetromino {
    let all = Tetromino::all();
    *all.choose(rng).unwrap_or(&Tetromino::I)
}

pub fn randomizer_from_kind(kind: RandomizerKind) -> Box<dyn Randomizer> {
    match kind {
        RandomizerKind::TrueRandom => Box::new(TrueRandom),
        RandomizerKind::Seeded { seed } => Box::new(Seeded::new(seed)),
        RandomizerKind::Sequence { pieces } => Box::new(Sequence::new(pieces)),
        RandomizerKind::SinglePiece { piece } => Box::new(SinglePiece { piece }),
    }
}
