use crate::r#move::Move;
use crate::square::Square;
use arrayvec::ArrayVec;
use rand::seq::SliceRandom;
use rand::Rng;

// No reachable position comes close to this many pseudo-legal moves
pub const MAX_MOVELIST_CAPACITY: usize = 256;

#[derive(Clone, Debug)]
pub struct MoveList(ArrayVec<Move, MAX_MOVELIST_CAPACITY>);
impl Default for MoveList {
    fn default() -> Self {
        MoveList(ArrayVec::new())
    }
}
impl MoveList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn push(&mut self, m: Move) {
        self.0.push(m)
    }
    /// Looks a move up by its endpoints
    pub fn find(&self, start: Square, end: Square) -> Option<Move> {
        self.0.iter().find(|m| m.start() == start && m.end() == end).copied()
    }
    pub fn retain<F: FnMut(&mut Move) -> bool>(&mut self, f: F) {
        self.0.retain(f)
    }
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.0.as_mut_slice().shuffle(rng)
    }
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Move> {
        self.0.as_slice().choose(rng).copied()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.0.iter()
    }
}
impl Extend<Move> for MoveList {
    fn extend<I: IntoIterator<Item = Move>>(&mut self, iter: I) {
        for m in iter {
            self.push(m)
        }
    }
}
impl std::fmt::Display for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        let mut s = String::new();
        for m in self.0.iter() {
            s.push_str(&format!("{} ", m))
        }
        write!(f, "{}", s.trim())
    }
}
impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = arrayvec::IntoIter<Move, MAX_MOVELIST_CAPACITY>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
