use crate::piece::Color;
use crate::piece::Color::{Black, White};
use std::fmt::{Display, Formatter};

/// The four castling flags, one bit per side and wing.
/// Rights only ever get revoked while playing; undoing a move restores the
/// snapshot kept in the history entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const ALL: CastlingRights = CastlingRights(0b1111);
    pub const NONE: CastlingRights = CastlingRights(0);

    pub fn new() -> CastlingRights {
        Self::ALL
    }

    pub fn from_flags(
        white_kingside: bool,
        white_queenside: bool,
        black_kingside: bool,
        black_queenside: bool,
    ) -> CastlingRights {
        let mut res = CastlingRights(0);
        if white_kingside {
            res.0 |= 0b1000
        }
        if white_queenside {
            res.0 |= 0b0100
        }
        if black_kingside {
            res.0 |= 0b0010
        }
        if black_queenside {
            res.0 |= 0b0001
        }
        res
    }

    /// Returns the castling rights of a given color as (kingside, queenside)
    pub fn get(&self, side: Color) -> (bool, bool) {
        match side {
            White => (self.0 & 0b1000 != 0, self.0 & 0b0100 != 0),
            Black => (self.0 & 0b10 != 0, self.0 & 0b01 != 0),
        }
    }
    /// Marks the given side as unable to castle
    pub fn revoke(&mut self, side: Color) {
        self.0 &= match side {
            White => 0b0011,
            Black => 0b1100,
        }
    }
    /// Marks the given side as unable to castle kingside
    pub fn revoke_kingside(&mut self, side: Color) {
        self.0 &= match side {
            White => 0b0111,
            Black => 0b1101,
        }
    }
    /// Marks the given side as unable to castle queenside
    pub fn revoke_queenside(&mut self, side: Color) {
        self.0 &= match side {
            White => 0b1011,
            Black => 0b1110,
        }
    }
}

impl Display for CastlingRights {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0 == 0 {
            return write!(f, "-");
        }
        let (wking, wqueen) = self.get(White);
        let (bking, bqueen) = self.get(Black);
        write!(
            f,
            "{}{}{}{}",
            if wking { "K" } else { "" },
            if wqueen { "Q" } else { "" },
            if bking { "k" } else { "" },
            if bqueen { "q" } else { "" }
        )
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revoking_one_wing_leaves_the_others() {
        let mut rights = CastlingRights::new();
        rights.revoke_queenside(White);
        assert_eq!(rights.get(White), (true, false));
        assert_eq!(rights.get(Black), (true, true));
        rights.revoke(Black);
        assert_eq!(rights.get(Black), (false, false));
        assert_eq!(rights.to_string(), "K");
        rights.revoke_kingside(White);
        assert_eq!(rights, CastlingRights::NONE);
        assert_eq!(rights.to_string(), "-");
    }

    #[test]
    fn flags_map_to_the_right_side() {
        let rights = CastlingRights::from_flags(false, true, true, false);
        assert_eq!(rights.get(White), (false, true));
        assert_eq!(rights.get(Black), (true, false));
        assert_eq!(rights.to_string(), "Qk");
    }
}
