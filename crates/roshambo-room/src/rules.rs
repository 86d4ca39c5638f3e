//! Round resolution: the only "game logic" in the system.
//!
//! Pure functions, no hidden state. The room actor decides *when* a
//! round resolves (exactly two pending moves) and *who* occupies which
//! slot (join order); this module only decides the winner of an ordered
//! pair of moves.

use roshambo_protocol::Move;

/// The outcome of a round, in terms of slots rather than identities.
///
/// Slot one is the room's first joiner, slot two the second. The caller
/// maps slots back to player ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Slot one's move beats slot two's.
    PlayerOne,
    /// Slot two's move beats slot one's.
    PlayerTwo,
    /// Equal moves.
    Draw,
}

/// Returns the move that `mv` defeats.
///
/// The full cycle: rock → scissors → paper → rock.
pub fn beats(mv: Move) -> Move {
    match mv {
        Move::Rock => Move::Scissors,
        Move::Paper => Move::Rock,
        Move::Scissors => Move::Paper,
    }
}

/// Resolves an ordered pair of moves.
///
/// Total over the move enum — there is no "unrecognized move" case
/// because illegal strings are rejected at the protocol boundary and
/// never reach this function.
pub fn resolve(one: Move, two: Move) -> Outcome {
    if one == two {
        Outcome::Draw
    } else if beats(one) == two {
        Outcome::PlayerOne
    } else {
        Outcome::PlayerTwo
    }
}
