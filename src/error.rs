use crate::coordinate::{Coordinate, Move};

/// Crate-wide error type. Each submodule defines its own error enum and
/// plugs in here via [`crate::util::err::impl_err`].
#[derive(Debug)]
pub enum Error {
    Lattice(LatticeError),
    Decode(crate::decode::error::DecodeError),
}

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LatticeError {
    #[error("no node exists at source coordinate {0}")]
    InvalidSource(Coordinate),

    #[error("no node exists at target coordinate {0}")]
    InvalidTarget(Coordinate),

    #[error("search mode ordinal {0} is not a recognised algorithm")]
    InvalidSearchMode(u32),

    #[error("no route exists from {0} to {1}")]
    Untraversable(Coordinate, Coordinate),

    #[error("route playback hit move '{0}' at step {1} with no matching arc")]
    InvalidRoute(Move, usize),
}

crate::util::err::impl_err!(LatticeError, Lattice);
crate::util::err::impl_err!(crate::decode::error::DecodeError, Decode);
