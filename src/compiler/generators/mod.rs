//! Code Generators Module
//!
//! Translation rules for each block kind, split by what the block produces:
//! - `expression`: value-producing blocks (literals, variable reads, negation)
//! - `statement`: side-effecting blocks (assignment, print)

pub mod expression;
pub mod statement;
