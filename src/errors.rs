//! Errors surfaced by maze generation.
//!
//! `error_chain!` creates the `Error`, `ErrorKind`, `ResultExt` and `Result` types. Other modules
//! `use crate::errors::*;` to get at them.

use error_chain::*;

error_chain! {
    errors {
        InvalidDimension(width: usize, height: usize) {
            description("invalid maze dimensions")
            display("invalid maze dimensions {}x{}: width and height must be positive and fit \
                     in a u32",
                    width,
                    height)
        }
        ExitCountExceedsBoundary(requested: usize, available: usize) {
            description("more exits requested than there are boundary cells")
            display("{} exits requested but the grid only has {} boundary cells",
                    requested,
                    available)
        }
    }
}
