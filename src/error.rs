//! The one fatal error class this core can raise.
//!
//! Every other failure mode — empty input, a degenerate loop, a
//! non-printable perimeter, a collapsed offset, an ambiguous bridge — is a
//! silent, total outcome (an empty collection or a `None` angle), not a
//! `Result`. Only a Boolean-kernel failure is modeled as an error, because the
//! kernel is expected to never fail given integer coordinates and a safety
//! offset; if it does, the region can't be trusted and the scheduler needs to
//! know.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SlicerError {
    #[error("boolean operation `{op}` produced an invalid expolygon set: {detail}")]
    BooleanOpFailed { op: &'static str, detail: String },
}
