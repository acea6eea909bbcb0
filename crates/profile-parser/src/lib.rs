//! Resistivity Profile Parsing
//!
//! Reads segmented `.obl` resistivity profiles and depth files into typed
//! layer sequences and depth arrays.

mod depth;
mod error;
mod kind;
mod layer;
mod token;

pub use depth::DepthArray;
pub use error::{DepthError, ProfileError};
pub use kind::InputKind;
pub use layer::{join_flat, segment, segment_flat, Layer, ISOTROPIC_LAYER_LEN};
pub use token::{ProfileTokens, Token, SENTINEL};

use std::path::Path;

/// Parse a profile file straight into its layer sequence
pub fn load_layers(path: &Path) -> Result<Vec<Layer>, ProfileError> {
    let tokens = ProfileTokens::from_path(path)?;
    segment(&tokens)
}
