//! Layer Segmentation

use crate::error::ProfileError;
use crate::token::{ProfileTokens, Token, SENTINEL};

/// Record length of an isotropic layer (top, bottom and five parameters)
pub const ISOTROPIC_LAYER_LEN: usize = 7;

/// Depth-bounded segment of a resistivity profile
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Top depth
    pub top: f32,
    /// Bottom depth
    pub bottom: f32,
    /// Layer parameters following the depth span
    params: Vec<f32>,
}

impl Layer {
    pub fn new(top: f32, bottom: f32, params: Vec<f32>) -> Self {
        Self { top, bottom, params }
    }

    /// Build a layer from a raw record `[top, bottom, params...]`
    pub fn from_values(index: usize, values: &[f32]) -> Result<Self, ProfileError> {
        match values {
            [top, bottom, params @ ..] => Ok(Self {
                top: *top,
                bottom: *bottom,
                params: params.to_vec(),
            }),
            _ => Err(ProfileError::MalformedLayer {
                index,
                len: values.len(),
            }),
        }
    }

    /// Layer parameters (everything after the depth span)
    pub fn params(&self) -> &[f32] {
        &self.params
    }

    /// Last parameter, if any
    pub fn last_param(&self) -> Option<f32> {
        self.params.last().copied()
    }

    /// Record length including the depth span
    pub fn record_len(&self) -> usize {
        self.params.len() + 2
    }

    /// Record length is the variant discriminant
    pub fn is_isotropic(&self) -> bool {
        self.record_len() == ISOTROPIC_LAYER_LEN
    }

    /// Raw record `[top, bottom, params...]`
    pub fn to_values(&self) -> Vec<f32> {
        let mut values = Vec::with_capacity(self.record_len());
        values.push(self.top);
        values.push(self.bottom);
        values.extend_from_slice(&self.params);
        values
    }
}

/// Split a tokenized profile into layers, one per input line
pub fn segment(tokens: &ProfileTokens) -> Result<Vec<Layer>, ProfileError> {
    let mut layers = Vec::new();
    let mut current = Vec::new();

    for token in tokens.tokens() {
        match token {
            Token::Number(v) => current.push(*v),
            Token::LineBreak => flush(&mut current, &mut layers)?,
        }
    }
    flush(&mut current, &mut layers)?;

    Ok(layers)
}

/// Split a flat sentinel-separated array into layers.
///
/// Every value exactly equal to [`SENTINEL`] is treated as a separator, so a
/// genuine `-1.0` reading splits its layer. Prefer [`segment`] on tokens.
pub fn segment_flat(flat: &[f32]) -> Result<Vec<Layer>, ProfileError> {
    let mut layers = Vec::new();
    for chunk in flat.split(|v| *v == SENTINEL) {
        if chunk.is_empty() {
            continue;
        }
        layers.push(Layer::from_values(layers.len(), chunk)?);
    }
    Ok(layers)
}

/// Rebuild the flat sentinel-separated array from layers
pub fn join_flat(layers: &[Layer]) -> Vec<f32> {
    let mut flat = Vec::new();
    for (i, layer) in layers.iter().enumerate() {
        if i > 0 {
            flat.push(SENTINEL);
        }
        flat.extend(layer.to_values());
    }
    flat
}

fn flush(current: &mut Vec<f32>, layers: &mut Vec<Layer>) -> Result<(), ProfileError> {
    if !current.is_empty() {
        layers.push(Layer::from_values(layers.len(), current)?);
        current.clear();
    }
    Ok(())
}
