//! Vector distance and similarity math.
//!
//! Every helper validates that both vectors have the same length and fails
//! with `DimensionMismatch` otherwise. The engine routes all search scoring
//! through [`distance`], so the comparison semantics live in one place:
//! cosine and euclidean produce distances (lower = closer), dot produces a
//! raw similarity (higher = closer).

use recall_core::{DistanceMetric, EngineError, EngineResult};

fn check_dims(a: &[f32], b: &[f32]) -> EngineResult<()> {
    if a.len() != b.len() {
        return Err(EngineError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(())
}

/// Dot product of two vectors.
pub fn dot_product(a: &[f32], b: &[f32]) -> EngineResult<f32> {
    check_dims(a, b)?;
    Ok(a.iter().zip(b.iter()).map(|(x, y)| x * y).sum())
}

/// Cosine similarity: dot(a,b) / (||a|| * ||b||), in [-1, 1].
///
/// A zero-norm vector has no direction; similarity is defined as 0.0 there.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> EngineResult<f32> {
    check_dims(a, b)?;
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a * norm_b))
}

/// Euclidean (L2) distance.
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> EngineResult<f32> {
    check_dims(a, b)?;
    Ok(a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f32>()
        .sqrt())
}

/// Comparison value used by search for the given metric.
///
/// - `Cosine`: 1 - cosine similarity (zero-norm inputs score the maximum
///   distance, 1.0, rather than poisoning the sort with NaN)
/// - `Euclidean`: L2 distance
/// - `Dot`: raw dot product
pub fn distance(metric: DistanceMetric, a: &[f32], b: &[f32]) -> EngineResult<f32> {
    match metric {
        DistanceMetric::Cosine => Ok(1.0 - cosine_similarity(a, b)?),
        DistanceMetric::Euclidean => euclidean_distance(a, b),
        DistanceMetric::Dot => dot_product(a, b),
    }
}
