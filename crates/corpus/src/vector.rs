//! Similarity primitives over packed embedding vectors.

use crate::error::{CorpusError, Result};

/// Reinterpret a packed byte buffer as little-endian f32 values.
///
/// The derived length is `bytes.len() / 4`; the caller is responsible for
/// handing in a buffer whose length is a multiple of 4 and matches the
/// corpus-wide vector width. Trailing bytes that do not form a full float
/// are ignored.
#[must_use]
pub fn decode_vector(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// Pack an f32 vector into little-endian bytes (snapshot builders, tests).
#[must_use]
pub fn encode_vector(vector: &[f32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(vector.len() * 4);
    for v in vector {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

/// Cosine similarity between two vectors of equal length.
///
/// Returns exactly 0.0 when either vector has zero norm, so a degenerate
/// embedding never propagates NaN into a ranking.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(CorpusError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

/// Element-wise mean of N same-length vectors.
pub fn centroid(vectors: &[Vec<f32>]) -> Result<Vec<f32>> {
    let Some(first) = vectors.first() else {
        return Err(CorpusError::EmptyCentroid);
    };

    let dim = first.len();
    let mut sum = vec![0.0f32; dim];
    for vector in vectors {
        if vector.len() != dim {
            return Err(CorpusError::DimensionMismatch {
                expected: dim,
                actual: vector.len(),
            });
        }
        for (acc, v) in sum.iter_mut().zip(vector.iter()) {
            *acc += v;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let n = vectors.len() as f32;
    for v in &mut sum {
        *v /= n;
    }
    Ok(sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decode_roundtrips_encode() {
        let vector = vec![0.25f32, -1.5, 3.0, 0.0];
        assert_eq!(decode_vector(&encode_vector(&vector)), vector);
    }

    #[test]
    fn decode_length_is_bytes_over_four() {
        let bytes = encode_vector(&[1.0; 7]);
        assert_eq!(decode_vector(&bytes).len(), 7);
    }

    #[test]
    fn cosine_is_symmetric() {
        let a = vec![0.2, 0.8, 0.1];
        let b = vec![0.5, 0.3, 0.9];
        let ab = cosine_similarity(&a, &b).unwrap();
        let ba = cosine_similarity(&b, &a).unwrap();
        assert_eq!(ab, ba);
    }

    #[test]
    fn cosine_is_bounded() {
        let a = vec![3.0, -4.0];
        let b = vec![-3.0, 4.0];
        let sim = cosine_similarity(&a, &b).unwrap();
        assert!((-1.0..=1.0).contains(&sim));
        assert!((sim + 1.0).abs() < 1e-6);

        let sim = cosine_similarity(&a, &a).unwrap();
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_zero_vector_is_zero_not_nan() {
        let zero = vec![0.0, 0.0, 0.0];
        let b = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&zero, &b).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&b, &zero).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero).unwrap(), 0.0);
    }

    #[test]
    fn cosine_rejects_dimension_mismatch() {
        let err = cosine_similarity(&[1.0, 2.0], &[1.0]).unwrap_err();
        assert!(matches!(
            err,
            CorpusError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn centroid_is_elementwise_mean() {
        let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        assert_eq!(centroid(&vectors).unwrap(), vec![0.5, 0.5]);
    }

    #[test]
    fn centroid_of_nothing_fails() {
        assert!(matches!(
            centroid(&[]).unwrap_err(),
            CorpusError::EmptyCentroid
        ));
    }
}
