use crate::error::{GeometryError, Result};

/// A vertex without its own offset plane, and the nearest vertices before
/// and after it that have one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColinearPnt {
    pub idx: usize,
    pub prev_ok: usize,
    pub next_ok: usize,
}

/// Finds the resolved neighbours of every unresolved vertex.
///
/// `resolved[i]` tells whether vertex `i` could be offset on its own. For a
/// closed polyline the last entry duplicates the first and is skipped; the
/// search wraps around the ring instead.
///
/// # Errors
///
/// Returns `GeometryError::Degenerate` if an unresolved vertex has no
/// resolved vertex on one of its sides.
pub fn get_colinear_neighbors(resolved: &[bool], is_open: bool) -> Result<Vec<ColinearPnt>> {
    let n = resolved.len();
    let ring = if is_open { n } else { n.saturating_sub(1) };
    let mut out = Vec::new();

    for idx in (0..ring).filter(|&i| !resolved[i]) {
        let (prev_ok, next_ok) = if is_open {
            (
                (0..idx).rev().find(|&i| resolved[i]),
                (idx + 1..n).find(|&i| resolved[i]),
            )
        } else {
            (
                (1..ring)
                    .map(|k| (idx + ring - k) % ring)
                    .find(|&i| resolved[i]),
                (1..ring).map(|k| (idx + k) % ring).find(|&i| resolved[i]),
            )
        };
        match (prev_ok, next_ok) {
            (Some(prev_ok), Some(next_ok)) => out.push(ColinearPnt {
                idx,
                prev_ok,
                next_ok,
            }),
            _ => {
                return Err(GeometryError::Degenerate(format!(
                    "colinear point {idx} has no neighbour with an offset plane"
                ))
                .into())
            }
        }
    }
    Ok(out)
}
