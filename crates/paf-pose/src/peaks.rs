use crate::PoseError;
use paf_base::{Tensor, Vec2};

/// Integer location of a confidence-map local maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Peak {
    pub row: usize,
    pub col: usize,
}

/// Number of entries per part type.
pub fn counts<T>(per_part: &[Vec<T>]) -> Vec<usize> {
    per_part.iter().map(Vec::len).collect()
}

/// Find local maxima in every channel of a `[C, H, W]` confidence map.
///
/// A pixel is a peak when its value is above `threshold` and strictly greater
/// than every other pixel in the `window_size` square centered on it. Each
/// channel is scanned in row-major order and keeps at most `max_parts` peaks.
pub fn find_peaks(
    cmap: &Tensor<f32>,
    threshold: f32,
    window_size: usize,
    max_parts: usize,
) -> Result<Vec<Vec<Peak>>, PoseError> {
    let (channels, height, width) = cmap.planes()?;
    let win = window_size / 2;

    let peaks = (0..channels)
        .map(|c| {
            let plane = cmap.plane(c);
            let mut found = Vec::with_capacity(max_parts);
            'scan: for row in 0..height {
                for col in 0..width {
                    if found.len() >= max_parts {
                        break 'scan;
                    }
                    let value = plane[row * width + col];
                    if value > threshold && is_window_max(plane, height, width, row, col, win) {
                        found.push(Peak { row, col });
                    }
                }
            }
            found
        })
        .collect();

    Ok(peaks)
}

fn is_window_max(
    plane: &[f32],
    height: usize,
    width: usize,
    row: usize,
    col: usize,
    win: usize,
) -> bool {
    let value = plane[row * width + col];
    for r in row.saturating_sub(win)..(row + win + 1).min(height) {
        for c in col.saturating_sub(win)..(col + win + 1).min(width) {
            if (r, c) != (row, col) && plane[r * width + c] >= value {
                return false;
            }
        }
    }
    true
}

/// Mirror an out-of-range index back into `0..len`.
fn reflect(i: isize, len: usize) -> usize {
    let n = len as isize;
    let mirrored = if i < 0 {
        -i
    } else if i >= n {
        2 * n - i - 2
    } else {
        i
    };
    mirrored.clamp(0, n - 1) as usize
}

/// Refine peaks to sub-pixel accuracy and normalize them to `[0, 1]`.
///
/// Each peak is replaced by the confidence-weighted centroid of its window
/// (negative confidences weigh zero), shifted to the pixel center and divided
/// by the map size. The result has `x` along columns and `y` along rows and is
/// index-parallel with `peaks`.
pub fn refine_peaks(
    peaks: &[Vec<Peak>],
    cmap: &Tensor<f32>,
    window_size: usize,
) -> Result<Vec<Vec<Vec2<f32>>>, PoseError> {
    let (channels, height, width) = cmap.planes()?;
    if peaks.len() > channels {
        return Err(PoseError::Shape(format!(
            "peaks cover {} part types but confidence map has {} channels",
            peaks.len(),
            channels
        )));
    }
    let win = (window_size / 2) as isize;

    let refined = peaks
        .iter()
        .enumerate()
        .map(|(c, part_peaks)| {
            let plane = cmap.plane(c);
            part_peaks
                .iter()
                .map(|peak| {
                    let mut weighted = Vec2::<f32>::zero();
                    let mut weight_sum = 0.0f32;
                    for dr in -win..=win {
                        let r = peak.row as isize + dr;
                        let rr = reflect(r, height);
                        for dc in -win..=win {
                            let c = peak.col as isize + dc;
                            let weight = plane[rr * width + reflect(c, width)].max(0.0);
                            weighted += Vec2::new(c as f32, r as f32) * weight;
                            weight_sum += weight;
                        }
                    }
                    let center = if weight_sum > 0.0 {
                        weighted / weight_sum
                    } else {
                        Vec2::new(peak.col as f32, peak.row as f32)
                    };
                    Vec2::new(
                        ((center.x + 0.5) / width as f32).clamp(0.0, 1.0),
                        ((center.y + 0.5) / height as f32).clamp(0.0, 1.0),
                    )
                })
                .collect()
        })
        .collect();

    Ok(refined)
}
