//! Water signatures.
//!
//! Everything here is a pure function over the filter's bookkeeping; nothing
//! is mutated.

use fixed::types::U32F32;

use super::config::FilterConfig;
use super::history::TouchHistory;
use super::types::{RejectReason, ScreenSize, TouchSample};
use super::utils::{abs_diff_i16, int_sqrt_u128, squared_distance};
use super::zones::{ZoneCoord, ZoneGrid, ACTIVATION_WINDOW_MS};

/// Points of a batch that take part in cluster and line analysis.
pub const MULTI_TOUCH_CAPACITY: usize = 5;
/// Hit number inside one burst window that is treated as re-triggering.
pub const ZONE_BURST_HITS: u8 = 4;
pub const ZONE_SPREAD_MAX_NEIGHBORS: u8 = 4;
pub const STATIC_MAX_MATCHES: u8 = 5;
pub const CLUSTER_MIN_POINTS: usize = 3;
pub const CLUSTER_DENSITY_LIMIT: U32F32 = U32F32::from_bits(50 << 32);
/// Density reported when there is no pair to measure.
pub const NO_CLUSTER_DENSITY: U32F32 = U32F32::from_bits(1_000 << 32);
pub const LINE_MIN_POINTS: usize = 3;
pub const LINE_CORRELATION_MIN_X100: i64 = 90;

pub fn is_large_area(sample: &TouchSample, config: &FilterConfig) -> bool {
    sample.area > config.max_touch_area
}

/// Rapid re-triggering of one cell, or a patch of active cells around it.
pub fn zone_signal(
    grid: &ZoneGrid,
    screen: ScreenSize,
    sample: &TouchSample,
    config: &FilterConfig,
) -> Option<RejectReason> {
    let coord = ZoneCoord::of(screen, sample.x, sample.y)?;
    let now_ms = sample.timestamp_ms;

    if let Some(cell) = grid.cell(coord) {
        let in_window =
            cell.active && now_ms.saturating_sub(cell.activation_ms) < ACTIVATION_WINDOW_MS;
        if in_window && cell.touch_count.saturating_add(1) >= ZONE_BURST_HITS {
            return Some(RejectReason::ZoneBurst);
        }
    }

    let neighbors = grid.active_neighbors(coord, now_ms, u64::from(config.touch_timeout_ms));
    (neighbors > ZONE_SPREAD_MAX_NEIGHBORS).then_some(RejectReason::ZoneSpread)
}

/// Recent history entries sitting on the same spot as `sample`.
pub fn static_matches(history: &TouchHistory, sample: &TouchSample, config: &FilterConfig) -> u8 {
    let window_ms = u64::from(config.max_static_time_ms);
    let matches = history
        .iter()
        .filter(|entry| sample.timestamp_ms.saturating_sub(entry.timestamp_ms) < window_ms)
        .filter(|entry| {
            abs_diff_i16(entry.x, sample.x) < config.min_movement
                && abs_diff_i16(entry.y, sample.y) < config.min_movement
        })
        .count();
    matches.min(u8::MAX as usize) as u8
}

pub fn is_static_dwell(history: &TouchHistory, sample: &TouchSample, config: &FilterConfig) -> bool {
    static_matches(history, sample, config) > STATIC_MAX_MATCHES
}

/// Single-sample checks in evaluation order: area, zone activity, dwell.
pub fn single_touch_signal(
    grid: &ZoneGrid,
    history: &TouchHistory,
    screen: ScreenSize,
    sample: &TouchSample,
    config: &FilterConfig,
) -> Option<RejectReason> {
    if is_large_area(sample, config) {
        return Some(RejectReason::LargeArea);
    }
    if let Some(reason) = zone_signal(grid, screen, sample, config) {
        return Some(reason);
    }
    is_static_dwell(history, sample, config).then_some(RejectReason::StaticDwell)
}

fn analysed(points: &[TouchSample]) -> &[TouchSample] {
    &points[..points.len().min(MULTI_TOUCH_CAPACITY)]
}

/// Mean pairwise distance between the analysed points, in pixels.
pub fn cluster_density(points: &[TouchSample]) -> U32F32 {
    let points = analysed(points);
    let mut total_bits = 0u64;
    let mut pairs = 0u64;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            let d2 = squared_distance(a.x, a.y, b.x, b.y);
            // sqrt(d2 * 2^64) is the distance with 32 fractional bits.
            total_bits += int_sqrt_u128(u128::from(d2) << 64);
            pairs += 1;
        }
    }
    if pairs == 0 {
        return NO_CLUSTER_DENSITY;
    }
    U32F32::from_bits(total_bits / pairs)
}

struct LineMoments {
    covariance: i128,
    variance_x: i128,
    variance_y: i128,
}

fn line_moments(points: &[TouchSample]) -> Option<LineMoments> {
    let points = analysed(points);
    if points.len() < LINE_MIN_POINTS {
        return None;
    }
    let n = points.len() as i128;
    let (mut sx, mut sy, mut sxy, mut sx2, mut sy2) = (0i128, 0i128, 0i128, 0i128, 0i128);
    for p in points {
        let (x, y) = (i128::from(p.x), i128::from(p.y));
        sx += x;
        sy += y;
        sxy += x * y;
        sx2 += x * x;
        sy2 += y * y;
    }
    let moments = LineMoments {
        covariance: n * sxy - sx * sy,
        variance_x: n * sx2 - sx * sx,
        variance_y: n * sy2 - sy * sy,
    };
    // A vertical or horizontal run has no defined correlation.
    (moments.variance_x > 0 && moments.variance_y > 0).then_some(moments)
}

/// Pearson correlation of the analysed points scaled by 100, truncated toward
/// zero. `None` when there are fewer than three points or an axis has no spread.
pub fn line_correlation_x100(points: &[TouchSample]) -> Option<i32> {
    let m = line_moments(points)?;
    let denom = int_sqrt_u128((m.variance_x * m.variance_y) as u128);
    if denom == 0 {
        return None;
    }
    Some((m.covariance * 100 / i128::from(denom)).clamp(-100, 100) as i32)
}

/// `|r| > 0.9`, evaluated as `100^2 * cov^2 > 90^2 * var_x * var_y`.
pub fn is_line_pattern(points: &[TouchSample]) -> bool {
    let Some(m) = line_moments(points) else {
        return false;
    };
    let min = i128::from(LINE_CORRELATION_MIN_X100);
    m.covariance * m.covariance * 10_000 > min * min * m.variance_x * m.variance_y
}

/// Multi-touch checks over one batch: tight cluster, then streak.
pub fn batch_signal(points: &[TouchSample]) -> Option<RejectReason> {
    if points.len() < 2 {
        return None;
    }
    if points.len() >= CLUSTER_MIN_POINTS && cluster_density(points) < CLUSTER_DENSITY_LIMIT {
        return Some(RejectReason::Cluster);
    }
    is_line_pattern(points).then_some(RejectReason::Streak)
}

#[cfg(test)]
mod tests;
