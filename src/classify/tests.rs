use super::*;
use crate::types::PanelKind;

const SCREEN: ScreenSize = ScreenSize::new(320, 240);

fn at(x: i16, y: i16, t: u64) -> TouchSample {
    TouchSample::new(x, y, t)
}

fn capacitive() -> FilterConfig {
    FilterConfig::for_panel(PanelKind::Capacitive)
}

#[test]
fn area_above_limit_is_water() {
    let config = capacitive();
    assert!(!is_large_area(&at(10, 10, 0).area(50), &config));
    assert!(is_large_area(&at(10, 10, 0).area(51), &config));
    let grid = ZoneGrid::new();
    let history = TouchHistory::new();
    assert_eq!(
        single_touch_signal(&grid, &history, SCREEN, &at(10, 10, 0).area(60), &config),
        Some(RejectReason::LargeArea)
    );
}

#[test]
fn fourth_hit_in_burst_window_is_water() {
    let config = capacitive();
    let mut grid = ZoneGrid::new();
    let coord = ZoneCoord::of(SCREEN, 100, 100).unwrap_or(ZoneCoord { x: 0, y: 0 });

    grid.mark(coord, 0);
    grid.mark(coord, 20);
    assert_eq!(zone_signal(&grid, SCREEN, &at(101, 101, 40), &config), None);
    grid.mark(coord, 40);
    assert_eq!(
        zone_signal(&grid, SCREEN, &at(102, 100, 60), &config),
        Some(RejectReason::ZoneBurst)
    );
    // Once the burst window closes the same cell is fine again.
    assert_eq!(zone_signal(&grid, SCREEN, &at(102, 100, 150), &config), None);
}

#[test]
fn spreading_patch_is_water() {
    let config = capacitive();
    let mut grid = ZoneGrid::new();
    let centre = ZoneCoord { x: 10, y: 10 };
    for (x, y) in [(9, 9), (10, 9), (11, 9), (9, 10), (11, 10)] {
        grid.mark(ZoneCoord { x, y }, 0);
    }
    // Cell (10, 10) covers x 160..176, y 120..132.
    let sample = at(165, 125, 500);
    assert_eq!(ZoneCoord::of(SCREEN, sample.x, sample.y), Some(centre));
    assert_eq!(
        zone_signal(&grid, SCREEN, &sample, &config),
        Some(RejectReason::ZoneSpread)
    );
    let stale = at(165, 125, 1_500);
    assert_eq!(zone_signal(&grid, SCREEN, &stale, &config), None);
}

#[test]
fn stationary_contact_is_water_after_six_matches() {
    let config = capacitive();
    let mut history = TouchHistory::new();
    for t in 0..5u64 {
        history.push(at(200, 200, t * 50));
    }
    assert_eq!(static_matches(&history, &at(201, 199, 260), &config), 5);
    assert!(!is_static_dwell(&history, &at(201, 199, 260), &config));

    history.push(at(200, 201, 250));
    assert!(is_static_dwell(&history, &at(201, 199, 260), &config));
    // Drifted far enough: not the same spot.
    assert!(!is_static_dwell(&history, &at(210, 199, 260), &config));
    // Old entries fall out of the dwell window.
    assert!(!is_static_dwell(&history, &at(200, 200, 900), &config));
}

#[test]
fn cluster_density_is_mean_pairwise_distance() {
    let points = [at(0, 0, 0), at(3, 4, 0), at(6, 8, 0)];
    // Pairs: 5, 10, 5.
    let density = cluster_density(&points);
    assert!(density > U32F32::from_num(6.66) && density < U32F32::from_num(6.67));
    assert_eq!(cluster_density(&points[..1]), NO_CLUSTER_DENSITY);
}

#[test]
fn tight_triplet_is_cluster() {
    let points = [at(100, 100, 0), at(110, 105, 0), at(95, 112, 0)];
    assert_eq!(batch_signal(&points), Some(RejectReason::Cluster));
    // Two points never form a cluster on their own.
    assert_eq!(batch_signal(&points[..2]), None);
}

#[test]
fn spread_collinear_points_are_streak() {
    let points = [at(10, 10, 0), at(100, 95, 0), at(200, 205, 0), at(300, 290, 0)];
    assert!(is_line_pattern(&points));
    assert!(line_correlation_x100(&points).is_some_and(|r| r > 90));
    assert_eq!(batch_signal(&points), Some(RejectReason::Streak));
}

#[test]
fn scattered_fingers_pass() {
    let points = [at(20, 200, 0), at(160, 20, 0), at(300, 220, 0)];
    assert!(!is_line_pattern(&points));
    assert_eq!(batch_signal(&points), None);
}

#[test]
fn zero_variance_has_no_line_signal() {
    let vertical = [at(50, 10, 0), at(50, 120, 0), at(50, 230, 0)];
    assert_eq!(line_correlation_x100(&vertical), None);
    assert!(!is_line_pattern(&vertical));
    assert_eq!(batch_signal(&vertical), None);
}

#[test]
fn only_first_five_points_are_analysed() {
    let mut points = [at(0, 0, 0); 7];
    for (i, p) in points.iter_mut().enumerate().take(5) {
        *p = at(i as i16 * 60, i as i16 * 60, 0);
    }
    // Trailing duplicates would collapse the density if they were counted.
    assert!(cluster_density(&points) > CLUSTER_DENSITY_LIMIT);
}
