use splashguard::{
    FilterConfig, FilterEngine, FilterOutcome, FilterStats, GesturePhase, PanelKind, RejectReason,
    TouchSample, ZoneCoord,
};

const WIDTH: u16 = 320;
const HEIGHT: u16 = 240;

fn engine(panel: PanelKind) -> FilterEngine {
    FilterEngine::new(WIDTH, HEIGHT, panel)
}

fn zone_active(engine: &FilterEngine, x: i16, y: i16) -> bool {
    ZoneCoord::of(engine.screen(), x, y)
        .and_then(|coord| engine.zones().cell(coord).copied())
        .is_some_and(|cell| cell.active)
}

#[test]
fn out_of_bounds_never_counts() {
    for panel in [PanelKind::Capacitive, PanelKind::Resistive] {
        let mut engine = engine(panel);
        let edges = [
            (-1, 0),
            (0, -1),
            (WIDTH as i16, 0),
            (0, HEIGHT as i16),
            (i16::MAX, i16::MAX),
            (-300, 120),
        ];
        for (t, (x, y)) in edges.into_iter().enumerate() {
            let sample = TouchSample::new(x, y, t as u64).pressure(1_000);
            assert!(!engine.process_touch(sample), "{panel} accepted ({x}, {y})");
        }
        assert_eq!(engine.stats(), FilterStats::default());
    }
}

#[test]
fn counters_move_one_at_a_time() {
    let mut engine = engine(PanelKind::Capacitive);
    let samples = [
        TouchSample::new(30, 30, 0),
        TouchSample::new(160, 40, 200).area(75),
        TouchSample::new(250, 200, 400),
        TouchSample::new(90, 180, 600).area(51),
    ];
    for sample in samples {
        let before = engine.stats();
        let outcome = engine.process(sample);
        let after = engine.stats();
        match outcome {
            FilterOutcome::Accepted => {
                assert_eq!(after.accepted, before.accepted + 1);
                assert_eq!(after.rejected, before.rejected);
            }
            FilterOutcome::Rejected(reason) => {
                assert!(reason.is_water());
                assert_eq!(after.rejected, before.rejected + 1);
                assert_eq!(after.accepted, before.accepted);
            }
            FilterOutcome::Repeat => panic!("capacitive panels never debounce"),
        }
    }
    assert_eq!(engine.stats(), FilterStats { accepted: 2, rejected: 2 });
}

#[test]
fn repeated_ticks_only_expire() {
    let mut engine = engine(PanelKind::Capacitive);
    engine.enable_gesture_mode();
    assert!(!engine.process_xy(10, 100, 0));
    assert!(engine.process_xy(200, 100, 100));
    assert!(zone_active(&engine, 200, 100));

    for _ in 0..3 {
        engine.tick(600);
        assert!(zone_active(&engine, 200, 100));
        assert!(engine.is_gesture_active());
    }
    for _ in 0..3 {
        engine.tick(1_200);
        assert!(!zone_active(&engine, 200, 100));
        assert_eq!(engine.zones().active_count(), 0);
    }
    // An earlier timestamp must not bring anything back.
    engine.tick(0);
    assert!(!zone_active(&engine, 200, 100));
    assert_eq!(engine.stats().accepted, 1);
}

#[test]
fn resistive_debounce_swallows_repeat() {
    let mut engine = engine(PanelKind::Resistive);
    let mut config = engine.config();
    config.debounce_time_ms = 50;
    config.min_movement = 10;
    engine.set_config(config);

    assert!(engine.process_touch(TouchSample::new(100, 100, 0).pressure(400)));
    assert_eq!(engine.history().len(), 1);
    assert!(engine.process_touch(TouchSample::new(101, 101, 20).pressure(400)));
    assert_eq!(engine.history().len(), 1);
    assert_eq!(engine.stats(), FilterStats { accepted: 1, rejected: 0 });
}

#[test]
fn oversized_contact_is_water() {
    let mut engine = engine(PanelKind::Capacitive);
    engine.set_max_touch_area(50);
    for (i, (x, y)) in [(0, 0), (160, 120), (319, 239)].into_iter().enumerate() {
        let sample = TouchSample::new(x, y, i as u64 * 1_000).area(60);
        assert_eq!(
            engine.process(sample),
            FilterOutcome::Rejected(RejectReason::LargeArea)
        );
        assert_eq!(engine.rejected(), i as u32 + 1);
    }
}

#[test]
fn edge_swipe_unlocks_input() {
    let mut engine = engine(PanelKind::Capacitive);
    let mut config = FilterConfig::default();
    config.require_gesture = true;
    config.edge_swipe_threshold = 50;
    config.swipe_min_distance = 150;
    engine.begin_with(config);

    assert_eq!(engine.gesture_phase(), GesturePhase::Idle);
    let _ = engine.process_xy(10, 100, 0);
    assert_eq!(engine.gesture_phase(), GesturePhase::Waiting);
    let _ = engine.process_xy(200, 100, 100);
    assert_eq!(engine.gesture_phase(), GesturePhase::Active);
    assert!(engine.process_xy(120, 60, 300));
}

#[test]
fn tight_cluster_counts_once() {
    let mut engine = engine(PanelKind::Capacitive);
    let mut config = engine.config();
    config.max_simultaneous_touches = 3;
    engine.set_config(config);

    let batch = [
        TouchSample::new(150, 100, 0),
        TouchSample::new(160, 105, 0),
        TouchSample::new(155, 115, 0),
    ];
    assert!(!engine.process_multi_touch(&batch));
    assert_eq!(engine.stats(), FilterStats { accepted: 0, rejected: 1 });
    assert!(engine.history().is_empty());
}

#[test]
fn zone_stays_lit_until_timeout_passes() {
    let mut engine = engine(PanelKind::Capacitive);
    let timeout = u64::from(engine.config().touch_timeout_ms);
    assert!(engine.process_xy(80, 80, 0));

    engine.tick(timeout - 1);
    assert!(zone_active(&engine, 80, 80));
    engine.tick(timeout + 1);
    assert!(!zone_active(&engine, 80, 80));
}

#[test]
fn wet_resistive_profile_blocks_light_and_ungestured_touches() {
    let mut engine = engine(PanelKind::Resistive);
    engine.set_wet_mode(true);
    let config = engine.config();
    assert_eq!(config.pressure_threshold, 400);
    assert!(config.require_gesture);

    assert_eq!(
        engine.process(TouchSample::new(150, 100, 0).pressure(350)),
        FilterOutcome::Rejected(RejectReason::LowPressure)
    );
    assert_eq!(
        engine.process(TouchSample::new(150, 100, 100).pressure(450)),
        FilterOutcome::Rejected(RejectReason::GestureLocked)
    );
    assert_eq!(engine.stats(), FilterStats::default());
}
