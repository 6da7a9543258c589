use super::*;
use crate::foundation::core::{Fps, FrameIndex, Screen, Size};
use crate::save::model::{CommonProps, ObjectRecord, TimerBarProps, TimerPointProps};
use crate::widgets::{AudioSnapshot, RecordingSurface};
use std::collections::BTreeMap;

fn run(widget: &mut dyn Widget, objects: &BTreeMap<ObjectId, ObjectRecord>, time: (f64, f64)) -> Visual {
    let ctx = FrameContext {
        frame: FrameIndex(0),
        fps: Fps::default(),
        screen: Screen::default(),
        objects,
        audio: AudioSnapshot {
            frequency: &[],
            smoothed: &[],
            volume: 0.0,
            time,
        },
    };
    let mut surface = RecordingSurface::new();
    assert!(widget.update(&ctx, &mut surface));
    surface.get(widget.id().as_str()).cloned().unwrap()
}

fn common(width: f64) -> CommonProps {
    CommonProps {
        size: Size::new(width, 20.0),
        ..CommonProps::default()
    }
}

#[test]
fn progress_is_clamped_and_tolerates_unknown_total() {
    assert_eq!(progress(5.0, 10.0), 0.5);
    assert_eq!(progress(15.0, 10.0), 1.0);
    assert_eq!(progress(1.0, 0.0), 0.0);
    assert_eq!(progress(1.0, f64::INFINITY), 0.0);
}

#[test]
fn bar_fills_track_inside_border_and_spacing() {
    let id = ObjectId::from("bar");
    let mut objects = BTreeMap::new();
    objects.insert(
        id.clone(),
        ObjectRecord {
            common: common(110.0),
            kind: ObjectKind::TimerStraightBar(TimerBarProps {
                border_thickness: 5.0,
                border_to_bar_space: 5.0,
                ..TimerBarProps::default()
            }),
        },
    );
    let mut w = TimerBarWidget::new(id);
    let Visual::TimerBar { bar_width, .. } = run(&mut w, &objects, (30.0, 120.0)) else {
        panic!("wrong visual");
    };
    // Track is 110 - 2 * (5 + 5) = 90 wide.
    assert!((bar_width - 22.5).abs() < 1e-9);
}

#[test]
fn point_cursor_moves_along_line() {
    let id = ObjectId::from("pt");
    let mut objects = BTreeMap::new();
    objects.insert(
        id.clone(),
        ObjectRecord {
            common: common(104.0),
            kind: ObjectKind::TimerStraightLinePoint(TimerPointProps {
                border_thickness: 2.0,
                ..TimerPointProps::default()
            }),
        },
    );
    let mut w = TimerPointWidget::new(id);
    let Visual::TimerPoint { cursor_x, .. } = run(&mut w, &objects, (0.0, 10.0)) else {
        panic!("wrong visual");
    };
    assert_eq!(cursor_x, 2.0);
    let Visual::TimerPoint { cursor_x, .. } = run(&mut w, &objects, (10.0, 10.0)) else {
        panic!("wrong visual");
    };
    assert_eq!(cursor_x, 102.0);
}
