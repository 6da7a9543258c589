use super::*;
use crate::foundation::core::{Fps, FrameIndex, Screen};
use crate::save::model::{CommonProps, ObjectRecord, TextProps};
use crate::widgets::{AudioSnapshot, RecordingSurface};
use std::collections::BTreeMap;

#[test]
fn clock_pads_seconds_and_truncates() {
    assert_eq!(format_clock(0.0), "0:00");
    assert_eq!(format_clock(65.9), "1:05");
    assert_eq!(format_clock(600.0), "10:00");
    assert_eq!(format_clock(-3.0), "0:00");
    assert_eq!(format_clock(f64::NAN), "0:00");
    assert_eq!(format_time_pair(5.0, 200.0), "0:05 | 3:20");
}

#[test]
fn time_text_shows_playback_position() {
    let id = ObjectId::from("clock");
    let mut objects = BTreeMap::new();
    objects.insert(
        id.clone(),
        ObjectRecord {
            common: CommonProps::default(),
            kind: ObjectKind::Text(TextProps {
                text_type: TextType::Time,
                ..TextProps::default()
            }),
        },
    );
    let ctx = FrameContext {
        frame: FrameIndex(0),
        fps: Fps::default(),
        screen: Screen::default(),
        objects: &objects,
        audio: AudioSnapshot {
            frequency: &[],
            smoothed: &[],
            volume: 0.0,
            time: (61.0, 125.0),
        },
    };
    let mut surface = RecordingSurface::new();
    assert!(TextWidget::new(id).update(&ctx, &mut surface));
    let Some(Visual::Text { content, .. }) = surface.get("clock") else {
        panic!("no text visual");
    };
    assert_eq!(content, "1:01 | 2:05");
}
