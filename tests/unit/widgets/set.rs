use super::*;
use crate::save::model::{CommonProps, ShapeProps, TextProps};
use std::cell::Cell;
use std::rc::Rc;

struct Stub {
    id: ObjectId,
    updates: Rc<Cell<u32>>,
    finish: bool,
    idle: Rc<Cell<bool>>,
}

impl Widget for Stub {
    fn id(&self) -> &ObjectId {
        &self.id
    }

    fn update(&mut self, _ctx: &FrameContext<'_>, _surface: &mut dyn RenderSurface) -> bool {
        self.updates.set(self.updates.get() + 1);
        self.finish
    }

    fn is_idle(&self) -> bool {
        self.idle.get()
    }
}

fn ctx(objects: &BTreeMap<ObjectId, ObjectRecord>) -> FrameContext<'_> {
    FrameContext {
        frame: FrameIndex(0),
        fps: Fps::default(),
        screen: Screen::default(),
        objects,
        audio: AudioSnapshot {
            frequency: &[],
            smoothed: &[],
            volume: 0.0,
            time: (0.0, 0.0),
        },
    }
}

#[test]
fn incomplete_widget_blocks_until_idle() {
    let idle = Rc::new(Cell::new(false));
    let updates = Rc::new(Cell::new(0));
    let mut set = WidgetSet::new();
    set.insert(Box::new(Stub {
        id: ObjectId::from("slow"),
        updates: updates.clone(),
        finish: false,
        idle: idle.clone(),
    }));

    assert!(set.all_complete());
    let objects = BTreeMap::new();
    let mut surface = RecordingSurface::new();
    assert_eq!(set.update_all(&ctx(&objects), &mut surface), vec![false]);

    assert!(!set.all_complete());
    idle.set(true);
    assert!(set.all_complete());
    assert_eq!(updates.get(), 1);
}

#[test]
fn insert_keeps_order_and_replaces_same_id() {
    let mut set = WidgetSet::new();
    for id in ["b", "a", "c"] {
        set.insert(Box::new(shape::ShapeWidget::new(ObjectId::from(id))));
    }
    set.insert(Box::new(shape::ShapeWidget::new(ObjectId::from("a"))));
    let ids: Vec<&str> = set.ids().map(ObjectId::as_str).collect();
    assert_eq!(ids, ["b", "a", "c"]);

    assert!(set.remove(&ObjectId::from("a")));
    assert!(!set.remove(&ObjectId::from("a")));
    assert_eq!(set.len(), 2);
}

#[test]
fn create_widget_dispatches_on_kind() {
    let mut objects = BTreeMap::new();
    objects.insert(
        ObjectId::from("s"),
        ObjectRecord {
            common: CommonProps::default(),
            kind: ObjectKind::Shape(ShapeProps::default()),
        },
    );
    objects.insert(
        ObjectId::from("t"),
        ObjectRecord {
            common: CommonProps::default(),
            kind: ObjectKind::Text(TextProps::default()),
        },
    );

    let mut set = WidgetSet::new();
    for (id, rec) in &objects {
        set.insert(create_widget(id.clone(), rec, 7));
    }
    let mut surface = RecordingSurface::new();
    assert_eq!(set.update_all(&ctx(&objects), &mut surface), vec![true, true]);
    assert!(matches!(surface.get("s"), Some(Visual::Shape { .. })));
    assert!(matches!(surface.get("t"), Some(Visual::Text { .. })));
}

#[test]
fn widget_without_record_draws_nothing() {
    let objects = BTreeMap::new();
    let mut w = shape::ShapeWidget::new(ObjectId::from("gone"));
    let mut surface = RecordingSurface::new();
    assert!(w.update(&ctx(&objects), &mut surface));
    assert_eq!(surface.applied(), 0);
}
