use super::*;
use std::cell::RefCell;
use std::rc::Rc;

fn positive(v: &i32) -> Result<(), String> {
    if *v > 0 {
        Ok(())
    } else {
        Err("must be positive".to_owned())
    }
}

#[test]
fn invalid_initial_value_is_rejected() {
    let err = Property::new("count", 0, positive).unwrap_err();
    assert!(matches!(err, SonoError::InvalidFieldValue { ref field, .. } if field == "count"));
}

#[test]
fn set_validates_and_notifies_on_change_only() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut p = Property::new("count", 1, positive).unwrap();
    let sink = seen.clone();
    p.on_change(move |v| sink.borrow_mut().push(*v));

    assert!(p.set(3).unwrap());
    assert!(!p.set(3).unwrap());
    assert!(p.set(-1).is_err());
    assert_eq!(*p.get(), 3);
    assert_eq!(*seen.borrow(), vec![3]);
}

#[test]
fn validate_does_not_modify() {
    let p = Property::new("count", 2, positive).unwrap();
    assert!(p.validate(&5).is_ok());
    assert!(p.validate(&-5).is_err());
    assert_eq!(*p.get(), 2);
    assert_eq!(p.name(), "count");
}
