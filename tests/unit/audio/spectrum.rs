use super::*;

#[test]
fn log_remap_of_constant_array_is_constant() {
    let out = linear_to_log(&[1.0; 8]);
    assert_eq!(out, vec![1.0; 8]);
}

#[test]
fn log_remap_keeps_endpoints_and_fills_every_slot() {
    let input: Vec<f64> = (0..64).map(|i| (i * 3 % 17) as f64).collect();
    let out = linear_to_log(&input);
    assert_eq!(out.len(), input.len());
    assert_eq!(out[0], input[0]);
    assert_eq!(out[63], input[63]);
    assert!(out.iter().all(|v| v.is_finite()));
}

#[test]
fn log_remap_spreads_low_bins_and_interpolates_gaps() {
    // N = 8: bin 0 -> 0, bin 1 -> 2, bin 2 -> 4, bins 3..=7 -> 5, 6, 6, 7, 7.
    let input = [0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0];
    let out = linear_to_log(&input);
    assert_eq!(out[0], 0.0);
    assert_eq!(out[2], 10.0);
    assert_eq!(out[1], 5.0);
    assert_eq!(out[4], 20.0);
    assert_eq!(out[3], 15.0);
    assert_eq!(out[7], 70.0);
}

#[test]
fn log_remap_handles_tiny_inputs() {
    assert!(linear_to_log(&[]).is_empty());
    assert_eq!(linear_to_log(&[4.0]), vec![4.0]);
    assert_eq!(linear_to_log(&[4.0, 9.0]), vec![4.0, 9.0]);
}

#[test]
fn volume_excludes_the_tail() {
    let mut data = vec![100.0; 200];
    for v in data.iter_mut().skip(100) {
        *v = 0.0;
    }
    assert_eq!(volume(&data, 100), 100.0);
    assert_eq!(volume(&data[..50], 100), 0.0);
}

#[test]
fn first_apply_seeds_history() {
    let mut s = Smoother::new(SmoothingKind::Average, 0.7);
    assert_eq!(s.apply(&[10.0, -20.0]), &[10.0, 20.0]);
}

#[test]
fn average_blends_previous_and_current() {
    let mut s = Smoother::new(SmoothingKind::Average, 0.5);
    s.apply(&[100.0]);
    assert_eq!(s.apply(&[0.0]), &[50.0]);
    assert_eq!(s.apply(&[0.0]), &[25.0]);
}

#[test]
fn average_converges_on_constant_input() {
    let mut s = Smoother::new(SmoothingKind::Average, 0.7);
    s.apply(&[0.0; 4]);
    for _ in 0..200 {
        s.apply(&[100.0; 4]);
    }
    assert!(s.output().iter().all(|v| (v - 100.0).abs() < 1e-6));
}

#[test]
fn linear_decrease_caps_the_fall_rate() {
    let mut s = Smoother::new(SmoothingKind::LinearDecrease, 0.1);
    s.apply(&[255.0]);
    let out = s.apply(&[0.0])[0];
    assert!((out - 229.5).abs() < 1e-9);
    // Rising values pass through immediately.
    assert_eq!(s.apply(&[250.0]), &[250.0]);
}

#[test]
fn proportional_decrease_scales_with_previous_value() {
    let mut s = Smoother::new(SmoothingKind::ProportionalDecrease, 0.5);
    s.apply(&[200.0, 2.0]);
    assert_eq!(s.apply(&[0.0, 0.0]), &[100.0, 1.0]);
}

#[test]
fn length_change_reseeds() {
    let mut s = Smoother::new(SmoothingKind::Average, 0.9);
    s.apply(&[0.0, 0.0]);
    assert_eq!(s.apply(&[5.0, 5.0, 5.0]), &[5.0, 5.0, 5.0]);
}
