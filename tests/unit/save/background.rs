use super::*;

#[test]
fn hex_and_rgb_functions_are_colors() {
    for css in ["#ff0000", "#FFF", "#00ff0080", "rgb(1, 2, 3)", "rgba(255,0,0,0.5)"] {
        assert_eq!(
            classify(css),
            Some(LegacyBackground::Color(css.to_owned())),
            "{css}"
        );
    }
}

#[test]
fn malformed_colors_are_not_colors() {
    assert_eq!(classify("#ff00"), Some(LegacyBackground::Color("#ff00".into())));
    assert_eq!(classify("#ggg"), None);
    assert_eq!(classify("rgb(1,2)"), None);
    assert_eq!(classify("rgba(1,2,3)"), None);
}

#[test]
fn gradients_are_detected_by_substring() {
    let css = "linear-gradient(90deg,red,blue)";
    assert_eq!(classify(css), Some(LegacyBackground::Gradient(css.into())));
    assert!(matches!(
        classify("repeating-radial-gradient(circle, red, blue)"),
        Some(LegacyBackground::Gradient(_))
    ));
}

#[test]
fn url_wrapper_and_quotes_are_stripped() {
    assert_eq!(
        classify("url(\"./temp/bg.png\")"),
        Some(LegacyBackground::Image("./temp/bg.png".into()))
    );
    assert_eq!(classify("url()"), None);
}

#[test]
fn unrecognised_strings_are_none() {
    assert_eq!(classify("banana"), None);
    assert_eq!(classify(""), None);
}

#[test]
fn into_def_leaves_other_slots_empty() {
    let def = LegacyBackground::Color("#ff0000".into()).into_def("cover".into(), "no-repeat".into());
    assert_eq!(def.kind, BackgroundKind::Color);
    assert_eq!(def.last_color, "#ff0000");
    assert_eq!(def.last_gradient, "");
    assert_eq!(def.last_image, "");
}
