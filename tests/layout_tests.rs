use approx::assert_abs_diff_eq;
use rigging_core::constants::DEFAULT_CABLE_COLOR;
use rigging_core::{ConnectorSpec, ImagePlacement, LayoutBook, LayoutError, OverlayDescriptor};

const LAYOUT: &str = include_str!("../assets/layouts.json");

#[test]
fn bundled_layout_keeps_document_order() {
    let book = LayoutBook::from_json(LAYOUT).expect("layout parses");
    let list = book.for_background(30);
    let names: Vec<&str> = list.iter().map(OverlayDescriptor::name).collect();
    assert_eq!(
        names,
        vec![
            "30_Iso_Droite.png",
            "30_Iso_Gauche.png",
            "connecteur1",
            "connecteur2",
            "connecteur3"
        ]
    );

    let OverlayDescriptor::Image(ImagePlacement { x, y, rotation, .. }) = &list[0] else {
        panic!("first overlay is an image");
    };
    assert_abs_diff_eq!(*x, 24.0);
    assert_abs_diff_eq!(*y, 13.0);
    assert_eq!(*rotation, Some(-15.0));

    let OverlayDescriptor::Connector(middle) = &list[3] else {
        panic!("fourth overlay is a cable");
    };
    assert!(!middle.fixed);
    assert_abs_diff_eq!(middle.sag_percent, 25.0);
    assert_eq!(middle.color, "#f16a10ff");
}

#[test]
fn backgrounds_without_layout_are_empty() {
    let book = LayoutBook::from_json(LAYOUT).expect("layout parses");
    assert!(book.for_background(1).is_empty());
    assert!(book.for_background(31).is_empty());
}

#[test]
fn legacy_field_names_are_accepted() {
    let text = r#"{
        "backgrounds": {
            "32": [
                { "type": "connecteur", "name": "c", "x1": 10, "y1": 20, "x2": 90, "y2": 20, "pending": 15 }
            ]
        }
    }"#;
    let book = LayoutBook::from_json(text).expect("legacy layout parses");
    let list = book.for_background(32);
    assert_eq!(list.len(), 1);
    let OverlayDescriptor::Connector(ConnectorSpec {
        sag_percent,
        fixed,
        color,
        ..
    }) = &list[0]
    else {
        panic!("expected a cable");
    };
    assert_abs_diff_eq!(*sag_percent, 15.0);
    assert!(!fixed);
    assert_eq!(color, DEFAULT_CABLE_COLOR);
}

#[test]
fn image_rotation_is_optional() {
    let text = r#"{ "backgrounds": { "30": [ { "type": "image", "name": "a.png", "x": 5, "y": 6 } ] } }"#;
    let book = LayoutBook::from_json(text).expect("parses");
    assert!(matches!(
        &book.for_background(30)[0],
        OverlayDescriptor::Image(ImagePlacement { rotation: None, .. })
    ));
}

#[test]
fn malformed_documents_are_rejected() {
    assert!(matches!(LayoutBook::from_json("{ not json"), Err(LayoutError::Parse(_))));
    let unknown = r#"{ "backgrounds": { "30": [ { "type": "sprite", "name": "x" } ] } }"#;
    assert!(matches!(LayoutBook::from_json(unknown), Err(LayoutError::Parse(_))));
}

#[test]
fn out_of_range_percentages_still_load() {
    let text = r#"{ "backgrounds": { "30": [ { "type": "image", "name": "a.png", "x": 120, "y": -5 } ] } }"#;
    let book = LayoutBook::from_json(text).expect("parses with a warning");
    assert_eq!(book.for_background(30).len(), 1);
}
