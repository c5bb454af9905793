//! Collection-level tests: measured icons in, annotated shapes out.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use approx::assert_relative_eq;
use svanim::{
    Animator, AttributeWriter, Collection, Icon, IconConfig, IconConfigTable, IconsConfig,
    Options, PerShape, Shape, SvanimError, total_duration,
};

const MEASURED: &str = r#"{
    "arrow-left": {
        "width": 24,
        "height": 24,
        "shapes": [
            { "length": 18.5, "stroke": "currentColor" },
            { "length": 6.2, "stroke": "currentColor" },
            { "length": 6.2, "stroke": "currentColor" }
        ]
    },
    "dot": {
        "width": 16,
        "height": 16,
        "shapes": [
            { "length": 12.6, "fill": "currentColor",
              "node": { "name": "circle", "attributes": [{ "name": "class", "value": "accent" }] } }
        ]
    },
    "too-long": {
        "width": 24,
        "height": 24,
        "shapes": [{ "length": 640, "stroke": "currentColor" }]
    }
}"#;

fn options_with_table() -> Options {
    let table: IconConfigTable = serde_json::from_str(
        r#"{
            "left": { "copy": { "2": 1 } },
            "dot": { "extraDelay": 3 }
        }"#,
    )
    .unwrap();
    Options {
        icons_config: table.into(),
        ..Options::default()
    }
}

#[test]
fn test_two_stroke_scenario() {
    let icon = Icon::new(24.0, 24.0, vec![Shape::stroked(10.0), Shape::stroked(20.0)]);
    let options = Options {
        split_short_animations: false,
        ..Options::default()
    };

    let shapes = svanim::animate_with_options(&icon, &options).unwrap();

    assert_relative_eq!(total_duration(2), 0.6464, epsilon = 1e-4);
    assert_eq!(shapes[0].timing.delay, 0);
    assert_eq!(shapes[0].timing.duration, 4);
    assert_eq!(shapes[1].timing.delay, 4);
    assert_eq!(shapes[1].timing.duration, 9);
}

#[test]
fn test_animate_each_reports_failures_per_icon() {
    let collection = Collection::from_json(MEASURED).unwrap();
    let animator = Animator::new(options_with_table()).unwrap();

    let results = animator.animate_each(&collection);
    assert_eq!(results.len(), 3);

    let arrow = results["arrow-left"].as_ref().unwrap();
    // the table entry for "left" applies through prefix stripping
    assert_eq!(arrow[2].timing, arrow[1].timing);

    let dot = results["dot"].as_ref().unwrap();
    assert_eq!(dot[0].timing.delay, 3);
    assert_eq!(
        dot[0].shape.node.get_attr("class"),
        Some("animation-delay-3 animation-duration-10 animate-fill accent")
    );

    match &results["too-long"] {
        Err(SvanimError::Icon { key, source }) => {
            assert_eq!(key, "too-long");
            assert!(matches!(**source, SvanimError::LengthExceedsMax { max: 500, .. }));
        }
        other => panic!("expected icon error, got {:?}", other),
    }
}

#[test]
fn test_animate_collection_fails_fast() {
    let collection = Collection::from_json(MEASURED).unwrap();
    let animator = Animator::new(options_with_table()).unwrap();

    let err = animator.animate_collection(&collection).unwrap_err();
    assert!(err.to_string().contains("too-long"), "{}", err);
}

#[test]
fn test_animate_collection_matches_animate_each() {
    let mut collection = Collection::from_json(MEASURED).unwrap();
    collection.icons.remove("too-long");
    let animator = Animator::new(options_with_table()).unwrap();

    let all = animator.animate_collection(&collection).unwrap();
    let each: BTreeMap<_, _> = animator
        .animate_each(&collection)
        .into_iter()
        .map(|(key, result)| (key, result.unwrap()))
        .collect();
    assert_eq!(all, each);
}

#[test]
fn test_large_batch_in_parallel() {
    let collection: Collection = (0..64)
        .map(|i| {
            let lengths = [5.0 + i as f64, 30.0, 2.0];
            let shapes = lengths.iter().map(|&l| Shape::stroked(l)).collect();
            (format!("icon-{:02}", i), Icon::new(24.0, 24.0, shapes))
        })
        .collect();

    let animator = Animator::new(Options::default()).unwrap();
    let results = animator.animate_each(&collection);

    assert_eq!(results.len(), 64);
    for (key, result) in &results {
        let shapes = result.as_ref().unwrap();
        let single = animator.animate_icon(key, &collection.icons[key]).unwrap();
        assert_eq!(shapes, &single);
    }
}

#[test]
fn test_custom_writer_sees_final_values() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let writer = AttributeWriter::new(move |shape, index| {
        counter.fetch_add(1, Ordering::SeqCst);
        shape
            .shape
            .node
            .set_attr("data-timing", format!("{}/{}", index, shape.timing.delay));
    });

    let mut fragment = IconConfig::default();
    fragment.delay.insert(0, 12);
    let options = Options {
        attributes_callback: writer,
        icons_config: IconsConfig::resolver(move |_, _| fragment.clone()),
        ..Options::default()
    };

    let icon = Icon::new(24.0, 24.0, vec![Shape::stroked(8.0), Shape::stroked(8.0)]);
    let shapes = svanim::animate_with_options(&icon, &options).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(shapes[0].shape.node.get_attr("data-timing"), Some("0/12"));
    assert_eq!(shapes[0].shape.node.get_attr("class"), None);
}

#[test]
fn test_writer_index_follows_reversed_order() {
    let writer = AttributeWriter::new(|shape, index| {
        shape
            .shape
            .node
            .set_attr("data-timing", format!("{}/{}", index, shape.timing.delay));
    });

    let mut fragment = IconConfig::default();
    fragment.delay.insert(0, 11);
    let options = Options {
        attributes_callback: writer,
        reverse_animation_order: true,
        icons_config: IconsConfig::resolver(move |_, _| fragment.clone()),
        ..Options::default()
    };

    let icon = Icon::new(24.0, 24.0, vec![Shape::stroked(10.0), Shape::stroked(20.0)]);
    let shapes = svanim::animate_with_options(&icon, &options).unwrap();

    // The last shape is processed first, so it is index 0 for both the writer and overrides
    assert_eq!(shapes[1].timing.delay, 11);
    assert_eq!(shapes[1].shape.node.get_attr("data-timing"), Some("0/11"));
    let first = shapes[0].shape.node.get_attr("data-timing").unwrap();
    assert!(first.starts_with("1/"), "unexpected writer index: {}", first);
}

#[test]
fn test_forced_fill_from_table() {
    let mut table = IconConfigTable::default();
    table.insert("outline", IconConfig {
        fill: Some(PerShape::All(true)),
        ..IconConfig::default()
    });
    let options = Options {
        icons_config: table.into(),
        ..Options::default()
    };
    let animator = Animator::new(options).unwrap();

    let icon = Icon::new(24.0, 24.0, vec![Shape::stroked(40.0)]);
    let shapes = animator.animate_icon("home-outline", &icon).unwrap();
    assert!(!shapes[0].timing.stroke);
    assert!(shapes[0].timing.ignore_stroke);
    assert!(shapes[0].shape.node.has_class("animate-fill"));
}

#[test]
fn test_annotated_output_serializes() {
    let icon = Icon::new(24.0, 24.0, vec![Shape::stroked(10.0)]);
    let shapes = svanim::animate(&icon).unwrap();

    let json = serde_json::to_value(&shapes).unwrap();
    assert_eq!(json[0]["length"], 10.0);
    assert_eq!(json[0]["timing"]["breakPoint"], 13);
    assert_eq!(json[0]["timing"]["duration"], 10);
    assert_eq!(json[0]["timing"]["stroke"], true);
}
