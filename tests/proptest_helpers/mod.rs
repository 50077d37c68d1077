#![allow(dead_code)]

use boxtag::geom::{Region, RegionBox};
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Finite pixel coordinate, allowed to stray well outside a small image.
pub fn arb_coord() -> impl Strategy<Value = f64> {
    -200.0f64..400.0
}

/// Ordered pixel box (xmin <= xmax, ymin <= ymax).
pub fn arb_ordered_box() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    (arb_coord(), arb_coord(), 0.0f64..300.0, 0.0f64..300.0)
        .prop_map(|(x, y, w, h)| (x, y, x + w, y + h))
}

/// Any box at all, including inverted and non-finite ones.
pub fn arb_any_box() -> impl Strategy<Value = RegionBox> {
    let value = prop_oneof![
        8 => arb_coord(),
        1 => Just(f64::NAN),
        1 => Just(f64::INFINITY),
        1 => Just(-1e15),
    ];
    (value.clone(), value.clone(), value.clone(), value, any::<bool>()).prop_map(
        |(a, b, c, d, normalized)| {
            if normalized {
                RegionBox::normalized(a / 100.0, b / 100.0, c / 100.0, d / 100.0)
            } else {
                RegionBox::pixel(a, b, c, d)
            }
        },
    )
}

pub fn arb_label() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[a-zA-Z0-9 _%:-]{1,16}", "\\PC{0,8}"]
}

pub fn arb_region() -> impl Strategy<Value = Region> {
    (arb_label(), arb_any_box(), proptest::option::of(0.0f64..1.0)).prop_map(
        |(label, bbox, score)| Region {
            label,
            bbox,
            score,
            color: None,
        },
    )
}
