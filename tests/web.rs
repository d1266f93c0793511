//! Browser smoke tests, run with `wasm-pack test --headless --firefox`
#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;
use christmas_tree_morph::ornaments::CameraPose;
use christmas_tree_morph::{SceneConfig, TreeScene, TreeState};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn scene_builds_with_browser_entropy() {
    let config = SceneConfig::from_yaml("foliage_count: 300\n").unwrap();
    let mut scene = TreeScene::new(&config).unwrap();
    let snapshot = scene.tick(1.0 / 60.0, &CameraPose::default());
    assert_eq!(snapshot.progress, 1.0);
    assert_eq!(snapshot.photo_quads.len(), 8);
}

#[wasm_bindgen_test]
fn toggle_runs_to_chaos() {
    let config = SceneConfig::from_yaml("foliage_count: 100\nseed: 3\n").unwrap();
    let mut scene = TreeScene::new(&config).unwrap();
    assert_eq!(scene.toggle(), TreeState::Chaos);
    for _ in 0..600 {
        scene.tick(1.0 / 60.0, &CameraPose::default());
    }
    assert!(scene.progress() < 0.01);
}

#[wasm_bindgen_test]
fn missing_photo_gets_placeholder() {
    let mut scene = TreeScene::new(&SceneConfig::default().with_seed(1)).unwrap();
    scene.photo_store_mut().fetch_failed(0, "404");
    assert_eq!(scene.photo_store().label(0), Some("FILE MISSING"));
    assert!(scene.photo_store().texture(0).is_some());
}
