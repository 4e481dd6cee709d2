//! Browser tests for the GL-free surface. Run with `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]

use signature_tree::layout::GroupKind;
use signature_tree::{AppState, Scene, SceneConfig, StateUpdate, ThemeColor};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn small_scene() -> Scene {
    let config = SceneConfig::from_yaml(
        "foliage: { count: 40 }\nornaments: { count: 12 }\nlights: { count: 9 }\n",
    )
    .unwrap();
    Scene::new(config, AppState::default(), 7).unwrap()
}

#[wasm_bindgen_test]
fn test_dispatch_from_patch() {
    let mut scene = small_scene();
    let update = StateUpdate::from_yaml(r#"{"is_exploded": true, "theme_color": "ruby"}"#).unwrap();
    let state = scene.dispatch(update);

    assert!(state.is_exploded);
    assert_eq!(state.theme_color, ThemeColor::Ruby);
    assert!(state.lights_on);
}

#[wasm_bindgen_test]
fn test_explode_then_assemble() {
    let mut scene = small_scene();
    scene.dispatch(StateUpdate::exploded(true));
    for _ in 0..300 {
        scene.update(1.0 / 60.0, 0.0);
    }
    assert!(scene.morph_progress() > 0.999);

    scene.dispatch(StateUpdate::exploded(false));
    for _ in 0..300 {
        scene.update(1.0 / 60.0, 0.0);
    }
    assert!(scene.morph_progress() < 0.001);
}

#[wasm_bindgen_test]
fn test_config_reload_resizes_group() {
    let mut scene = small_scene();
    let config = SceneConfig::from_yaml("ornaments: { count: 30 }\n").unwrap();
    scene.apply_config(config).unwrap();

    assert_eq!(scene.animator(GroupKind::Ornament).count(), 30);
    assert_eq!(scene.animator(GroupKind::Foliage).count(), 1500);
}

#[wasm_bindgen_test]
fn test_frame_without_lights() {
    let mut scene = small_scene();
    scene.dispatch(StateUpdate::lights_on(false));
    let frame = scene.frame(1.0);

    assert!(frame.sparkles.is_none());
    assert_eq!(frame.post.bloom_strength, 0.5);
}
