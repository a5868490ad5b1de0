use std::time::{Duration, Instant};

use xrgallery_assets::{catalog_from_str, ImageLoadResult, ImageLoader};
use xrgallery_core::Rgba;
use xrgallery_interact::Registry;
use xrgallery_panels::{apply_image_outcome, PanelGenerator, PanelLayout};
use xrgallery_scene::SceneGraph;

const CATALOG: &str = r##"
[
  { "title": "Broken", "description": "image is missing", "image": "no/such/file.png", "fallback_color": "#336699" },
  { "title": "Plain", "description": "never had an image", "fallback_color": "#ff9900" }
]
"##;

fn poll_one(loader: &mut ImageLoader) -> ImageLoadResult {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(result) = loader.poll().pop() {
            return result;
        }
        assert!(Instant::now() < deadline, "decode worker never reported");
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn failed_image_load_degrades_only_its_own_panel() {
    let items = catalog_from_str(CATALOG).expect("valid catalog");
    let generator = PanelGenerator::with_rasterizer(PanelLayout::default(), None);
    let mut scene = SceneGraph::new();
    let mut registry = Registry::new();
    let mut images = ImageLoader::new();

    let broken = generator
        .build(&items[0], 0, 2, &mut scene, &mut registry, &mut images)
        .expect("panel build");
    let plain = generator
        .build(&items[1], 1, 2, &mut scene, &mut registry, &mut images)
        .expect("panel build");
    assert!(broken.image_request.is_some());
    assert!(plain.image_request.is_none());
    // The imageless panel degraded at build time.
    let plain_material = scene.material(plain.panel).expect("plain material");
    assert_eq!(plain_material.color, Rgba::from_hex("#ff9900").unwrap());

    let result = poll_one(&mut images);
    assert_eq!(Some(result.request), broken.image_request);
    assert!(result.outcome.is_err());
    assert!(apply_image_outcome(
        &mut scene,
        broken.panel,
        broken.fallback,
        result.outcome,
    ));

    let material = scene.material(broken.panel).expect("broken material");
    assert_eq!(material.color, Rgba::from_hex("#336699").unwrap());
    assert!(material.texture.is_none());
    assert!(material.needs_update);
    // The sibling keeps its own fallback.
    let plain_material = scene.material(plain.panel).expect("plain material");
    assert_eq!(plain_material.color, Rgba::from_hex("#ff9900").unwrap());

    // Both panels stay registered and hittable after degradation.
    assert_eq!(registry.snapshot(&scene).len(), 2);
    images.shutdown();
}

#[test]
fn late_image_result_after_teardown_is_dropped() {
    let items = catalog_from_str(CATALOG).expect("valid catalog");
    let generator = PanelGenerator::with_rasterizer(PanelLayout::default(), None);
    let mut scene = SceneGraph::new();
    let mut registry = Registry::new();
    let mut images = ImageLoader::new();

    let broken = generator
        .build(&items[0], 0, 1, &mut scene, &mut registry, &mut images)
        .expect("panel build");
    let result = poll_one(&mut images);

    registry.unregister(broken.object);
    scene.remove_node(broken.panel);
    assert!(!apply_image_outcome(
        &mut scene,
        broken.panel,
        broken.fallback,
        result.outcome,
    ));
    images.shutdown();
}
