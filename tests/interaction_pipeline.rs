use std::time::{Duration, Instant};

use glam::Vec3;
use xrgallery_assets::{catalog_from_str, ImageLoader};
use xrgallery_interact::{
    ObjectState, RayKind, Ray, Raycaster, Registry, SelectionEvent, SelectionFeedback,
    FeedbackPolicy,
};
use xrgallery_panels::{PanelGenerator, PanelLayout};
use xrgallery_scene::{CameraPose, SceneGraph};

const CATALOG: &str = r#"
[
  { "title": "Left", "description": "leftmost panel" },
  { "title": "Center", "description": "middle panel" },
  { "title": "Right", "description": "rightmost panel" }
]
"#;

struct Stage {
    scene: SceneGraph,
    registry: Registry,
    panels: Vec<xrgallery_panels::PanelAssembly>,
}

fn build_stage() -> Stage {
    let items = catalog_from_str(CATALOG).expect("valid catalog");
    let generator = PanelGenerator::with_rasterizer(PanelLayout::default(), None);
    let mut scene = SceneGraph::new();
    let mut registry = Registry::new();
    let mut images = ImageLoader::new();
    let panels: Vec<_> = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            generator
                .build(item, index, items.len(), &mut scene, &mut registry, &mut images)
                .expect("panel build")
        })
        .collect();
    images.shutdown();
    Stage {
        scene,
        registry,
        panels,
    }
}

fn gaze_from_spawn() -> Ray {
    let camera = CameraPose::looking_at(
        Vec3::new(0.0, 1.6, 3.0),
        Vec3::new(0.0, 1.5, -3.0),
        Vec3::Y,
    );
    Ray::from_gaze(&camera)
}

#[test]
fn gaze_from_spawn_hits_only_the_center_panel() {
    let stage = build_stage();
    let snapshot = stage.registry.snapshot(&stage.scene);
    let mut raycaster = Raycaster::new();

    let hit = raycaster
        .intersect(&gaze_from_spawn(), &snapshot)
        .expect("center panel in the gaze path");
    assert_eq!(hit.object, stage.panels[1].object);
    let title = stage
        .registry
        .get(hit.object)
        .and_then(|o| o.metadata.get("title").cloned());
    assert_eq!(title.as_deref(), Some("Center"));
    // Flanking panels sit 5 m to either side, well outside the quad.
    assert!(hit.point.x.abs() < 1e-3);
}

#[test]
fn pinch_pulses_once_and_reverts_once() {
    let stage = build_stage();
    let snapshot = stage.registry.snapshot(&stage.scene);
    let mut raycaster = Raycaster::new();
    let mut selection = SelectionFeedback::new(FeedbackPolicy::default());
    let t0 = Instant::now();

    let hit = raycaster.intersect(&gaze_from_spawn(), &snapshot);
    let started = selection.pinch_start(hit.as_ref(), t0).expect("pulse starts");
    assert_eq!(
        started,
        SelectionEvent::PulseStarted {
            object: stage.panels[1].object,
            scale: 1.2,
        }
    );
    assert_eq!(
        selection.state_of(stage.panels[1].object),
        ObjectState::Selected
    );

    assert!(selection.update(t0 + Duration::from_millis(999)).is_empty());
    let reverted = selection.update(t0 + Duration::from_millis(1000));
    assert_eq!(
        reverted,
        vec![SelectionEvent::PulseReverted(stage.panels[1].object)]
    );
    // The deadline fires exactly once.
    assert!(selection.update(t0 + Duration::from_secs(10)).is_empty());
    assert_eq!(selection.state_of(stage.panels[1].object), ObjectState::Idle);
}

#[test]
fn retrigger_restarts_the_timer_instead_of_stacking() {
    let stage = build_stage();
    let snapshot = stage.registry.snapshot(&stage.scene);
    let mut raycaster = Raycaster::new();
    let mut selection = SelectionFeedback::new(FeedbackPolicy::default());
    let t0 = Instant::now();

    let hit = raycaster.intersect(&gaze_from_spawn(), &snapshot);
    selection.pinch_start(hit.as_ref(), t0);
    selection.pinch_start(hit.as_ref(), t0 + Duration::from_millis(600));
    assert_eq!(selection.armed(), 1);

    // The first trigger's deadline passes without an event.
    assert!(selection.update(t0 + Duration::from_millis(1100)).is_empty());
    let reverted = selection.update(t0 + Duration::from_millis(1600));
    assert_eq!(reverted.len(), 1);
}

#[test]
fn gaze_hover_follows_the_ray_across_panels() {
    let stage = build_stage();
    let snapshot = stage.registry.snapshot(&stage.scene);
    let mut raycaster = Raycaster::new();
    let mut selection = SelectionFeedback::new(FeedbackPolicy::default());

    let hit = raycaster.intersect(&gaze_from_spawn(), &snapshot);
    let events = selection.pointer_frame(RayKind::Gaze, hit.as_ref());
    assert_eq!(
        events,
        vec![SelectionEvent::HoverEnter(stage.panels[1].object)]
    );
    // Same hit next frame: no churn.
    assert!(selection
        .pointer_frame(RayKind::Gaze, hit.as_ref())
        .is_empty());

    // Look away: the miss clears hover.
    let away = Ray {
        direction: Vec3::Y,
        ..gaze_from_spawn()
    };
    let miss = raycaster.intersect(&away, &snapshot);
    assert!(miss.is_none());
    let events = selection.pointer_frame(RayKind::Gaze, miss.as_ref());
    assert_eq!(
        events,
        vec![SelectionEvent::HoverExit(stage.panels[1].object)]
    );
}

#[test]
fn unregistered_panel_is_invisible_to_rays() {
    let mut stage = build_stage();
    let center = stage.panels[1].object;
    stage.registry.unregister(center);

    let snapshot = stage.registry.snapshot(&stage.scene);
    let mut raycaster = Raycaster::new();
    assert!(raycaster.intersect(&gaze_from_spawn(), &snapshot).is_none());
    // The flanking panels are still registered and reachable.
    assert_eq!(snapshot.len(), 2);
}
