//! The gallery session: explicit owner of scene, registry, interaction
//! state and the input subscription, with a create/run/dispose lifecycle.

use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use glam::Vec3;
use tracing::{debug, error, info};
use xrgallery_assets::{load_model_manifest, ContentItem, ImageLoader, ImageRequest};
use xrgallery_core::{Rgba, Transform};
use xrgallery_interact::{
    Bounds, InteractiveObject, ObjectId, Ray, RayKind, Raycaster, Registry, SelectionEvent,
    SelectionFeedback,
};
use xrgallery_panels::{apply_image_outcome, PanelAssembly, PanelGenerator};
use xrgallery_scene::{CameraPose, Material, NodeId, SceneGraph};

use crate::config::GalleryConfig;
use crate::input::{InputBridge, InputSubscription, PinchPhase};

/// Camera bootstrap pose: eye height, slightly in front of the panels.
const CAMERA_EYE: Vec3 = Vec3::new(0.0, 1.6, 3.0);
const CAMERA_TARGET: Vec3 = Vec3::new(0.0, 1.5, -3.0);
/// Gaze cursor offset in camera-local space.
const CURSOR_OFFSET: Vec3 = Vec3::new(0.0, 0.0, -2.0);

pub struct GallerySession {
    scene: SceneGraph,
    registry: Registry,
    raycaster: Raycaster,
    selection: SelectionFeedback,
    images: ImageLoader,
    camera: NodeId,
    cursor: NodeId,
    panels: Vec<PanelAssembly>,
    pending_images: HashMap<ImageRequest, usize>,
    subscription: Option<InputSubscription>,
    disposed: bool,
}

impl GallerySession {
    /// Build the scene: camera + cursor, one panel per catalog item
    /// (registered in catalog order), the optional demo model, and an
    /// input subscription held by handle.
    pub fn create(
        config: &GalleryConfig,
        items: &[ContentItem],
        input: &mut InputBridge,
    ) -> Result<Self> {
        let mut scene = SceneGraph::new();
        let mut registry = Registry::new();
        let mut images = ImageLoader::new();

        let camera_pose = CameraPose::looking_at(CAMERA_EYE, CAMERA_TARGET, Vec3::Y);
        let camera = scene.add_node(
            "camera",
            Transform::from_position(camera_pose.position).with_rotation(camera_pose.rotation),
            None,
        )?;
        let cursor = scene.add_node(
            "gaze-cursor",
            Transform::from_position(CURSOR_OFFSET),
            Some(camera),
        )?;
        if let Some(material) = scene.material_mut(cursor) {
            *material = Material::flat(Rgba::WHITE);
        }

        let generator = PanelGenerator::new(config.panel_layout());
        let mut panels = Vec::with_capacity(items.len());
        let mut pending_images = HashMap::new();
        for (index, item) in items.iter().enumerate() {
            let assembly = generator.build(
                item,
                index,
                items.len(),
                &mut scene,
                &mut registry,
                &mut images,
            )?;
            if let Some(request) = assembly.image_request {
                pending_images.insert(request, index);
            }
            panels.push(assembly);
        }

        if let Some(path) = config.model_manifest.as_deref() {
            // A failed model load leaves the interactive set unaffected.
            match load_model_manifest(Path::new(path)) {
                Ok(manifest) => {
                    let node = scene.add_node(
                        manifest.name.clone(),
                        Transform::from_position(manifest.position_vec()),
                        None,
                    )?;
                    registry.register(InteractiveObject::new(
                        node,
                        Bounds::Aabb {
                            min: manifest.min_vec(),
                            max: manifest.max_vec(),
                        },
                    ))?;
                    info!(name = %manifest.name, "model registered");
                }
                Err(err) => error!(%path, %err, "model load failed"),
            }
        }

        let raycaster = Raycaster::new()
            .with_backface_culling(config.interaction.cull_backfaces)
            .with_max_distance(config.interaction.max_ray_distance);

        Ok(Self {
            scene,
            registry,
            raycaster,
            selection: SelectionFeedback::new(config.feedback_policy()),
            images,
            camera,
            cursor,
            panels,
            pending_images,
            subscription: Some(input.subscribe()),
            disposed: false,
        })
    }

    /// One cooperative frame: drain pinch events, apply completed image
    /// loads, refresh gaze hover, advance pulse timers.
    pub fn run_frame(&mut self, now: Instant) {
        if self.disposed {
            return;
        }

        // Pinch events arrive between frames; handle them first so a
        // pulse starts on the frame its gesture lands.
        let events: Vec<_> = match self.subscription.as_ref() {
            Some(sub) => sub.events.try_iter().collect(),
            None => Vec::new(),
        };
        for event in events {
            match event.phase {
                PinchPhase::Start(pose) => {
                    let ray = Ray::from_controller(event.hand, &pose);
                    let snapshot = self.registry.snapshot(&self.scene);
                    let hit = self.raycaster.intersect(&ray, &snapshot);
                    if let Some(selected) = self.selection.pinch_start(hit.as_ref(), now) {
                        self.apply(selected);
                    }
                }
                PinchPhase::End => self.selection.pinch_end(event.hand),
            }
        }

        // Image completions, with the liveness check the async contract
        // requires.
        for result in self.images.poll() {
            let Some(index) = self.pending_images.remove(&result.request) else {
                continue;
            };
            let record = &self.panels[index];
            if !apply_image_outcome(&mut self.scene, record.panel, record.fallback, result.outcome)
            {
                debug!(uri = %result.uri, "image resolved after panel teardown");
            }
        }

        // Gaze hover is re-derived every frame from the current hit.
        if let Some(camera_world) = self.scene.world_transform(self.camera) {
            let pose = CameraPose::from_transform(&camera_world);
            let ray = Ray::from_gaze(&pose);
            let snapshot = self.registry.snapshot(&self.scene);
            let hit = self.raycaster.intersect(&ray, &snapshot);
            for event in self.selection.pointer_frame(RayKind::Gaze, hit.as_ref()) {
                self.apply(event);
            }
            let color = if self.selection.is_pointer_hovering(RayKind::Gaze) {
                Rgba::RED
            } else {
                Rgba::WHITE
            };
            if let Some(material) = self.scene.material_mut(self.cursor) {
                material.color = color;
            }
        }

        for event in self.selection.update(now) {
            self.apply(event);
        }
    }

    fn apply(&mut self, event: SelectionEvent) {
        match event {
            SelectionEvent::HoverEnter(object) => {
                debug!(object = object.raw(), "hover enter");
            }
            SelectionEvent::HoverExit(object) => {
                debug!(object = object.raw(), "hover exit");
            }
            SelectionEvent::PulseStarted { object, scale } => {
                self.set_object_scale(object, scale);
            }
            SelectionEvent::PulseReverted(object) => {
                self.set_object_scale(object, 1.0);
            }
        }
    }

    fn set_object_scale(&mut self, object: ObjectId, scale: f32) {
        let Some(node) = self.registry.get(object).map(|o| o.node) else {
            return;
        };
        // The node can die between arming and reversion; that is fine.
        let _ = self.scene.set_uniform_scale(node, scale);
    }

    /// Remove one panel (and its text child) from the session.
    pub fn remove_panel(&mut self, index: usize) {
        if index >= self.panels.len() {
            return;
        }
        let assembly = self.panels.remove(index);
        self.selection.forget(assembly.object);
        self.registry.unregister(assembly.object);
        self.scene.remove_node(assembly.panel);
        self.pending_images.retain(|_, i| {
            if *i == index {
                return false;
            }
            if *i > index {
                *i -= 1;
            }
            true
        });
    }

    /// Tear the session down: cancel pulse timers, stop accepting image
    /// completions, cancel exactly the held input subscription, clear the
    /// scene. Safe to call more than once.
    pub fn dispose(&mut self, input: &mut InputBridge) {
        if self.disposed {
            return;
        }
        self.selection.cancel_all();
        self.images.shutdown();
        if let Some(sub) = self.subscription.take() {
            input.unsubscribe(sub.handle);
        }
        self.pending_images.clear();
        self.panels.clear();
        self.registry.clear();
        self.scene.clear();
        self.disposed = true;
        info!("session disposed");
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn selection(&self) -> &SelectionFeedback {
        &self.selection
    }

    pub fn panels(&self) -> &[PanelAssembly] {
        &self.panels
    }

    pub fn cursor_color(&self) -> Option<Rgba> {
        self.scene.material(self.cursor).map(|m| m.color)
    }

    /// Pose of a controller parked at the camera and aimed at the panel
    /// with layout index `index`, used by the scripted demo.
    pub fn aim_at_panel(&self, index: usize) -> Option<Transform> {
        let assembly = self.panels.get(index)?;
        let target = self.scene.world_transform(assembly.panel)?.position;
        let pose = CameraPose::looking_at(CAMERA_EYE, target, Vec3::Y);
        Some(Transform::from_position(pose.position).with_rotation(pose.rotation))
    }
}
