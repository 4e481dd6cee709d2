//! Scene composition
//!
//! The [`Scene`] owns everything that changes over time: the application
//! state, one morph animator and instance buffer per particle group, the
//! star, the sparkles and the camera. Each frame it advances them in order
//! (state, then animation) and describes what to draw as [`FrameParams`].

pub mod camera;
pub mod lighting;
pub mod materials;
pub mod palette;
pub mod sparkles;
pub mod star;
pub mod starfield;

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info};

use crate::animation::{sanitize_dt, MorphAnimator};
use crate::config::{GroupConfig, SceneConfig};
use crate::error::Result;
use crate::instances::{InstanceBuffer, InstanceSink};
use crate::layout::{GroupKind, ParticleGroup, TreeLayer};
use crate::state::{AppState, StateUpdate};

pub use camera::OrbitCamera;
pub use lighting::{LightRig, PointLight, PostSettings};
pub use materials::Material;
pub use sparkles::{SparkleLook, Sparkles};
pub use star::StarTopper;
pub use starfield::Starfield;

/// Height of the floor plane
pub const FLOOR_HEIGHT: f32 = -0.75;

/// Static meshes drawn alongside the instanced groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prop {
    Trunk,
    StarBody,
    StarRing,
    Floor,
}

impl Prop {
    pub const ALL: [Prop; 4] = [Prop::Trunk, Prop::StarBody, Prop::StarRing, Prop::Floor];
}

/// One static mesh draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropDraw {
    pub prop: Prop,
    /// Relative to the rotating tree group
    pub matrix: Mat4,
    pub material: Material,
}

/// Everything the renderer needs for one frame besides the instance buffers
#[derive(Debug, Clone)]
pub struct FrameParams {
    /// Rotation of the whole tree group
    pub model: Mat4,
    pub camera: OrbitCamera,
    pub lights: LightRig,
    pub post: PostSettings,
    pub background: Vec3,
    pub foliage: Material,
    pub ornaments: Material,
    pub bulbs: Material,
    pub props: Vec<PropDraw>,
    /// Sparkle particle data, absent while the lights are off
    pub sparkles: Option<Vec<f32>>,
    /// Point size multiplier for the static starfield
    pub star_size: f32,
}

/// An animator paired with the buffer it writes into
#[derive(Debug, Clone)]
struct GroupSlot {
    config: GroupConfig,
    animator: MorphAnimator,
    buffer: InstanceBuffer,
}

impl GroupSlot {
    fn generate(
        kind: GroupKind,
        config: &SceneConfig,
        exploded: bool,
        rng: &mut StdRng,
    ) -> Result<Self> {
        let group_config = *config.group(kind);
        let group = ParticleGroup::generate(
            kind,
            group_config.count,
            group_config.scatter_radius,
            &config.layers,
            rng,
        )?;

        Ok(Self {
            config: group_config,
            buffer: InstanceBuffer::new(group.count()),
            animator: MorphAnimator::new(group, config.morph, exploded),
        })
    }

    /// Regenerate only when the layout inputs differ
    fn refresh(
        &mut self,
        kind: GroupKind,
        config: &SceneConfig,
        layers_changed: bool,
        rng: &mut StdRng,
    ) -> Result<bool> {
        self.animator.set_morph(config.morph);

        let group_config = *config.group(kind);
        if !layers_changed && group_config == self.config {
            return Ok(false);
        }

        let group = ParticleGroup::generate(
            kind,
            group_config.count,
            group_config.scatter_radius,
            &config.layers,
            rng,
        )?;

        if group.count() != self.buffer.instance_count() {
            self.buffer.resize(group.count());
        }
        self.animator.replace_group(group);
        self.config = group_config;
        Ok(true)
    }
}

/// The whole animated scene
#[derive(Debug, Clone)]
pub struct Scene {
    config: SceneConfig,
    state: AppState,
    foliage: GroupSlot,
    ornaments: GroupSlot,
    lights: GroupSlot,
    star: StarTopper,
    sparkles: Sparkles,
    starfield: Starfield,
    camera: OrbitCamera,
    /// Accumulated rotation of the tree group around y
    rotation: f32,
    rng: StdRng,
}

impl Scene {
    /// Build the scene, generating every layout from `seed`
    pub fn new(config: SceneConfig, state: AppState, seed: u64) -> Result<Self> {
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(seed);
        let foliage = GroupSlot::generate(GroupKind::Foliage, &config, state.is_exploded, &mut rng)?;
        let ornaments = GroupSlot::generate(GroupKind::Ornament, &config, state.is_exploded, &mut rng)?;
        let lights = GroupSlot::generate(GroupKind::Light, &config, state.is_exploded, &mut rng)?;
        let sparkles = Sparkles::new(sparkles::SPARKLE_COUNT, &mut rng);
        let starfield = Starfield::new(
            starfield::STAR_COUNT,
            starfield::STAR_RADIUS,
            starfield::STAR_DEPTH,
            starfield::STAR_FACTOR,
            &mut rng,
        );

        let mut scene = Self {
            config,
            state,
            foliage,
            ornaments,
            lights,
            star: StarTopper::default(),
            sparkles,
            starfield,
            camera: OrbitCamera::default(),
            rotation: 0.0,
            rng,
        };
        scene.paint_ornaments();

        info!(
            foliage = scene.foliage.animator.count(),
            ornaments = scene.ornaments.animator.count(),
            lights = scene.lights.animator.count(),
            seed,
            "scene ready"
        );

        Ok(scene)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn layers(&self) -> &[TreeLayer] {
        &self.config.layers
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn star(&self) -> &StarTopper {
        &self.star
    }

    pub fn starfield(&self) -> &Starfield {
        &self.starfield
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    fn slot(&self, kind: GroupKind) -> &GroupSlot {
        match kind {
            GroupKind::Foliage => &self.foliage,
            GroupKind::Ornament => &self.ornaments,
            GroupKind::Light => &self.lights,
        }
    }

    fn slot_mut(&mut self, kind: GroupKind) -> &mut GroupSlot {
        match kind {
            GroupKind::Foliage => &mut self.foliage,
            GroupKind::Ornament => &mut self.ornaments,
            GroupKind::Light => &mut self.lights,
        }
    }

    pub fn animator(&self, kind: GroupKind) -> &MorphAnimator {
        &self.slot(kind).animator
    }

    pub fn buffer(&self, kind: GroupKind) -> &InstanceBuffer {
        &self.slot(kind).buffer
    }

    /// Mutable access so the renderer can clear dirty flags after upload
    pub fn buffer_mut(&mut self, kind: GroupKind) -> &mut InstanceBuffer {
        &mut self.slot_mut(kind).buffer
    }

    /// Morph progress of the tree; every group moves in lockstep
    pub fn morph_progress(&self) -> f32 {
        self.foliage.animator.progress()
    }

    /// Apply a UI action. Only a theme change touches the colour buffer and
    /// nothing here regenerates a layout.
    pub fn dispatch(&mut self, update: StateUpdate) -> AppState {
        let previous = self.state;
        self.state = previous.reduce(update);

        if self.state.theme_color != previous.theme_color {
            self.paint_ornaments();
        }
        if self.state != previous {
            debug!(state = ?self.state, "state updated");
        }

        self.state
    }

    /// Swap configuration, regenerating only the groups whose inputs changed
    pub fn apply_config(&mut self, config: SceneConfig) -> Result<()> {
        config.validate()?;

        let layers_changed = config.layers != self.config.layers;
        let mut regenerated = Vec::new();

        for kind in GroupKind::ALL {
            let Self {
                foliage,
                ornaments,
                lights,
                rng,
                ..
            } = &mut *self;
            let slot = match kind {
                GroupKind::Foliage => foliage,
                GroupKind::Ornament => ornaments,
                GroupKind::Light => lights,
            };
            if slot.refresh(kind, &config, layers_changed, rng)? {
                regenerated.push(kind.name());
            }
        }

        self.config = config;
        if regenerated.contains(&GroupKind::Ornament.name()) {
            self.paint_ornaments();
        }

        info!(?regenerated, "configuration applied");
        Ok(())
    }

    /// Advance one frame. `time` is wall-clock seconds and drives the float
    /// of scattered instances.
    pub fn update(&mut self, dt: f32, time: f64) {
        let state = self.state;
        let frame_dt = sanitize_dt(dt).unwrap_or(0.0);

        self.rotation = (self.rotation + frame_dt * state.rotation_speed * 0.5) % std::f32::consts::TAU;
        self.camera.update(frame_dt, state.rotation_speed);
        self.star.update(state.is_exploded);

        for kind in GroupKind::ALL {
            let slot = self.slot_mut(kind);
            slot.animator.advance(dt, state.is_exploded, time, &mut slot.buffer);
        }
    }

    /// Describe the current frame for the renderer
    pub fn frame(&self, time: f64) -> FrameParams {
        let state = &self.state;

        let sparkles = Sparkles::visible(state)
            .then(|| self.sparkles.particle_data(time, &SparkleLook::for_state(state)));

        FrameParams {
            model: Mat4::from_rotation_y(self.rotation),
            camera: self.camera,
            lights: LightRig::for_state(state, &self.star),
            post: PostSettings::for_state(state),
            background: palette::hex(palette::BACKGROUND),
            foliage: Material::foliage(),
            ornaments: Material::ornament(),
            bulbs: Material::bulb(state.lights_on),
            props: self.props(),
            sparkles,
            star_size: self.starfield.size_scale(time),
        }
    }

    fn props(&self) -> Vec<PropDraw> {
        let exploded = self.state.is_exploded;
        let trunk_scale = if exploded { 0.0 } else { 1.0 };

        vec![
            PropDraw {
                prop: Prop::Trunk,
                matrix: Mat4::from_scale(Vec3::splat(trunk_scale))
                    * Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)),
                material: Material::trunk(),
            },
            PropDraw {
                prop: Prop::StarBody,
                matrix: self.star.body_matrix(exploded),
                material: Material::star(self.state.lights_on),
            },
            PropDraw {
                prop: Prop::StarRing,
                matrix: self.star.ring_matrix(),
                material: Material::star_ring(),
            },
            PropDraw {
                prop: Prop::Floor,
                matrix: Mat4::from_translation(Vec3::new(0.0, FLOOR_HEIGHT, 0.0))
                    * Mat4::from_rotation_x(-FRAC_PI_2),
                material: Material::floor(),
            },
        ]
    }

    fn paint_ornaments(&mut self) {
        let theme = self.state.theme_color;
        palette::paint_ornaments(&mut self.ornaments.buffer, theme);
    }
}
