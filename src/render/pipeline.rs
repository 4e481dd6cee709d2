use glam::Mat4;
use tracing::{debug, info};
use web_sys::{
    WebGl2RenderingContext, WebGlBuffer, WebGlFramebuffer, WebGlProgram, WebGlRenderbuffer,
    WebGlTexture, WebGlUniformLocation, WebGlVertexArrayObject,
};

use super::shaders::*;
use super::webgl::WebGLContext;
use crate::instances::{InstanceBuffer, InstanceSink, COLOR_FLOATS};
use crate::layout::GroupKind;
use crate::mesh::{primitives, Mesh, VERTEX_FLOATS};
use crate::scene::lighting::MAX_POINT_LIGHTS;
use crate::scene::sparkles::SPARKLE_FLOATS;
use crate::scene::{FrameParams, LightRig, Material, Prop, Scene};

type Gl = WebGl2RenderingContext;

/// Wrap for the grain time uniform, in seconds
const GRAIN_PERIOD: f64 = 1000.0;

/// Mesh used for each particle group
fn group_mesh(kind: GroupKind) -> Mesh {
    match kind {
        GroupKind::Foliage => primitives::cylinder(0.02, 0.12, 0.6, 4),
        GroupKind::Ornament => primitives::uv_sphere(1.0, 16, 16),
        GroupKind::Light => primitives::uv_sphere(1.0, 8, 8),
    }
}

fn prop_mesh(prop: Prop) -> Mesh {
    match prop {
        Prop::Trunk => primitives::cylinder(0.4, 0.8, 2.5, 8),
        Prop::StarBody => primitives::octahedron(0.3),
        Prop::StarRing => primitives::torus(0.3, 0.02, 16, 32),
        Prop::Floor => primitives::plane(100.0, 100.0),
    }
}

/// Cached uniform locations for the lit shader
struct LitUniforms {
    model: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    camera_pos: Option<WebGlUniformLocation>,
    base_color: Option<WebGlUniformLocation>,
    roughness: Option<WebGlUniformLocation>,
    metalness: Option<WebGlUniformLocation>,
    emissive: Option<WebGlUniformLocation>,
    emissive_intensity: Option<WebGlUniformLocation>,
    ambient: Option<WebGlUniformLocation>,
    light_count: Option<WebGlUniformLocation>,
    light_position: Vec<Option<WebGlUniformLocation>>,
    light_color: Vec<Option<WebGlUniformLocation>>,
    light_intensity: Vec<Option<WebGlUniformLocation>>,
    light_range: Vec<Option<WebGlUniformLocation>>,
}

impl LitUniforms {
    fn new(ctx: &WebGLContext, program: &WebGlProgram) -> Self {
        let loc = |name: &str| ctx.get_uniform_location(program, name);
        let array = |name: &str| {
            (0..MAX_POINT_LIGHTS)
                .map(|i| ctx.get_uniform_location(program, &format!("{}[{}]", name, i)))
                .collect::<Vec<_>>()
        };

        Self {
            model: loc("u_model"),
            view: loc("u_view"),
            projection: loc("u_projection"),
            camera_pos: loc("u_camera_pos"),
            base_color: loc("u_base_color"),
            roughness: loc("u_roughness"),
            metalness: loc("u_metalness"),
            emissive: loc("u_emissive"),
            emissive_intensity: loc("u_emissive_intensity"),
            ambient: loc("u_ambient"),
            light_count: loc("u_light_count"),
            light_position: array("u_light_position"),
            light_color: array("u_light_color"),
            light_intensity: array("u_light_intensity"),
            light_range: array("u_light_range"),
        }
    }
}

/// Cached uniform locations for the sparkle shader
struct SparkleUniforms {
    model: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    pixel_ratio: Option<WebGlUniformLocation>,
    size_scale: Option<WebGlUniformLocation>,
}

/// Cached uniform locations for post-processing
struct PostUniforms {
    extract_texture: Option<WebGlUniformLocation>,
    threshold: Option<WebGlUniformLocation>,
    blur_texture: Option<WebGlUniformLocation>,
    direction: Option<WebGlUniformLocation>,
    scene: Option<WebGlUniformLocation>,
    bloom: Option<WebGlUniformLocation>,
    bloom_strength: Option<WebGlUniformLocation>,
    vignette_offset: Option<WebGlUniformLocation>,
    vignette_darkness: Option<WebGlUniformLocation>,
    grain: Option<WebGlUniformLocation>,
    time: Option<WebGlUniformLocation>,
}

/// One mesh drawn many times with per-instance matrix and colour
struct InstancedBatch {
    vao: WebGlVertexArrayObject,
    _vertex_buffer: WebGlBuffer,
    _index_buffer: WebGlBuffer,
    matrix_buffer: WebGlBuffer,
    color_buffer: WebGlBuffer,
    index_count: i32,
    instance_count: usize,
}

impl InstancedBatch {
    fn new(ctx: &WebGLContext, mesh: &Mesh, instances: &InstanceBuffer) -> Result<Self, String> {
        let gl = &ctx.gl;

        let vao = ctx.create_vao()?;
        gl.bind_vertex_array(Some(&vao));

        // Layout: position(3) + normal(3)
        let stride = (VERTEX_FLOATS * 4) as i32;
        let vertex_buffer = ctx.create_buffer_f32(&mesh.vertex_data(), Gl::STATIC_DRAW)?;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&vertex_buffer));
        ctx.float_attribute(0, 3, stride, 0, 0);
        ctx.float_attribute(1, 3, stride, 12, 0);

        let index_buffer = ctx.create_index_buffer(mesh.index_data(), Gl::STATIC_DRAW)?;
        let (matrix_buffer, color_buffer) = Self::attach_instances(ctx, instances)?;

        gl.bind_vertex_array(None);
        gl.bind_buffer(Gl::ARRAY_BUFFER, None);

        Ok(Self {
            vao,
            _vertex_buffer: vertex_buffer,
            _index_buffer: index_buffer,
            matrix_buffer,
            color_buffer,
            index_count: mesh.index_data().len() as i32,
            instance_count: instances.instance_count(),
        })
    }

    /// Create instance buffers and wire them into the bound VAO
    fn attach_instances(
        ctx: &WebGLContext,
        instances: &InstanceBuffer,
    ) -> Result<(WebGlBuffer, WebGlBuffer), String> {
        let gl = &ctx.gl;

        let matrix_buffer = ctx.create_buffer_f32(instances.matrices(), Gl::DYNAMIC_DRAW)?;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&matrix_buffer));
        ctx.mat4_attribute(2);

        let color_buffer = ctx.create_buffer_f32(instances.colors(), Gl::DYNAMIC_DRAW)?;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&color_buffer));
        ctx.float_attribute(6, 3, (COLOR_FLOATS * 4) as i32, 0, 1);

        Ok((matrix_buffer, color_buffer))
    }

    /// Push whatever the CPU side flagged dirty, then clear the flags
    fn upload(&mut self, ctx: &WebGLContext, instances: &mut InstanceBuffer) -> Result<(), String> {
        if instances.instance_count() != self.instance_count {
            let gl = &ctx.gl;
            gl.delete_buffer(Some(&self.matrix_buffer));
            gl.delete_buffer(Some(&self.color_buffer));

            gl.bind_vertex_array(Some(&self.vao));
            let (matrix_buffer, color_buffer) = Self::attach_instances(ctx, instances)?;
            gl.bind_vertex_array(None);
            gl.bind_buffer(Gl::ARRAY_BUFFER, None);

            self.matrix_buffer = matrix_buffer;
            self.color_buffer = color_buffer;
            self.instance_count = instances.instance_count();
            instances.take_transforms_dirty();
            instances.take_colors_dirty();
            debug!(count = self.instance_count, "reallocated instance buffers");
            return Ok(());
        }

        if instances.take_transforms_dirty() {
            ctx.update_buffer_f32(&self.matrix_buffer, instances.matrices());
        }
        if instances.take_colors_dirty() {
            ctx.update_buffer_f32(&self.color_buffer, instances.colors());
        }
        Ok(())
    }

    fn draw(&self, gl: &WebGl2RenderingContext) {
        if self.instance_count == 0 {
            return;
        }
        gl.bind_vertex_array(Some(&self.vao));
        gl.draw_elements_instanced_with_i32(
            Gl::TRIANGLES,
            self.index_count,
            Gl::UNSIGNED_INT,
            0,
            self.instance_count as i32,
        );
    }
}

/// A static mesh drawn through the instanced path with a single instance
struct PropBatch {
    prop: Prop,
    batch: InstancedBatch,
    instance: InstanceBuffer,
}

/// Complete render pipeline for the tree scene
pub struct RenderPipeline {
    ctx: WebGLContext,

    // Shaders
    lit_program: WebGlProgram,
    sparkle_program: WebGlProgram,
    bloom_extract_program: WebGlProgram,
    blur_program: WebGlProgram,
    composite_program: WebGlProgram,

    // Uniform locations
    lit_uniforms: LitUniforms,
    sparkle_uniforms: SparkleUniforms,
    post_uniforms: PostUniforms,

    // Geometry
    groups: Vec<(GroupKind, InstancedBatch)>,
    props: Vec<PropBatch>,

    // Sparkle data
    sparkle_vao: WebGlVertexArrayObject,
    sparkle_buffer: WebGlBuffer,
    sparkle_capacity: usize,
    sparkle_count: i32,

    // Starfield, uploaded once
    star_vao: WebGlVertexArrayObject,
    _star_buffer: WebGlBuffer,
    star_count: i32,

    // Framebuffers for post-processing
    scene_texture: Option<WebGlTexture>,
    scene_depth: Option<WebGlRenderbuffer>,
    scene_fbo: Option<WebGlFramebuffer>,
    bloom_textures: [Option<WebGlTexture>; 2],
    bloom_fbos: [Option<WebGlFramebuffer>; 2],

    // Dimensions
    width: i32,
    height: i32,
    pixel_ratio: f32,
}

impl RenderPipeline {
    pub fn new(gl: WebGl2RenderingContext, scene: &Scene, width: i32, height: i32) -> Result<Self, String> {
        let ctx = WebGLContext::new(gl);

        // Compile shaders
        let lit_program = ctx.create_program(LIT_VERTEX_SHADER, LIT_FRAGMENT_SHADER)?;
        let sparkle_program = ctx.create_program(SPARKLE_VERTEX_SHADER, SPARKLE_FRAGMENT_SHADER)?;
        let bloom_extract_program = ctx.create_program(FULLSCREEN_VERTEX_SHADER, BLOOM_EXTRACT_SHADER)?;
        let blur_program = ctx.create_program(FULLSCREEN_VERTEX_SHADER, BLUR_SHADER)?;
        let composite_program = ctx.create_program(FULLSCREEN_VERTEX_SHADER, COMPOSITE_SHADER)?;

        let lit_uniforms = LitUniforms::new(&ctx, &lit_program);

        let sparkle_uniforms = SparkleUniforms {
            model: ctx.get_uniform_location(&sparkle_program, "u_model"),
            view: ctx.get_uniform_location(&sparkle_program, "u_view"),
            projection: ctx.get_uniform_location(&sparkle_program, "u_projection"),
            pixel_ratio: ctx.get_uniform_location(&sparkle_program, "u_pixel_ratio"),
            size_scale: ctx.get_uniform_location(&sparkle_program, "u_size_scale"),
        };

        let post_uniforms = PostUniforms {
            extract_texture: ctx.get_uniform_location(&bloom_extract_program, "u_texture"),
            threshold: ctx.get_uniform_location(&bloom_extract_program, "u_threshold"),
            blur_texture: ctx.get_uniform_location(&blur_program, "u_texture"),
            direction: ctx.get_uniform_location(&blur_program, "u_direction"),
            scene: ctx.get_uniform_location(&composite_program, "u_scene"),
            bloom: ctx.get_uniform_location(&composite_program, "u_bloom"),
            bloom_strength: ctx.get_uniform_location(&composite_program, "u_bloom_strength"),
            vignette_offset: ctx.get_uniform_location(&composite_program, "u_vignette_offset"),
            vignette_darkness: ctx.get_uniform_location(&composite_program, "u_vignette_darkness"),
            grain: ctx.get_uniform_location(&composite_program, "u_grain"),
            time: ctx.get_uniform_location(&composite_program, "u_time"),
        };

        let groups = GroupKind::ALL
            .into_iter()
            .map(|kind| Ok((kind, InstancedBatch::new(&ctx, &group_mesh(kind), scene.buffer(kind))?)))
            .collect::<Result<Vec<_>, String>>()?;

        let props = Prop::ALL
            .into_iter()
            .map(|prop| {
                let instance = InstanceBuffer::new(1);
                let batch = InstancedBatch::new(&ctx, &prop_mesh(prop), &instance)?;
                Ok(PropBatch { prop, batch, instance })
            })
            .collect::<Result<Vec<_>, String>>()?;

        let (sparkle_vao, sparkle_buffer) = Self::create_point_buffer(&ctx, &[], Gl::DYNAMIC_DRAW)?;
        let stars = scene.starfield();
        let (star_vao, star_buffer) =
            Self::create_point_buffer(&ctx, stars.particle_data(), Gl::STATIC_DRAW)?;

        let mut pipeline = Self {
            ctx,
            lit_program,
            sparkle_program,
            bloom_extract_program,
            blur_program,
            composite_program,
            lit_uniforms,
            sparkle_uniforms,
            post_uniforms,
            groups,
            props,
            sparkle_vao,
            sparkle_buffer,
            sparkle_capacity: 0,
            sparkle_count: 0,
            star_vao,
            _star_buffer: star_buffer,
            star_count: stars.count() as i32,
            scene_texture: None,
            scene_depth: None,
            scene_fbo: None,
            bloom_textures: [None, None],
            bloom_fbos: [None, None],
            width,
            height,
            pixel_ratio: 1.0,
        };

        pipeline.create_framebuffers()?;
        info!(width, height, "render pipeline ready");

        Ok(pipeline)
    }

    /// Format: position(3) + size(1) + alpha(1) + color(3) = 8 floats per particle
    fn create_point_buffer(
        ctx: &WebGLContext,
        data: &[f32],
        usage: u32,
    ) -> Result<(WebGlVertexArrayObject, WebGlBuffer), String> {
        let gl = &ctx.gl;

        let vao = ctx.create_vao()?;
        gl.bind_vertex_array(Some(&vao));

        let buffer = ctx.create_buffer_f32(data, usage)?;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));

        let stride = (SPARKLE_FLOATS * 4) as i32;
        ctx.float_attribute(0, 3, stride, 0, 0);
        ctx.float_attribute(1, 1, stride, 12, 0);
        ctx.float_attribute(2, 1, stride, 16, 0);
        ctx.float_attribute(3, 3, stride, 20, 0);

        gl.bind_vertex_array(None);
        gl.bind_buffer(Gl::ARRAY_BUFFER, None);

        Ok((vao, buffer))
    }

    fn upload_sparkles(&mut self, data: &[f32]) -> Result<(), String> {
        let count = data.len() / SPARKLE_FLOATS;

        if count > self.sparkle_capacity {
            let gl = &self.ctx.gl;
            gl.delete_buffer(Some(&self.sparkle_buffer));
            gl.delete_vertex_array(Some(&self.sparkle_vao));

            let (vao, buffer) = Self::create_point_buffer(&self.ctx, data, Gl::DYNAMIC_DRAW)?;
            self.sparkle_vao = vao;
            self.sparkle_buffer = buffer;
            self.sparkle_capacity = count;
        } else {
            self.ctx.update_buffer_f32(&self.sparkle_buffer, data);
        }

        self.sparkle_count = count as i32;
        Ok(())
    }

    fn create_framebuffers(&mut self) -> Result<(), String> {
        self.delete_framebuffers();

        // Scene framebuffer
        let scene_tex = self.ctx.create_texture(self.width, self.height, Gl::RGBA)?;
        let depth = self.ctx.create_depth_buffer(self.width, self.height)?;
        let scene_fbo = self.ctx.create_framebuffer(&scene_tex, Some(&depth))?;
        self.scene_texture = Some(scene_tex);
        self.scene_depth = Some(depth);
        self.scene_fbo = Some(scene_fbo);

        // Bloom framebuffers (at half resolution)
        let (bloom_width, bloom_height) = self.bloom_size();

        for i in 0..2 {
            let tex = self.ctx.create_texture(bloom_width, bloom_height, Gl::RGBA)?;
            let fbo = self.ctx.create_framebuffer(&tex, None)?;
            self.bloom_textures[i] = Some(tex);
            self.bloom_fbos[i] = Some(fbo);
        }

        Ok(())
    }

    fn delete_framebuffers(&mut self) {
        let gl = &self.ctx.gl;
        gl.delete_framebuffer(self.scene_fbo.take().as_ref());
        gl.delete_texture(self.scene_texture.take().as_ref());
        gl.delete_renderbuffer(self.scene_depth.take().as_ref());
        for i in 0..2 {
            gl.delete_framebuffer(self.bloom_fbos[i].take().as_ref());
            gl.delete_texture(self.bloom_textures[i].take().as_ref());
        }
    }

    fn bloom_size(&self) -> (i32, i32) {
        ((self.width / 2).max(1), (self.height / 2).max(1))
    }

    fn set_material(&self, material: &Material) {
        let u = &self.lit_uniforms;
        self.ctx.uniform_vec3(u.base_color.as_ref(), material.color);
        self.ctx.uniform_1f(u.roughness.as_ref(), material.roughness);
        self.ctx.uniform_1f(u.metalness.as_ref(), material.metalness);
        self.ctx.uniform_vec3(u.emissive.as_ref(), material.emissive);
        self.ctx.uniform_1f(u.emissive_intensity.as_ref(), material.emissive_intensity);
    }

    fn set_lights(&self, rig: &LightRig) {
        let u = &self.lit_uniforms;
        self.ctx.uniform_vec3(u.ambient.as_ref(), rig.ambient_color * rig.ambient_intensity);
        self.ctx.uniform_1i(u.light_count.as_ref(), rig.points.len().min(u.light_position.len()) as i32);

        for (i, light) in rig.points.iter().take(u.light_position.len()).enumerate() {
            self.ctx.uniform_vec3(u.light_position[i].as_ref(), light.position);
            self.ctx.uniform_vec3(u.light_color[i].as_ref(), light.color);
            self.ctx.uniform_1f(u.light_intensity[i].as_ref(), light.intensity);
            self.ctx.uniform_1f(u.light_range[i].as_ref(), light.range);
        }
    }

    /// Render a frame
    pub fn render(&mut self, scene: &mut Scene, time: f64) -> Result<(), String> {
        for (kind, batch) in &mut self.groups {
            batch.upload(&self.ctx, scene.buffer_mut(*kind))?;
        }

        let frame = scene.frame(time);
        for prop in &mut self.props {
            if let Some(draw) = frame.props.iter().find(|d| d.prop == prop.prop) {
                prop.instance.set_matrix_at(0, &draw.matrix);
                prop.instance.mark_transforms_dirty();
                prop.batch.upload(&self.ctx, &mut prop.instance)?;
            }
        }

        match frame.sparkles.as_deref() {
            Some(data) => self.upload_sparkles(data)?,
            None => self.sparkle_count = 0,
        }

        self.draw_scene(&frame);
        self.draw_post(&frame, time);
        Ok(())
    }

    fn draw_scene(&self, frame: &FrameParams) {
        let gl = &self.ctx.gl;

        let aspect = self.width as f32 / self.height.max(1) as f32;
        let projection = frame.camera.projection_matrix(aspect);
        let view = frame.camera.view_matrix();

        // === Pass 1: Render scene to framebuffer ===
        gl.bind_framebuffer(Gl::FRAMEBUFFER, self.scene_fbo.as_ref());
        self.ctx.viewport(0, 0, self.width, self.height);
        gl.disable(Gl::BLEND);
        self.ctx.enable_depth_test();
        self.ctx.clear(frame.background);

        gl.use_program(Some(&self.lit_program));
        let u = &self.lit_uniforms;
        self.ctx.uniform_mat4(u.view.as_ref(), &view);
        self.ctx.uniform_mat4(u.projection.as_ref(), &projection);
        self.ctx.uniform_vec3(u.camera_pos.as_ref(), frame.camera.position());
        self.ctx.uniform_mat4(u.model.as_ref(), &frame.model);
        self.set_lights(&frame.lights);

        for (kind, batch) in &self.groups {
            let material = match kind {
                GroupKind::Foliage => &frame.foliage,
                GroupKind::Ornament => &frame.ornaments,
                GroupKind::Light => &frame.bulbs,
            };
            self.set_material(material);
            batch.draw(gl);
        }

        for prop in &self.props {
            if let Some(draw) = frame.props.iter().find(|d| d.prop == prop.prop) {
                self.set_material(&draw.material);
                prop.batch.draw(gl);
            }
        }

        // Points: stars stay fixed in the world, sparkles turn with the tree
        gl.use_program(Some(&self.sparkle_program));
        gl.depth_mask(false);
        self.ctx.enable_additive_blending();

        let s = &self.sparkle_uniforms;
        self.ctx.uniform_mat4(s.view.as_ref(), &view);
        self.ctx.uniform_mat4(s.projection.as_ref(), &projection);
        self.ctx.uniform_1f(s.pixel_ratio.as_ref(), self.pixel_ratio);

        if self.star_count > 0 {
            self.ctx.uniform_mat4(s.model.as_ref(), &Mat4::IDENTITY);
            self.ctx.uniform_1f(s.size_scale.as_ref(), frame.star_size);
            gl.bind_vertex_array(Some(&self.star_vao));
            gl.draw_arrays(Gl::POINTS, 0, self.star_count);
        }

        if self.sparkle_count > 0 {
            self.ctx.uniform_mat4(s.model.as_ref(), &frame.model);
            self.ctx.uniform_1f(s.size_scale.as_ref(), 1.0);
            gl.bind_vertex_array(Some(&self.sparkle_vao));
            gl.draw_arrays(Gl::POINTS, 0, self.sparkle_count);
        }
        gl.depth_mask(true);

        gl.bind_vertex_array(None);
    }

    fn draw_post(&self, frame: &FrameParams, time: f64) {
        let gl = &self.ctx.gl;
        let post = &frame.post;
        let (bloom_width, bloom_height) = self.bloom_size();

        // === Pass 2: Extract bloom ===
        gl.bind_framebuffer(Gl::FRAMEBUFFER, self.bloom_fbos[0].as_ref());
        self.ctx.viewport(0, 0, bloom_width, bloom_height);
        gl.disable(Gl::DEPTH_TEST);
        gl.disable(Gl::BLEND);

        gl.use_program(Some(&self.bloom_extract_program));
        gl.active_texture(Gl::TEXTURE0);
        gl.bind_texture(Gl::TEXTURE_2D, self.scene_texture.as_ref());
        self.ctx.uniform_1i(self.post_uniforms.extract_texture.as_ref(), 0);
        self.ctx.uniform_1f(self.post_uniforms.threshold.as_ref(), post.bloom_threshold);

        gl.draw_arrays(Gl::TRIANGLES, 0, 3);

        // === Pass 3 & 4: Separable blur ===
        gl.use_program(Some(&self.blur_program));
        self.ctx.uniform_1i(self.post_uniforms.blur_texture.as_ref(), 0);

        for (target, source, direction) in [(1, 0, (1.0, 0.0)), (0, 1, (0.0, 1.0))] {
            gl.bind_framebuffer(Gl::FRAMEBUFFER, self.bloom_fbos[target].as_ref());
            gl.bind_texture(Gl::TEXTURE_2D, self.bloom_textures[source].as_ref());
            self.ctx.uniform_2f(self.post_uniforms.direction.as_ref(), direction.0, direction.1);
            gl.draw_arrays(Gl::TRIANGLES, 0, 3);
        }

        // === Pass 5: Composite ===
        gl.bind_framebuffer(Gl::FRAMEBUFFER, None);
        self.ctx.viewport(0, 0, self.width, self.height);

        gl.use_program(Some(&self.composite_program));

        gl.active_texture(Gl::TEXTURE0);
        gl.bind_texture(Gl::TEXTURE_2D, self.scene_texture.as_ref());
        self.ctx.uniform_1i(self.post_uniforms.scene.as_ref(), 0);

        gl.active_texture(Gl::TEXTURE1);
        gl.bind_texture(Gl::TEXTURE_2D, self.bloom_textures[0].as_ref());
        self.ctx.uniform_1i(self.post_uniforms.bloom.as_ref(), 1);

        let p = &self.post_uniforms;
        self.ctx.uniform_1f(p.bloom_strength.as_ref(), post.bloom_strength);
        self.ctx.uniform_1f(p.vignette_offset.as_ref(), post.vignette_offset);
        self.ctx.uniform_1f(p.vignette_darkness.as_ref(), post.vignette_darkness);
        self.ctx.uniform_1f(p.grain.as_ref(), post.grain);
        // Grain only needs a varying seed, so keep the uniform small
        self.ctx.uniform_1f(p.time.as_ref(), time.rem_euclid(GRAIN_PERIOD) as f32);

        gl.draw_arrays(Gl::TRIANGLES, 0, 3);
        gl.active_texture(Gl::TEXTURE0);
    }

    /// Resize the render targets
    pub fn resize(&mut self, width: i32, height: i32) -> Result<(), String> {
        self.width = width.max(1);
        self.height = height.max(1);
        self.create_framebuffers()?;
        debug!(width = self.width, height = self.height, "resized render targets");
        Ok(())
    }

    pub fn set_pixel_ratio(&mut self, ratio: f32) {
        if ratio.is_finite() && ratio > 0.0 {
            self.pixel_ratio = ratio;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_meshes() {
        let needle = group_mesh(GroupKind::Foliage);
        assert!(needle.vertices.iter().all(|v| v.position.y.abs() <= 0.3 + 1e-5));

        let ornament = group_mesh(GroupKind::Ornament);
        let bulb = group_mesh(GroupKind::Light);
        assert!(ornament.triangle_count() > bulb.triangle_count());
        assert!((ornament.extent() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_prop_meshes_cover_every_prop() {
        for prop in Prop::ALL {
            assert!(prop_mesh(prop).triangle_count() > 0);
        }
        assert!((prop_mesh(Prop::StarBody).extent() - 0.3).abs() < 1e-5);
    }
}
