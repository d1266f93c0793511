use std::f32::consts::FRAC_PI_4;
use web_sys::{
    WebGl2RenderingContext, WebGlBuffer, WebGlProgram, WebGlVertexArrayObject,
    WebGlTexture, WebGlFramebuffer, WebGlUniformLocation,
};
use crate::assets::PhotoStore;
use crate::math::{Mat4, Vec3};
use crate::mesh::{primitive, quad, Mesh, Vertex};
use crate::ornaments::{Instance, Shape, POINT_STRIDE};
use crate::scene::FrameSnapshot;
use super::webgl::WebGLContext;
use super::shaders::*;

/// Scene background, #020508
const BACKGROUND: u32 = 0x020508;
const BLOOM_THRESHOLD: f32 = 0.7;
const BLOOM_STRENGTH: f32 = 1.2;
const VIGNETTE_STRENGTH: f32 = 0.4;
const POINT_SIZE_SCALE: f32 = 300.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 400.0;

struct PointUniforms {
    model: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    size_scale: Option<WebGlUniformLocation>,
}

struct InstanceUniforms {
    group: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    camera_pos: Option<WebGlUniformLocation>,
    key_light: Option<WebGlUniformLocation>,
    warm_light_pos: Option<WebGlUniformLocation>,
}

struct PhotoUniforms {
    model: Option<WebGlUniformLocation>,
    view: Option<WebGlUniformLocation>,
    projection: Option<WebGlUniformLocation>,
    photo: Option<WebGlUniformLocation>,
    has_photo: Option<WebGlUniformLocation>,
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
    vignette_strength: Option<WebGlUniformLocation>,
}

/// A static mesh, optionally with a per-instance buffer
struct MeshBuffers {
    vao: WebGlVertexArrayObject,
    index_count: i32,
    instances: Option<WebGlBuffer>,
}

/// Dynamic point-sprite batch
struct PointBatch {
    vao: WebGlVertexArrayObject,
    buffer: WebGlBuffer,
    count: i32,
}

/// Render pipeline for the tree scene: lit instances, photo planes, point sprites, bloom
pub struct RenderPipeline {
    ctx: WebGLContext,

    point_program: WebGlProgram,
    instance_program: WebGlProgram,
    photo_program: WebGlProgram,
    bloom_extract_program: WebGlProgram,
    blur_program: WebGlProgram,
    composite_program: WebGlProgram,

    point_uniforms: PointUniforms,
    instance_uniforms: InstanceUniforms,
    photo_uniforms: PhotoUniforms,
    post_uniforms: PostUniforms,

    /// Indexed by [`Shape::index`]
    shapes: Vec<MeshBuffers>,
    instance_data: Vec<Vec<f32>>,
    photo_quad: MeshBuffers,
    tree_points: PointBatch,
    ambient_points: PointBatch,
    photo_textures: Vec<Option<WebGlTexture>>,

    // Framebuffers for post-processing
    scene_texture: Option<WebGlTexture>,
    scene_fbo: Option<WebGlFramebuffer>,
    bloom_textures: [Option<WebGlTexture>; 2],
    bloom_fbos: [Option<WebGlFramebuffer>; 2],

    width: i32,
    height: i32,

    // Camera state
    pub camera_position: Vec3,
    pub camera_target: Vec3,
    pub fov: f32,
}

impl RenderPipeline {
    pub fn new(gl: WebGl2RenderingContext, width: i32, height: i32) -> Result<Self, String> {
        let ctx = WebGLContext::new(gl);

        let point_program = ctx.create_program(POINT_VERTEX_SHADER, POINT_FRAGMENT_SHADER)?;
        let instance_program = ctx.create_program(INSTANCE_VERTEX_SHADER, INSTANCE_FRAGMENT_SHADER)?;
        let photo_program = ctx.create_program(PHOTO_VERTEX_SHADER, PHOTO_FRAGMENT_SHADER)?;
        let bloom_extract_program = ctx.create_program(FULLSCREEN_VERTEX_SHADER, BLOOM_EXTRACT_SHADER)?;
        let blur_program = ctx.create_program(FULLSCREEN_VERTEX_SHADER, BLUR_SHADER)?;
        let composite_program = ctx.create_program(FULLSCREEN_VERTEX_SHADER, COMPOSITE_SHADER)?;

        let point_uniforms = PointUniforms {
            model: ctx.get_uniform_location(&point_program, "u_model"),
            view: ctx.get_uniform_location(&point_program, "u_view"),
            projection: ctx.get_uniform_location(&point_program, "u_projection"),
            size_scale: ctx.get_uniform_location(&point_program, "u_size_scale"),
        };

        let instance_uniforms = InstanceUniforms {
            group: ctx.get_uniform_location(&instance_program, "u_group"),
            view: ctx.get_uniform_location(&instance_program, "u_view"),
            projection: ctx.get_uniform_location(&instance_program, "u_projection"),
            camera_pos: ctx.get_uniform_location(&instance_program, "u_camera_pos"),
            key_light: ctx.get_uniform_location(&instance_program, "u_key_light"),
            warm_light_pos: ctx.get_uniform_location(&instance_program, "u_warm_light_pos"),
        };

        let photo_uniforms = PhotoUniforms {
            model: ctx.get_uniform_location(&photo_program, "u_model"),
            view: ctx.get_uniform_location(&photo_program, "u_view"),
            projection: ctx.get_uniform_location(&photo_program, "u_projection"),
            photo: ctx.get_uniform_location(&photo_program, "u_photo"),
            has_photo: ctx.get_uniform_location(&photo_program, "u_has_photo"),
        };

        let post_uniforms = PostUniforms {
            extract_texture: ctx.get_uniform_location(&bloom_extract_program, "u_texture"),
            threshold: ctx.get_uniform_location(&bloom_extract_program, "u_threshold"),
            blur_texture: ctx.get_uniform_location(&blur_program, "u_texture"),
            direction: ctx.get_uniform_location(&blur_program, "u_direction"),
            scene: ctx.get_uniform_location(&composite_program, "u_scene"),
            bloom: ctx.get_uniform_location(&composite_program, "u_bloom"),
            bloom_strength: ctx.get_uniform_location(&composite_program, "u_bloom_strength"),
            vignette_strength: ctx.get_uniform_location(&composite_program, "u_vignette_strength"),
        };

        let shapes = Shape::ALL
            .iter()
            .map(|&shape| upload_mesh(&ctx, &primitive(shape), true))
            .collect::<Result<Vec<_>, _>>()?;
        let photo_quad = upload_mesh(&ctx, &quad(), false)?;
        let tree_points = create_point_batch(&ctx)?;
        let ambient_points = create_point_batch(&ctx)?;

        let mut pipeline = Self {
            ctx,
            point_program,
            instance_program,
            photo_program,
            bloom_extract_program,
            blur_program,
            composite_program,
            point_uniforms,
            instance_uniforms,
            photo_uniforms,
            post_uniforms,
            shapes,
            instance_data: vec![Vec::new(); Shape::ALL.len()],
            photo_quad,
            tree_points,
            ambient_points,
            photo_textures: Vec::new(),
            scene_texture: None,
            scene_fbo: None,
            bloom_textures: [None, None],
            bloom_fbos: [None, None],
            width,
            height,
            camera_position: Vec3::new(0.0, 4.0, 20.0),
            camera_target: Vec3::ZERO,
            fov: FRAC_PI_4,
        };

        pipeline.create_framebuffers()?;

        Ok(pipeline)
    }

    fn create_framebuffers(&mut self) -> Result<(), String> {
        let width = self.width.max(1);
        let height = self.height.max(1);

        let scene_tex = self.ctx.create_texture(width, height, None)?;
        let depth = self.ctx.create_depth_buffer(width, height)?;
        let scene_fbo = self.ctx.create_framebuffer(&scene_tex, Some(&depth))?;
        self.scene_texture = Some(scene_tex);
        self.scene_fbo = Some(scene_fbo);

        // Bloom framebuffers (at half resolution)
        let bloom_width = (width / 2).max(1);
        let bloom_height = (height / 2).max(1);

        for i in 0..2 {
            let tex = self.ctx.create_texture(bloom_width, bloom_height, None)?;
            let fbo = self.ctx.create_framebuffer(&tex, None)?;
            self.bloom_textures[i] = Some(tex);
            self.bloom_fbos[i] = Some(fbo);
        }

        Ok(())
    }

    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.camera_position, self.camera_target, Vec3::UP)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov, self.aspect(), NEAR, FAR)
    }

    /// Upload textures the store changed since the last call
    pub fn sync_photos(&mut self, store: &mut PhotoStore) -> Result<(), String> {
        if self.photo_textures.len() < store.len() {
            self.photo_textures.resize(store.len(), None);
        }

        let ctx = &self.ctx;
        let textures = &mut self.photo_textures;
        let failures = store.upload_dirty(|id, image| {
            let texture = ctx.create_texture(image.width as i32, image.height as i32, Some(image.pixels.as_slice()))?;
            if let Some(old) = textures[id].replace(texture) {
                ctx.gl.delete_texture(Some(&old));
            }
            Ok(())
        });

        if failures > 0 {
            return Err(format!("{} photo texture(s) could not be uploaded", failures));
        }
        Ok(())
    }

    /// Render one frame of the scene
    pub fn render(&mut self, snapshot: &FrameSnapshot) {
        self.fill_instances(&snapshot.instances);
        self.ctx.update_buffer_f32(&self.tree_points.buffer, &snapshot.tree_points);
        self.tree_points.count = (snapshot.tree_points.len() / POINT_STRIDE) as i32;
        self.ctx.update_buffer_f32(&self.ambient_points.buffer, &snapshot.ambient_points);
        self.ambient_points.count = (snapshot.ambient_points.len() / POINT_STRIDE) as i32;

        let gl = &self.ctx.gl;
        let projection = self.projection_matrix();
        let view = self.view_matrix();
        let group = snapshot.group;

        // === Pass 1: Render scene to framebuffer ===
        gl.bind_framebuffer(WebGl2RenderingContext::FRAMEBUFFER, self.scene_fbo.as_ref());
        self.ctx.viewport(0, 0, self.width, self.height);
        let bg = Vec3::from_hex(BACKGROUND);
        self.ctx.clear(bg.x, bg.y, bg.z, 1.0);
        self.ctx.enable_depth_test();
        gl.depth_mask(true);
        gl.disable(WebGl2RenderingContext::BLEND);

        // Instanced primitives
        gl.use_program(Some(&self.instance_program));
        self.ctx.uniform_matrix4fv(self.instance_uniforms.group.as_ref(), group.as_slice());
        self.ctx.uniform_matrix4fv(self.instance_uniforms.view.as_ref(), view.as_slice());
        self.ctx.uniform_matrix4fv(self.instance_uniforms.projection.as_ref(), projection.as_slice());
        let eye = self.camera_position;
        self.ctx.uniform_3f(self.instance_uniforms.camera_pos.as_ref(), eye.x, eye.y, eye.z);
        self.ctx.uniform_3f(self.instance_uniforms.key_light.as_ref(), 0.4, 1.0, 0.6);
        self.ctx.uniform_3f(self.instance_uniforms.warm_light_pos.as_ref(), 10.0, 10.0, 10.0);

        for (mesh, data) in self.shapes.iter().zip(self.instance_data.iter()) {
            let count = (data.len() / Instance::STRIDE) as i32;
            let Some(buffer) = mesh.instances.as_ref() else {
                continue;
            };
            if count == 0 {
                continue;
            }
            self.ctx.update_buffer_f32(buffer, data);
            gl.bind_vertex_array(Some(&mesh.vao));
            gl.draw_elements_instanced_with_i32(
                WebGl2RenderingContext::TRIANGLES,
                mesh.index_count,
                WebGl2RenderingContext::UNSIGNED_INT,
                0,
                count,
            );
        }

        // Photo planes
        gl.use_program(Some(&self.photo_program));
        self.ctx.uniform_matrix4fv(self.photo_uniforms.view.as_ref(), view.as_slice());
        self.ctx.uniform_matrix4fv(self.photo_uniforms.projection.as_ref(), projection.as_slice());
        self.ctx.uniform_1i(self.photo_uniforms.photo.as_ref(), 0);
        gl.active_texture(WebGl2RenderingContext::TEXTURE0);
        gl.bind_vertex_array(Some(&self.photo_quad.vao));
        for photo in &snapshot.photo_quads {
            let model = group.mul(&Mat4 { data: photo.model });
            self.ctx.uniform_matrix4fv(self.photo_uniforms.model.as_ref(), model.as_slice());
            let texture = self.photo_textures.get(photo.id).and_then(|t| t.as_ref());
            gl.bind_texture(WebGl2RenderingContext::TEXTURE_2D, texture);
            self.ctx.uniform_1f(self.photo_uniforms.has_photo.as_ref(), if texture.is_some() { 1.0 } else { 0.0 });
            gl.draw_elements_with_i32(
                WebGl2RenderingContext::TRIANGLES,
                self.photo_quad.index_count,
                WebGl2RenderingContext::UNSIGNED_INT,
                0,
            );
        }

        // Point sprites: depth tested but not written
        gl.use_program(Some(&self.point_program));
        gl.depth_mask(false);
        self.ctx.uniform_matrix4fv(self.point_uniforms.view.as_ref(), view.as_slice());
        self.ctx.uniform_matrix4fv(self.point_uniforms.projection.as_ref(), projection.as_slice());
        self.ctx.uniform_1f(self.point_uniforms.size_scale.as_ref(), POINT_SIZE_SCALE);

        self.ctx.enable_blending();
        self.ctx.uniform_matrix4fv(self.point_uniforms.model.as_ref(), group.as_slice());
        draw_points(gl, &self.tree_points);

        self.ctx.enable_additive_blending();
        self.ctx.uniform_matrix4fv(self.point_uniforms.model.as_ref(), Mat4::identity().as_slice());
        draw_points(gl, &self.ambient_points);

        gl.depth_mask(true);
        gl.bind_vertex_array(None);

        // === Pass 2: Extract bloom ===
        gl.bind_framebuffer(WebGl2RenderingContext::FRAMEBUFFER, self.bloom_fbos[0].as_ref());
        self.ctx.viewport(0, 0, (self.width / 2).max(1), (self.height / 2).max(1));
        gl.disable(WebGl2RenderingContext::DEPTH_TEST);
        gl.disable(WebGl2RenderingContext::BLEND);

        gl.use_program(Some(&self.bloom_extract_program));
        gl.active_texture(WebGl2RenderingContext::TEXTURE0);
        gl.bind_texture(WebGl2RenderingContext::TEXTURE_2D, self.scene_texture.as_ref());
        self.ctx.uniform_1i(self.post_uniforms.extract_texture.as_ref(), 0);
        self.ctx.uniform_1f(self.post_uniforms.threshold.as_ref(), BLOOM_THRESHOLD);

        gl.draw_arrays(WebGl2RenderingContext::TRIANGLES, 0, 3);

        // === Pass 3: Blur horizontally ===
        gl.bind_framebuffer(WebGl2RenderingContext::FRAMEBUFFER, self.bloom_fbos[1].as_ref());
        gl.use_program(Some(&self.blur_program));
        gl.bind_texture(WebGl2RenderingContext::TEXTURE_2D, self.bloom_textures[0].as_ref());
        self.ctx.uniform_1i(self.post_uniforms.blur_texture.as_ref(), 0);
        self.ctx.uniform_2f(self.post_uniforms.direction.as_ref(), 1.0, 0.0);

        gl.draw_arrays(WebGl2RenderingContext::TRIANGLES, 0, 3);

        // === Pass 4: Blur vertically ===
        gl.bind_framebuffer(WebGl2RenderingContext::FRAMEBUFFER, self.bloom_fbos[0].as_ref());
        gl.bind_texture(WebGl2RenderingContext::TEXTURE_2D, self.bloom_textures[1].as_ref());
        self.ctx.uniform_2f(self.post_uniforms.direction.as_ref(), 0.0, 1.0);

        gl.draw_arrays(WebGl2RenderingContext::TRIANGLES, 0, 3);

        // === Pass 5: Composite ===
        gl.bind_framebuffer(WebGl2RenderingContext::FRAMEBUFFER, None);
        self.ctx.viewport(0, 0, self.width, self.height);

        gl.use_program(Some(&self.composite_program));

        gl.active_texture(WebGl2RenderingContext::TEXTURE0);
        gl.bind_texture(WebGl2RenderingContext::TEXTURE_2D, self.scene_texture.as_ref());
        self.ctx.uniform_1i(self.post_uniforms.scene.as_ref(), 0);

        gl.active_texture(WebGl2RenderingContext::TEXTURE1);
        gl.bind_texture(WebGl2RenderingContext::TEXTURE_2D, self.bloom_textures[0].as_ref());
        self.ctx.uniform_1i(self.post_uniforms.bloom.as_ref(), 1);

        self.ctx.uniform_1f(self.post_uniforms.bloom_strength.as_ref(), BLOOM_STRENGTH);
        self.ctx.uniform_1f(self.post_uniforms.vignette_strength.as_ref(), VIGNETTE_STRENGTH);

        gl.draw_arrays(WebGl2RenderingContext::TRIANGLES, 0, 3);
        gl.active_texture(WebGl2RenderingContext::TEXTURE0);
    }

    /// Bucket instances by shape into the per-shape scratch buffers
    fn fill_instances(&mut self, instances: &[Instance]) {
        for data in &mut self.instance_data {
            data.clear();
        }
        for instance in instances {
            instance.write_to(&mut self.instance_data[instance.shape.index()]);
        }
    }

    /// Resize the render pipeline
    pub fn resize(&mut self, width: i32, height: i32) -> Result<(), String> {
        self.width = width;
        self.height = height;
        self.create_framebuffers()
    }
}

fn draw_points(gl: &WebGl2RenderingContext, batch: &PointBatch) {
    if batch.count == 0 {
        return;
    }
    gl.bind_vertex_array(Some(&batch.vao));
    gl.draw_arrays(WebGl2RenderingContext::POINTS, 0, batch.count);
}

/// Upload a static mesh. Instanced meshes also get an empty per-instance buffer
/// laid out as model matrix columns (locations 3..=6) and color (location 7).
fn upload_mesh(ctx: &WebGLContext, mesh: &Mesh, instanced: bool) -> Result<MeshBuffers, String> {
    let gl = &ctx.gl;

    let vao = ctx.create_vao()?;
    gl.bind_vertex_array(Some(&vao));

    let vertex_buffer = ctx.create_buffer_f32(&mesh.vertex_data(), WebGl2RenderingContext::STATIC_DRAW)?;
    let index_buffer = ctx.create_index_buffer(mesh.index_data(), WebGl2RenderingContext::STATIC_DRAW)?;

    gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, Some(&vertex_buffer));
    gl.bind_buffer(WebGl2RenderingContext::ELEMENT_ARRAY_BUFFER, Some(&index_buffer));

    let stride = Vertex::FLOATS as i32;
    ctx.float_attribute(0, 3, stride, 0);
    ctx.float_attribute(1, 3, stride, 3);
    ctx.float_attribute(2, 2, stride, 6);

    let instances = if instanced {
        let buffer = ctx.create_buffer_f32(&[], WebGl2RenderingContext::DYNAMIC_DRAW)?;
        gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, Some(&buffer));
        let stride = Instance::STRIDE as i32;
        for column in 0..4 {
            ctx.instanced_attribute(3 + column as u32, 4, stride, column * 4);
        }
        ctx.instanced_attribute(7, 3, stride, 16);
        Some(buffer)
    } else {
        None
    };

    gl.bind_vertex_array(None);
    gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, None);

    Ok(MeshBuffers {
        vao,
        index_count: mesh.index_data().len() as i32,
        instances,
    })
}

/// Format: position(3) + size(1) + alpha(1) + color(3) = 8 floats per point
fn create_point_batch(ctx: &WebGLContext) -> Result<PointBatch, String> {
    let gl = &ctx.gl;

    let vao = ctx.create_vao()?;
    gl.bind_vertex_array(Some(&vao));

    let buffer = ctx.create_buffer_f32(&[], WebGl2RenderingContext::DYNAMIC_DRAW)?;
    gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, Some(&buffer));

    let stride = POINT_STRIDE as i32;
    ctx.float_attribute(0, 3, stride, 0);
    ctx.float_attribute(1, 1, stride, 3);
    ctx.float_attribute(2, 1, stride, 4);
    ctx.float_attribute(3, 3, stride, 5);

    gl.bind_vertex_array(None);
    gl.bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, None);

    Ok(PointBatch { vao, buffer, count: 0 })
}
