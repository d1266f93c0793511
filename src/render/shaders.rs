/// Vertex shader for point sprites (foliage, sparkles, stars)
pub const POINT_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_position;
layout(location = 1) in float a_size;
layout(location = 2) in float a_alpha;
layout(location = 3) in vec3 a_color;

uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;
uniform float u_size_scale;

out float v_alpha;
out vec3 v_color;

void main() {
    v_alpha = a_alpha;
    v_color = a_color;

    vec4 view_pos = u_view * u_model * vec4(a_position, 1.0);
    gl_Position = u_projection * view_pos;
    gl_PointSize = a_size * (u_size_scale / -view_pos.z);
}
"#;

/// Fragment shader for point sprites
pub const POINT_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in float v_alpha;
in vec3 v_color;

out vec4 fragColor;

void main() {
    // Circular soft particle
    vec2 coord = gl_PointCoord - vec2(0.5);
    float dist = length(coord);

    if (dist > 0.5) {
        discard;
    }

    float alpha = v_alpha * smoothstep(0.5, 0.1, dist);
    fragColor = vec4(v_color, alpha);
}
"#;

/// Vertex shader for instanced primitives (baubles, animals, frames, topper)
pub const INSTANCE_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec2 a_uv;
layout(location = 3) in mat4 a_instance;
layout(location = 7) in vec3 a_color;

uniform mat4 u_group;
uniform mat4 u_view;
uniform mat4 u_projection;

out vec3 v_normal;
out vec3 v_world_position;
out vec3 v_color;

void main() {
    mat4 model = u_group * a_instance;
    vec4 world_pos = model * vec4(a_position, 1.0);

    v_world_position = world_pos.xyz;
    v_normal = normalize(mat3(model) * a_normal);
    v_color = a_color;

    gl_Position = u_projection * u_view * world_pos;
}
"#;

/// Fragment shader for instanced primitives
pub const INSTANCE_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec3 v_normal;
in vec3 v_world_position;
in vec3 v_color;

uniform vec3 u_camera_pos;
uniform vec3 u_key_light;
uniform vec3 u_warm_light_pos;

out vec4 fragColor;

void main() {
    vec3 normal = normalize(v_normal);
    vec3 view_dir = normalize(u_camera_pos - v_world_position);

    // Colors above 1 are lights; keep them emissive so bloom picks them up
    float emissive = step(1.0, max(v_color.r, max(v_color.g, v_color.b)));

    vec3 key_dir = normalize(u_key_light);
    float key = max(dot(normal, key_dir), 0.0);

    vec3 to_warm = u_warm_light_pos - v_world_position;
    float warm = max(dot(normal, normalize(to_warm)), 0.0) / (1.0 + 0.02 * dot(to_warm, to_warm));
    vec3 warm_color = vec3(1.0, 0.84, 0.0);

    vec3 half_dir = normalize(key_dir + view_dir);
    float spec = pow(max(dot(normal, half_dir), 0.0), 48.0);

    float rim = pow(1.0 - max(dot(normal, view_dir), 0.0), 3.0);

    vec3 ambient = v_color * 0.25;
    vec3 lit = ambient
        + v_color * key * 0.9
        + v_color * warm_color * warm * 1.5
        + vec3(spec) * 0.6
        + warm_color * rim * 0.15;

    vec3 color = mix(lit, v_color, emissive);
    fragColor = vec4(color, 1.0);
}
"#;

/// Vertex shader for photo planes
pub const PHOTO_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec2 a_uv;

uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;

out vec2 v_uv;

void main() {
    v_uv = a_uv;
    gl_Position = u_projection * u_view * u_model * vec4(a_position, 1.0);
}
"#;

/// Fragment shader for photo planes
pub const PHOTO_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec2 v_uv;

uniform sampler2D u_photo;
uniform float u_has_photo;

out vec4 fragColor;

void main() {
    // Blank card until the host reports the image
    vec3 blank = vec3(0.94);
    vec3 photo = texture(u_photo, vec2(v_uv.x, 1.0 - v_uv.y)).rgb;
    fragColor = vec4(mix(blank, photo, u_has_photo), 1.0);
}
"#;

/// Fullscreen quad vertex shader for post-processing
pub const FULLSCREEN_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

out vec2 v_uv;

void main() {
    // Fullscreen triangle
    float x = float((gl_VertexID & 1) << 2);
    float y = float((gl_VertexID & 2) << 1);
    v_uv = vec2(x * 0.5, y * 0.5);
    gl_Position = vec4(x - 1.0, y - 1.0, 0.0, 1.0);
}
"#;

/// Bloom extraction shader
pub const BLOOM_EXTRACT_SHADER: &str = r#"#version 300 es
precision highp float;

in vec2 v_uv;

uniform sampler2D u_texture;
uniform float u_threshold;

out vec4 fragColor;

void main() {
    vec3 color = texture(u_texture, v_uv).rgb;
    float brightness = dot(color, vec3(0.2126, 0.7152, 0.0722));

    // Soft knee just below the threshold
    float weight = smoothstep(u_threshold - 0.1, u_threshold + 0.1, brightness);
    fragColor = vec4(color * weight, 1.0);
}
"#;

/// Gaussian blur shader
pub const BLUR_SHADER: &str = r#"#version 300 es
precision highp float;

in vec2 v_uv;

uniform sampler2D u_texture;
uniform vec2 u_direction;

out vec4 fragColor;

void main() {
    vec2 texel = 1.0 / vec2(textureSize(u_texture, 0));

    // 9-tap Gaussian blur
    float weights[5] = float[](0.227027, 0.1945946, 0.1216216, 0.054054, 0.016216);

    vec3 result = texture(u_texture, v_uv).rgb * weights[0];

    for (int i = 1; i < 5; i++) {
        vec2 offset = u_direction * texel * float(i) * 2.0;
        result += texture(u_texture, v_uv + offset).rgb * weights[i];
        result += texture(u_texture, v_uv - offset).rgb * weights[i];
    }

    fragColor = vec4(result, 1.0);
}
"#;

/// Final composite shader: bloom, vignette, tone mapping
pub const COMPOSITE_SHADER: &str = r#"#version 300 es
precision highp float;

in vec2 v_uv;

uniform sampler2D u_scene;
uniform sampler2D u_bloom;
uniform float u_bloom_strength;
uniform float u_vignette_strength;

out vec4 fragColor;

void main() {
    vec3 scene = texture(u_scene, v_uv).rgb;
    vec3 bloom = texture(u_bloom, v_uv).rgb;

    vec3 color = scene + bloom * u_bloom_strength;

    // Darken towards the corners
    vec2 uv = (v_uv - 0.5) * 2.0;
    float vignette = clamp(1.0 - dot(uv, uv) * 0.5 * u_vignette_strength, 0.0, 1.0);
    color *= vignette;

    // Reinhard tone mapping and gamma
    color = color / (color + vec3(1.0));
    color = pow(color, vec3(1.0 / 2.2));

    fragColor = vec4(color, 1.0);
}
"#;
