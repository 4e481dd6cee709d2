/// Vertex shader for instanced lit meshes
///
/// Locations 2-5 hold the per-instance matrix columns, 6 the instance colour.
pub const LIT_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in mat4 a_instance;
layout(location = 6) in vec3 a_color;

uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;

out vec3 v_world_position;
out vec3 v_normal;
out vec3 v_color;

void main() {
    mat4 world = u_model * a_instance;
    vec4 world_pos = world * vec4(a_position, 1.0);

    v_world_position = world_pos.xyz;
    v_normal = mat3(world) * a_normal;
    v_color = a_color;

    gl_Position = u_projection * u_view * world_pos;
}
"#;

/// Fragment shader for metal/dielectric surfaces lit by a few point lights
pub const LIT_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

#define MAX_LIGHTS 4

in vec3 v_world_position;
in vec3 v_normal;
in vec3 v_color;

uniform vec3 u_camera_pos;

uniform vec3 u_base_color;
uniform float u_roughness;
uniform float u_metalness;
uniform vec3 u_emissive;
uniform float u_emissive_intensity;

uniform vec3 u_ambient;
uniform int u_light_count;
uniform vec3 u_light_position[MAX_LIGHTS];
uniform vec3 u_light_color[MAX_LIGHTS];
uniform float u_light_intensity[MAX_LIGHTS];
uniform float u_light_range[MAX_LIGHTS];

out vec4 fragColor;

// Cheap stand-in for an environment map: dark emerald below, warm above
vec3 environment(vec3 dir) {
    vec3 low = vec3(0.0, 0.04, 0.03);
    vec3 high = vec3(0.55, 0.45, 0.3);
    return mix(low, high, smoothstep(-0.3, 1.0, dir.y)) * 0.5;
}

void main() {
    vec3 normal = normalize(v_normal);
    if (!gl_FrontFacing) normal = -normal;
    vec3 view_dir = normalize(u_camera_pos - v_world_position);

    vec3 albedo = u_base_color * v_color;
    vec3 f0 = mix(vec3(0.04), albedo, u_metalness);
    vec3 diffuse_color = albedo * (1.0 - u_metalness);
    float shininess = max(2.0 / max(pow(u_roughness, 4.0), 0.001) - 2.0, 1.0);

    vec3 color = u_ambient * diffuse_color;

    for (int i = 0; i < MAX_LIGHTS; i++) {
        if (i >= u_light_count) break;

        vec3 to_light = u_light_position[i] - v_world_position;
        float dist = length(to_light);
        vec3 light_dir = to_light / dist;

        float attenuation = u_light_intensity[i] / max(dist * dist, 0.01);
        if (u_light_range[i] > 0.0) {
            float window = clamp(1.0 - pow(dist / u_light_range[i], 4.0), 0.0, 1.0);
            attenuation *= window * window;
        }

        float ndotl = max(dot(normal, light_dir), 0.0);
        vec3 half_dir = normalize(light_dir + view_dir);
        float spec = pow(max(dot(normal, half_dir), 0.0), shininess) * (shininess + 8.0) / 25.0;

        color += u_light_color[i] * attenuation * ndotl * (diffuse_color + f0 * spec);
    }

    vec3 reflected = reflect(-view_dir, normal);
    float fresnel = pow(1.0 - max(dot(normal, view_dir), 0.0), 5.0);
    vec3 specular_env = mix(f0, vec3(1.0), fresnel) * (1.0 - u_roughness * 0.7);
    color += environment(reflected) * specular_env;

    color += u_emissive * u_emissive_intensity;

    fragColor = vec4(color, 1.0);
}
"#;

/// Vertex shader for sparkle points
pub const SPARKLE_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

layout(location = 0) in vec3 a_position;
layout(location = 1) in float a_size;
layout(location = 2) in float a_alpha;
layout(location = 3) in vec3 a_color;

uniform mat4 u_model;
uniform mat4 u_view;
uniform mat4 u_projection;
uniform float u_pixel_ratio;
uniform float u_size_scale;

out float v_alpha;
out vec3 v_color;

void main() {
    v_alpha = a_alpha;
    v_color = a_color;

    vec4 view_pos = u_view * u_model * vec4(a_position, 1.0);
    gl_Position = u_projection * view_pos;
    gl_PointSize = a_size * u_size_scale * u_pixel_ratio * (25.0 / -view_pos.z);
}
"#;

/// Fragment shader for sparkle points
pub const SPARKLE_FRAGMENT_SHADER: &str = r#"#version 300 es
precision highp float;

in float v_alpha;
in vec3 v_color;

out vec4 fragColor;

void main() {
    vec2 coord = gl_PointCoord - vec2(0.5);
    float dist = length(coord);

    if (dist > 0.5) {
        discard;
    }

    float strength = 0.05 / dist - 0.1;
    fragColor = vec4(v_color * 2.0, clamp(strength, 0.0, 1.0) * v_alpha);
}
"#;

/// Fullscreen triangle vertex shader for post-processing
pub const FULLSCREEN_VERTEX_SHADER: &str = r#"#version 300 es
precision highp float;

out vec2 v_uv;

void main() {
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
    float weight = smoothstep(u_threshold, u_threshold + 0.1, brightness);

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
    vec2 tex_size = vec2(textureSize(u_texture, 0));
    vec2 texel = 1.0 / tex_size;

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

/// Final composite: bloom, film grain, vignette
pub const COMPOSITE_SHADER: &str = r#"#version 300 es
precision highp float;

in vec2 v_uv;

uniform sampler2D u_scene;
uniform sampler2D u_bloom;
uniform float u_bloom_strength;
uniform float u_vignette_offset;
uniform float u_vignette_darkness;
uniform float u_grain;
uniform float u_time;

out vec4 fragColor;

float rand(vec2 co) {
    return fract(sin(dot(co, vec2(12.9898, 78.233))) * 43758.5453);
}

vec3 overlay(vec3 base, vec3 blend) {
    return mix(
        2.0 * base * blend,
        1.0 - 2.0 * (1.0 - base) * (1.0 - blend),
        step(0.5, base)
    );
}

void main() {
    vec3 scene = texture(u_scene, v_uv).rgb;
    vec3 bloom = texture(u_bloom, v_uv).rgb;

    vec3 color = scene + bloom * u_bloom_strength;
    color = clamp(color, 0.0, 1.0);

    vec3 noise = vec3(rand(v_uv * (1.0 + fract(u_time))));
    color = mix(color, overlay(color, noise), u_grain);

    float d = distance(v_uv, vec2(0.5));
    color *= smoothstep(0.8, u_vignette_offset * 0.799, d * (u_vignette_darkness + u_vignette_offset));

    fragColor = vec4(color, 1.0);
}
"#;
