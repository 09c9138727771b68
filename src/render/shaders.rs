/// Blinn-Phong shading with two point lights. Lights arrive in world space
/// and are moved into eye space with the model-view matrix.
pub(crate) const PHONG_SHADER: &str = r#"
struct PhongUniform {
    projection: mat4x4<f32>,
    model_view: mat4x4<f32>,
    primary_light: vec4<f32>,
    secondary_light: vec4<f32>,
    ambient: vec4<f32>,
    diffuse: vec4<f32>,
    specular: vec4<f32>,
}

@group(0) @binding(0)
var<uniform> u: PhongUniform;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) eye_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let eye = u.model_view * vec4<f32>(input.position, 1.0);
    out.position = u.projection * eye;
    out.eye_pos = eye.xyz;
    out.normal = (u.model_view * vec4<f32>(input.normal, 0.0)).xyz;
    return out;
}

fn shade(light: vec4<f32>, pos: vec3<f32>, n: vec3<f32>, v: vec3<f32>) -> vec3<f32> {
    let light_eye = (u.model_view * vec4<f32>(light.xyz, 1.0)).xyz;
    let l = normalize(light_eye - pos);
    let h = normalize(l + v);
    let diffuse = u.diffuse.rgb * max(dot(n, l), 0.0);
    let specular = u.specular.rgb * pow(max(dot(n, h), 0.0), u.specular.w);
    return light.w * (diffuse + specular);
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(input.normal);
    let v = normalize(-input.eye_pos);
    var color = u.ambient.rgb;
    color += shade(u.primary_light, input.eye_pos, n, v);
    color += shade(u.secondary_light, input.eye_pos, n, v);
    return vec4<f32>(color, 1.0);
}
"#;

/// Unlit pipeline that colors fragments by their eye-space normal.
pub(crate) const FLAT_SHADER: &str = r#"
struct FlatUniform {
    projection: mat4x4<f32>,
    model_view: mat4x4<f32>,
}

@group(0) @binding(0)
var<uniform> u: FlatUniform;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) normal: vec3<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.position = u.projection * u.model_view * vec4<f32>(input.position, 1.0);
    out.normal = (u.model_view * vec4<f32>(input.normal, 0.0)).xyz;
    return out;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let n = normalize(input.normal);
    return vec4<f32>(0.5 * n + vec3<f32>(0.5), 1.0);
}
"#;
