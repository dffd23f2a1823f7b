/// WGSL shader for instanced scene primitives: Lambert lighting with an
/// ambient term, one sun and a bounded set of point lights, plus distance fog.
pub const SCENE_SHADER: &str = r#"
const MAX_POINT_LIGHTS: u32 = 8u;

struct PointLight {
    position_range: vec4<f32>,
    color: vec4<f32>,
};

struct Uniforms {
    view_proj: mat4x4<f32>,
    camera_pos: vec4<f32>,
    // rgb, w = 1 when fog is on
    fog_color: vec4<f32>,
    // near, far, density
    fog_params: vec4<f32>,
    ambient: vec4<f32>,
    // direction toward the sun
    sun_dir: vec4<f32>,
    sun_color: vec4<f32>,
    light_count: vec4<u32>,
    point_lights: array<PointLight, MAX_POINT_LIGHTS>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
    // rgb emissive, w = 1 for lit surfaces
    @location(7) emissive: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) emissive: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;
    out.color = instance.color;
    out.emissive = instance.emissive;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    var rgb = in.color.rgb;

    if in.emissive.w > 0.5 {
        let n = normalize(in.world_normal);
        var light = uniforms.ambient.rgb;
        light += uniforms.sun_color.rgb * max(dot(n, uniforms.sun_dir.xyz), 0.0);
        let count = min(uniforms.light_count.x, MAX_POINT_LIGHTS);
        for (var i = 0u; i < count; i++) {
            let pl = uniforms.point_lights[i];
            let to_light = pl.position_range.xyz - in.world_pos;
            let dist = length(to_light);
            let falloff = clamp(1.0 - dist / pl.position_range.w, 0.0, 1.0);
            let lambert = max(dot(n, to_light / max(dist, 0.0001)), 0.0);
            light += pl.color.rgb * lambert * falloff * falloff;
        }
        rgb = rgb * light + in.emissive.rgb;
    }

    if uniforms.fog_color.w > 0.5 {
        let dist = distance(in.world_pos, uniforms.camera_pos.xyz);
        let near = uniforms.fog_params.x;
        let far = uniforms.fog_params.y;
        let density = uniforms.fog_params.z;
        let linear = clamp((dist - near) / max(far - near, 0.0001), 0.0, 1.0);
        let dense = 1.0 - exp(-(density * dist) * (density * dist));
        rgb = mix(rgb, uniforms.fog_color.rgb, max(linear, dense));
    }

    return vec4<f32>(rgb, in.color.a);
}
"#;
