// GLB decoding and model attachment, using GLB containers assembled in memory.

use approx::assert_relative_eq;
use glam::Vec3;
use scene_core::error::SceneError;
use scene_core::model::Model;
use scene_core::scene::{Phase, Scene};
use scene_core::state::Viewport;

const JSON_CHUNK: u32 = 0x4E4F_534A;
const BIN_CHUNK: u32 = 0x004E_4942;

fn glb(json: &str, bin: Option<&[u8]>) -> Vec<u8> {
    let mut json = json.as_bytes().to_vec();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let bin = bin.map(|b| {
        let mut b = b.to_vec();
        while b.len() % 4 != 0 {
            b.push(0);
        }
        b
    });
    let total = 12 + 8 + json.len() + bin.as_ref().map_or(0, |b| 8 + b.len());

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(&JSON_CHUNK.to_le_bytes());
    out.extend_from_slice(&json);
    if let Some(bin) = bin {
        out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        out.extend_from_slice(&BIN_CHUNK.to_le_bytes());
        out.extend_from_slice(&bin);
    }
    out
}

/// Positions (0,0,0) (1,0,0) (0,1,0) followed by u16 indices 0 1 2.
fn triangle_bin() -> Vec<u8> {
    let mut bin = Vec::new();
    for p in [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
        for c in p {
            bin.extend_from_slice(&c.to_le_bytes());
        }
    }
    for i in [0u16, 1, 2] {
        bin.extend_from_slice(&i.to_le_bytes());
    }
    bin.extend_from_slice(&[0, 0]);
    bin
}

fn document(nodes: &str, primitive: &str, extra: &str, buffer: &str) -> String {
    format!(
        r#"{{
  "asset": {{"version": "2.0"}},
  "scene": 0,
  "scenes": [{{"nodes": [0]}}],
  "nodes": {nodes},
  "meshes": [{{"primitives": [{primitive}]}}],
  "buffers": [{buffer}],
  "bufferViews": [
    {{"buffer": 0, "byteOffset": 0, "byteLength": 36}},
    {{"buffer": 0, "byteOffset": 36, "byteLength": 6}}
  ],
  "accessors": [
    {{"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
      "min": [0, 0, 0], "max": [1, 1, 0]}},
    {{"bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR"}}
  ]{extra}
}}"#
    )
}

const EMBEDDED: &str = r#"{"byteLength": 44}"#;
const INDEXED: &str = r#"{"attributes": {"POSITION": 0}, "indices": 1}"#;

fn decode(nodes: &str, primitive: &str, extra: &str) -> Result<Model, SceneError> {
    let json = document(nodes, primitive, extra, EMBEDDED);
    Model::from_glb(&glb(&json, Some(&triangle_bin())))
}

#[test]
fn decodes_translated_triangle() {
    let model = decode(r#"[{"mesh": 0, "translation": [0, 1, 0]}]"#, INDEXED, "")
        .expect("valid triangle");
    assert_eq!(model.vertex_count(), 3);
    assert_eq!(model.triangle_count(), 1);
    assert_eq!(model.indices, vec![0, 1, 2]);
    assert_eq!(model.vertices[1].position, [1.0, 1.0, 0.0]);
    for v in &model.vertices {
        assert_relative_eq!(v.normal[2], 1.0, epsilon = 1e-6);
        assert_eq!(v.color, [1.0, 1.0, 1.0, 1.0]);
    }
    let (min, max) = model.bounds();
    assert_eq!(min, Vec3::new(0.0, 1.0, 0.0));
    assert_eq!(max, Vec3::new(1.0, 2.0, 0.0));
}

#[test]
fn nested_node_transforms_compose() {
    let nodes = r#"[
      {"translation": [0, 1, 0], "children": [1]},
      {"mesh": 0, "scale": [2, 2, 2]}
    ]"#;
    let model = decode(nodes, INDEXED, "").expect("valid nested nodes");
    assert_eq!(model.vertices[1].position, [2.0, 1.0, 0.0]);
    assert_eq!(model.vertices[2].position, [0.0, 3.0, 0.0]);
    assert_relative_eq!(model.vertices[0].normal[2], 1.0, epsilon = 1e-6);
}

#[test]
fn non_indexed_primitive_gets_sequential_indices() {
    let model = decode(
        r#"[{"mesh": 0}]"#,
        r#"{"attributes": {"POSITION": 0}}"#,
        "",
    )
    .expect("valid non-indexed triangle");
    assert_eq!(model.indices, vec![0, 1, 2]);
}

#[test]
fn base_color_factor_tints_vertices() {
    let model = decode(
        r#"[{"mesh": 0}]"#,
        r#"{"attributes": {"POSITION": 0}, "indices": 1, "material": 0}"#,
        r#", "materials": [{"pbrMetallicRoughness": {"baseColorFactor": [1, 0, 0, 1]}}]"#,
    )
    .expect("valid material");
    assert_eq!(model.vertices[0].color, [1.0, 0.0, 0.0, 1.0]);
}

#[test]
fn line_primitives_leave_an_empty_model() {
    let err = decode(
        r#"[{"mesh": 0}]"#,
        r#"{"attributes": {"POSITION": 0}, "mode": 1}"#,
        "",
    )
    .unwrap_err();
    assert!(matches!(err, SceneError::EmptyModel));
}

#[test]
fn external_buffers_are_rejected() {
    let json = document(
        r#"[{"mesh": 0}]"#,
        INDEXED,
        "",
        r#"{"byteLength": 44, "uri": "triangle.bin"}"#,
    );
    let err = Model::from_glb(&glb(&json, None)).unwrap_err();
    assert!(matches!(err, SceneError::MissingBuffer { index: 0 }));
}

#[test]
fn garbage_is_a_gltf_error() {
    let err = Model::from_glb(b"definitely not a model").unwrap_err();
    assert!(matches!(err, SceneError::Gltf(_)));
}

/// Triangle, indices, then NORMAL (0,0,-1) at 44 and COLOR_0 (0.5,1,1,1) at 80.
fn attributed_bin(indices: [u16; 3]) -> Vec<u8> {
    let mut bin = triangle_bin();
    bin.truncate(36);
    for i in indices {
        bin.extend_from_slice(&i.to_le_bytes());
    }
    bin.extend_from_slice(&[0, 0]);
    for _ in 0..3 {
        for c in [0.0f32, 0.0, -1.0] {
            bin.extend_from_slice(&c.to_le_bytes());
        }
    }
    for _ in 0..3 {
        for c in [0.5f32, 1.0, 1.0, 1.0] {
            bin.extend_from_slice(&c.to_le_bytes());
        }
    }
    bin
}

fn attributed_document(scene_index: bool, primitive: &str, extra: &str) -> String {
    let scene = if scene_index { r#""scene": 0,"# } else { "" };
    format!(
        r#"{{
  "asset": {{"version": "2.0"}},
  {scene}
  "scenes": [{{"nodes": [0]}}],
  "nodes": [{{"mesh": 0, "translation": [0, 1, 0]}}],
  "meshes": [{{"primitives": [{primitive}]}}],
  "buffers": [{{"byteLength": 128}}],
  "bufferViews": [
    {{"buffer": 0, "byteOffset": 0, "byteLength": 36}},
    {{"buffer": 0, "byteOffset": 36, "byteLength": 6}},
    {{"buffer": 0, "byteOffset": 44, "byteLength": 36}},
    {{"buffer": 0, "byteOffset": 80, "byteLength": 48}}
  ],
  "accessors": [
    {{"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
      "min": [0, 0, 0], "max": [1, 1, 0]}},
    {{"bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR"}},
    {{"bufferView": 2, "componentType": 5126, "count": 3, "type": "VEC3"}},
    {{"bufferView": 3, "componentType": 5126, "count": 3, "type": "VEC4"}}
  ]{extra}
}}"#
    )
}

const ALL_ATTRIBUTES: &str =
    r#"{"attributes": {"POSITION": 0, "NORMAL": 2, "COLOR_0": 3}, "indices": 1, "material": 0}"#;
const PINK: &str =
    r#", "materials": [{"pbrMetallicRoughness": {"baseColorFactor": [1, 0.5, 1, 1]}}]"#;

#[test]
fn vertex_color_multiplies_base_color() {
    let json = attributed_document(true, ALL_ATTRIBUTES, PINK);
    let model = Model::from_glb(&glb(&json, Some(&attributed_bin([0, 1, 2]))))
        .expect("valid colored triangle");
    for v in &model.vertices {
        assert_eq!(v.color, [0.5, 0.5, 1.0, 1.0]);
    }
}

#[test]
fn authored_normals_are_kept() {
    let json = attributed_document(true, ALL_ATTRIBUTES, PINK);
    let model = Model::from_glb(&glb(&json, Some(&attributed_bin([0, 1, 2]))))
        .expect("valid triangle with normals");
    for v in &model.vertices {
        assert_relative_eq!(v.normal[2], -1.0, epsilon = 1e-6);
    }
}

#[test]
fn first_scene_is_used_without_default() {
    let json = attributed_document(false, INDEXED, "");
    let model = Model::from_glb(&glb(&json, Some(&attributed_bin([0, 1, 2]))))
        .expect("valid triangle without scene index");
    // the node translation only applies when the scene graph was walked
    assert_eq!(model.vertices[0].position, [0.0, 1.0, 0.0]);
}

#[test]
fn out_of_range_triangles_are_dropped() {
    let json = attributed_document(true, INDEXED, "");
    let err = Model::from_glb(&glb(&json, Some(&attributed_bin([0, 1, 9])))).unwrap_err();
    assert!(matches!(err, SceneError::EmptyModel));
}

#[test]
fn model_attaches_exactly_once() {
    let mut scene = Scene::new(Viewport::new(800, 600));
    assert_eq!(scene.phase(), Phase::SceneReady);

    let first = decode(r#"[{"mesh": 0}]"#, INDEXED, "").expect("valid triangle");
    scene.attach_model(first).expect("first attach");
    assert_eq!(scene.phase(), Phase::AssetReady);

    let second = decode(r#"[{"mesh": 0, "translation": [5, 5, 5]}]"#, INDEXED, "")
        .expect("valid triangle");
    let err = scene.attach_model(second).unwrap_err();
    assert!(matches!(err, SceneError::AssetAlreadyAttached));

    let kept = scene.model().expect("model still attached");
    assert_eq!(kept.vertices[1].position, [1.0, 0.0, 0.0]);
}

#[test]
fn model_matrix_applies_offset_then_scroll_rotation() {
    let mut scene = Scene::new(Viewport::new(800, 600));
    scene
        .scroll_group_mut()
        .set_rotation_y(std::f32::consts::FRAC_PI_2);
    let p = scene.model_matrix().transform_point3(Vec3::new(1.0, 0.0, 0.0));
    assert!(p.abs_diff_eq(Vec3::new(0.0, -10.0, -1.0), 1e-5), "{:?}", p);
}

#[test]
fn key_light_follows_the_camera() {
    let mut scene = Scene::new(Viewport::new(800, 600));
    let before = scene.uniforms().key_direction();
    scene.camera.position = Vec3::new(400.0, 0.0, 0.0);
    let after = scene.uniforms().key_direction();
    assert!(!before.abs_diff_eq(after, 1e-3));
    assert_relative_eq!(after.length(), 1.0, epsilon = 1e-5);
}
