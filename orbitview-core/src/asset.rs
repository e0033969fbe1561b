//! GLB asset decoding
//!
//! Parsing is delegated to the `gltf` crate; this module walks the default
//! scene, bakes each node's world transform into its vertices and flattens
//! the result into a [`Model`]. Textures are not imported: only geometry and
//! the material base color survive.

use gltf::Gltf;
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

use crate::error::AssetError;
use crate::geometry::{MeshNode, Model, Vertex};

/// Decode a binary glTF (GLB) byte buffer into a model. Only buffers
/// embedded in the GLB binary chunk are resolved; external URIs are not
/// fetched here.
pub fn decode_glb(bytes: &[u8]) -> Result<Model, AssetError> {
    let gltf = Gltf::from_slice(bytes)?;
    let blob = gltf.blob.as_deref();

    let scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .ok_or(AssetError::EmptyScene)?;

    let mut nodes = Vec::new();
    for node in scene.nodes() {
        collect_node(&node, &Matrix4::identity(), blob, &mut nodes)?;
    }
    if nodes.is_empty() {
        return Err(AssetError::EmptyScene);
    }

    log::debug!(
        "decoded {} mesh node(s), {} triangle(s)",
        nodes.len(),
        nodes.iter().map(MeshNode::triangle_count).sum::<usize>()
    );
    Ok(Model::new(nodes))
}

fn collect_node(
    node: &gltf::Node,
    parent: &Matrix4<f32>,
    blob: Option<&[u8]>,
    out: &mut Vec<MeshNode>,
) -> Result<(), AssetError> {
    let world = parent * Matrix4::from(node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        // Normals need the inverse-transpose when the transform is non-uniform
        let normal_matrix = world
            .fixed_view::<3, 3>(0, 0)
            .into_owned()
            .try_inverse()
            .map(|m| m.transpose())
            .unwrap_or_else(Matrix3::identity);

        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| match buffer.source() {
                gltf::buffer::Source::Bin => blob,
                gltf::buffer::Source::Uri(_) => None,
            });

            let positions: Vec<Point3<f32>> = reader
                .read_positions()
                .ok_or(AssetError::MissingPositions)?
                .map(|p| world.transform_point(&Point3::new(p[0], p[1], p[2])))
                .collect();

            let indices: Vec<u32> = match reader.read_indices() {
                Some(read) => read.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };
            // A malformed index accessor must surface as an error, not a panic
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
                return Err(AssetError::IndexOutOfRange {
                    index,
                    vertex_count: positions.len(),
                });
            }

            let normals: Vec<Vector3<f32>> = match reader.read_normals() {
                Some(read) => read
                    .map(|n| {
                        (normal_matrix * Vector3::new(n[0], n[1], n[2]))
                            .try_normalize(1e-6)
                            .unwrap_or_else(Vector3::y)
                    })
                    .collect(),
                None => smooth_normals(&positions, &indices),
            };

            let vertices = positions
                .into_iter()
                .zip(normals)
                .map(|(position, normal)| Vertex { position, normal })
                .collect();

            out.push(MeshNode {
                name: mesh.name().map(str::to_owned),
                vertices,
                indices,
                base_color: primitive
                    .material()
                    .pbr_metallic_roughness()
                    .base_color_factor(),
                cast_shadow: false,
                receive_shadow: false,
            });
        }
    }

    for child in node.children() {
        collect_node(&child, &world, blob, out)?;
    }
    Ok(())
}

/// Reconstruct vertex normals by accumulating face normals, for primitives
/// that ship positions only
fn smooth_normals(positions: &[Point3<f32>], indices: &[u32]) -> Vec<Vector3<f32>> {
    let mut normals = vec![Vector3::zeros(); positions.len()];
    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let face = (positions[b] - positions[a]).cross(&(positions[c] - positions[a]));
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    normals
        .into_iter()
        .map(|n| n.try_normalize(1e-6).unwrap_or_else(Vector3::y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GLB_MAGIC: u32 = 0x46546C67;
    const CHUNK_JSON: u32 = 0x4E4F534A;
    const CHUNK_BIN: u32 = 0x004E4942;

    /// Assemble a minimal single-primitive GLB around the given positions
    fn tiny_glb(positions: &[[f32; 3]], node_json: &str) -> Vec<u8> {
        let mut bin = Vec::new();
        for p in positions {
            for c in p {
                bin.extend_from_slice(&c.to_le_bytes());
            }
        }
        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        for p in positions {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
        let json = format!(
            concat!(
                r#"{{"asset":{{"version":"2.0"}},"scene":0,"scenes":[{{"nodes":[0]}}],"#,
                r#""nodes":[{node}],"#,
                r#""meshes":[{{"name":"part","primitives":[{{"attributes":{{"POSITION":0}}}}]}}],"#,
                r#""accessors":[{{"bufferView":0,"byteOffset":0,"componentType":5126,"#,
                r#""count":{count},"type":"VEC3","min":{min:?},"max":{max:?}}}],"#,
                r#""bufferViews":[{{"buffer":0,"byteOffset":0,"byteLength":{len}}}],"#,
                r#""buffers":[{{"byteLength":{len}}}]}}"#
            ),
            node = node_json,
            count = positions.len(),
            min = min,
            max = max,
            len = bin.len(),
        );

        let mut json_bytes = json.into_bytes();
        while json_bytes.len() % 4 != 0 {
            json_bytes.push(b' ');
        }
        while bin.len() % 4 != 0 {
            bin.push(0);
        }

        let total = 12 + 8 + json_bytes.len() + 8 + bin.len();
        let mut glb = Vec::with_capacity(total);
        glb.extend_from_slice(&GLB_MAGIC.to_le_bytes());
        glb.extend_from_slice(&2u32.to_le_bytes());
        glb.extend_from_slice(&(total as u32).to_le_bytes());
        glb.extend_from_slice(&(json_bytes.len() as u32).to_le_bytes());
        glb.extend_from_slice(&CHUNK_JSON.to_le_bytes());
        glb.extend_from_slice(&json_bytes);
        glb.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        glb.extend_from_slice(&CHUNK_BIN.to_le_bytes());
        glb.extend_from_slice(&bin);
        glb
    }

    /// Like `tiny_glb`, but with an explicit u32 index accessor
    fn indexed_glb(positions: &[[f32; 3]], indices: &[u32]) -> Vec<u8> {
        let mut bin = Vec::new();
        for p in positions {
            for c in p {
                bin.extend_from_slice(&c.to_le_bytes());
            }
        }
        let pos_len = bin.len();
        for i in indices {
            bin.extend_from_slice(&i.to_le_bytes());
        }
        let idx_len = bin.len() - pos_len;

        let mut min = [f32::INFINITY; 3];
        let mut max = [f32::NEG_INFINITY; 3];
        for p in positions {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }
        let json = format!(
            concat!(
                r#"{{"asset":{{"version":"2.0"}},"scene":0,"scenes":[{{"nodes":[0]}}],"#,
                r#""nodes":[{{"mesh":0}}],"#,
                r#""meshes":[{{"name":"part","primitives":"#,
                r#"[{{"attributes":{{"POSITION":0}},"indices":1}}]}}],"#,
                r#""accessors":[{{"bufferView":0,"byteOffset":0,"componentType":5126,"#,
                r#""count":{vcount},"type":"VEC3","min":{min:?},"max":{max:?}}},"#,
                r#"{{"bufferView":1,"byteOffset":0,"componentType":5125,"#,
                r#""count":{icount},"type":"SCALAR"}}],"#,
                r#""bufferViews":[{{"buffer":0,"byteOffset":0,"byteLength":{pos_len}}},"#,
                r#"{{"buffer":0,"byteOffset":{pos_len},"byteLength":{idx_len}}}],"#,
                r#""buffers":[{{"byteLength":{total}}}]}}"#
            ),
            vcount = positions.len(),
            icount = indices.len(),
            min = min,
            max = max,
            pos_len = pos_len,
            idx_len = idx_len,
            total = bin.len(),
        );

        let mut json_bytes = json.into_bytes();
        while json_bytes.len() % 4 != 0 {
            json_bytes.push(b' ');
        }
        while bin.len() % 4 != 0 {
            bin.push(0);
        }

        let total = 12 + 8 + json_bytes.len() + 8 + bin.len();
        let mut glb = Vec::with_capacity(total);
        glb.extend_from_slice(&GLB_MAGIC.to_le_bytes());
        glb.extend_from_slice(&2u32.to_le_bytes());
        glb.extend_from_slice(&(total as u32).to_le_bytes());
        glb.extend_from_slice(&(json_bytes.len() as u32).to_le_bytes());
        glb.extend_from_slice(&CHUNK_JSON.to_le_bytes());
        glb.extend_from_slice(&json_bytes);
        glb.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        glb.extend_from_slice(&CHUNK_BIN.to_le_bytes());
        glb.extend_from_slice(&bin);
        glb
    }

    const TRIANGLE: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

    #[test]
    fn test_decode_triangle() {
        let glb = tiny_glb(&TRIANGLE, r#"{"mesh":0}"#);
        let model = decode_glb(&glb).unwrap();
        assert_eq!(model.nodes.len(), 1);
        let node = &model.nodes[0];
        assert_eq!(node.name.as_deref(), Some("part"));
        assert_eq!(node.vertices.len(), 3);
        assert_eq!(node.triangle_count(), 1);
        // No index accessor: implicit sequential indices
        assert_eq!(node.indices, vec![0, 1, 2]);
        // Shadow flags are off until the session installs the model
        assert!(!node.cast_shadow && !node.receive_shadow);
    }

    #[test]
    fn test_missing_normals_are_reconstructed() {
        let glb = tiny_glb(&TRIANGLE, r#"{"mesh":0}"#);
        let model = decode_glb(&glb).unwrap();
        for vertex in &model.nodes[0].vertices {
            // Counter-clockwise triangle in the XY plane faces +Z
            assert!((vertex.normal - Vector3::z()).norm() < 1e-5);
        }
    }

    #[test]
    fn test_node_translation_is_baked_in() {
        let glb = tiny_glb(&TRIANGLE, r#"{"mesh":0,"translation":[1.0,2.0,3.0]}"#);
        let model = decode_glb(&glb).unwrap();
        let v0 = model.nodes[0].vertices[0].position;
        assert!((v0 - Point3::new(1.0, 2.0, 3.0)).norm() < 1e-5);
    }

    #[test]
    fn test_scene_without_meshes_is_an_error() {
        let glb = tiny_glb(&TRIANGLE, r#"{}"#);
        assert!(matches!(decode_glb(&glb), Err(AssetError::EmptyScene)));
    }

    #[test]
    fn test_explicit_indices_are_honored() {
        let glb = indexed_glb(&TRIANGLE, &[0, 2, 1]);
        let model = decode_glb(&glb).unwrap();
        assert_eq!(model.nodes[0].indices, vec![0, 2, 1]);
    }

    #[test]
    fn test_out_of_range_index_is_an_error() {
        let glb = indexed_glb(&TRIANGLE, &[0, 1, 7]);
        assert!(matches!(
            decode_glb(&glb),
            Err(AssetError::IndexOutOfRange {
                index: 7,
                vertex_count: 3,
            })
        ));
    }

    #[test]
    fn test_garbage_bytes_are_an_error() {
        assert!(matches!(
            decode_glb(b"not a glb at all"),
            Err(AssetError::Gltf(_))
        ));
    }
}
