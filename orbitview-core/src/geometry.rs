//! Geometry primitives: vertices, mesh nodes, models and bounding boxes
use nalgebra::{Matrix4, Point3, Vector3};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    /// Build a bounding box around a set of points, `None` if the set is empty
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point3<f32>>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut aabb = Self {
            min: first,
            max: first,
        };
        for point in iter {
            aabb.grow(&point);
        }
        Some(aabb)
    }

    pub fn grow(&mut self, point: &Point3<f32>) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(point[i]);
            self.max[i] = self.max[i].max(point[i]);
        }
    }

    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }
}

/// A single renderable piece of a loaded model: baked-down geometry with the
/// source node transform already applied, plus its shadow participation.
#[derive(Debug, Clone)]
pub struct MeshNode {
    pub name: Option<String>,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    /// Linear-space RGBA base color from the source material
    pub base_color: [f32; 4],
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl MeshNode {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// A loaded model: a flat list of mesh nodes plus the transform the viewer
/// mutates (uniform scale, centering offset, spin angle around Y).
#[derive(Debug, Clone)]
pub struct Model {
    pub nodes: Vec<MeshNode>,
    pub scale: f32,
    pub offset: Vector3<f32>,
    pub rotation_y: f32,
}

impl Model {
    pub fn new(nodes: Vec<MeshNode>) -> Self {
        Self {
            nodes,
            scale: 1.0,
            offset: Vector3::zeros(),
            rotation_y: 0.0,
        }
    }

    /// Model matrix: translate by the offset, spin around Y, then scale.
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&self.offset)
            * Matrix4::new_rotation(Vector3::new(0.0, self.rotation_y, 0.0))
            * Matrix4::new_scaling(self.scale)
    }

    /// Bounding box of the scaled, offset geometry. Spin is ignored: the box
    /// is only consulted for centering, which happens before any rotation.
    pub fn bounding_box(&self) -> Option<Aabb> {
        Aabb::from_points(self.nodes.iter().flat_map(|node| {
            node.vertices
                .iter()
                .map(|v| Point3::from(v.position.coords * self.scale + self.offset))
        }))
    }

    /// Shift the offset so the bounding-box center lands on the origin
    pub fn recenter(&mut self) {
        if let Some(aabb) = self.bounding_box() {
            self.offset -= aabb.center().coords;
        }
    }

    /// Mark every mesh node as both casting and receiving shadows
    pub fn enable_shadows(&mut self) {
        for node in &mut self.nodes {
            node.cast_shadow = true;
            node.receive_shadow = true;
        }
    }

    /// Advance the spin angle (radians); no wraparound is enforced
    pub fn spin(&mut self, delta: f32) {
        self.rotation_y += delta;
    }
}
