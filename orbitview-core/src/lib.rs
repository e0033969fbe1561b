//! OrbitView Core Library - Viewer state and asset logic
//!
//! This library provides the stateless core functionality for the browser
//! model viewer: GLB decoding, camera and orbit-control state, the lighting
//! rig, the viewer session, and the pure arithmetic behind resizing and the
//! card tilt effect. Nothing in here touches the DOM or the GPU.

pub mod asset;
pub mod camera;
pub mod error;
pub mod geometry;
pub mod lights;
pub mod orbit;
pub mod tilt;
pub mod viewer;

// Re-export commonly used types
pub use asset::decode_glb;
pub use camera::Camera;
pub use error::AssetError;
pub use geometry::{Aabb, MeshNode, Model, Vertex};
pub use lights::{AmbientLight, DirectionalLight, LightRig, SpotLight};
pub use orbit::OrbitControls;
pub use tilt::TiltAngles;
pub use viewer::{render_size, LoadPhase, ViewerSession};
