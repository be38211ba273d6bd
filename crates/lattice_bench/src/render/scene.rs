//! # Scene Builder
//!
//! Generates the N×N×N cube lattice centred on the origin and frames the
//! camera so the whole lattice fills the vertical field of view.
//!
//! ## Lattice geometry
//!
//! Along each axis the lattice spans `extent = N + (N − 1)·p` object sizes:
//! N unit cubes plus N − 1 gaps of `p` units. Object `i` sits at
//! `i + i·p − extent/2`. Positions are the minimum corner of each unit
//! cell and [`Mesh::cube`](crate::render::Mesh::cube) spans `[0, 1]` from
//! its local origin, so the drawn cubes run from `−extent/2` to `+extent/2`
//! while the positions themselves run from `−extent/2` to `extent/2 − 1`. A single object (N = 1) therefore
//! sits at `(−0.5, −0.5, −0.5)` and is drawn centred on the origin.
//!
//! ## Framing
//!
//! For landscape targets the framing angle is `fov / aspect`. Portrait
//! targets use the true horizontal field of view, which is then the
//! narrower of the two.

use crate::foundation::math::{Vec3, Vec4};
use crate::render::Camera;

/// Lattice dimensions: objects per axis and padding factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lattice {
    /// Objects per axis (N), at least 1
    pub dimension: u32,
    /// Extra spacing between neighbouring objects, in object sizes
    pub padding: f32,
}

impl Lattice {
    /// Create a lattice description
    pub const fn new(dimension: u32, padding: f32) -> Self {
        Self { dimension, padding }
    }

    /// Span of the lattice along one axis, in object sizes
    pub fn extent(&self) -> f32 {
        let n = self.dimension as f32;
        n + (n - 1.0) * self.padding
    }

    /// Centering subtraction applied to every coordinate
    pub fn offset(&self) -> f32 {
        self.extent() / 2.0
    }

    /// Number of objects in the lattice (N³)
    pub fn object_count(&self) -> usize {
        (self.dimension as usize).pow(3)
    }

    /// Coordinate of the `index`-th object along any axis
    fn coordinate(&self, index: u32, offset: f32) -> f32 {
        let i = index as f32;
        i + i * self.padding - offset
    }
}

/// A renderable object: one cube of the lattice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderObject {
    position: Vec3,
}

impl RenderObject {
    /// Create an object at the given world position
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
        }
    }

    /// World-space position
    pub const fn position(&self) -> Vec3 {
        self.position
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

/// Camera placement derived by [`frame_lattice`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeFraming {
    /// Half the lattice span along one axis
    pub base: f32,
    /// Angle the lattice is fitted into: `fov / aspect` for landscape
    /// targets, the horizontal field of view for portrait ones
    pub height_fov: f32,
    /// Distance at which a span of `2·base` exactly fills `height_fov`
    pub camera_distance: f32,
    /// Camera Z: `camera_distance + base + near`
    pub camera_z: f32,
    /// Far plane: twice `camera_z`
    pub far: f32,
}

/// Place the camera on +Z so the whole lattice is visible
///
/// Moves the camera to `(0, 0, camDistance + base + near, 1)` looking at
/// the origin and sets the far plane to twice that distance. `aspect_ratio`
/// must be the ratio of the render target the scene will be drawn to.
pub fn frame_lattice(camera: &mut Camera, lattice: &Lattice, aspect_ratio: f32) -> LatticeFraming {
    let base = lattice.extent() / 2.0;
    let height_fov = framing_fov(camera.field_of_view(), aspect_ratio);
    let camera_distance = base / (height_fov / 2.0).tan();
    let camera_z = camera_distance + base + camera.near();
    let far = 2.0 * camera_z;

    camera.set_position(Vec4::new(0.0, 0.0, camera_z, 1.0));
    camera.look_at(Vec3::zeros(), Vec3::new(0.0, 1.0, 0.0));
    camera.set_far(far);

    log::debug!(
        "Framed {}^3 lattice: base {:.3}, camera distance {:.3}, camera z {:.3}, far {:.3}",
        lattice.dimension, base, camera_distance, camera_z, far
    );

    LatticeFraming {
        base,
        height_fov,
        camera_distance,
        camera_z,
        far,
    }
}

fn framing_fov(fov: f32, aspect_ratio: f32) -> f32 {
    if aspect_ratio >= 1.0 {
        fov / aspect_ratio
    } else {
        2.0 * ((fov / 2.0).tan() * aspect_ratio).atan()
    }
}

/// The benchmark scene: one camera and the lattice objects
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Scene {
    camera: Camera,
    lattice: Option<Lattice>,
    render_objects: Vec<RenderObject>,
}

impl Scene {
    /// Wrap an existing camera and object list
    pub fn new(camera: Camera, render_objects: Vec<RenderObject>) -> Self {
        Self {
            camera,
            lattice: None,
            render_objects,
        }
    }

    /// Generate the N×N×N lattice, iterating x, then y, then z
    pub fn lattice(camera: Camera, lattice: Lattice) -> Self {
        let offset = lattice.offset();
        let n = lattice.dimension;

        let mut render_objects = Vec::with_capacity(lattice.object_count());
        for x in 0..n {
            for y in 0..n {
                for z in 0..n {
                    render_objects.push(RenderObject::new(
                        lattice.coordinate(x, offset),
                        lattice.coordinate(y, offset),
                        lattice.coordinate(z, offset),
                    ));
                }
            }
        }

        log::info!(
            "Built lattice scene: {}^3 = {} objects, padding {}",
            n,
            render_objects.len(),
            lattice.padding
        );

        Self {
            camera,
            lattice: Some(lattice),
            render_objects,
        }
    }

    /// Frame the camera for `lattice` and generate it in one step
    pub fn framed_lattice(mut camera: Camera, lattice: Lattice, aspect_ratio: f32) -> (Self, LatticeFraming) {
        let framing = frame_lattice(&mut camera, &lattice, aspect_ratio);
        (Self::lattice(camera, lattice), framing)
    }

    /// The scene camera
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Lattice the scene was generated from, if any
    pub const fn lattice_spec(&self) -> Option<&Lattice> {
        self.lattice.as_ref()
    }

    /// Objects in generation order
    pub fn render_objects(&self) -> &[RenderObject] {
        &self.render_objects
    }

    /// Bounds of the drawn cubes (`[position, position + 1]` per object)
    ///
    /// Returns `None` for an empty scene.
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.render_objects.first()?.position();
        let (min, max) = self.render_objects.iter().fold((first, first), |(min, max), object| {
            let p = object.position();
            (min.inf(&p), max.sup(&p))
        });

        Some(Bounds {
            min,
            max: max.add_scalar(1.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4, Mat4Ext};
    use crate::render::Mesh;
    use approx::assert_relative_eq;

    const ASPECT: f32 = 800.0 / 600.0;

    fn framed(dimension: u32, padding: f32) -> (Scene, LatticeFraming) {
        Scene::framed_lattice(Camera::default(), Lattice::new(dimension, padding), ASPECT)
    }

    /// World-space corners of every cube as the backend would draw them
    fn drawn_vertices(scene: &Scene) -> Vec<Vec3> {
        let cube = Mesh::cube();
        scene
            .render_objects()
            .iter()
            .flat_map(|object| {
                let model = Mat4::translation(object.position());
                cube.vertices
                    .iter()
                    .map(move |v| (model * Vec3::from(v.position).push(1.0)).xyz())
            })
            .collect()
    }

    #[test]
    fn test_object_count_is_cube_of_dimension() {
        for (n, p) in [(1, 0.0), (2, 0.5), (5, 0.0), (7, 2.25)] {
            let scene = Scene::lattice(Camera::default(), Lattice::new(n, p));
            assert_eq!(scene.render_objects().len(), (n as usize).pow(3));
        }
    }

    #[test]
    fn test_single_object_sits_at_half_unit_offset() {
        for padding in [0.0, 1.0, 3.5] {
            let scene = Scene::lattice(Camera::default(), Lattice::new(1, padding));
            assert_eq!(scene.render_objects(), &[RenderObject::new(-0.5, -0.5, -0.5)]);
        }
    }

    #[test]
    fn test_occupied_cells_are_symmetric_about_origin() {
        for (n, p) in [(1, 0.0), (2, 0.0), (3, 0.5), (6, 1.25), (10, 0.1)] {
            let scene = Scene::lattice(Camera::default(), Lattice::new(n, p));
            let bounds = scene.bounds().unwrap();
            assert_relative_eq!(bounds.max, -bounds.min, epsilon = 1e-4);
            assert_relative_eq!(bounds.max.x, Lattice::new(n, p).offset(), epsilon = 1e-4);
        }
    }

    #[test]
    fn test_bounds_match_drawn_cube_vertices() {
        for (n, p) in [(1, 0.0), (2, 0.5), (4, 1.5)] {
            let scene = Scene::lattice(Camera::default(), Lattice::new(n, p));
            let bounds = scene.bounds().unwrap();
            let vertices = drawn_vertices(&scene);

            let min = vertices.iter().fold(vertices[0], |acc, v| acc.inf(v));
            let max = vertices.iter().fold(vertices[0], |acc, v| acc.sup(v));
            assert_relative_eq!(bounds.min, min, epsilon = 1e-5);
            assert_relative_eq!(bounds.max, max, epsilon = 1e-5);
        }

        // Single cube is drawn centred on the origin
        let single = Scene::lattice(Camera::default(), Lattice::new(1, 0.0)).bounds().unwrap();
        assert_eq!(single.min, Vec3::new(-0.5, -0.5, -0.5));
        assert_eq!(single.max, Vec3::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_positions_span_extent_minus_one_cell() {
        let lattice = Lattice::new(4, 0.5);
        let scene = Scene::lattice(Camera::default(), lattice);
        let positions: Vec<f32> = scene.render_objects().iter().map(|o| o.position().z).collect();

        let min = positions.iter().copied().fold(f32::MAX, f32::min);
        let max = positions.iter().copied().fold(f32::MIN, f32::max);
        assert_relative_eq!(min, -lattice.offset(), epsilon = 1e-5);
        assert_relative_eq!(max, lattice.offset() - 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_zero_padding_packs_unit_grid() {
        let scene = Scene::lattice(Camera::default(), Lattice::new(3, 0.0));
        let objects = scene.render_objects();

        // Innermost loop walks z
        assert_eq!(objects[0].position(), Vec3::new(-1.5, -1.5, -1.5));
        assert_eq!(objects[1].position(), Vec3::new(-1.5, -1.5, -0.5));
        assert_eq!(objects[2].position(), Vec3::new(-1.5, -1.5, 0.5));
        assert_eq!(objects[3].position(), Vec3::new(-1.5, -0.5, -1.5));
    }

    #[test]
    fn test_far_plane_is_twice_camera_distance() {
        for (n, p) in [(1, 0.0), (4, 0.5), (20, 1.0)] {
            let (scene, framing) = framed(n, p);
            let camera = scene.camera();
            let expected = 2.0 * (framing.camera_distance + framing.base + camera.near());

            assert_relative_eq!(camera.far(), expected, epsilon = 1e-4);
            assert_relative_eq!(camera.position().z, framing.camera_z, epsilon = 1e-6);
            assert_eq!(camera.position().w, 1.0);
        }
    }

    #[test]
    fn test_camera_distance_fills_height_fov() {
        let (scene, framing) = framed(5, 0.25);
        let half_fov = scene.camera().field_of_view() / ASPECT / 2.0;
        assert_relative_eq!(framing.camera_distance * half_fov.tan(), framing.base, epsilon = 1e-4);
    }

    #[test]
    fn test_every_object_depth_between_near_and_far() {
        for (n, p) in [(1, 0.0), (3, 0.0), (8, 0.75), (15, 2.0)] {
            let (scene, _) = framed(n, p);
            let camera = scene.camera();
            for object in scene.render_objects() {
                // Camera looks down -Z from +Z
                let depth = camera.position().z - object.position().z;
                assert!(depth > camera.near(), "object {:?} inside near plane", object);
                assert!(depth < camera.far(), "object {:?} beyond far plane", object);
            }
        }
    }

    #[test]
    fn test_every_object_projects_inside_clip_volume() {
        let (scene, _) = framed(6, 0.5);
        let view_projection: Mat4 = scene.camera().view_projection_matrix(ASPECT);

        for object in scene.render_objects() {
            let clip = view_projection * object.position().push(1.0);
            assert!(clip.w > 0.0);
            let ndc = clip.xyz() / clip.w;
            assert!(ndc.x.abs() <= 1.0, "x out of frustum for {:?}", object);
            assert!(ndc.y.abs() <= 1.0, "y out of frustum for {:?}", object);
            assert!(ndc.z > 0.0 && ndc.z < 1.0, "depth out of range for {:?}", object);
        }
    }

    #[test]
    fn test_drawn_cubes_fit_landscape_and_portrait_targets() {
        for aspect in [16.0 / 9.0, ASPECT, 1.0, 600.0 / 800.0, 9.0 / 16.0] {
            let (scene, _) = Scene::framed_lattice(Camera::default(), Lattice::new(5, 0.5), aspect);
            let view_projection = scene.camera().view_projection_matrix(aspect);

            for vertex in drawn_vertices(&scene) {
                let clip = view_projection * vertex.push(1.0);
                assert!(clip.w > 0.0);
                let ndc = clip.xyz() / clip.w;
                assert!(ndc.x.abs() <= 1.0 + 1e-5, "x out of frustum at aspect {}", aspect);
                assert!(ndc.y.abs() <= 1.0 + 1e-5, "y out of frustum at aspect {}", aspect);
                assert!(ndc.z > 0.0 && ndc.z < 1.0, "depth out of range at aspect {}", aspect);
            }
        }
    }

    #[test]
    fn test_portrait_framing_uses_horizontal_fov() {
        let aspect = 0.5;
        let (scene, framing) = Scene::framed_lattice(Camera::default(), Lattice::new(3, 0.0), aspect);
        let fov = scene.camera().field_of_view();

        assert!(framing.height_fov < fov);
        assert_relative_eq!((framing.height_fov / 2.0).tan(), (fov / 2.0).tan() * aspect, epsilon = 1e-6);
    }

    #[test]
    fn test_empty_scene_has_no_bounds() {
        let scene = Scene::new(Camera::default(), Vec::new());
        assert!(scene.bounds().is_none());
        assert!(scene.lattice_spec().is_none());
    }
}
