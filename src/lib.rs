pub mod acceleration;
pub mod bvh;
pub mod geometry;
pub mod shape;
pub mod util;

pub use acceleration::AccelerationIndex;
pub use bvh::{BuildSettings, StackCache};
pub use geometry::{EPSILON, Ray};
pub use shape::{Cuboid, Cylinder, Intersection, MaterialId, Shape, ShapeError, Sphere, Triangle};
