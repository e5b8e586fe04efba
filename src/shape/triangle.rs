use crate::geometry::{self, Ray, WorldBox, WorldPoint, WorldVector};

use super::{Intersection, MaterialId, Shape, ShapeError};

/// Triangle with per vertex normals, shaded smoothly.
#[derive(Clone, Debug)]
pub struct Triangle {
    vertices: geometry::Triangle<WorldPoint>,
    normals: geometry::Triangle<WorldVector>,
    material: MaterialId,

    bounding_box: WorldBox,
}

impl Triangle {
    pub fn new(
        vertices: [WorldPoint; 3],
        normals: [WorldVector; 3],
        material: MaterialId,
    ) -> Triangle {
        let mut bounding_box = WorldBox::from_point(vertices[0]);
        bounding_box.extend(&vertices[1]).extend(&vertices[2]);
        let vertices = geometry::Triangle::from(vertices);

        Triangle {
            vertices,
            normals: normals.into(),
            material,
            bounding_box,
        }
    }

    /// Creates a triangle from vertex and normal lists, each must have exactly three items.
    pub fn from_slices(
        vertices: &[WorldPoint],
        normals: &[WorldVector],
        material: MaterialId,
    ) -> Result<Triangle, ShapeError> {
        let vertices: [WorldPoint; 3] = vertices
            .try_into()
            .map_err(|_| ShapeError::VertexCount(vertices.len()))?;
        let normals: [WorldVector; 3] = normals
            .try_into()
            .map_err(|_| ShapeError::NormalCount(normals.len()))?;

        Ok(Triangle::new(vertices, normals, material))
    }

    pub fn vertices(&self) -> &geometry::Triangle<WorldPoint> {
        &self.vertices
    }

    pub fn normals(&self) -> &geometry::Triangle<WorldVector> {
        &self.normals
    }
}

impl Shape for Triangle {
    fn intersect(&self, ray: &Ray) -> Option<Intersection<'_>> {
        let (t, uv) = self.vertices.intersect(ray)?;
        let normal = uv.interpolate_triangle(&self.normals);

        Some(Intersection::new(self, ray, t, normal))
    }

    fn bounding_box(&self) -> &WorldBox {
        &self.bounding_box
    }

    fn material(&self) -> MaterialId {
        self.material
    }
}
