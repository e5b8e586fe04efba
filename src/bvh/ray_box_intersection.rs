use crate::geometry::{FloatType, WorldBox};

use super::BvhRay;

pub trait RayIntersectionExt {
    /// Calculate first and last ray intersection with the box
    fn intersect(&self, ray: &BvhRay) -> (FloatType, FloatType);
}

impl RayIntersectionExt for WorldBox {
    /// Returns minimum and maximum distance along the ray, ray intersects if min <= max.
    /// The ray's distance range is not taken into account.
    fn intersect(&self, ray: &BvhRay) -> (FloatType, FloatType) {
        // The multiplication is NAN if the ray is starting on the slab bounding plane
        // and is parallel to it. In this case we blend to +-infinity, so that the range becomes infinite
        let to_box_min = (self.min - ray.origin)
            .component_mul(&ray.inv_direction)
            .map(|x| if x.is_nan() { FloatType::NEG_INFINITY } else { x });
        let to_box_max = (self.max - ray.origin)
            .component_mul(&ray.inv_direction)
            .map(|x| if x.is_nan() { FloatType::INFINITY } else { x });

        // Correctly ordered (min_t <= max_t)
        let componentwise_min_t = to_box_min.zip_map(&to_box_max, FloatType::min);
        let componentwise_max_t = to_box_min.zip_map(&to_box_max, FloatType::max);

        (componentwise_min_t.max(), componentwise_max_t.min())
    }
}
