pub mod dispatcher;
pub mod picking;

pub use dispatcher::{dispatch, InteractEvent, Interactive};
pub use picking::{ray_cylinder, ray_sphere, HitInfo, PickTarget, Ray, RayPicker, TreeHitbox};
