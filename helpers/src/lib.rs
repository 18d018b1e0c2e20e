pub mod general;
pub mod vec3;
