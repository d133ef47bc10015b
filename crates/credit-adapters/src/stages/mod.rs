pub mod clean;
pub mod extract;
pub mod load;
pub mod transform;
pub mod validate;
pub mod verify;
