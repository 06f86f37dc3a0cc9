pub mod contacts;
pub mod landing;
