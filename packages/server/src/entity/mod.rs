pub mod capture_photo;
pub mod flickr_photo;
