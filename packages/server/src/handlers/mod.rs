pub mod capture;
pub mod flickr;
