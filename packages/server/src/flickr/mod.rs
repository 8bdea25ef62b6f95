mod view;

pub use view::{Dimension, FlickrPhotoFacetVO, THUMBNAILS};
