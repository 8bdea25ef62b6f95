mod common;
mod flickr;
