mod request;

pub use request::ImageFetcher;
