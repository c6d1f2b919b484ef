pub mod recommendation;
pub mod timeline;
