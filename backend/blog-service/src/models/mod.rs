mod note;
mod post;

pub use note::*;
pub use post::*;
