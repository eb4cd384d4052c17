//! Application services - orchestrate domain rules over the ports.

mod posts;

pub use posts::{POSTS_PER_PAGE, PostService};
