//! Posts REST API client and payload types.

mod client;
mod post;

pub use client::{ApiResponse, PostsClient, JSON_UTF8};
pub use post::{check_post_collection, check_post_shape, NewPost, Post, PostPatch};
