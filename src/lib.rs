pub mod cart;
pub mod club_fetch;
pub mod comment_fetch;
pub mod demo_feed;
pub mod feed;
pub mod http_cache;
pub mod http_client;
pub mod match_fetch;
pub mod persist;
pub mod profile_fetch;
pub mod state;
