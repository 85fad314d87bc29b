pub mod cache;
pub mod chunker;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod inference;
pub mod merge;
pub mod model;
pub mod normalise;
pub mod openai;
pub mod pipeline;
pub mod prompt;
pub mod ranking;
pub mod rate_limit;
pub mod recommend;

#[cfg(test)]
pub(crate) mod test_support;
