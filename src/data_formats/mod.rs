mod request;
mod response;
mod wrapper;

pub use request::*;
pub use response::*;
pub use wrapper::*;

use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FeedScope {
    #[default]
    All,
    Mine,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct FeedQueryParams {
    #[serde(default)]
    pub scope: FeedScope,
    #[serde(default = "get_default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct DirectoryQueryParams {
    #[serde(default)]
    pub category: Option<String>,
}

fn get_default_limit() -> u32 {
    20
}
