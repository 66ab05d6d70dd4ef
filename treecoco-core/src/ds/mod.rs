mod key;
mod layout;

pub use key::{FrameKey, leading_token, parse_object_id};
pub use layout::DatasetLayout;
