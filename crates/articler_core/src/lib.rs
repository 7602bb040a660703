//! Articler core: job state, submission parameters and the deterministic
//! parts of article building.
mod article;
mod job;
mod pairing;
mod plan;
mod request;

pub use article::{Article, EmbeddedLink};
pub use job::{Job, JobId, JobSnapshot};
pub use pairing::{embedded_links, max_pairs, pair_pointer, EMBED_SLOTS};
pub use plan::{search_link, ArticlePlan};
pub use request::{parse_lines, JobRequest};
