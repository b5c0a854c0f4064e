use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Result of a slug availability probe, shown next to the slug input of a form.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SlugStatus {
    pub slug: String,
    pub available: bool,
}
