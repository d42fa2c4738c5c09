/// One validated search hit, flattened from the raw repository record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResultItem {
    pub name: String,
    pub owner: String,
    pub star_count: u64,
}

impl SearchResultItem {
    pub fn new(name: impl Into<String>, owner: impl Into<String>, star_count: u64) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
            star_count,
        }
    }
}
