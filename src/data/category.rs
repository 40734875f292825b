use std::fmt;
use std::str::FromStr;

use crate::error::QueryError;

/// The fixed set of pathogen groupings served by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Virus,
    Bacteria,
    Fungi,
    Others,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Virus,
        Category::Bacteria,
        Category::Fungi,
        Category::Others,
    ];

    /// URL segment naming this category.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Virus => "virus",
            Category::Bacteria => "bacteria",
            Category::Fungi => "fungi",
            Category::Others => "others",
        }
    }

    /// Column holding the pathogen name in this category's table.
    pub fn identifying_column(self) -> &'static str {
        match self {
            Category::Virus => "Virus",
            Category::Bacteria => "Bacterium",
            Category::Fungi => "Fungus",
            Category::Others => "Pathogen",
        }
    }

    /// Source files read when no override is configured.
    pub fn default_files(self) -> &'static [&'static str] {
        match self {
            Category::Virus => &["viruses_shared_behaviors_100_plus_complete.csv"],
            Category::Bacteria => &["bacteria_shared_behaviors_120.csv"],
            Category::Fungi => &["fungi_shared_behaviors_120.csv"],
            Category::Others => &["others_shared_behaviors_120_plus.csv"],
        }
    }

    /// Upper-case tag used in environment variable names.
    pub fn env_tag(self) -> &'static str {
        match self {
            Category::Virus => "VIRUS",
            Category::Bacteria => "BACTERIA",
            Category::Fungi => "FUNGI",
            Category::Others => "OTHERS",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact, case-sensitive match on the URL segment.
impl FromStr for Category {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| QueryError::InvalidCategory(s.to_string()))
    }
}
