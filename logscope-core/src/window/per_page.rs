use serde::{Deserialize, Serialize};
use std::fmt;

/// Rows per page. Only the sizes offered by the UI are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct PerPage(usize);

impl PerPage {
    pub const ALLOWED: [usize; 4] = [50, 100, 150, 200];

    pub fn new(n: usize) -> Option<PerPage> {
        Self::ALLOWED.contains(&n).then_some(PerPage(n))
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for PerPage {
    fn default() -> Self {
        PerPage(50)
    }
}

impl TryFrom<usize> for PerPage {
    type Error = String;

    fn try_from(n: usize) -> Result<Self, Self::Error> {
        PerPage::new(n).ok_or_else(|| format!("rows per page must be one of {:?}", Self::ALLOWED))
    }
}

impl From<PerPage> for usize {
    fn from(p: PerPage) -> usize {
        p.0
    }
}

impl fmt::Display for PerPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
