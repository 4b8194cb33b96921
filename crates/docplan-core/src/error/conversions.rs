//! From trait implementations for DocplanError conversions

use super::types::DocplanError;

impl From<regex::Error> for DocplanError {
    fn from(error: regex::Error) -> Self {
        Self::invalid_field("pattern", error.to_string())
    }
}
