use serde::{Deserialize, Serialize};

use super::{is_field_name, QueryError};

pub const DEFAULT_SORT_FIELD: &str = "createdAt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortField {
    pub field: String,
    pub direction: SortDirection,
}

/// Ordered list of sort keys; earlier keys take precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sort(pub Vec<SortField>);

impl Default for Sort {
    fn default() -> Self {
        Sort(vec![SortField {
            field: DEFAULT_SORT_FIELD.to_string(),
            direction: SortDirection::Desc,
        }])
    }
}

impl Sort {
    /// Parses `field:asc|desc` pairs separated by commas. A missing or blank
    /// value yields the default `createdAt:desc`.
    pub fn parse(raw: Option<&str>) -> Result<Self, QueryError> {
        let raw = match raw.map(str::trim) {
            None | Some("") => return Ok(Sort::default()),
            Some(raw) => raw,
        };

        raw.split(',')
            .map(|pair| {
                parse_pair(pair.trim()).ok_or_else(|| QueryError::InvalidSort(raw.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Sort)
    }

    pub fn fields(&self) -> &[SortField] {
        &self.0
    }
}

fn parse_pair(pair: &str) -> Option<SortField> {
    let (field, direction) = pair.split_once(':')?;
    if !is_field_name(field) {
        return None;
    }
    let direction = match direction.to_ascii_lowercase().as_str() {
        "asc" => SortDirection::Asc,
        "desc" => SortDirection::Desc,
        _ => return None,
    };
    Some(SortField {
        field: field.to_string(),
        direction,
    })
}
