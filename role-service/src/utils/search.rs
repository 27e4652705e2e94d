use serde::{Deserialize, Serialize};

use super::{is_field_name, QueryError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
    pub field: String,
    /// Alternatives; a record matches when its field equals any of them.
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Search(pub Vec<SearchFilter>);

impl Search {
    /// Parses `field:value[|value]` pairs separated by commas. Returns `None`
    /// for a missing or blank value. Repeated fields accumulate their values.
    pub fn parse(raw: Option<&str>) -> Result<Option<Self>, QueryError> {
        let raw = match raw.map(str::trim) {
            None | Some("") => return Ok(None),
            Some(raw) => raw,
        };
        let invalid = || QueryError::InvalidSearch(raw.to_string());

        let mut filters: Vec<SearchFilter> = Vec::new();
        for pair in raw.split(',') {
            let (field, values) = pair.trim().split_once(':').ok_or_else(invalid)?;
            if !is_field_name(field) {
                return Err(invalid());
            }
            let values: Vec<String> = values.split('|').map(|v| v.trim().to_string()).collect();
            if values.iter().any(String::is_empty) {
                return Err(invalid());
            }

            match filters.iter_mut().find(|f| f.field == field) {
                Some(existing) => existing.values.extend(values),
                None => filters.push(SearchFilter {
                    field: field.to_string(),
                    values,
                }),
            }
        }

        Ok(Some(Search(filters)))
    }

    pub fn filters(&self) -> &[SearchFilter] {
        &self.0
    }
}
