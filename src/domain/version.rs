use std::cmp::Ordering;
use std::fmt;

use super::AppError;

/// A dotted numeric version (e.g. "2.6.1") compared component-wise.
///
/// Missing trailing components count as zero, so `2.6` equals `2.6.0`.
#[derive(Debug, Clone)]
pub struct Version {
    parts: Vec<u32>,
}

impl Version {
    pub fn new(parts: impl Into<Vec<u32>>) -> Self {
        Self { parts: parts.into() }
    }

    /// Parse a version string into a `Version`.
    ///
    /// Surrounding whitespace is ignored. Every dot-separated segment must be
    /// a non-negative integer.
    pub fn parse(s: &str) -> Result<Self, AppError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AppError::InvalidVersion(s.to_string()));
        }
        let parts = trimmed
            .split('.')
            .map(|segment| segment.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| AppError::InvalidVersion(s.to_string()))?;
        Ok(Self { parts })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.parts.iter().map(|p| p.to_string()).collect();
        write!(f, "{}", rendered.join("."))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let max_len = self.parts.len().max(other.parts.len());
        for idx in 0..max_len {
            let left_value = *self.parts.get(idx).unwrap_or(&0);
            let right_value = *other.parts.get(idx).unwrap_or(&0);
            match left_value.cmp(&right_value) {
                Ordering::Less => return Ordering::Less,
                Ordering::Greater => return Ordering::Greater,
                Ordering::Equal => {}
            }
        }
        Ordering::Equal
    }
}
