//! One-hot encoding of categorical features

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One-hot encoder over a fixed list of categorical columns.
///
/// Categories are learned per column and kept sorted. A value that was not
/// seen during fitting encodes to an all-zero block instead of failing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OneHotEncoder {
    categories: Vec<Vec<String>>,
}

impl OneHotEncoder {
    /// Learn the categories of each column.
    ///
    /// `rows` yields one slice per sample, holding one value per column.
    pub fn fit<'a, I>(n_columns: usize, rows: I) -> Self
    where
        I: IntoIterator<Item = Vec<&'a str>>,
    {
        let mut seen: Vec<BTreeSet<&'a str>> = vec![BTreeSet::new(); n_columns];
        for row in rows {
            for (column, value) in seen.iter_mut().zip(row) {
                column.insert(value);
            }
        }

        Self {
            categories: seen
                .into_iter()
                .map(|column| column.into_iter().map(str::to_string).collect())
                .collect(),
        }
    }

    /// Number of output columns produced by `encode_into`
    pub fn width(&self) -> usize {
        self.categories.iter().map(Vec::len).sum()
    }

    pub fn n_columns(&self) -> usize {
        self.categories.len()
    }

    pub fn categories(&self, column: usize) -> Option<&[String]> {
        self.categories.get(column).map(Vec::as_slice)
    }

    /// Append the encoding of `values` to `out`
    pub fn encode_into(&self, values: &[&str], out: &mut Vec<f64>) {
        for (known, value) in self.categories.iter().zip(values) {
            let start = out.len();
            out.resize(start + known.len(), 0.0);
            if let Ok(position) = known.binary_search_by(|category| category.as_str().cmp(*value)) {
                out[start + position] = 1.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitted() -> OneHotEncoder {
        OneHotEncoder::fit(
            2,
            vec![
                vec!["Punjab", "Kharif"],
                vec!["Bihar", "Rabi"],
                vec!["Punjab", "Rabi"],
            ],
        )
    }

    #[test]
    fn test_categories_are_sorted_and_unique() {
        let encoder = fitted();
        assert_eq!(encoder.n_columns(), 2);
        assert_eq!(encoder.categories(0).unwrap(), ["Bihar", "Punjab"]);
        assert_eq!(encoder.categories(1).unwrap(), ["Kharif", "Rabi"]);
        assert_eq!(encoder.width(), 4);
    }

    #[test]
    fn test_encode_known_values() {
        let encoder = fitted();
        let mut out = Vec::new();
        encoder.encode_into(&["Punjab", "Rabi"], &mut out);
        assert_eq!(out, vec![0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_unknown_value_encodes_to_zeros() {
        let encoder = fitted();
        let mut out = vec![42.0];
        encoder.encode_into(&["Kerala", "Kharif"], &mut out);
        assert_eq!(out, vec![42.0, 0.0, 0.0, 1.0, 0.0]);
    }
}
