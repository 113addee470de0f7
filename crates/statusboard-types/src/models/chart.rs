use serde::{Deserialize, Serialize};

/// One bar / donut segment of a distribution chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSlice {
    pub name: String,
    pub value: usize,
    /// Share of the total, rounded to the nearest integer percent
    pub percentage: u32,
}

impl ChartSlice {
    /// Build a slice, computing its percentage against `total`
    ///
    /// # Examples
    ///
    /// ```
    /// use statusboard_types::ChartSlice;
    ///
    /// let slice = ChartSlice::new("진행중", 1, 3);
    /// assert_eq!(slice.percentage, 33);
    ///
    /// // An empty dataset never divides by zero
    /// assert_eq!(ChartSlice::new("진행중", 0, 0).percentage, 0);
    /// ```
    pub fn new(name: impl Into<String>, value: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            ((value as f64 / total as f64) * 100.0).round() as u32
        };

        Self {
            name: name.into(),
            value,
            percentage,
        }
    }
}
