use serde::{Deserialize, Serialize};

/// One value falling inside a polygon footprint, with its weight
/// (1 for raster cells, points and lines; intersection area for polygon features).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub value: f64,
    pub weight: f64,
}

impl Sample {
    #[inline] pub fn unit(value: f64) -> Self { Self { value, weight: 1.0 } }
}

/// Zonal statistic used to summarize a driver over a polygon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZonalStat {
    /// Weighted arithmetic mean.
    #[default]
    Mean,
    Sum,
    Min,
    Max,
    Median,
    /// Number of contributing cells or features.
    Count,
}

impl ZonalStat {
    /// Reduce samples to one value; `None` when nothing overlaps the polygon.
    pub fn reduce(self, samples: &[Sample]) -> Option<f64> {
        if samples.is_empty() { return None }

        match self {
            Self::Mean => {
                let total_weight: f64 = samples.iter().map(|s| s.weight).sum();
                (total_weight > 0.0).then(|| {
                    samples.iter().map(|s| s.value * s.weight).sum::<f64>() / total_weight
                })
            }
            Self::Sum => Some(samples.iter().map(|s| s.value).sum()),
            Self::Min => samples.iter().map(|s| s.value).reduce(f64::min),
            Self::Max => samples.iter().map(|s| s.value).reduce(f64::max),
            Self::Median => {
                let mut values: Vec<f64> = samples.iter().map(|s| s.value).collect();
                values.sort_by(f64::total_cmp);
                let mid = values.len() / 2;
                Some(if values.len() % 2 == 0 { (values[mid - 1] + values[mid]) / 2.0 } else { values[mid] })
            }
            Self::Count => Some(samples.len() as f64),
        }
    }
}
