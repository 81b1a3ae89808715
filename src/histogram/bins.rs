use super::{HistogramError, Result};

pub const DEFAULT_BINS: usize = 1024;

/// Equal-width histogram spanning the observed range of its values.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    counts: Vec<f64>,
    edge_min: f32,
    edge_max: f32,
    count_sum: f64,
    is_integer: bool,
    normalized: bool,
}

impl Histogram {
    /// Non-finite samples are skipped. A constant input puts every sample in
    /// the first bin and collapses all edges onto that value.
    pub fn from_values(values: &[f32], n_bins: usize) -> Result<Self> {
        if n_bins < 2 {
            return Err(HistogramError::TooFewBins(n_bins));
        }
        let mut finite = values.iter().copied().filter(|value| value.is_finite()).peekable();
        let Some(&first) = finite.peek() else {
            return Err(HistogramError::NoFiniteValues);
        };
        let (mut min, mut max, mut is_integer) = (first, first, true);
        for value in finite {
            min = min.min(value);
            max = max.max(value);
            is_integer &= value.fract() == 0.0;
        }

        let mut counts = vec![0.0; n_bins];
        let range = f64::from(max) - f64::from(min);
        let mut count_sum = 0.0;
        for value in values.iter().copied().filter(|value| value.is_finite()) {
            let bin = if range > 0.0 {
                let offset = (f64::from(value) - f64::from(min)) / range;
                ((offset * n_bins as f64) as usize).min(n_bins - 1)
            } else {
                0
            };
            counts[bin] += 1.0;
            count_sum += 1.0;
        }

        Ok(Self {
            counts,
            edge_min: min,
            edge_max: max,
            count_sum,
            is_integer,
            normalized: false,
        })
    }

    /// Rewrites counts as fractions of the total.
    pub fn normalize(&mut self) {
        if self.normalized || self.count_sum <= 0.0 {
            return;
        }
        for count in &mut self.counts {
            *count /= self.count_sum;
        }
        self.normalized = true;
    }

    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    pub fn n_bins(&self) -> usize {
        self.counts.len()
    }

    pub fn count(&self, bin: usize) -> f64 {
        self.counts.get(bin).copied().unwrap_or(0.0)
    }

    pub fn bin_width(&self) -> f64 {
        (f64::from(self.edge_max) - f64::from(self.edge_min)) / self.n_bins() as f64
    }

    pub fn bin_left_edge(&self, bin: usize) -> f32 {
        (f64::from(self.edge_min) + bin as f64 * self.bin_width()) as f32
    }

    pub fn bin_right_edge(&self, bin: usize) -> f32 {
        if bin + 1 >= self.n_bins() {
            return self.edge_max;
        }
        self.bin_left_edge(bin + 1)
    }

    pub fn edge_min(&self) -> f32 {
        self.edge_min
    }

    pub fn edge_max(&self) -> f32 {
        self.edge_max
    }

    /// Number of samples binned, regardless of normalization.
    pub fn count_sum(&self) -> f64 {
        self.count_sum
    }

    pub fn is_integer(&self) -> bool {
        self.is_integer
    }

    pub fn is_normalized(&self) -> bool {
        self.normalized
    }

    pub fn min_value(&self) -> f32 {
        self.edge_min
    }

    pub fn max_value(&self) -> f32 {
        self.edge_max
    }
}
