/// Online estimator for the mean and population variance of a scalar stream.
#[derive(Debug, Clone, Default)]
pub struct Welford {
    count: u32,
    mean: f64,
    m2: f64,
}

impl Welford {
    /// Create a new, empty estimator.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, x: f64) {
        self.count += 1;
        let n = self.count as f64;

        let delta = x - self.mean;
        self.mean += delta / n;
        let delta2 = x - self.mean;
        self.m2 += delta * delta2;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn variance(&self) -> Option<f64> {
        if self.count > 0 {
            Some(self.m2 / self.count as f64)
        } else {
            None
        }
    }
}
