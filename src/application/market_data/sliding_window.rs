use std::collections::VecDeque;

/// Fixed-size buffer over the most recent values of a series.
///
/// Holds at most `capacity` values; pushing into a full window evicts the
/// oldest one. Statistics are only defined once the window is full and every
/// value in it is defined.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    capacity: usize,
    values: VecDeque<Option<f64>>,
}

impl SlidingWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            values: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, value: Option<f64>) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    /// Window contents, oldest first, if full and fully defined
    pub fn values(&self) -> Option<Vec<f64>> {
        if !self.is_full() {
            return None;
        }
        self.values.iter().copied().collect()
    }

    pub fn mean(&self) -> Option<f64> {
        let values = self.values()?;
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Sample standard deviation (n - 1 denominator)
    pub fn sample_std_dev(&self) -> Option<f64> {
        let values = self.values()?;
        let n = values.len();
        if n < 2 {
            return None;
        }

        let mean = values.iter().sum::<f64>() / n as f64;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        Some(variance.sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_undefined_until_full() {
        let mut window = SlidingWindow::new(3);
        window.push(Some(1.0));
        window.push(Some(2.0));
        assert_eq!(window.mean(), None);

        window.push(Some(3.0));
        assert_eq!(window.mean(), Some(2.0));
    }

    #[test]
    fn test_window_evicts_oldest() {
        let mut window = SlidingWindow::new(2);
        for v in [1.0, 2.0, 3.0, 4.0] {
            window.push(Some(v));
        }

        assert_eq!(window.values(), Some(vec![3.0, 4.0]));
    }

    #[test]
    fn test_undefined_value_poisons_window_until_evicted() {
        let mut window = SlidingWindow::new(2);
        window.push(None);
        window.push(Some(1.0));
        assert_eq!(window.mean(), None);

        window.push(Some(3.0));
        assert_eq!(window.mean(), Some(2.0));
    }

    #[test]
    fn test_sample_std_dev_uses_n_minus_one() {
        let mut window = SlidingWindow::new(4);
        for v in [2.0, 4.0, 4.0, 6.0] {
            window.push(Some(v));
        }

        // mean 4, squared deviations 4+0+0+4 = 8, 8/3
        let expected = (8.0_f64 / 3.0).sqrt();
        assert!((window.sample_std_dev().unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_single_value_window_has_no_std_dev() {
        let mut window = SlidingWindow::new(1);
        window.push(Some(5.0));
        assert_eq!(window.mean(), Some(5.0));
        assert_eq!(window.sample_std_dev(), None);
    }
}
