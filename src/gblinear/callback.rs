//! Early stopping on the held-out metric.

/// Early stopping state.
///
/// Lower metric values are better. Training stops once `patience` consecutive
/// rounds have passed without a new best value.
#[derive(Debug, Clone)]
pub struct EarlyStopping {
    /// Rounds without improvement tolerated before stopping. 0 disables stopping.
    patience: usize,
    best_value: Option<f64>,
    best_round: usize,
    current_round: usize,
}

impl EarlyStopping {
    pub fn new(patience: usize) -> Self {
        Self {
            patience,
            best_value: None,
            best_round: 0,
            current_round: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.patience > 0
    }

    /// Records the metric for the current round.
    ///
    /// Returns `true` if this round set a new best value. NaN never counts as an
    /// improvement.
    pub fn record(&mut self, value: f64) -> bool {
        let is_improvement = match self.best_value {
            None => !value.is_nan(),
            Some(best) => value < best,
        };

        if is_improvement {
            self.best_value = Some(value);
            self.best_round = self.current_round;
        }
        self.current_round += 1;

        is_improvement
    }

    /// Whether the patience window has run out since the best round.
    pub fn should_stop(&self) -> bool {
        if !self.is_enabled() {
            return false;
        }
        let stale = match self.best_value {
            Some(_) => self.current_round - self.best_round - 1,
            None => self.current_round,
        };
        stale >= self.patience
    }

    pub fn best_value(&self) -> Option<f64> {
        self.best_value
    }

    pub fn best_round(&self) -> Option<usize> {
        self.best_value.map(|_| self.best_round)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_stop_while_improving() {
        let mut early_stop = EarlyStopping::new(3);

        for value in [1.0, 0.9, 0.8, 0.7, 0.6] {
            assert!(early_stop.record(value));
            assert!(!early_stop.should_stop());
        }

        assert_eq!(early_stop.best_round(), Some(4));
        assert!((early_stop.best_value().unwrap() - 0.6).abs() < 1e-10);
    }

    #[test]
    fn stops_after_patience() {
        let mut early_stop = EarlyStopping::new(3);

        early_stop.record(0.5);
        assert!(!early_stop.should_stop());
        early_stop.record(0.6); // 1 stale round
        assert!(!early_stop.should_stop());
        early_stop.record(0.7); // 2
        assert!(!early_stop.should_stop());
        early_stop.record(0.8); // 3
        assert!(early_stop.should_stop());

        assert_eq!(early_stop.best_round(), Some(0));
    }

    #[test]
    fn improvement_resets_window() {
        let mut early_stop = EarlyStopping::new(2);

        early_stop.record(1.0);
        early_stop.record(1.1);
        assert!(!early_stop.should_stop());
        assert!(early_stop.record(0.9));
        early_stop.record(1.0);
        assert!(!early_stop.should_stop());
        early_stop.record(1.0);
        assert!(early_stop.should_stop());

        assert_eq!(early_stop.best_round(), Some(2));
    }

    #[test]
    fn equal_value_is_not_improvement() {
        let mut early_stop = EarlyStopping::new(1);
        assert!(early_stop.record(0.5));
        assert!(!early_stop.record(0.5));
        assert!(early_stop.should_stop());
    }

    #[test]
    fn disabled_never_stops() {
        let mut early_stop = EarlyStopping::new(0);
        for value in [0.5, 0.6, 0.7, 0.8, 0.9] {
            early_stop.record(value);
        }
        assert!(!early_stop.should_stop());
        assert_eq!(early_stop.best_round(), Some(0));
    }

    #[test]
    fn nan_never_improves() {
        let mut early_stop = EarlyStopping::new(2);
        assert!(!early_stop.record(f64::NAN));
        assert!(!early_stop.record(f64::NAN));
        assert!(early_stop.should_stop());
        assert_eq!(early_stop.best_round(), None);
    }
}
