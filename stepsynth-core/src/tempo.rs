use std::time::Duration;

/// Linear map from the speed pot to the step period:
/// `period = base + speed * scale`, rounded to whole milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TempoMap {
    pub base_offset_ms: u64,
    pub scale_ms: u64,
}

impl Default for TempoMap {
    fn default() -> Self {
        Self {
            base_offset_ms: 20,
            scale_ms: 1000,
        }
    }
}

impl TempoMap {
    pub fn period(&self, speed: f32) -> Duration {
        let speed = speed.clamp(0.0, 1.0) as f64;
        let ms = (self.base_offset_ms as f64 + speed * self.scale_ms as f64).round();
        Duration::from_millis(ms as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_map() {
        let map = TempoMap::default();
        assert_eq!(map.period(0.0), Duration::from_millis(20));
        assert_eq!(map.period(0.2), Duration::from_millis(220));
        assert_eq!(map.period(0.5), Duration::from_millis(520));
        assert_eq!(map.period(1.0), Duration::from_millis(1020));
    }

    #[test]
    fn test_clamps_out_of_range() {
        let map = TempoMap::default();
        assert_eq!(map.period(-1.0), map.period(0.0));
        assert_eq!(map.period(2.0), map.period(1.0));
    }
}
