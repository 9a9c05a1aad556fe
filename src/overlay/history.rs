/// Number of frame times kept for the inspector histogram.
pub const FRAME_HISTORY_LEN: usize = 240;
/// How often the FPS line is logged (seconds).
const LOG_INTERVAL: f64 = 5.0;

/// Summary of the frames currently in the window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameSummary {
    pub fps: f64,
    pub avg: f64,
    pub min: f64,
    pub max: f64,
}

/// Fixed-capacity window of recent frame times (seconds), oldest first,
/// plus the periodic FPS log accumulator.
pub struct FrameHistory {
    buf: Vec<f64>,
    head: usize,
    len: usize,
    total_frames: u64,
    log_timer: f64,
    log_frames: u32,
}

impl FrameHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: vec![0.0; capacity.max(1)],
            head: 0,
            len: 0,
            total_frames: 0,
            log_timer: 0.0,
            log_frames: 0,
        }
    }

    /// Record one frame and emit the periodic FPS log when due.
    pub fn record(&mut self, dt: f64) {
        let cap = self.buf.len();
        self.buf[self.head] = dt;
        self.head = (self.head + 1) % cap;
        self.len = (self.len + 1).min(cap);
        self.total_frames += 1;

        self.log_frames += 1;
        self.log_timer += dt;
        if self.log_timer >= LOG_INTERVAL {
            let s = self.summary();
            log::info!(
                "FPS: {:.0} | avg: {:.2}ms | min: {:.2}ms | max: {:.2}ms | total frames: {}",
                self.log_frames as f64 / self.log_timer,
                s.avg * 1000.0,
                s.min * 1000.0,
                s.max * 1000.0,
                self.total_frames,
            );
            self.log_timer = 0.0;
            self.log_frames = 0;
        }
    }

    /// Iterate from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        let cap = self.buf.len();
        let start = if self.len < cap { 0 } else { self.head };
        (0..self.len).map(move |i| self.buf[(start + i) % cap])
    }

    pub fn summary(&self) -> FrameSummary {
        if self.len == 0 {
            return FrameSummary::default();
        }
        let (sum, min, max) = self
            .iter()
            .fold((0.0, f64::MAX, 0.0f64), |(s, lo, hi), t| (s + t, lo.min(t), hi.max(t)));
        let avg = sum / self.len as f64;
        FrameSummary {
            fps: if avg > 0.0 { 1.0 / avg } else { 0.0 },
            avg,
            min,
            max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_newest_frames_in_order() {
        let mut h = FrameHistory::new(3);
        for dt in [0.1, 0.2, 0.3, 0.4] {
            h.record(dt);
        }
        assert_eq!(h.iter().collect::<Vec<_>>(), vec![0.2, 0.3, 0.4]);
    }

    #[test]
    fn summary_of_window() {
        let mut h = FrameHistory::new(8);
        assert_eq!(h.summary(), FrameSummary::default());
        for dt in [0.010, 0.020, 0.030] {
            h.record(dt);
        }
        let s = h.summary();
        assert!((s.avg - 0.020).abs() < 1e-12);
        assert_eq!(s.min, 0.010);
        assert_eq!(s.max, 0.030);
        assert!((s.fps - 50.0).abs() < 1e-9);
    }
}
