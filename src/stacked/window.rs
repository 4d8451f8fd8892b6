use ndarray::{s, Array2};
use crate::stacked::{Recording, StackError};
// Tolerance for sample times that land on a window edge up to float noise.
const EDGE_EPS: f64 = 1e-9;
/// Samples of a recording restricted to the display window.
#[derive(Clone, Debug)]
pub struct Trimmed {
    pub data: Array2<f64>, // channels x samples
    pub labels: Vec<String>,
    pub sample_rate: f64,
    pub start: f64,
    pub end: f64,
    /// Index of the first kept sample in the source recording.
    pub first_sample: usize,
}
impl Trimmed {
    pub fn num_channels(&self) -> usize {
        self.data.nrows()
    }
    pub fn num_samples(&self) -> usize {
        self.data.ncols()
    }
}
pub fn trim(recording: &Recording, window: Option<[f64; 2]>) -> Result<Trimmed, StackError> {
    let (min, max) = (recording.start(), recording.end());
    let Some([start, end]) = window else {
        log::info!("no window given, showing the whole recording [{min}, {max}] s");
        return Ok(Trimmed {
            data: recording.data().clone(),
            labels: recording.labels().to_vec(),
            sample_rate: recording.sample_rate(),
            start: min,
            end: max,
            first_sample: 0,
        });
    };
    if !start.is_finite() || !end.is_finite() {
        return Err(StackError::InvalidWindow {
            start,
            end,
            reason: "bounds must be finite",
        });
    }
    if end > max || start < min {
        return Err(StackError::WindowOutOfRange {
            start,
            end,
            min,
            max,
        });
    }
    if start > end {
        return Err(StackError::InvalidWindow {
            start,
            end,
            reason: "start is after end",
        });
    }
    let sr = recording.sample_rate();
    let last_index = recording.num_samples() - 1;
    let first = ((start - min) * sr - EDGE_EPS).ceil().max(0.0) as usize;
    let last = (((end - min) * sr + EDGE_EPS).floor() as usize).min(last_index);
    if first > last {
        return Err(StackError::InvalidWindow {
            start,
            end,
            reason: "window contains no samples",
        });
    }
    Ok(Trimmed {
        data: recording.data().slice(s![.., first..=last]).to_owned(),
        labels: recording.labels().to_vec(),
        sample_rate: sr,
        start,
        end,
        first_sample: first,
    })
}
#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    fn ramp(channels: usize, samples: usize, sample_rate: f64) -> Recording {
        let data = Array2::from_shape_fn((channels, samples), |(c, t)| (c * 1000 + t) as f64);
        let labels = (0..channels).map(|c| format!("E{c}")).collect();
        Recording::new(data, sample_rate, labels).unwrap()
    }
    #[test]
    fn missing_window_keeps_everything() {
        let rec = ramp(2, 100, 50.0);
        let trimmed = trim(&rec, None).unwrap();
        assert_eq!(trimmed.num_samples(), 100);
        assert_eq!((trimmed.start, trimmed.end), (0.0, 2.0));
    }
    #[test]
    fn window_past_the_end_is_out_of_range() {
        let rec = ramp(2, 100, 50.0);
        let err = trim(&rec, Some([0.5, 2.5])).unwrap_err();
        assert!(matches!(err, StackError::WindowOutOfRange { .. }));
    }
    #[test]
    fn window_before_the_start_is_out_of_range() {
        let rec = ramp(1, 100, 50.0).with_start(1.0);
        let err = trim(&rec, Some([0.5, 1.5])).unwrap_err();
        assert!(matches!(err, StackError::WindowOutOfRange { .. }));
    }
    #[test]
    fn inverted_window_is_invalid() {
        let rec = ramp(1, 100, 50.0);
        let err = trim(&rec, Some([1.5, 0.5])).unwrap_err();
        assert!(matches!(err, StackError::InvalidWindow { .. }));
    }
    #[test]
    fn sub_window_selects_inclusive_samples() {
        let rec = ramp(2, 1000, 100.0);
        let trimmed = trim(&rec, Some([1.0, 2.5])).unwrap();
        assert_eq!(trimmed.first_sample, 100);
        assert_eq!(trimmed.num_samples(), 151);
        assert_eq!(trimmed.data[[0, 0]], 100.0);
        assert_eq!(trimmed.data[[1, 150]], 1250.0);
        assert_eq!(trimmed.labels, ["E0", "E1"]);
    }
    #[test]
    fn window_reaching_the_end_is_clamped_to_last_sample() {
        let rec = ramp(1, 100, 50.0);
        let trimmed = trim(&rec, Some([1.0, 2.0])).unwrap();
        assert_eq!(trimmed.first_sample, 50);
        assert_eq!(trimmed.num_samples(), 50);
    }
    #[test]
    fn sample_count_tracks_window_length() {
        use rand::{rngs::StdRng, Rng, SeedableRng};
        let mut rng = StdRng::seed_from_u64(7);
        let rec = ramp(1, 5000, 256.0);
        for _ in 0..200 {
            let a = rng.gen_range(0.0..rec.end());
            let b = rng.gen_range(a..=rec.end());
            let Ok(trimmed) = trim(&rec, Some([a, b])) else {
                // only sub-sample windows between two sample times may fail
                assert!((b - a) * 256.0 < 1.0);
                continue;
            };
            let expected = ((b - a) * 256.0).round() as i64;
            let got = trimmed.num_samples() as i64;
            assert!((got - expected).abs() <= 1, "{a}..{b}: {got} vs {expected}");
        }
    }
    #[test]
    fn window_between_samples_is_invalid() {
        let rec = ramp(1, 10, 1.0);
        let err = trim(&rec, Some([2.2, 2.4])).unwrap_err();
        assert!(matches!(err, StackError::InvalidWindow { .. }));
    }
}
