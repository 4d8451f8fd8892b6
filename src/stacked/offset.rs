use ndarray::{Array2, Axis};
use crate::stacked::StackError;
/// Auto scale-bar lengths snap up to multiples of this (µV).
pub const BAR_ROUNDING: f64 = 50.0;
/// Vertical spacing shared by all traces of one plot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Offsets {
    /// Signed distance between neighbouring channel baselines; negative so the
    /// first channel ends up on top.
    pub step: f64,
    pub bar_length: f64,
}
/// Peak-to-peak range of every channel (row). NaN samples are skipped; an
/// infinite sample (or a channel with no finite sample) gives a non-finite
/// range.
pub fn peak_to_peak(data: &Array2<f64>) -> Vec<f64> {
    data.axis_iter(Axis(0))
        .map(|row| {
            let (lo, hi) = row
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                });
            hi - lo
        })
        .collect()
}
/// Derive the channel step and the scale-bar length.
///
/// A fixed `scale` sets the step directly and also becomes the bar length.
/// Without one, the step follows the mean peak-to-peak range and the bar is
/// that range rounded up to [`BAR_ROUNDING`]. An explicit `scale_bar` always
/// wins for the bar. Non-finite ranges are rejected.
pub fn compute(
    data: &Array2<f64>,
    scale: Option<f64>,
    scale_bar: Option<f64>,
) -> Result<Offsets, StackError> {
    let (step, default_bar) = match scale {
        Some(scale) => (-scale, scale),
        None => {
            let ranges = peak_to_peak(data);
            let mean = if ranges.is_empty() {
                0.0
            } else {
                ranges.iter().sum::<f64>() / ranges.len() as f64
            };
            if !mean.is_finite() {
                return Err(StackError::InvalidInput(
                    "channel ranges are not finite (infinite or all-NaN samples)".into(),
                ));
            }
            (-mean, round_bar(mean))
        }
    };
    let bar_length = scale_bar.unwrap_or(default_bar);
    if !step.is_finite() || !bar_length.is_finite() {
        return Err(StackError::InvalidInput(format!(
            "channel step {step} and scale bar {bar_length} must be finite"
        )));
    }
    log::debug!("channel step {step}, scale bar {bar_length}");
    Ok(Offsets { step, bar_length })
}
pub fn round_bar(range: f64) -> f64 {
    BAR_ROUNDING * (range / BAR_ROUNDING).ceil()
}
/// Shift channel `k` (1-based) by `step * k`, then every channel by
/// `-step * n`, leaving the last channel at its original level.
pub fn apply(data: &mut Array2<f64>, step: f64) {
    let n = data.nrows() as f64;
    for (idx, mut row) in data.axis_iter_mut(Axis(0)).enumerate() {
        let k = (idx + 1) as f64;
        row.mapv_inplace(|v| v + step * k);
    }
    data.mapv_inplace(|v| v - step * n);
}
/// Baseline of channel `idx` (0-based) after [`apply`].
pub fn baseline(step: f64, idx: usize, n: usize) -> f64 {
    step * (idx + 1) as f64 - step * n as f64
}
/// Baselines ordered bottom to top, i.e. last channel first.
pub fn tick_positions(step: f64, n: usize) -> Vec<f64> {
    (0..n).rev().map(|idx| baseline(step, idx, n)).collect()
}
#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    #[test]
    fn auto_step_uses_mean_range() {
        let data = array![[0.0, 1.0, 0.0, -1.0], [0.0, 2.0, 0.0, -2.0]];
        assert_eq!(peak_to_peak(&data), vec![2.0, 4.0]);
        let offsets = compute(&data, None, None).unwrap();
        assert_eq!(offsets.step, -3.0);
        assert_eq!(offsets.bar_length, 50.0);
    }
    #[test]
    fn fixed_scale_sets_step_and_bar() {
        let data = array![[0.0, 120.0], [0.0, 7.0]];
        let offsets = compute(&data, Some(37.5), None).unwrap();
        assert_eq!(offsets.step, -37.5);
        assert_eq!(offsets.bar_length, 37.5);
    }
    #[test]
    fn explicit_bar_overrides_everything() {
        let data = array![[0.0, 120.0]];
        assert_eq!(compute(&data, Some(20.0), Some(100.0)).unwrap().bar_length, 100.0);
        assert_eq!(compute(&data, None, Some(10.0)).unwrap().bar_length, 10.0);
    }
    #[test]
    fn auto_bar_rounds_up_to_fifty() {
        assert_eq!(round_bar(1.0), 50.0);
        assert_eq!(round_bar(50.0), 50.0);
        assert_eq!(round_bar(50.1), 100.0);
        assert_eq!(round_bar(0.0), 0.0);
        let data = array![[-40.0, 40.0], [-30.0, 90.0]];
        assert_eq!(compute(&data, None, None).unwrap().bar_length, 100.0);
    }
    #[test]
    fn infinite_samples_are_rejected() {
        let data = array![[0.0, f64::INFINITY, 1.0], [0.0, 2.0, -2.0]];
        assert!(peak_to_peak(&data)[0].is_infinite());
        let err = compute(&data, None, None).unwrap_err();
        assert!(matches!(err, StackError::InvalidInput(_)));
        let data = array![[f64::NEG_INFINITY, f64::NEG_INFINITY]];
        assert!(compute(&data, None, None).is_err());
        assert!(compute(&array![[0.0, 1.0]], Some(f64::INFINITY), None).is_err());
        assert!(compute(&array![[0.0, 1.0]], None, Some(f64::NAN)).is_err());
    }
    #[test]
    fn nan_samples_are_skipped() {
        let data = array![[0.0, f64::NAN, 4.0]];
        assert_eq!(peak_to_peak(&data), vec![4.0]);
        assert_eq!(compute(&data, None, None).unwrap().step, -4.0);
    }
    #[test]
    fn offsets_stack_first_channel_on_top() {
        let mut data = array![[0.0, 1.0, 0.0, -1.0], [0.0, 2.0, 0.0, -2.0]];
        apply(&mut data, -3.0);
        assert_eq!(data, array![[3.0, 4.0, 3.0, 2.0], [0.0, 2.0, 0.0, -2.0]]);
    }
    #[test]
    fn first_channel_shift_is_step_minus_step_times_n() {
        let n = 5;
        let original = Array2::from_shape_fn((n, 3), |(c, t)| (c as f64) * 0.5 - t as f64);
        let mut shifted = original.clone();
        let step = -12.25;
        apply(&mut shifted, step);
        let delta = shifted[[0, 0]] - original[[0, 0]];
        assert!((delta - (step - step * n as f64)).abs() < 1e-12);
        assert_eq!(shifted.row(n - 1), original.row(n - 1));
    }
    #[test]
    fn ticks_are_evenly_spaced_and_one_per_channel() {
        for n in 1..9 {
            let ticks = tick_positions(-7.0, n);
            assert_eq!(ticks.len(), n);
            assert_eq!(ticks[0], 0.0);
            for pair in ticks.windows(2) {
                assert!((pair[1] - pair[0] - 7.0).abs() < 1e-12);
            }
            assert_eq!(*ticks.last().unwrap(), baseline(-7.0, 0, n));
        }
    }
}
