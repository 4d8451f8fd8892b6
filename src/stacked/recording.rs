use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use ndarray::{concatenate, Array2, Axis};
use serde::{Deserialize, Serialize};
use crate::stacked::StackError;
/// Marker attached to a recording, e.g. a movement onset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Seconds from the recording origin (same clock as `Recording::start`).
    pub latency: f64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub code: Option<i64>,
}
/// Multi-channel recording with everything needed to draw it.
#[derive(Clone, Debug)]
pub struct Recording {
    data: Array2<f64>, // channels x samples
    sample_rate: f64,
    labels: Vec<String>,
    start: f64,
    events: Vec<Event>,
}
impl Recording {
    pub fn new(
        data: Array2<f64>,
        sample_rate: f64,
        labels: Vec<String>,
    ) -> Result<Self, StackError> {
        validate_matrix(&data)?;
        validate_sample_rate(sample_rate)?;
        if labels.len() != data.nrows() {
            return Err(StackError::InvalidInput(format!(
                "{} channel labels for {} channels",
                labels.len(),
                data.nrows()
            )));
        }
        Ok(Self {
            data,
            sample_rate,
            labels,
            start: 0.0,
            events: Vec::new(),
        })
    }
    pub fn with_start(mut self, start: f64) -> Self {
        self.start = start;
        self
    }
    pub fn with_events(mut self, events: Vec<Event>) -> Self {
        self.events = events;
        self
    }
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
    pub fn events(&self) -> &[Event] {
        &self.events
    }
    pub fn num_channels(&self) -> usize {
        self.data.nrows()
    }
    pub fn num_samples(&self) -> usize {
        self.data.ncols()
    }
    pub fn start(&self) -> f64 {
        self.start
    }
    pub fn end(&self) -> f64 {
        self.start + self.num_samples() as f64 / self.sample_rate
    }
    /// Append the channels of an auxiliary recording (e.g. ocular references)
    /// and return their row indices so they can be passed on as reference
    /// channels. Both recordings must share sample rate, start and length.
    pub fn append_channels(&mut self, aux: &Recording) -> Result<Vec<usize>, StackError> {
        if aux.sample_rate != self.sample_rate {
            return Err(StackError::InvalidInput(format!(
                "auxiliary channels run at {} Hz, recording at {} Hz",
                aux.sample_rate, self.sample_rate
            )));
        }
        if aux.start != self.start {
            return Err(StackError::InvalidInput(format!(
                "auxiliary channels start at {} s, recording at {} s",
                aux.start, self.start
            )));
        }
        if aux.num_samples() != self.num_samples() {
            return Err(StackError::InvalidInput(format!(
                "auxiliary channels have {} samples, recording has {}",
                aux.num_samples(),
                self.num_samples()
            )));
        }
        let first = self.num_channels();
        self.data = concatenate(Axis(0), &[self.data.view(), aux.data.view()])
            .map_err(|e| StackError::InvalidInput(e.to_string()))?;
        self.labels.extend(aux.labels.iter().cloned());
        Ok((first..self.num_channels()).collect())
    }
    pub fn events_of<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Event> + 'a {
        self.events.iter().filter(move |e| e.kind == kind)
    }
    /// Display window `[latency - before, latency + after]`.
    pub fn window_around(latency: f64, before: f64, after: f64) -> [f64; 2] {
        [latency - before, latency + after]
    }
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, StackError> {
        let file: RecordingFile = serde_json::from_reader(reader)?;
        file.into_recording()
    }
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, StackError> {
        let file = File::open(path)?;
        Self::from_json_reader(BufReader::new(file))
    }
}
/// On-disk JSON form of a recording.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecordingFile {
    pub sample_rate: f64,
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    pub data: Vec<Vec<f64>>, // channels x samples
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub events: Vec<Event>,
}
impl RecordingFile {
    pub fn into_recording(self) -> Result<Recording, StackError> {
        let data = rows_to_array(self.data)?;
        let labels = match self.labels {
            Some(labels) => labels,
            None => numeric_labels(data.nrows()),
        };
        Ok(Recording::new(data, self.sample_rate, labels)?
            .with_start(self.start)
            .with_events(self.events))
    }
}
/// Either shape a caller may hand to the stacked plot.
#[derive(Clone, Debug)]
pub enum SignalInput {
    Recording(Recording),
    Matrix(Array2<f64>),
}
impl From<Recording> for SignalInput {
    fn from(value: Recording) -> Self {
        SignalInput::Recording(value)
    }
}
impl From<Array2<f64>> for SignalInput {
    fn from(value: Array2<f64>) -> Self {
        SignalInput::Matrix(value)
    }
}
/// Bring either input shape into a validated [`Recording`].
pub fn normalize(
    input: SignalInput,
    sample_rate: Option<f64>,
    labels: Option<Vec<String>>,
) -> Result<Recording, StackError> {
    match input {
        SignalInput::Recording(recording) => {
            if labels.is_some() {
                log::warn!("channel labels ignored: the recording carries its own");
            }
            if sample_rate.is_some_and(|sr| sr != recording.sample_rate) {
                log::warn!(
                    "sample rate ignored: the recording runs at {} Hz",
                    recording.sample_rate
                );
            }
            Ok(recording)
        }
        SignalInput::Matrix(data) => {
            let sample_rate = sample_rate.ok_or(StackError::MissingParameter("sample_rate"))?;
            validate_matrix(&data)?;
            let labels = match labels {
                Some(labels) => labels,
                None => {
                    log::info!(
                        "no channel labels given, numbering {} channels from 1",
                        data.nrows()
                    );
                    numeric_labels(data.nrows())
                }
            };
            Recording::new(data, sample_rate, labels)
        }
    }
}
/// `"1"`, `"2"`, ... `"n"`.
pub fn numeric_labels(n: usize) -> Vec<String> {
    (1..=n).map(|i| i.to_string()).collect()
}
fn validate_matrix(data: &Array2<f64>) -> Result<(), StackError> {
    if data.nrows() == 0 || data.ncols() == 0 {
        return Err(StackError::InvalidInput(format!(
            "signal matrix is empty ({} x {})",
            data.nrows(),
            data.ncols()
        )));
    }
    Ok(())
}
fn validate_sample_rate(sample_rate: f64) -> Result<(), StackError> {
    if !sample_rate.is_finite() || sample_rate <= 0.0 {
        return Err(StackError::InvalidInput(format!(
            "sample rate must be a positive number, got {sample_rate}"
        )));
    }
    Ok(())
}
fn rows_to_array(rows: Vec<Vec<f64>>) -> Result<Array2<f64>, StackError> {
    let channels = rows.len();
    let samples = rows.first().map(|r| r.len()).unwrap_or(0);
    if let Some(bad) = rows.iter().position(|r| r.len() != samples) {
        return Err(StackError::InvalidInput(format!(
            "channel {bad} has {} samples, expected {samples}",
            rows[bad].len()
        )));
    }
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((channels, samples), flat)
        .map_err(|e| StackError::InvalidInput(e.to_string()))
}
#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    #[test]
    fn bare_matrix_needs_sample_rate() {
        let err = normalize(array![[0.0, 1.0]].into(), None, None).unwrap_err();
        assert!(matches!(err, StackError::MissingParameter("sample_rate")));
    }
    #[test]
    fn bare_matrix_gets_numbered_labels_and_bounds() {
        let data = Array2::<f64>::zeros((3, 500));
        let rec = normalize(data.into(), Some(250.0), None).unwrap();
        assert_eq!(rec.labels(), ["1", "2", "3"]);
        assert_eq!(rec.start(), 0.0);
        assert!((rec.end() - 2.0).abs() < 1e-12);
    }
    #[test]
    fn empty_matrix_is_rejected() {
        let err = normalize(Array2::<f64>::zeros((2, 0)).into(), Some(100.0), None).unwrap_err();
        assert!(matches!(err, StackError::InvalidInput(_)));
        let err = normalize(Array2::<f64>::zeros((0, 10)).into(), Some(100.0), None).unwrap_err();
        assert!(matches!(err, StackError::InvalidInput(_)));
    }
    #[test]
    fn label_count_must_match_channels() {
        let err = normalize(
            Array2::<f64>::zeros((2, 4)).into(),
            Some(1.0),
            Some(vec!["Fz".into()]),
        )
        .unwrap_err();
        assert!(matches!(err, StackError::InvalidInput(_)));
    }
    #[test]
    fn recording_passes_through_and_ignores_overrides() {
        let rec = Recording::new(Array2::zeros((2, 10)), 10.0, vec!["C3".into(), "C4".into()])
            .unwrap()
            .with_start(5.0);
        let out = normalize(rec.into(), Some(99.0), Some(vec!["x".into(), "y".into()])).unwrap();
        assert_eq!(out.labels(), ["C3", "C4"]);
        assert_eq!(out.sample_rate(), 10.0);
        assert_eq!(out.start(), 5.0);
        assert!((out.end() - 6.0).abs() < 1e-12);
    }
    #[test]
    fn non_positive_sample_rate_is_rejected() {
        let err = normalize(Array2::<f64>::zeros((1, 4)).into(), Some(0.0), None).unwrap_err();
        assert!(matches!(err, StackError::InvalidInput(_)));
    }
    #[test]
    fn auxiliary_channels_are_appended_as_references() {
        let mut rec =
            Recording::new(Array2::zeros((2, 8)), 4.0, vec!["Cz".into(), "Pz".into()]).unwrap();
        let eog =
            Recording::new(Array2::ones((2, 8)), 4.0, vec!["VEOG".into(), "HEOG".into()]).unwrap();
        let refs = rec.append_channels(&eog).unwrap();
        assert_eq!(refs, vec![2, 3]);
        assert_eq!(rec.num_channels(), 4);
        assert_eq!(rec.labels()[3], "HEOG");
        assert_eq!(rec.data()[[2, 0]], 1.0);
        let short = Recording::new(Array2::ones((1, 7)), 4.0, vec!["EMG".into()]).unwrap();
        let err = rec.append_channels(&short).unwrap_err();
        assert!(matches!(err, StackError::InvalidInput(_)));
    }
    #[test]
    fn auxiliary_channels_must_share_rate_and_start() {
        let mut rec = Recording::new(Array2::zeros((1, 8)), 4.0, vec!["Cz".into()]).unwrap();
        let faster = Recording::new(Array2::ones((1, 8)), 16.0, vec!["VEOG".into()]).unwrap();
        let err = rec.append_channels(&faster).unwrap_err();
        assert!(matches!(err, StackError::InvalidInput(msg) if msg.contains("Hz")));
        let later = Recording::new(Array2::ones((1, 8)), 4.0, vec!["VEOG".into()])
            .unwrap()
            .with_start(3.0);
        let err = rec.append_channels(&later).unwrap_err();
        assert!(matches!(err, StackError::InvalidInput(msg) if msg.contains("start")));
        assert_eq!(rec.num_channels(), 1);
        assert_eq!(rec.labels(), ["Cz"]);
    }
    #[test]
    fn json_file_loads_with_events() {
        let json = r#"{
            "sample_rate": 2.0,
            "data": [[0, 1, 2, 3], [4, 5, 6, 7]],
            "events": [
                {"latency": 0.5, "type": "grasp", "code": 3},
                {"latency": 1.0, "type": "reach"},
                {"latency": 1.5, "type": "grasp"}
            ]
        }"#;
        let rec = Recording::from_json_reader(json.as_bytes()).unwrap();
        assert_eq!(rec.num_channels(), 2);
        assert_eq!(rec.labels(), ["1", "2"]);
        assert_eq!(rec.data()[[1, 2]], 6.0);
        let grasps: Vec<f64> = rec.events_of("grasp").map(|e| e.latency).collect();
        assert_eq!(grasps, vec![0.5, 1.5]);
        assert_eq!(rec.events()[0].code, Some(3));
        assert_eq!(Recording::window_around(1.0, 0.25, 0.5), [0.75, 1.5]);
    }
    #[test]
    fn ragged_json_rows_are_rejected() {
        let json = r#"{"sample_rate": 1.0, "data": [[0, 1], [2]]}"#;
        let err = Recording::from_json_reader(json.as_bytes()).unwrap_err();
        assert!(matches!(err, StackError::InvalidInput(_)));
    }
}
