use crate::config::ReportErrors;

/// Reads a number of hours. Both `.` and `,` are accepted as decimal separator.
/// Anything that is not a finite number is treated as missing.
pub fn validate_hours(s: &str) -> Option<f64> {
    s.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|x| x.is_finite())
}

/// Reads a grade on the 1-10 scale.
///
/// - numbers larger than 100 are discarded
/// - numbers between 10 and 100 are taken as written without the decimal point
///   and divided by 10
/// - numbers lower than 4 are discarded
pub fn validate_grades(s: &str) -> Option<f64> {
    let x = s.trim().parse::<f64>().ok().filter(|x| x.is_finite())?;
    if x > 100.0 {
        None
    } else if x > 10.0 {
        Some(x / 10.0)
    } else if x < 4.0 {
        None
    } else {
        Some(x)
    }
}

/// Rounds half to even (8.5 -> 8, 7.5 -> 8).
pub fn round_half_even(x: f64) -> f64 {
    x.round_ties_even()
}

pub fn round_to(x: f64, decimals: i32) -> f64 {
    let f = 10f64.powi(decimals);
    round_half_even(x * f) / f
}

/// Half-open intervals `[breaks[i], breaks[i+1])`, each with a label.
#[derive(PartialEq, Debug, Clone)]
pub struct Bins {
    breaks: Vec<f64>,
    labels: Vec<String>,
}

impl Bins {
    pub fn new(breaks: Vec<f64>, labels: Vec<String>) -> Result<Bins, ReportErrors> {
        if breaks.len() < 2 || breaks.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ReportErrors::InvalidBreaks(breaks));
        }
        if labels.len() != breaks.len() - 1 {
            return Err(ReportErrors::LabelCountMismatch {
                breaks: breaks.len(),
                labels: labels.len(),
            });
        }
        Ok(Bins { breaks, labels })
    }

    /// Custom breaks labelled `[a-b)`.
    pub fn with_interval_labels(breaks: Vec<f64>) -> Result<Bins, ReportErrors> {
        let labels = breaks
            .windows(2)
            .map(|w| format!("[{}-{})", w[0], w[1]))
            .collect();
        Bins::new(breaks, labels)
    }

    /// Bins of width `step` from `start` up to `stop`, labelled by their lower bound.
    pub fn fixed_width(start: f64, stop: f64, step: f64) -> Result<Bins, ReportErrors> {
        if step <= 0.0 || stop <= start {
            return Err(ReportErrors::InvalidBreaks(vec![start, stop]));
        }
        let n = ((stop - start) / step).ceil() as usize;
        let breaks: Vec<f64> = (0..=n)
            .map(|i| (start + step * i as f64).min(stop))
            .collect();
        let labels = breaks[..n].iter().map(|b| format!("{}", b)).collect();
        Bins::new(breaks, labels)
    }

    pub fn breaks(&self) -> &[f64] {
        &self.breaks
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// The index of the bin containing the value, or `None` outside of the range.
    pub fn bin_index(&self, x: f64) -> Option<usize> {
        if !x.is_finite() {
            return None;
        }
        self.breaks
            .windows(2)
            .position(|w| w[0] <= x && x < w[1])
    }

    pub fn label_of(&self, x: f64) -> Option<&str> {
        self.bin_index(x).map(|i| self.labels[i].as_str())
    }
}

/// Descriptive statistics of a set of numbers.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

pub fn summarize(values: &[f64]) -> Option<Summary> {
    if values.is_empty() {
        return None;
    }
    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    Some(Summary {
        count,
        mean,
        min,
        max,
    })
}
