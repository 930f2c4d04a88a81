use serde::Serialize;

/// Standardized word length used by every speed figure.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Point-in-time view of a session's scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StatsSnapshot {
    pub wpm: u32,
    pub raw_speed: u32,
    pub accuracy: u32,
    pub consistency: u32,
    pub elapsed: u64,
    pub time_left: u64,
    pub typed_chars: usize,
    pub correct_chars: usize,
}

fn per_minute(chars: usize, elapsed_secs: u64) -> u32 {
    if elapsed_secs == 0 {
        return 0;
    }
    let minutes = elapsed_secs as f64 / 60.0;
    ((chars as f64 / CHARS_PER_WORD) / minutes).round() as u32
}

/// Words per minute from correctly typed characters.
pub fn wpm(correct_chars: usize, elapsed_secs: u64) -> u32 {
    per_minute(correct_chars, elapsed_secs)
}

/// Same as [`wpm`] but over every typed character, right or wrong.
pub fn raw_speed(typed_chars: usize, elapsed_secs: u64) -> u32 {
    per_minute(typed_chars, elapsed_secs)
}

/// Percentage of typed characters that were correct; 100 before anything is typed.
pub fn accuracy(correct_chars: usize, typed_chars: usize) -> u32 {
    if typed_chars == 0 {
        return 100;
    }
    ((correct_chars as f64 / typed_chars as f64) * 100.0).round() as u32
}

/// Rounded population standard deviation of the speed samples.
pub fn consistency(samples: &[f64]) -> u32 {
    std_dev(samples).map_or(0, |sd| sd.round() as u32)
}

pub fn mean(data: &[f64]) -> Option<f64> {
    match data.len() {
        0 => None,
        count => Some(data.iter().sum::<f64>() / count as f64),
    }
}

pub fn std_dev(data: &[f64]) -> Option<f64> {
    let data_mean = mean(data)?;
    let variance = data
        .iter()
        .map(|value| {
            let diff = data_mean - *value;
            diff * diff
        })
        .sum::<f64>()
        / data.len() as f64;

    Some(variance.sqrt())
}
