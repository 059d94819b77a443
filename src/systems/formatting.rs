use std::time::Duration;

use num_width::NumberWidth;
use smallvec::SmallVec;
use strum::EnumCount;

use crate::systems::profiling::StageId;

/// A duration split for display: whole part, three-digit fraction, and unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Reading {
    whole: u64,
    fraction: u32,
    unit: &'static str,
}

impl From<Duration> for Reading {
    fn from(duration: Duration) -> Self {
        let (whole, fraction, unit) = if duration >= Duration::from_secs(1) {
            (duration.as_secs(), duration.subsec_millis(), "s")
        } else if duration >= Duration::from_millis(1) {
            (duration.as_millis() as u64, (duration.as_micros() % 1000) as u32, "ms")
        } else if duration >= Duration::from_micros(1) {
            (duration.as_micros() as u64, (duration.as_nanos() % 1000) as u32, "µs")
        } else {
            (duration.as_nanos() as u64, 0, "ns")
        };
        Self { whole, fraction, unit }
    }
}

struct Row {
    name: String,
    mean: Reading,
    deviation: Reading,
}

/// Column widths shared by every row.
#[derive(Clone, Copy)]
struct Widths {
    name: usize,
    mean_whole: usize,
    deviation_whole: usize,
}

impl Widths {
    fn fit(rows: &[Row]) -> Self {
        rows.iter().fold(
            Widths {
                name: 0,
                mean_whole: 0,
                deviation_whole: 0,
            },
            |w, row| Widths {
                name: w.name.max(row.name.len()),
                mean_whole: w.mean_whole.max(row.mean.whole.width() as usize),
                deviation_whole: w.deviation_whole.max(row.deviation.whole.width() as usize),
            },
        )
    }
}

/// Lays out `(name, mean, standard deviation)` rows so that names and decimal points line up.
pub fn format_timing_display(
    timing_data: impl IntoIterator<Item = (String, Duration, Duration)>,
) -> SmallVec<[String; StageId::COUNT]> {
    let rows: SmallVec<[Row; StageId::COUNT]> = timing_data
        .into_iter()
        .map(|(name, mean, deviation)| Row {
            name,
            mean: mean.into(),
            deviation: deviation.into(),
        })
        .collect();
    if rows.is_empty() {
        return SmallVec::new();
    }

    let w = Widths::fit(&rows);
    rows.iter()
        .map(|row| {
            format!(
                "{name:<nw$} : {mw:>mww$}.{mf:03}{mu} ± {dw:>dww$}.{df:03}{du}",
                name = row.name,
                mw = row.mean.whole,
                mf = row.mean.fraction,
                mu = row.mean.unit,
                dw = row.deviation.whole,
                df = row.deviation.fraction,
                du = row.deviation.unit,
                nw = w.name,
                mww = w.mean_whole,
                dww = w.deviation_whole,
            )
        })
        .collect()
}
