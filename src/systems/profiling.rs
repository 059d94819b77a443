use std::time::{Duration, Instant};

use circular_buffer::CircularBuffer;
use micromap::Map;
use parking_lot::Mutex;
use smallvec::SmallVec;
use strum::{EnumCount, IntoEnumIterator};
use thousands::Separable;

/// Number of frames each stage's rolling statistics cover.
const TIMING_WINDOW_SIZE: usize = 30;

/// The phases of one frame that get timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::EnumCount, strum_macros::EnumIter, strum_macros::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum StageId {
    /// The whole frame.
    Total,
    /// Tick gates, deferred timers and key bindings.
    Services,
    /// The installed update function.
    Update,
    /// Level transitions applied between frames.
    Lifecycle,
    Draw,
}

type Window = CircularBuffer<TIMING_WINDOW_SIZE, Duration>;

/// Rolling per-stage frame timings.
#[derive(Debug)]
pub struct StageTimings {
    timings: Mutex<Map<StageId, Window, { StageId::COUNT }>>,
}

impl Default for StageTimings {
    fn default() -> Self {
        let mut timings = Map::new();
        for id in StageId::iter() {
            timings.insert(id, Window::new());
        }
        Self {
            timings: Mutex::new(timings),
        }
    }
}

impl StageTimings {
    pub fn add_timing(&self, id: StageId, duration: Duration) {
        let mut timings = self.timings.lock();
        if let Some(window) = timings.get_mut(&id) {
            window.push_back(duration);
        }
    }

    /// Runs `f` and records how long it took under `id`.
    pub fn measure<R>(&self, id: StageId, f: impl FnOnce() -> R) -> R {
        let start = Instant::now();
        let result = f();
        self.add_timing(id, start.elapsed());
        result
    }

    /// Mean and standard deviation per stage. Stages without samples report zero.
    pub fn get_stats(&self) -> Map<StageId, (Duration, Duration), { StageId::COUNT }> {
        let timings = self.timings.lock();
        let mut stats = Map::new();

        for (id, window) in timings.iter() {
            stats.insert(*id, mean_and_deviation(window.iter()));
        }

        stats
    }

    /// The `n` stages with the highest mean, slowest first. The total is excluded.
    pub fn get_slowest_stages(&self, n: usize) -> SmallVec<[(StageId, Duration); StageId::COUNT]> {
        let stats = self.get_stats();
        let mut stages: SmallVec<[(StageId, Duration); StageId::COUNT]> = stats
            .iter()
            .filter(|(id, _)| **id != StageId::Total)
            .map(|(id, (mean, _))| (*id, *mean))
            .collect();
        stages.sort_by(|a, b| b.1.cmp(&a.1));
        stages.truncate(n);
        stages
    }

    /// Aligned lines for the debug overlay: the frame rate implied by the total, then the three
    /// slowest stages.
    pub fn format_timing_display(&self) -> SmallVec<[String; StageId::COUNT]> {
        let stats = self.get_stats();
        let (total_mean, total_deviation) = stats.get(&StageId::Total).copied().unwrap_or_default();

        let fps = match total_mean.as_secs_f64() {
            secs if secs <= 0.0 => "-- FPS".to_string(),
            secs => match 1.0 / secs {
                f if f > 1000.0 => format!("{} FPS", (f as u64).separate_with_commas()),
                f if f < 10.0 => format!("{f:.1} FPS"),
                f => format!("{f:.0} FPS"),
            },
        };

        let mut rows = vec![(fps, total_mean, total_deviation)];
        for (id, _) in self.get_slowest_stages(3) {
            let (mean, deviation) = stats.get(&id).copied().unwrap_or_default();
            let name: &'static str = id.into();
            rows.push((name.to_string(), mean, deviation));
        }

        crate::systems::formatting::format_timing_display(rows)
    }
}

fn mean_and_deviation<'a>(samples: impl Iterator<Item = &'a Duration>) -> (Duration, Duration) {
    let millis: SmallVec<[f64; TIMING_WINDOW_SIZE]> = samples.map(|d| d.as_secs_f64() * 1000.0).collect();
    if millis.is_empty() {
        return (Duration::ZERO, Duration::ZERO);
    }

    let count = millis.len() as f64;
    let mean = millis.iter().sum::<f64>() / count;
    let variance = millis.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / count;

    (
        Duration::from_secs_f64(mean / 1000.0),
        Duration::from_secs_f64(variance.sqrt() / 1000.0),
    )
}
