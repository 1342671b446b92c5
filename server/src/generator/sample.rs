use anyhow::Context;
use detectcore::DetectionRecord;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use std::fs::{self, File};
use std::path::Path;

/// Settings for synthesizing a demo detection log.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub rows: usize,
    pub seed: u64,
    pub objects: Vec<String>,
    pub max_count: u64,
    /// Seconds between consecutive timestamps.
    pub interval_secs: u64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            rows: 40,
            seed: 0,
            objects: ["person", "car", "bicycle", "dog", "cat"]
                .iter()
                .map(|name| name.to_string())
                .collect(),
            max_count: 8,
            interval_secs: 2,
        }
    }
}

fn clock_label(offset_secs: u64) -> String {
    let secs = offset_secs % 86_400;
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60
    )
}

/// Deterministic for a given seed.
pub fn generate_records(config: &SampleConfig) -> anyhow::Result<Vec<DetectionRecord>> {
    if config.objects.is_empty() {
        anyhow::bail!("sample generator needs at least one object label");
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let records = (0..config.rows)
        .map(|index| {
            let object = config
                .objects
                .choose(&mut rng)
                .cloned()
                .unwrap_or_default();
            let count = rng.gen_range(1..=config.max_count.max(1));
            let timestamp = clock_label(index as u64 * config.interval_secs);
            DetectionRecord::new(timestamp, object, count)
        })
        .collect();
    Ok(records)
}

/// Writes a headed detection log, replacing any existing file.
pub fn write_csv(path: &Path, records: &[DetectionRecord]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);
    for record in records {
        writer
            .serialize(record)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}
