//! Run records
//!
//! One JSON object per line, appended after every finished run so that
//! repeated runs accumulate in a single log for later analysis.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{non_finite, EvolutionResult};
use crate::error::{GenomeError, PersistenceError};
use crate::genome::control_sequence::ControlSequence;

/// Outcome of a single optimization run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Cost of the best genome; `null` when infeasible
    #[serde(with = "non_finite")]
    pub best_fitness: f64,
    /// Wall-clock seconds
    pub run_time: f64,
    pub best_individual_length: usize,
    /// `[left, right]` wheel speeds per step
    pub best_individual: Vec<(f64, f64)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl RunRecord {
    pub fn from_result(result: &EvolutionResult<ControlSequence>) -> Self {
        Self {
            best_fitness: result.best_fitness,
            run_time: result.stats.total_runtime_ms / 1000.0,
            best_individual_length: result.best_genome.len(),
            best_individual: result.best_genome.to_pairs(),
            seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Rebuild the recorded control sequence
    pub fn genome(&self) -> Result<ControlSequence, GenomeError> {
        ControlSequence::from_pairs(&self.best_individual)
    }

    /// Write this record as one JSON line
    pub fn write_line<W: Write>(&self, writer: &mut W) -> Result<(), PersistenceError> {
        serde_json::to_writer(&mut *writer, self)
            .map_err(|e| PersistenceError::Serialization(e.to_string()))?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Append a record to the log at `path`, creating it if needed
pub fn append_record(path: impl AsRef<Path>, record: &RunRecord) -> Result<(), PersistenceError> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    record.write_line(&mut file)?;
    file.flush()?;
    Ok(())
}

/// Read every record from the log at `path`. Blank lines are skipped.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<RunRecord>, PersistenceError> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|e| PersistenceError::Deserialization {
            line: idx + 1,
            message: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::traits::INFEASIBLE;

    fn record(fitness: f64) -> RunRecord {
        RunRecord {
            best_fitness: fitness,
            run_time: 1.5,
            best_individual_length: 2,
            best_individual: vec![(0.5, 0.5), (0.25, 1.0)],
            seed: None,
        }
    }

    #[test]
    fn test_line_format() {
        let mut buf = Vec::new();
        record(12.5).write_line(&mut buf).unwrap();
        let line = String::from_utf8(buf).unwrap();
        assert_eq!(
            line,
            "{\"best_fitness\":12.5,\"run_time\":1.5,\"best_individual_length\":2,\
             \"best_individual\":[[0.5,0.5],[0.25,1.0]]}\n"
        );
    }

    #[test]
    fn test_infeasible_written_as_null() {
        let mut buf = Vec::new();
        record(INFEASIBLE).write_line(&mut buf).unwrap();
        let line = String::from_utf8(buf).unwrap();
        assert!(line.starts_with("{\"best_fitness\":null,"));

        let back: RunRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(back.best_fitness, INFEASIBLE);
    }

    #[test]
    fn test_append_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.jsonl");

        append_record(&path, &record(10.0)).unwrap();
        append_record(&path, &record(INFEASIBLE).with_seed(43)).unwrap();

        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], record(10.0));
        assert_eq!(records[1].best_fitness, INFEASIBLE);
        assert_eq!(records[1].seed, Some(43));
    }

    #[test]
    fn test_read_reports_bad_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.jsonl");
        append_record(&path, &record(1.0)).unwrap();
        std::fs::OpenOptions::new()
            .append(true)
            .open(&path)
            .unwrap()
            .write_all(b"\nnot json\n")
            .unwrap();

        match read_records(&path).unwrap_err() {
            PersistenceError::Deserialization { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_genome_roundtrip() {
        let genome = record(1.0).genome().unwrap();
        assert_eq!(genome.len(), 2);
        assert_eq!(genome[1].right, 1.0);

        let mut bad = record(1.0);
        bad.best_individual.push((2.0, 0.0));
        assert!(bad.genome().is_err());
    }
}
