use serde::{Deserialize, Serialize};

use cellarscope_model::{ScanRecord, ScanType};

use super::classify::{ScanOutcome, classify};
use crate::numbers::rounded_percent;

/// Outcome counts for a group of scans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub total: usize,
    pub successful: usize,
    pub errors: usize,
    pub pending: usize,
}

impl OutcomeCounts {
    fn record(&mut self, outcome: ScanOutcome) {
        self.total += 1;
        match outcome {
            ScanOutcome::Success => self.successful += 1,
            ScanOutcome::Error => self.errors += 1,
            ScanOutcome::Pending => self.pending += 1,
        }
    }

    pub fn success_rate(&self) -> u32 {
        rounded_percent(self.successful, self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeBreakdown {
    #[serde(rename = "type")]
    pub scan_type: ScanType,
    #[serde(flatten)]
    pub counts: OutcomeCounts,
}

/// Headline numbers for the dashboard header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub total: usize,
    pub successful: usize,
    pub errors: usize,
    pub pending: usize,
    /// Whole percent of successful scans, 0 when there are none.
    pub success_rate: u32,
    /// Known types first in their canonical order, then unknown types by name.
    pub by_type: Vec<TypeBreakdown>,
}

impl ScanStats {
    pub fn compute<'a, I>(scans: I) -> Self
    where
        I: IntoIterator<Item = &'a ScanRecord>,
    {
        let mut overall = OutcomeCounts::default();
        let mut per_type: Vec<TypeBreakdown> = Vec::new();

        for scan in scans {
            let outcome = classify(scan);
            overall.record(outcome);

            match per_type
                .iter_mut()
                .find(|entry| entry.scan_type == scan.scan_type)
            {
                Some(entry) => entry.counts.record(outcome),
                None => {
                    let mut counts = OutcomeCounts::default();
                    counts.record(outcome);
                    per_type.push(TypeBreakdown {
                        scan_type: scan.scan_type.clone(),
                        counts,
                    });
                }
            }
        }

        per_type.sort_by(|a, b| type_rank(&a.scan_type).cmp(&type_rank(&b.scan_type)));

        ScanStats {
            total: overall.total,
            successful: overall.successful,
            errors: overall.errors,
            pending: overall.pending,
            success_rate: overall.success_rate(),
            by_type: per_type,
        }
    }
}

fn type_rank(scan_type: &ScanType) -> (usize, &str) {
    let known = ScanType::known();
    let position = known
        .iter()
        .position(|candidate| candidate == scan_type)
        .unwrap_or(known.len());
    (position, scan_type.as_str())
}
