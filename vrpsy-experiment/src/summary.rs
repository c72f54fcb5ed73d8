use std::fmt;

use vrpsy_core::{CellValue, ResultsTable};

/// Per-table digest logged when a session ends.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSummary {
    pub name: String,
    pub trials: usize,
    /// Share of rows with `TrialSucceeded == true`, for tables that score success.
    pub success_rate: Option<f64>,
    pub mean_reaction_time: Option<f64>,
    pub min_reaction_time: Option<f64>,
    pub max_reaction_time: Option<f64>,
}

impl TableSummary {
    pub fn of(table: &ResultsTable) -> Self {
        let scored = table.columns().iter().any(|c| c == "TrialSucceeded");
        let success_rate = (scored && !table.is_empty()).then(|| {
            let hits = table
                .column_values("TrialSucceeded")
                .filter(|v| v.as_bool() == Some(true))
                .count();
            hits as f64 / table.len() as f64
        });

        let times: Vec<f64> = table
            .column_values("ReactionTime")
            .filter_map(CellValue::as_f64)
            .collect();
        let (mean, min, max) = if times.is_empty() {
            (None, None, None)
        } else {
            (
                Some(times.iter().sum::<f64>() / times.len() as f64),
                Some(times.iter().copied().fold(f64::INFINITY, f64::min)),
                Some(times.iter().copied().fold(f64::NEG_INFINITY, f64::max)),
            )
        };

        Self {
            name: table.name().to_string(),
            trials: table.len(),
            success_rate,
            mean_reaction_time: mean,
            min_reaction_time: min,
            max_reaction_time: max,
        }
    }
}

impl fmt::Display for TableSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} trials", self.name, self.trials)?;
        if let Some(rate) = self.success_rate {
            write!(f, ", success rate {:.1}%", rate * 100.0)?;
        }
        if let (Some(mean), Some(min), Some(max)) = (
            self.mean_reaction_time,
            self.min_reaction_time,
            self.max_reaction_time,
        ) {
            write!(
                f,
                ", reaction times: mean {:.3} ms, min {:.3} ms, max {:.3} ms",
                mean * 1e3,
                min * 1e3,
                max * 1e3
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vrpsy_core::ResultRow;

    #[test]
    fn scores_success_and_reaction_times() {
        let mut t = ResultsTable::new("Appearance", ["TrialSucceeded", "ReactionTime"]);
        for (ok, rt) in [(true, Some(0.2)), (false, None), (true, Some(0.4)), (false, None)] {
            t.add_complete_row(
                ResultRow::new()
                    .with("TrialSucceeded", ok)
                    .with("ReactionTime", rt),
            )
            .unwrap();
        }
        let s = TableSummary::of(&t);
        assert_eq!(s.trials, 4);
        assert_eq!(s.success_rate, Some(0.5));
        assert!((s.mean_reaction_time.unwrap() - 0.3).abs() < 1e-12);
        assert_eq!(s.min_reaction_time, Some(0.2));
        assert_eq!(s.max_reaction_time, Some(0.4));
        assert!(s.to_string().contains("success rate 50.0%"));
    }

    #[test]
    fn unscored_table_only_counts() {
        let mut t = ResultsTable::new("Dummy", ["ClickCount"]);
        t.add_complete_row(ResultRow::new().with("ClickCount", 1i64))
            .unwrap();
        let s = TableSummary::of(&t);
        assert_eq!(s.success_rate, None);
        assert_eq!(s.mean_reaction_time, None);
        assert_eq!(s.to_string(), "Dummy: 1 trials");
    }
}
