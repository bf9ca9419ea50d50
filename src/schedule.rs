//! Pipe schedule parsing.
//!
//! The schedule is CSV-like text: one header line (ignored), then rows of
//! `gapCenter,gapHeight,appearSecs`.  The first two columns are fractions of
//! the playfield height (0 = top, 1 = bottom) and are scaled to pixels here.
//!
//! Ids follow row order.  The result is sorted by appearance time so the
//! tick engine can rely on pending templates being in order.

use log::info;

use crate::config::GameConfig;
use crate::entities::ObstacleTemplate;
use crate::error::ScheduleError;

const COLUMNS: usize = 3;

fn parse_field(line: usize, column: usize, raw: &str) -> Result<f64, ScheduleError> {
    let value: f64 = raw.trim().parse().map_err(|_| ScheduleError::InvalidNumber {
        line,
        column,
        value: raw.trim().to_string(),
    })?;
    if !value.is_finite() {
        return Err(ScheduleError::InvalidNumber {
            line,
            column,
            value: raw.trim().to_string(),
        });
    }
    Ok(value)
}

fn parse_row(line: usize, row: &str) -> Result<(f64, f64, f64), ScheduleError> {
    let fields: Vec<&str> = row.split(',').collect();
    if fields.len() != COLUMNS {
        return Err(ScheduleError::WrongColumnCount {
            line,
            found: fields.len(),
        });
    }

    let center = parse_field(line, 1, fields[0])?;
    let height = parse_field(line, 2, fields[1])?;
    let secs = parse_field(line, 3, fields[2])?;

    for (column, value) in [(1, center), (2, height)] {
        if !(0.0..=1.0).contains(&value) {
            return Err(ScheduleError::OutOfRange { line, column, value });
        }
    }
    if secs < 0.0 {
        return Err(ScheduleError::OutOfRange {
            line,
            column: 3,
            value: secs,
        });
    }
    Ok((center, height, secs))
}

/// Parse a whole schedule.  Any bad row fails the whole parse.
pub fn parse_schedule(
    text: &str,
    config: &GameConfig,
) -> Result<Vec<ObstacleTemplate>, ScheduleError> {
    let mut lines = text.lines().enumerate();
    if lines.next().is_none() {
        return Err(ScheduleError::MissingHeader);
    }

    let mut templates = Vec::new();
    for (idx, row) in lines {
        if row.trim().is_empty() {
            continue;
        }
        let (center, height, secs) = parse_row(idx + 1, row)?;
        templates.push(ObstacleTemplate {
            id: templates.len(),
            gap_center: center * config.playfield_height,
            gap_height: height * config.playfield_height,
            appear_at_secs: secs,
        });
    }

    // Stable: rows sharing a time keep their file order.
    templates.sort_by(|a, b| a.appear_at_secs.total_cmp(&b.appear_at_secs));

    info!("Parsed schedule with {} pipes", templates.len());
    Ok(templates)
}
