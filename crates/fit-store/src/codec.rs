//! Line-oriented codecs for the month and weight files.
//!
//! One logical record per line, fields separated by `|`, fields trimmed of
//! surrounding whitespace. Month file format:
//!
//! ```text
//! USER | Nary
//! WORKOUT | Leg Day | 45 | 2025-10-22 09:00 | RECOVERY,EASY
//! EXERCISE | Squat | 10,8
//! END_WORKOUT
//! ```
//!
//! The trailing fields of a `WORKOUT` line are optional on decode: a
//! three-field line (the legacy shape) falls back to the first instant of
//! the file's month, and the manual-tag field is written only when the
//! workout carries overrides. Auto tags are never persisted; they are
//! recomputed from the dictionaries on load.
//!
//! Decoding is a two-state line classifier (no group / inside a workout
//! group). Any single malformed line is skipped and reported through the
//! [`DecodeReport`]; decoding never aborts. An `EXERCISE` line outside an
//! open workout group is discarded.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime};

use fit_core::entities::{Exercise, WeightRecord, Workout};
use fit_core::month::MonthKey;

const USER_TAG: &str = "USER";
const WORKOUT_TAG: &str = "WORKOUT";
const EXERCISE_TAG: &str = "EXERCISE";
const END_WORKOUT_TAG: &str = "END_WORKOUT";
const WEIGHT_TAG: &str = "WEIGHT";

const START_FORMAT: &str = "%Y-%m-%d %H:%M";
const DATE_FORMAT: &str = "%d/%m/%y";

/// A line the decoder refused, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line_no: usize,
    pub content: String,
    pub reason: String,
}

/// Diagnostics accumulated across one decode pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeReport {
    pub skipped: Vec<SkippedLine>,
}

impl DecodeReport {
    fn skip(&mut self, line_no: usize, content: &str, reason: impl Into<String>) {
        self.skipped.push(SkippedLine {
            line_no,
            content: content.to_string(),
            reason: reason.into(),
        });
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Result of decoding a month file.
#[derive(Debug)]
pub struct DecodedMonth {
    /// Username from the `USER` header, if one was present and well-formed.
    pub username: Option<String>,
    pub workouts: Vec<Workout>,
    pub report: DecodeReport,
}

/// A `WORKOUT` line whose group is still being read.
struct PendingWorkout {
    line_no: usize,
    name: String,
    duration_min: i64,
    start: NaiveDateTime,
    manual_tags: BTreeSet<String>,
    exercises: Vec<Exercise>,
}

/// Encode a month's collection. The `USER` header is written once, first.
#[must_use]
pub fn encode_month(username: &str, workouts: &[Workout]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{USER_TAG} | {username}\n"));

    for workout in workouts {
        let mut line = format!(
            "{WORKOUT_TAG} | {} | {} | {}",
            workout.name(),
            workout.duration_min(),
            workout.start().format(START_FORMAT)
        );
        if !workout.manual_tags().is_empty() {
            let tags = workout
                .manual_tags()
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(",");
            line.push_str(&format!(" | {tags}"));
        }
        line.push('\n');
        out.push_str(&line);
        for exercise in workout.exercises() {
            let reps = exercise
                .sets()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            out.push_str(&format!("{EXERCISE_TAG} | {} | {reps}\n", exercise.name()));
        }
        out.push_str(END_WORKOUT_TAG);
        out.push('\n');
    }

    out
}

/// Decode a month file, skipping malformed lines.
#[must_use]
pub fn decode_month(input: &str, month: MonthKey, fallback_username: &str) -> DecodedMonth {
    let mut username: Option<String> = None;
    let mut workouts = Vec::new();
    let mut report = DecodeReport::default();
    let mut current: Option<PendingWorkout> = None;

    let finalize = |pending: PendingWorkout,
                    workouts: &mut Vec<Workout>,
                    report: &mut DecodeReport,
                    username: Option<&str>| {
        let owner = username.unwrap_or(fallback_username);
        match Workout::from_record(
            &pending.name,
            pending.duration_min,
            pending.start,
            owner,
            pending.exercises,
        ) {
            Ok(mut workout) => {
                workout.set_manual_tags(pending.manual_tags);
                workouts.push(workout);
            }
            Err(error) => report.skip(pending.line_no, &pending.name, error.to_string()),
        }
    };

    for (index, raw) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('|').map(str::trim).collect();
        match fields[0] {
            USER_TAG => {
                if fields.len() == 2 && !fields[1].is_empty() {
                    username = Some(fields[1].to_string());
                } else {
                    report.skip(line_no, line, "malformed USER header");
                }
            }
            WORKOUT_TAG => {
                // A new group implicitly terminates an unterminated one.
                if let Some(pending) = current.take() {
                    finalize(pending, &mut workouts, &mut report, username.as_deref());
                }
                match parse_workout_line(&fields, line_no, month) {
                    Ok(pending) => current = Some(pending),
                    Err(reason) => report.skip(line_no, line, reason),
                }
            }
            EXERCISE_TAG => match current.as_mut() {
                Some(pending) => match parse_exercise_line(&fields) {
                    Ok(exercise) => pending.exercises.push(exercise),
                    Err(reason) => report.skip(line_no, line, reason),
                },
                None => report.skip(line_no, line, "exercise record outside a workout group"),
            },
            END_WORKOUT_TAG => match current.take() {
                Some(pending) => {
                    finalize(pending, &mut workouts, &mut report, username.as_deref());
                }
                None => report.skip(line_no, line, "end marker without an open workout group"),
            },
            _ => report.skip(line_no, line, "unrecognized record tag"),
        }
    }

    if let Some(pending) = current.take() {
        finalize(pending, &mut workouts, &mut report, username.as_deref());
    }

    DecodedMonth {
        username,
        workouts,
        report,
    }
}

fn parse_workout_line(
    fields: &[&str],
    line_no: usize,
    month: MonthKey,
) -> Result<PendingWorkout, String> {
    if !(3..=5).contains(&fields.len()) {
        return Err(format!("expected 3 to 5 fields, got {}", fields.len()));
    }

    let name = fields[1];
    if name.is_empty() {
        return Err("workout name is empty".to_string());
    }

    let duration_min: i64 = fields[2]
        .parse()
        .map_err(|_| format!("non-numeric duration '{}'", fields[2]))?;
    if duration_min < 0 {
        return Err(format!("negative duration {duration_min}"));
    }

    let start = match fields.get(3) {
        Some(raw) => NaiveDateTime::parse_from_str(raw, START_FORMAT)
            .map_err(|_| format!("unparseable start timestamp '{raw}'"))?,
        None => month.first_instant(),
    };

    let manual_tags = fields
        .get(4)
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect::<BTreeSet<_>>()
        })
        .unwrap_or_default();

    Ok(PendingWorkout {
        line_no,
        name: name.to_string(),
        duration_min,
        start,
        manual_tags,
        exercises: Vec::new(),
    })
}

fn parse_exercise_line(fields: &[&str]) -> Result<Exercise, String> {
    if fields.len() != 3 {
        return Err(format!("expected 3 fields, got {}", fields.len()));
    }

    let name = fields[1];
    let mut reps = fields[2].split(',').map(|raw| {
        raw.trim()
            .parse::<u32>()
            .map_err(|_| format!("non-numeric rep count '{}'", raw.trim()))
    });

    let first = reps.next().ok_or_else(|| "no sets".to_string())??;
    let mut exercise = Exercise::new(name, first).map_err(|error| error.to_string())?;
    for rep in reps {
        exercise.add_set(rep?).map_err(|error| error.to_string())?;
    }
    Ok(exercise)
}

/// Encode the weight history, in recording order.
#[must_use]
pub fn encode_weights(records: &[WeightRecord]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&format!(
            "{WEIGHT_TAG} | {} | {}\n",
            record.weight_kg(),
            record.date().format(DATE_FORMAT)
        ));
    }
    out
}

/// Decode the weight history, skipping malformed lines.
#[must_use]
pub fn decode_weights(input: &str) -> (Vec<WeightRecord>, DecodeReport) {
    let mut records = Vec::new();
    let mut report = DecodeReport::default();

    for (index, raw) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('|').map(str::trim).collect();
        match parse_weight_line(&fields) {
            Ok(record) => records.push(record),
            Err(reason) => report.skip(line_no, line, reason),
        }
    }

    (records, report)
}

fn parse_weight_line(fields: &[&str]) -> Result<WeightRecord, String> {
    if fields.len() != 3 || fields[0] != WEIGHT_TAG {
        return Err("malformed weight record".to_string());
    }

    let weight: f64 = fields[1]
        .parse()
        .map_err(|_| format!("non-numeric weight '{}'", fields[1]))?;
    let date = NaiveDate::parse_from_str(fields[2], DATE_FORMAT)
        .map_err(|_| format!("unparseable date '{}'", fields[2]))?;

    WeightRecord::new(weight, date).map_err(|error| error.to_string())
}
