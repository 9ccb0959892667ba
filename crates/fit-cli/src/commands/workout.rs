//! Workout lifecycle commands: create, add exercise/set, end, delete.

use anyhow::{Result, bail};
use chrono::{Local, NaiveDateTime};

use fit_core::manager::DeleteTarget;

use crate::app::App;
use crate::commands::args;
use crate::ui::Ui;

impl<U: Ui> App<U> {
    pub(crate) fn cmd_create_workout(&mut self, raw: &str) -> Result<()> {
        let Some(name) = args::value(raw, 'n') else {
            bail!("Usage: /create_workout n/NAME [d/DD/MM/YY] [t/HHmm]");
        };
        let date = args::value(raw, 'd').map(args::parse_date).transpose()?;
        let time = args::value(raw, 't').map(args::parse_time).transpose()?;
        let now = Local::now().naive_local();

        let report = self
            .manager
            .create_workout(name, date, time, now, &self.tagger)?;
        if report.date_defaulted {
            self.ui.show("No date given; using today.");
        }
        if report.time_defaulted {
            self.ui.show("No time given; using the current time.");
        }
        self.ui.show(&format!(
            "Workout '{name}' is open. Add exercises with /add_exercise."
        ));
        self.save_current_month();
        Ok(())
    }

    pub(crate) fn cmd_add_exercise(&mut self, raw: &str) -> Result<()> {
        let (Some(name), Some(reps_raw)) = (args::value(raw, 'n'), args::value(raw, 'r')) else {
            bail!("Usage: /add_exercise n/NAME r/REPS");
        };
        let reps = args::parse_reps(reps_raw)?;

        self.manager.add_exercise(name, reps, &self.tagger)?;
        self.ui
            .show(&format!("Added '{name}' with a first set of {reps} reps."));
        Ok(())
    }

    pub(crate) fn cmd_add_set(&mut self, raw: &str) -> Result<()> {
        let Some(reps_raw) = args::value(raw, 'r') else {
            bail!("Usage: /add_set r/REPS");
        };
        let reps = args::parse_reps(reps_raw)?;

        self.manager.add_set(reps)?;
        self.ui.show(&format!("Set of {reps} reps added."));
        Ok(())
    }

    pub(crate) fn cmd_end_workout(&mut self, raw: &str) -> Result<()> {
        let date = args::value(raw, 'd').map(args::parse_date).transpose()?;
        let time = args::value(raw, 't').map(args::parse_time).transpose()?;
        let now = Local::now().naive_local();
        let end = NaiveDateTime::new(
            date.unwrap_or_else(|| now.date()),
            time.unwrap_or_else(|| now.time()),
        );

        let minutes = self.manager.end_workout(end)?;
        if date.is_none() {
            self.ui.show("No end date given; using today.");
        }
        if time.is_none() {
            self.ui.show("No end time given; using the current time.");
        }
        self.ui
            .show(&format!("Workout wrapped! Duration: {minutes} min."));
        self.save_current_month();
        Ok(())
    }

    pub(crate) fn cmd_delete_workout(&mut self, raw: &str) -> Result<()> {
        let raw = raw.trim();
        if raw.is_empty() {
            bail!("Usage: /del_workout NAME | d/DD/MM/YY | i/INDEX");
        }

        // A numeric index deletes directly, no confirmation.
        if let Some(id_raw) = args::value(raw, 'i') {
            let id = args::parse_display_id(id_raw)?;
            let removed = self.manager.delete_at(id - 1)?;
            self.ui
                .show(&format!("Deleted workout '{}'.", removed.name()));
            self.save_current_month();
            return Ok(());
        }

        let target = match args::value(raw, 'd') {
            Some(date_raw) => DeleteTarget::Date(args::parse_date(date_raw)?),
            None => DeleteTarget::Name(raw.to_string()),
        };
        let matches = self.manager.find_matches(&target);

        match matches.as_slice() {
            [] => self.ui.show("No matching workout found."),
            [index] => {
                let removed = self.manager.delete_at(*index)?;
                self.ui
                    .show(&format!("Deleted workout '{}'.", removed.name()));
                self.save_current_month();
            }
            _ => {
                self.ui.show(&format!(
                    "{} workouts match. Confirm each one:",
                    matches.len()
                ));
                let mut confirmed = Vec::new();
                for &index in &matches {
                    let workout = &self.manager.workouts()[index];
                    let question =
                        format!("Delete '{}' ({})?", workout.name(), workout.date_string());
                    if self.ui.confirm(&question) {
                        confirmed.push(index);
                    }
                }

                if confirmed.is_empty() {
                    self.ui.show("Nothing deleted.");
                } else {
                    // Back to front so earlier indices stay valid.
                    for &index in confirmed.iter().rev() {
                        self.manager.delete_at(index)?;
                    }
                    self.ui
                        .show(&format!("Deleted {} workout(s).", confirmed.len()));
                    self.save_current_month();
                }
            }
        }
        Ok(())
    }
}
