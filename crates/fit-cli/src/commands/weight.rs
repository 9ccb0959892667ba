//! Body-weight commands.

use anyhow::{Result, bail};

use fit_core::entities::WeightRecord;

use crate::app::App;
use crate::commands::args;
use crate::ui::Ui;

impl<U: Ui> App<U> {
    pub(crate) fn cmd_add_weight(&mut self, raw: &str) -> Result<()> {
        let (Some(weight_raw), Some(date_raw)) = (args::value(raw, 'w'), args::value(raw, 'd'))
        else {
            bail!("Invalid input. Correct format: /add_weight w/WEIGHT d/DD/MM/YY");
        };
        let weight = args::parse_weight(weight_raw)?;
        let date = args::parse_date(date_raw)?;
        let record = WeightRecord::new(weight, date)?;

        self.ui.show(&format!("Logged: {record}"));
        self.profile.add_weight_record(record);
        if let Err(error) = self
            .store
            .save_weights(self.profile.name(), self.profile.weight_history())
        {
            self.ui
                .show_error(&format!("Failed to save weight history: {error}"));
        }
        Ok(())
    }

    pub(crate) fn cmd_view_weight(&mut self) {
        if self.profile.weight_history().is_empty() {
            self.ui.show("No weight history recorded yet.");
            return;
        }
        for record in self.profile.weight_history() {
            self.ui.show(&record.to_string());
        }
    }
}
