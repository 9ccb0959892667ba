//! User switching.

use anyhow::{Result, bail};

use fit_core::manager::WorkoutManager;

use crate::app::App;
use crate::commands::args;
use crate::ui::Ui;

impl<U: Ui> App<U> {
    pub(crate) fn cmd_my_name(&mut self, raw: &str) -> Result<()> {
        let Some(name) = args::value(raw, 'n') else {
            bail!("Usage: /my_name n/NAME");
        };
        let name = name.to_string();

        // Keep the current user's collection on disk before switching away.
        self.save_current_month();

        if let Err(error) = self.store.save_display_name(&name) {
            self.ui
                .show_error(&format!("Failed to save your profile: {error}"));
        }

        let month = self.manager.month();
        self.manager = WorkoutManager::new(&name, month);
        self.load_user_data();
        self.ui.show(&format!("Switched to user: {name}"));
        Ok(())
    }
}
