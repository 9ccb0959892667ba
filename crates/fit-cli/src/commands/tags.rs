//! Tag commands: manual overrides and runtime keyword additions.

use anyhow::{Result, anyhow, bail};

use fit_core::enums::{Modality, MuscleGroup};

use crate::app::App;
use crate::commands::args;
use crate::ui::Ui;

impl<U: Ui> App<U> {
    pub(crate) fn cmd_add_tag(&mut self, raw: &str) -> Result<()> {
        let (Some(id_raw), Some(tags)) = (args::value(raw, 'i'), args::value(raw, 't')) else {
            bail!("Usage: /add_tag i/INDEX t/TAGS");
        };
        let id = args::parse_display_id(id_raw)?;

        let overridden = self.manager.override_tags(id - 1, tags)?;
        if !overridden.is_empty() {
            self.ui.show(&format!(
                "Note: this overrides auto tag(s): {}",
                overridden.join(", ")
            ));
        }
        self.ui.show("Tags updated.");
        self.save_current_month();
        Ok(())
    }

    pub(crate) fn cmd_add_modality_keyword(&mut self, raw: &str) -> Result<()> {
        let (Some(modality_raw), Some(keyword)) = (args::value(raw, 'm'), args::value(raw, 'k'))
        else {
            bail!("Usage: /add_modality_keyword m/MODALITY k/KEYWORD");
        };
        let modality: Modality = modality_raw.parse().map_err(|message: String| anyhow!(message))?;

        self.manager
            .add_modality_keyword(&mut self.tagger, modality, keyword)?;
        self.ui.show(&format!(
            "Workouts mentioning '{}' are now tagged {modality}.",
            keyword.to_lowercase()
        ));
        Ok(())
    }

    pub(crate) fn cmd_add_muscle_keyword(&mut self, raw: &str) -> Result<()> {
        let (Some(group_raw), Some(keyword)) = (args::value(raw, 'g'), args::value(raw, 'k'))
        else {
            bail!("Usage: /add_muscle_keyword g/GROUP k/KEYWORD");
        };
        let group: MuscleGroup = group_raw.parse().map_err(|message: String| anyhow!(message))?;

        self.manager
            .add_muscle_keyword(&mut self.tagger, group, keyword)?;
        self.ui.show(&format!(
            "Workouts mentioning '{}' are now tagged {group}.",
            keyword.to_lowercase()
        ));
        Ok(())
    }
}
