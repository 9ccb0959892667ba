//! Log viewing commands.

use anyhow::Result;

use crate::app::App;
use crate::commands::args;
use crate::ui::Ui;
use crate::view;

impl<U: Ui> App<U> {
    pub(crate) fn cmd_view_log(&mut self, raw: &str) -> Result<()> {
        let filter = args::value(raw, 'd').map(args::parse_date).transpose()?;
        let rendered = view::render(&self.manager, filter);
        self.ui.show(&rendered);
        Ok(())
    }

    pub(crate) fn cmd_open(&mut self, raw: &str) -> Result<()> {
        let id = args::parse_display_id(raw.trim())?;
        let detail = view::render_detail(view::workout_by_display_id(&self.manager, id)?);
        self.ui.show(&detail);
        Ok(())
    }
}
