use std::{fmt, io::Write};

use client_core::Presentation;
use shared::{
    domain::{Item, ItemId, Owner},
    error::ApiError,
};
use tracing::warn;

fn checkbox(completed: bool) -> &'static str {
    if completed {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Prints every change to `out` as one line. Nothing drawn is kept.
pub struct TerminalPresentation<W> {
    out: W,
}

impl<W: Write> TerminalPresentation<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: fmt::Arguments<'_>) {
        if let Err(err) = writeln!(self.out, "{line}").and_then(|()| self.out.flush()) {
            warn!(error = %err, "failed to write to terminal");
        }
    }
}

impl<W: Write> Presentation for TerminalPresentation<W> {
    fn render_item(&mut self, item: &Item, owner_name: &str) {
        self.emit(format_args!(
            "+ {} #{} {} by {owner_name}",
            checkbox(item.completed),
            item.id,
            item.title
        ));
    }

    fn render_owner_option(&mut self, owner: &Owner) {
        self.emit(format_args!("owner {}: {}", owner.id, owner.name));
    }

    fn remove_rendered(&mut self, item_id: &ItemId) {
        self.emit(format_args!("- #{item_id} removed"));
    }

    fn set_rendered_completed(&mut self, item_id: &ItemId, completed: bool) {
        self.emit(format_args!("~ #{item_id} back to {}", checkbox(completed)));
    }

    fn notify_error(&mut self, error: &ApiError) {
        self.emit(format_args!("! {}", error.message));
    }
}
