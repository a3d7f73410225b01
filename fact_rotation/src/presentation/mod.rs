//! Presentation - how a selected fact reaches the user.
//!
//! The rotation core only calls [`Presenter::present`]. The terminal presenter
//! here prints a notification line and can also keep a detail view open.

mod detail;
mod render;

pub use detail::*;
pub use render::*;

use fact_catalog::Fact;
use std::io::Write;
use std::path::PathBuf;
use tracing::warn;

/// Receives each fact chosen by a rotation.
pub trait Presenter {
    fn present(&mut self, fact: &Fact);
}

impl<P: Presenter + ?Sized> Presenter for &mut P {
    fn present(&mut self, fact: &Fact) {
        (**self).present(fact)
    }
}

/// Writes facts to a terminal (or any writer).
pub struct TerminalPresenter<W: Write> {
    out: W,
    label: String,

    /// Print the detail text under the notification.
    show_details: bool,

    /// Also render the detail view to this file.
    detail_file: Option<PathBuf>,

    detail_view: DetailViewSlot<FileDetailView>,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W, label: impl Into<String>) -> Self {
        Self {
            out,
            label: label.into(),
            show_details: false,
            detail_file: None,
            detail_view: DetailViewSlot::new(),
        }
    }

    pub fn with_details(mut self, show: bool) -> Self {
        self.show_details = show;
        self
    }

    pub fn with_detail_file(mut self, path: Option<PathBuf>) -> Self {
        self.detail_file = path;
        self
    }

    /// The currently open file detail view, if any.
    pub fn detail_view(&self) -> Option<&FileDetailView> {
        self.detail_view.current()
    }

    /// Retire the open detail view.
    pub fn close_detail(&mut self) {
        self.detail_view.close();
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_fact(&mut self, fact: &Fact) -> std::io::Result<()> {
        writeln!(self.out, "{}", notification_text(&self.label, fact))?;
        if self.show_details {
            writeln!(self.out)?;
            write!(self.out, "{}", detail_text(fact))?;
        }
        self.out.flush()
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn present(&mut self, fact: &Fact) {
        if let Err(err) = self.write_fact(fact) {
            warn!(fact = %fact.id, error = %err, "failed to print fact");
        }

        if let Some(path) = self.detail_file.clone() {
            if let Err(err) = self.detail_view.open_with(|| FileDetailView::open(path, fact)) {
                warn!(fact = %fact.id, error = %err, "failed to open detail view");
            }
        }
    }
}
