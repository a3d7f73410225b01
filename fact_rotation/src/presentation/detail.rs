//! Detail views, of which at most one is live at a time.

use fact_catalog::Fact;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, warn};

use super::detail_text;

/// An open detail view that can be retired.
pub trait DetailView {
    fn close(&mut self);
}

/// Owns the single live detail view.
///
/// Opening a new view closes the current one first.
#[derive(Debug)]
pub struct DetailViewSlot<V: DetailView> {
    current: Option<V>,
}

impl<V: DetailView> Default for DetailViewSlot<V> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<V: DetailView> DetailViewSlot<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the current view, then open a new one with `open`.
    ///
    /// If `open` fails the slot is left empty.
    pub fn open_with<E>(&mut self, open: impl FnOnce() -> Result<V, E>) -> Result<&V, E> {
        self.close();
        let view = open()?;
        Ok(self.current.insert(view))
    }

    /// Close the current view, if any.
    pub fn close(&mut self) {
        if let Some(mut view) = self.current.take() {
            view.close();
        }
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&V> {
        self.current.as_ref()
    }
}

/// A detail view rendered to a Markdown file; closing it removes the file.
#[derive(Debug)]
pub struct FileDetailView {
    path: PathBuf,
    fact_title: String,
}

impl FileDetailView {
    /// Render `fact` into `path`, creating parent directories as needed.
    pub fn open(path: impl Into<PathBuf>, fact: &Fact) -> std::io::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&path, detail_text(fact))?;
        debug!(path = %path.display(), fact = %fact.id, "opened detail view");

        Ok(Self {
            path,
            fact_title: fact.title.clone(),
        })
    }

    pub fn fact_title(&self) -> &str {
        &self.fact_title
    }
}

impl DetailView for FileDetailView {
    fn close(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => warn!(path = %self.path.display(), error = %err, "failed to close detail view"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct LoggedView {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl DetailView for LoggedView {
        fn close(&mut self) {
            self.log.borrow_mut().push(format!("close {}", self.name));
        }
    }

    #[test]
    fn test_opening_retires_the_previous_view() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut slot = DetailViewSlot::new();

        for name in ["first", "second"] {
            let log = log.clone();
            slot.open_with(|| {
                log.borrow_mut().push(format!("open {name}"));
                Ok::<_, ()>(LoggedView { name, log: log.clone() })
            })
            .unwrap();
        }

        assert_eq!(
            *log.borrow(),
            vec!["open first", "close first", "open second"]
        );
        assert_eq!(slot.current().unwrap().name, "second");
    }

    #[test]
    fn test_failed_open_leaves_slot_empty() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut slot = DetailViewSlot::new();
        slot.open_with(|| Ok::<_, ()>(LoggedView { name: "only", log: log.clone() }))
            .unwrap();

        assert!(slot.open_with(|| Err::<LoggedView, _>("boom")).is_err());
        assert!(!slot.is_open());
        assert_eq!(*log.borrow(), vec!["close only"]);
    }

    #[test]
    fn test_file_detail_view_same_path_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("views").join("current.md");
        let mut slot = DetailViewSlot::new();

        let first = Fact::new("a", "First").with_detailed_description("one");
        let second = Fact::new("b", "Second").with_detailed_description("two");

        slot.open_with(|| FileDetailView::open(&path, &first)).unwrap();
        slot.open_with(|| FileDetailView::open(&path, &second)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# Second"));
        assert_eq!(slot.current().unwrap().fact_title(), "Second");

        slot.close();
        assert!(!path.exists());
    }
}
