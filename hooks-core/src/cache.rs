use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// In-memory map from request URL to decoded response body.
///
/// Cloning yields another handle to the same entries. Entries are never
/// evicted; the cache lives exactly as long as the hook instance holding
/// it, and is never shared with other instances.
#[derive(Debug)]
pub struct RequestCache<T> {
    entries: Rc<RefCell<HashMap<String, T>>>,
}

impl<T> Clone for RequestCache<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<T> Default for RequestCache<T> {
    fn default() -> Self {
        Self {
            entries: Rc::new(RefCell::new(HashMap::new())),
        }
    }
}

impl<T: Clone> RequestCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<T> {
        self.entries.borrow().get(url).cloned()
    }

    pub fn insert(&self, url: impl Into<String>, value: T) {
        self.entries.borrow_mut().insert(url.into(), value);
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.borrow().contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}
