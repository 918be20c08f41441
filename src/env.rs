use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::object::Object;

type Objects = HashMap<String, Object>;

/// One frame of the scope chain. Frames are shared through `Rc<RefCell<Env>>`
/// so closures see later writes to the variables they captured.
#[derive(Debug, Default)]
pub struct Env {
  objects: Objects,
  parent: Option<Rc<RefCell<Env>>>,
}

impl Env {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn new_with_parent(parent: Rc<RefCell<Env>>) -> Self {
    Self {
      objects: HashMap::new(),
      parent: Some(parent),
    }
  }

  pub fn shared(self) -> Rc<RefCell<Env>> {
    Rc::new(RefCell::new(self))
  }

  pub fn get(&self, name: &str) -> Option<Object> {
    if let Some(object) = self.objects.get(name) {
      return Some(object.clone());
    }

    if let Some(ref parent) = self.parent {
      return parent.borrow().get(name);
    }

    None
  }

  /// Defines `name` in this frame, shadowing any outer binding.
  pub fn set(&mut self, name: impl Into<String>, value: Object) {
    self.objects.insert(name.into(), value);
  }

  /// Overwrites the nearest existing binding of `name`.
  ///
  /// Returns `false` when no frame in the chain defines `name`.
  pub fn reset(&mut self, name: &str, value: Object) -> bool {
    if let Some(slot) = self.objects.get_mut(name) {
      *slot = value;
      return true;
    }

    match self.parent {
      Some(ref parent) => parent.borrow_mut().reset(name, value),
      None => false,
    }
  }
}
