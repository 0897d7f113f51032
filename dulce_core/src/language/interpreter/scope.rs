use std::collections::HashMap;
use std::rc::Rc;
use crate::language::ast::FunctionDecl;
use crate::language::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Value(Value),
    Function(Rc<FunctionDecl>),
}

/// Bindings displaced by [`Scope::enter`], in insertion order.
#[derive(Debug, Default)]
#[must_use]
pub struct Shadowed(Vec<(String, Option<Binding>)>);

/// The one flat scope of a running program. Nested blocks write through to it;
/// only the extra bindings a block was entered with are undone on exit.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    variables: HashMap<String, Binding>,
}

impl Scope {
    pub fn new() -> Self {
        Scope {
            variables: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.variables.get(name)
    }

    /// Binds `name`, replacing whatever was there.
    pub fn declare(&mut self, name: &str, binding: Binding) {
        self.variables.insert(name.to_string(), binding);
    }

    /// Overwrites an existing binding. Returns `false` if `name` is unbound.
    pub fn assign(&mut self, name: &str, binding: Binding) -> bool {
        match self.variables.get_mut(name) {
            Some(slot) => {
                *slot = binding;
                true
            }
            None => false,
        }
    }

    pub fn enter(&mut self, bindings: Vec<(String, Binding)>) -> Shadowed {
        let mut shadowed = Vec::with_capacity(bindings.len());
        for (name, binding) in bindings {
            let previous = self.variables.insert(name.clone(), binding);
            shadowed.push((name, previous));
        }
        Shadowed(shadowed)
    }

    pub fn leave(&mut self, shadowed: Shadowed) {
        // Reverse order so a name bound twice ends up with its oldest value.
        for (name, previous) in shadowed.0.into_iter().rev() {
            match previous {
                Some(binding) => {
                    self.variables.insert(name, binding);
                }
                None => {
                    self.variables.remove(&name);
                }
            }
        }
    }
}
