use crate::object::Object;
use gc::{Finalize, Gc, GcCell, Trace};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Trace)]
struct EnvironmentCore {
    store: HashMap<Rc<str>, Gc<Object>>,
    outer: Option<Environment>,
}

impl Finalize for EnvironmentCore {
    fn finalize(&self) {
        log::trace!("collecting scope with {} binding(s)", self.store.len());
        #[cfg(test)]
        tests::COLLECTED_SCOPES.with(|count| count.set(count.get() + 1));
    }
}

/// Shared handle to one scope. Cloning the handle aliases the same scope;
/// functions keep the scope they were defined in alive through it. Scopes and
/// the closures stored in them may reference each other, so they live on the
/// garbage-collected heap.
#[derive(Clone, Trace, Finalize)]
pub struct Environment {
    environment: Gc<GcCell<EnvironmentCore>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            environment: Gc::new(GcCell::new(EnvironmentCore {
                store: HashMap::new(),
                outer: None,
            })),
        }
    }

    pub fn new_enclosed(outer: &Environment) -> Environment {
        Environment {
            environment: Gc::new(GcCell::new(EnvironmentCore {
                store: HashMap::new(),
                outer: Some(outer.clone()),
            })),
        }
    }

    /// Looks `key` up in this scope and then outwards.
    pub fn get(&self, key: &str) -> Option<Gc<Object>> {
        let env = self.environment.borrow();
        match env.store.get(key) {
            Some(value) => Some(value.clone()),
            None => env.outer.as_ref().and_then(|outer| outer.get(key)),
        }
    }

    /// Binds `key` in this scope only, replacing an earlier binding here and
    /// shadowing any outer one.
    pub fn set(&self, key: Rc<str>, value: Gc<Object>) {
        self.environment.borrow_mut().store.insert(key, value);
    }

    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Gc::ptr_eq(&self.environment, &other.environment)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Environment {
    // Scopes reference functions which reference scopes; only names are shown.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let env = self.environment.borrow();
        f.debug_struct("Environment")
            .field("names", &env.store.keys().collect::<Vec<_>>())
            .field("outer", &env.outer)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::Environment;
    use crate::object::Object;
    use leopard_core::ast::BlockStatement;

    thread_local! {
        pub(crate) static COLLECTED_SCOPES: Cell<usize> = Cell::new(0);
    }

    /// Number of scopes the collector has reclaimed on this thread.
    pub(crate) fn collected_scopes() -> usize {
        COLLECTED_SCOPES.with(|count| count.get())
    }

    #[test]
    fn test_lookup_walks_outwards() {
        let global = Environment::new();
        global.set("a".into(), Object::integer(1));
        global.set("b".into(), Object::integer(2));

        let inner = Environment::new_enclosed(&global);
        inner.set("b".into(), Object::integer(20));

        assert_eq!(inner.get("a"), Some(Object::integer(1)));
        assert_eq!(inner.get("b"), Some(Object::integer(20)));
        assert_eq!(global.get("b"), Some(Object::integer(2)));
        assert_eq!(inner.get("c"), None);
    }

    #[test]
    fn test_set_overwrites_in_same_scope() {
        let env = Environment::new();
        env.set("x".into(), Object::integer(1));
        env.set("x".into(), Object::integer(2));

        assert_eq!(env.get("x"), Some(Object::integer(2)));
        assert_eq!(format!("{:?}", env), "Environment { names: [\"x\"], outer: None }");
    }

    #[test]
    fn test_clones_share_the_scope() {
        let env = Environment::new();
        let alias = env.clone();
        alias.set("x".into(), Object::boolean(true));

        assert!(env.ptr_eq(&alias));
        assert_eq!(env.get("x"), Some(Object::boolean(true)));
        assert!(!env.ptr_eq(&Environment::new()));
    }

    #[test]
    fn test_scope_cycle_is_collected() {
        let before = collected_scopes();
        {
            let global = Environment::new();
            let call_scope = Environment::new_enclosed(&global);
            let closure = Object::function(
                vec![],
                Rc::new(BlockStatement::default()),
                call_scope.clone(),
            );
            call_scope.set("closure".into(), closure.clone());
            global.set("closure".into(), closure);
        }
        gc::force_collect();

        assert!(collected_scopes() >= before + 2);
    }
}
