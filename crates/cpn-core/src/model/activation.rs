//! Predicado de activación de un artifact sobre `(stage, role)`.
//!
//! Se evalúa de nuevo en cada ejecución: el mismo tipo de task puede correr
//! como `guest` en `train` y como `host` en `predict`. Debe ser una función
//! pura de sus dos argumentos.

use std::fmt;
use std::sync::Arc;

use super::{Role, Stage};

type ActivationFn = dyn Fn(Stage, Role) -> bool + Send + Sync;

#[derive(Clone, Default)]
pub enum Activation {
    /// Activo para cualquier stage y rol.
    #[default]
    Always,
    /// Matriz roles × stages. Una lista vacía en un eje significa "cualquiera".
    Matrix { roles: Vec<Role>, stages: Vec<Stage> },
    /// Predicado arbitrario.
    Predicate(Arc<ActivationFn>),
}

impl Activation {
    pub fn roles(roles: impl IntoIterator<Item = Role>) -> Self {
        Activation::Matrix { roles: roles.into_iter().collect(),
                             stages: Vec::new() }
    }

    pub fn stages(stages: impl IntoIterator<Item = Stage>) -> Self {
        Activation::Matrix { roles: Vec::new(),
                             stages: stages.into_iter().collect() }
    }

    pub fn predicate<F>(f: F) -> Self
        where F: Fn(Stage, Role) -> bool + Send + Sync + 'static
    {
        Activation::Predicate(Arc::new(f))
    }

    /// Restringe además por roles (conserva los stages de una matriz).
    pub fn with_roles(self, roles: impl IntoIterator<Item = Role>) -> Self {
        let roles: Vec<Role> = roles.into_iter().collect();
        match self {
            Activation::Always => Activation::Matrix { roles, stages: Vec::new() },
            Activation::Matrix { stages, .. } => Activation::Matrix { roles, stages },
            Activation::Predicate(f) => {
                Activation::Predicate(Arc::new(move |s, r| roles.contains(&r) && f(s, r)))
            }
        }
    }

    /// Restringe además por stages (conserva los roles de una matriz).
    pub fn with_stages(self, stages: impl IntoIterator<Item = Stage>) -> Self {
        let stages: Vec<Stage> = stages.into_iter().collect();
        match self {
            Activation::Always => Activation::Matrix { roles: Vec::new(), stages },
            Activation::Matrix { roles, .. } => Activation::Matrix { roles, stages },
            Activation::Predicate(f) => {
                Activation::Predicate(Arc::new(move |s, r| stages.contains(&s) && f(s, r)))
            }
        }
    }

    pub fn is_active(&self, stage: Stage, role: Role) -> bool {
        match self {
            Activation::Always => true,
            Activation::Matrix { roles, stages } => {
                (roles.is_empty() || roles.contains(&role)) && (stages.is_empty() || stages.contains(&stage))
            }
            Activation::Predicate(f) => f(stage, role),
        }
    }
}

impl fmt::Debug for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Activation::Always => f.write_str("Always"),
            Activation::Matrix { roles, stages } => f.debug_struct("Matrix")
                                                     .field("roles", roles)
                                                     .field("stages", stages)
                                                     .finish(),
            Activation::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_axis_means_any() {
        let a = Activation::roles([Role::Guest]);
        assert!(a.is_active(Stage::Train, Role::Guest));
        assert!(a.is_active(Stage::Predict, Role::Guest));
        assert!(!a.is_active(Stage::Train, Role::Host));
    }

    #[test]
    fn matrix_combines_roles_and_stages() {
        let a = Activation::roles([Role::Guest, Role::Host]).with_stages([Stage::Train]);
        assert!(a.is_active(Stage::Train, Role::Host));
        assert!(!a.is_active(Stage::Predict, Role::Host));
        assert!(!a.is_active(Stage::Train, Role::Arbiter));
    }

    #[test]
    fn predicate_narrowed_by_roles() {
        let a = Activation::predicate(|s, _| s != Stage::Default).with_roles([Role::Local]);
        assert!(a.is_active(Stage::Train, Role::Local));
        assert!(!a.is_active(Stage::Default, Role::Local));
        assert!(!a.is_active(Stage::Train, Role::Guest));
    }
}
