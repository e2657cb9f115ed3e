//! Input action routing
//!
//! Buttons arrive as named actions with a press or release. Each bound
//! action grabs on press and lets go on release.

use crate::hand::Hand;
use std::collections::HashMap;

/// Digital button state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// What a hand should do in response to input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraspCommand {
    Fixate,
    Detach,
}

impl From<ButtonState> for GraspCommand {
    fn from(state: ButtonState) -> Self {
        match state {
            ButtonState::Pressed => Self::Fixate,
            ButtonState::Released => Self::Detach,
        }
    }
}

/// Maps action names to hands
#[derive(Debug, Clone)]
pub struct ActionBindings {
    bindings: HashMap<String, Hand>,
}

impl Default for ActionBindings {
    fn default() -> Self {
        let mut bindings = Self::empty();
        bindings.bind("LeftFixate", Hand::Left);
        bindings.bind("RightFixate", Hand::Right);
        bindings
    }
}

impl ActionBindings {
    /// Bindings with no actions
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind an action to a hand, replacing any previous binding
    pub fn bind(&mut self, action: impl Into<String>, hand: Hand) -> Option<Hand> {
        self.bindings.insert(action.into(), hand)
    }

    pub fn unbind(&mut self, action: &str) -> Option<Hand> {
        self.bindings.remove(action)
    }

    /// Which hand does what, or `None` for an unbound action
    pub fn resolve(&self, action: &str, state: ButtonState) -> Option<(Hand, GraspCommand)> {
        self.bindings
            .get(action)
            .map(|hand| (*hand, GraspCommand::from(state)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let bindings = ActionBindings::default();
        assert_eq!(
            bindings.resolve("LeftFixate", ButtonState::Pressed),
            Some((Hand::Left, GraspCommand::Fixate))
        );
        assert_eq!(
            bindings.resolve("RightFixate", ButtonState::Released),
            Some((Hand::Right, GraspCommand::Detach))
        );
        assert_eq!(bindings.resolve("Jump", ButtonState::Pressed), None);
    }

    #[test]
    fn test_rebind() {
        let mut bindings = ActionBindings::empty();
        assert_eq!(bindings.resolve("LeftFixate", ButtonState::Pressed), None);

        bindings.bind("Grip", Hand::Left);
        assert_eq!(bindings.bind("Grip", Hand::Right), Some(Hand::Left));
        assert_eq!(
            bindings.resolve("Grip", ButtonState::Pressed),
            Some((Hand::Right, GraspCommand::Fixate))
        );
        bindings.unbind("Grip");
        assert_eq!(bindings.resolve("Grip", ButtonState::Pressed), None);
    }
}
