use std::fmt;

use crate::defs::SaveDef;

/// A save record that parses but cannot describe a playable character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    BlankName,
    InvalidValue { field: &'static str, context: String },
    BadItem { index: usize, context: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::BlankName => write!(f, "character name is blank"),
            ValidationError::InvalidValue { field, context } => {
                write!(f, "invalid {field} ({context})")
            },
            ValidationError::BadItem { index, context } => {
                write!(f, "item #{index} rejected ({context})")
            },
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check the invariants a loaded character must satisfy.
///
/// Current HP above the maximum is not reported; loaders clamp it.
///
/// ```
/// use vorath_data::{HeroClass, SaveDef, validate_save};
///
/// let mut save = SaveDef::with_class(HeroClass::Archer);
/// save.name = "Rook".into();
/// save.max_hp = 100;
/// save.current_hp = 100;
/// assert!(validate_save(&save).is_empty());
/// ```
pub fn validate_save(save: &SaveDef) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if save.name.trim().is_empty() {
        errors.push(ValidationError::BlankName);
    }
    if save.max_hp == 0 {
        errors.push(ValidationError::InvalidValue {
            field: "max hp",
            context: "must be positive".to_string(),
        });
    }
    if save.level == 0 {
        errors.push(ValidationError::InvalidValue {
            field: "level",
            context: "must be at least 1".to_string(),
        });
    }
    if save.xp_next == 0 {
        errors.push(ValidationError::InvalidValue {
            field: "xp threshold",
            context: "must be positive".to_string(),
        });
    }
    if save.chapter == 0 {
        errors.push(ValidationError::InvalidValue {
            field: "chapter",
            context: "chapters start at 1".to_string(),
        });
    }

    for (index, item) in save.items.iter().enumerate() {
        if item.name.trim().is_empty() {
            errors.push(ValidationError::BadItem {
                index,
                context: "blank name".to_string(),
            });
        }
        if item.quantity == 0 {
            errors.push(ValidationError::BadItem {
                index,
                context: format!("'{}' has zero quantity", item.name),
            });
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::{EffectKind, HeroClass, ItemDef};

    fn playable() -> SaveDef {
        let mut save = SaveDef::with_class(HeroClass::Warrior);
        save.name = "Aria".into();
        save.max_hp = 120;
        save.current_hp = 120;
        save
    }

    #[test]
    fn defaults_with_name_and_hp_are_valid() {
        assert!(validate_save(&playable()).is_empty());
    }

    #[test]
    fn reports_every_violation() {
        let mut save = playable();
        save.name = "  ".into();
        save.max_hp = 0;
        save.level = 0;
        save.items.push(ItemDef {
            name: "Dust".into(),
            description: String::new(),
            effect: EffectKind::Other,
            quantity: 0,
            value: 0,
        });
        let errors = validate_save(&save);
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::BlankName));
        assert!(matches!(errors[3], ValidationError::BadItem { index: 0, .. }));
    }
}
