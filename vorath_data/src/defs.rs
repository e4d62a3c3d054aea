use std::fmt;

/// Kinds of effect an item can have when used.
///
/// The declaration order is also the tie-break order used when sorting items
/// that share a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EffectKind {
    Heal,
    AttackBuff,
    DefenseBuff,
    Damage,
    Other,
}

impl EffectKind {
    /// Symbol written to save files.
    pub fn symbol(self) -> &'static str {
        match self {
            EffectKind::Heal => "CURA",
            EffectKind::AttackBuff => "BUFF_ATAQUE",
            EffectKind::DefenseBuff => "BUFF_DEFESA",
            EffectKind::Damage => "DANO",
            EffectKind::Other => "OUTRO",
        }
    }

    /// Parse a save-file symbol. English aliases are accepted as well.
    pub fn from_symbol(symbol: &str) -> Option<EffectKind> {
        match symbol.trim() {
            "CURA" | "HEAL" => Some(EffectKind::Heal),
            "BUFF_ATAQUE" | "ATTACK_BUFF" => Some(EffectKind::AttackBuff),
            "BUFF_DEFESA" | "DEFENSE_BUFF" => Some(EffectKind::DefenseBuff),
            "DANO" | "DAMAGE" => Some(EffectKind::Damage),
            "OUTRO" | "OTHER" => Some(EffectKind::Other),
            _ => None,
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EffectKind::Heal => "Heal",
            EffectKind::AttackBuff => "Attack Buff",
            EffectKind::DefenseBuff => "Defense Buff",
            EffectKind::Damage => "Damage",
            EffectKind::Other => "Other",
        };
        f.write_str(label)
    }
}

/// Playable hero archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeroClass {
    Warrior,
    Mage,
    Archer,
}

impl HeroClass {
    /// Every class, in menu order.
    pub const ALL: [HeroClass; 3] = [HeroClass::Warrior, HeroClass::Mage, HeroClass::Archer];

    /// Class tag written to the `CLASSE=` line.
    pub fn tag(self) -> &'static str {
        match self {
            HeroClass::Warrior => "Guerreiro",
            HeroClass::Mage => "Mago",
            HeroClass::Archer => "Arqueiro",
        }
    }

    /// Parse a class tag. English class names are accepted as aliases.
    pub fn from_tag(tag: &str) -> Option<HeroClass> {
        match tag.trim() {
            "Guerreiro" | "Warrior" => Some(HeroClass::Warrior),
            "Mago" | "Mage" => Some(HeroClass::Mage),
            "Arqueiro" | "Archer" => Some(HeroClass::Archer),
            _ => None,
        }
    }
}

impl fmt::Display for HeroClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HeroClass::Warrior => "Warrior",
            HeroClass::Mage => "Mage",
            HeroClass::Archer => "Archer",
        };
        f.write_str(label)
    }
}

/// One stack of items as stored in a save file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDef {
    pub name: String,
    pub description: String,
    pub effect: EffectKind,
    pub quantity: u32,
    pub value: u32,
}

/// Complete contents of one save slot.
///
/// Defaults match what a loader assumes for lines missing from the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveDef {
    pub class: HeroClass,
    pub name: String,
    pub level: u32,
    pub current_hp: u32,
    pub max_hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub xp: u32,
    pub xp_next: u32,
    pub chapter: u32,
    pub explorations: u32,
    pub boss_defeated: bool,
    pub items: Vec<ItemDef>,
}

impl SaveDef {
    /// A record for `class` with every other field at its loader default.
    pub fn with_class(class: HeroClass) -> SaveDef {
        SaveDef {
            class,
            name: String::new(),
            level: 1,
            current_hp: 0,
            max_hp: 0,
            attack: 0,
            defense: 0,
            xp: 0,
            xp_next: 100,
            chapter: 1,
            explorations: 0,
            boss_defeated: false,
            items: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_tags_cover_every_class() {
        for class in HeroClass::ALL {
            assert_eq!(HeroClass::from_tag(class.tag()), Some(class));
            assert_eq!(HeroClass::from_tag(&class.to_string()), Some(class));
        }
        assert_eq!(HeroClass::from_tag("Bardo"), None);
    }
}
