use illuvilytics::data::data_registry::DataRegistry;
use illuvilytics::data::illuvial::Illuvial;
use illuvilytics::data::synergy_map::{SynergyEntry, SynergyTable};

pub fn illuvial(id: &str, display_name: &str, affinity: &str, class_name: &str) -> Illuvial {
    Illuvial {
        id: id.to_string(),
        display_name: display_name.to_string(),
        line: "Test".to_string(),
        stage: 1.0,
        tier: 1.0,
        affinity: affinity.to_string(),
        class_name: class_name.to_string(),
        max_health: 1000.0,
        attack_physical: 50.0,
        attack_speed: 100.0,
        image: String::new(),
    }
}

pub fn entry(affinity: &str, class_name: &str, affinities: &[&str], classes: &[&str]) -> SynergyEntry {
    SynergyEntry {
        base_affinity: affinity.to_string(),
        base_class: class_name.to_string(),
        composite_affinities: affinities.iter().map(|s| s.to_string()).collect(),
        composite_classes: classes.iter().map(|s| s.to_string()).collect(),
    }
}

/// Twelve catalog ids so capacity limits can be exercised; "Mystery" has no synergy entry.
pub fn registry() -> DataRegistry {
    let mut catalog = vec![
        illuvial("steam", "Steamback", "Fire", "Bulwark"),
        illuvial("ember", "Emberhorn", "Fire", "Fighter"),
        illuvial("tide", "Tideglider", "Water", "Psion"),
        illuvial("myst", "Mystery", "Air", "Empath"),
    ];
    catalog.extend((0..8).map(|n| illuvial(&format!("filler-{n}"), "Emberhorn", "Fire", "Fighter")));

    let synergy = SynergyTable::from_entries([
        ("Steamback".to_string(), entry("Fire", "Bulwark", &["Water"], &[])),
        ("Emberhorn".to_string(), entry("Fire", "Fighter", &[], &[])),
        ("Tideglider".to_string(), entry("Water", "Psion", &["Air", "Air"], &["Rogue"])),
    ]);
    DataRegistry::from_parts(catalog, synergy)
}
