use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum MethodCategory {
    Farming,
    Grinding,
    Economy,
    Pvp,
    Other,
}

impl MethodCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            MethodCategory::Farming => "Farming",
            MethodCategory::Grinding => "Grinding",
            MethodCategory::Economy => "Economy",
            MethodCategory::Pvp => "PvP",
            MethodCategory::Other => "Other",
        }
    }

    pub fn all() -> Vec<MethodCategory> {
        vec![
            MethodCategory::Farming,
            MethodCategory::Grinding,
            MethodCategory::Economy,
            MethodCategory::Pvp,
            MethodCategory::Other,
        ]
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Extreme,
}

impl Difficulty {
    pub fn display_name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Extreme => "Extreme",
        }
    }
}

/// A single money-making method. Static content, never mutated at runtime.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MoneyMethod {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: MethodCategory,
    pub difficulty: Difficulty,
    pub investment: String,
    pub estimated_return: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub icon: String,
}

pub struct MethodCatalog {
    methods: Vec<MoneyMethod>,
}

impl MethodCatalog {
    pub fn new() -> Self {
        Self {
            methods: builtin_methods(),
        }
    }

    pub fn all(&self) -> &[MoneyMethod] {
        &self.methods
    }

    pub fn by_category(&self, category: MethodCategory) -> Vec<&MoneyMethod> {
        self.methods
            .iter()
            .filter(|m| m.category == category)
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&MoneyMethod> {
        self.methods.iter().find(|m| m.id == id)
    }

    /// Dashboard picks: the first three methods that don't need a big bankroll.
    pub fn top_beginner_picks(&self) -> Vec<&MoneyMethod> {
        self.methods
            .iter()
            .filter(|m| !m.investment.starts_with("High"))
            .take(3)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl Default for MethodCatalog {
    fn default() -> Self {
        Self::new()
    }
}

fn method(
    id: &str,
    title: &str,
    description: &str,
    category: MethodCategory,
    difficulty: Difficulty,
    investment: &str,
    estimated_return: &str,
    pros: &[&str],
    cons: &[&str],
    icon: &str,
) -> MoneyMethod {
    MoneyMethod {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        category,
        difficulty,
        investment: investment.to_string(),
        estimated_return: estimated_return.to_string(),
        pros: pros.iter().map(|s| s.to_string()).collect(),
        cons: cons.iter().map(|s| s.to_string()).collect(),
        icon: icon.to_string(),
    }
}

fn builtin_methods() -> Vec<MoneyMethod> {
    vec![
        method(
            "cactus-farm",
            "Cactus Farm",
            "Classic zero-redstone starter. Cactus breaks itself when it grows next to a block, so a wall of string and hoppers does all the work while you AFK.",
            MethodCategory::Farming,
            Difficulty::Easy,
            "Low",
            "$150k/hr",
            &["No redstone needed", "Fully AFK once built", "Cheap to expand"],
            &["Low sell price per item", "Needs a big footprint to scale"],
            "Sprout",
        ),
        method(
            "sugar-cane",
            "Sugar Cane Rows",
            "Rows of cane on a flying-machine or observer clock. Sells steadily and doubles as trade fodder for emerald villagers.",
            MethodCategory::Farming,
            Difficulty::Easy,
            "Low",
            "$120k/hr",
            &["Cheap startup", "Paper also sells to villagers"],
            &["Observer clocks cost redstone", "Price dips after wipes"],
            "Wheat",
        ),
        method(
            "iron-golem-spawners",
            "Iron Golem Spawners",
            "The AFK meta. Stack golem spawners over a kill chamber, hopper the iron into sell chests, and sleep your way to the baltop.",
            MethodCategory::Grinding,
            Difficulty::Medium,
            "High ($ millions)",
            "$1M+/hr",
            &["Best $/hr while AFK", "Scales linearly with spawner count"],
            &["Huge upfront spawner cost", "Prime raid target if your base is found"],
            "Anvil",
        ),
        method(
            "blaze-grinder",
            "Blaze Grinder",
            "Blaze rods sell well and the XP is a bonus. A nether fortress spawner plus a magma-block crush does the job.",
            MethodCategory::Grinding,
            Difficulty::Medium,
            "Medium",
            "$300k/hr",
            &["Great XP alongside cash", "Rods stay in demand for potions"],
            &["Nether travel is risky on hardcore seasons", "Semi-AFK at best"],
            "Flame",
        ),
        method(
            "auction-flipping",
            "Auction House Flipping",
            "Buy underpriced spawners and crate loot off /ah, relist at market rate. Pure margin, no grinding.",
            MethodCategory::Economy,
            Difficulty::Hard,
            "High ($ millions)",
            "$500k/hr",
            &["No build required", "Works from spawn"],
            &["Needs capital and price knowledge", "Margins vanish when the market is crowded"],
            "Gavel",
        ),
        method(
            "vote-crates",
            "Vote Crates",
            "Vote on every site daily and stack the keys. Crate pulls drop cash, spawners, and rank shards.",
            MethodCategory::Other,
            Difficulty::Easy,
            "None",
            "$50k/day",
            &["Completely free", "Takes two minutes a day"],
            &["RNG dependent", "Hard-capped per day"],
            "Gift",
        ),
        method(
            "bounty-hunting",
            "Bounty Hunting",
            "Claimed bounties pay out the target's hat price. Gear up, check /bounty, and collect.",
            MethodCategory::Pvp,
            Difficulty::Extreme,
            "Medium",
            "Varies",
            &["Big single payouts", "Fun if you like PvP"],
            &["You can lose your kit", "Top bounties are stacked players"],
            "Sword",
        ),
        method(
            "shop-reselling",
            "Player Shop Reselling",
            "Scan /warp shops and player warps for items priced under server-shop sell value, buy out the stock, sell to the server.",
            MethodCategory::Economy,
            Difficulty::Medium,
            "Low",
            "$200k/hr",
            &["Low risk", "No base needed"],
            &["Tedious scanning", "Other flippers race you to restocks"],
            "DollarSign",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let catalog = MethodCatalog::new();
        let ids: HashSet<&str> = catalog.all().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn listing_order_is_stable() {
        let a = MethodCatalog::new();
        let b = MethodCatalog::new();
        let order_a: Vec<&str> = a.all().iter().map(|m| m.id.as_str()).collect();
        let order_b: Vec<&str> = b.all().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(order_a, order_b);
    }

    #[test]
    fn category_filter_only_returns_matching() {
        let catalog = MethodCatalog::new();
        let farming = catalog.by_category(MethodCategory::Farming);
        assert!(!farming.is_empty());
        assert!(farming.iter().all(|m| m.category == MethodCategory::Farming));
    }

    #[test]
    fn top_picks_exclude_high_investment() {
        let catalog = MethodCatalog::new();
        let picks = catalog.top_beginner_picks();
        assert_eq!(picks.len(), 3);
        assert!(picks.iter().all(|m| !m.investment.starts_with("High")));
    }

    #[test]
    fn get_by_id() {
        let catalog = MethodCatalog::new();
        assert!(catalog.get("cactus-farm").is_some());
        assert!(catalog.get("nonexistent").is_none());
    }
}
