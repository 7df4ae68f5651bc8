/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct GameConfig {
    /// Number of slots in the base (non-bag) inventory.
    pub base_inventory_slots: usize,

    /// Stack size for items that do not declare `maxStack`.
    pub default_max_stack: u32,

    /// Amount restored per regeneration tick for stamina when its node declares no rate.
    pub regen_amount: f64,
}

impl GameConfig {
    // ===== compile-time constants =====
    /// Hard cap on modifier propagation passes.
    ///
    /// Amplifying cycles in the modifier graph stop here instead of converging;
    /// the result after the last pass is the accepted approximation.
    pub const MAX_RESOLVE_PASSES: usize = 5;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_BASE_INVENTORY_SLOTS: usize = 24;
    pub const DEFAULT_MAX_STACK: u32 = 1;
    pub const DEFAULT_REGEN_AMOUNT: f64 = 1.0;

    pub fn new() -> Self {
        Self {
            base_inventory_slots: Self::DEFAULT_BASE_INVENTORY_SLOTS,
            default_max_stack: Self::DEFAULT_MAX_STACK,
            regen_amount: Self::DEFAULT_REGEN_AMOUNT,
        }
    }

    pub fn with_base_inventory_slots(mut self, slots: usize) -> Self {
        self.base_inventory_slots = slots;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
