//! One character's session.
//!
//! # Architecture
//!
//! ```text
//! CharacterSession
//! ├── content: Arc<ContentTables>     read-only, shared
//! ├── stored state                    selection, inventory, resources,
//! │                                   auras, buffs, learned abilities
//! ├── sheet: AttributeSheet           derived, recomputed wholesale
//! └── transient state                 drag, work timer, regen clock
//! ```
//!
//! Every command that can change an input of the attribute computation
//! (selection, equipment, buffs) recomputes the sheet and reconciles resource
//! state against the new maxima before returning. Failed commands leave the
//! session unchanged.
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use idle_core::{
    AbilityDefinition, AbilityKind, AbilityOracle, ActiveAuras, ActiveBuff, ActiveBuffs,
    AttributeSheet, AuraMultipliers, AvatarSelection, ContentTables, Contributions, DragState,
    DropOutcome, GameConfig, GameError, InstanceIdSource, InventoryEnv, InventoryError,
    InventorySlot, InventoryState, ItemEffectOutcome, ItemOracle, Location, Millis, MoveOutcome,
    NodeOracle, ResourceState, SlotArray, SlotRef, ValueMap, apply_item_effects,
    aura_multipliers, buff_modifiers, compute_sheet,
};

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::ids::ClockInstanceIds;
use crate::save::SaveState;
use crate::work::WorkTimer;

/// What a completed job paid out.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkReport {
    pub ability_id: String,
    /// Item id → units added to the inventory.
    pub granted: BTreeMap<String, u32>,
    /// Item id → units that did not fit.
    pub overflow: BTreeMap<String, u32>,
}

/// What one call to [`CharacterSession::tick`] did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Resources whose value went up.
    pub regenerated: Vec<String>,
    pub buffs_expired: bool,
    pub work_due: bool,
}

pub struct CharacterSession {
    content: Arc<ContentTables>,
    game: GameConfig,
    config: RuntimeConfig,

    // ===== stored =====
    selection: AvatarSelection,
    inventory: InventoryState,
    resources: ResourceState,
    auras: ActiveAuras,
    buffs: ActiveBuffs,
    learned: BTreeSet<String>,
    skills_unlocked: bool,

    // ===== derived =====
    sheet: AttributeSheet,

    // ===== transient =====
    drag: DragState,
    work: Option<WorkTimer>,
    ids: Box<dyn InstanceIdSource>,
    clock_ms: Millis,
    last_regen_ms: Option<Millis>,
}

impl CharacterSession {
    /// Fresh character: empty inventory, every unlocked resource full.
    pub fn new(
        content: Arc<ContentTables>,
        game: GameConfig,
        config: RuntimeConfig,
        selection: AvatarSelection,
        now: Millis,
    ) -> Self {
        let save = SaveState {
            version: SaveState::VERSION,
            selection,
            ..SaveState::default()
        };
        Self::restore(content, game, config, save, now)
    }

    /// Rebuilds a session from saved state.
    ///
    /// Saved resource values are clamped into the recomputed maxima.
    pub fn restore(
        content: Arc<ContentTables>,
        game: GameConfig,
        config: RuntimeConfig,
        save: SaveState,
        now: Millis,
    ) -> Self {
        let base = if save.inventory.is_empty() {
            SlotArray::new(game.base_inventory_slots)
        } else {
            save.inventory
        };
        let inventory = InventoryState::from_parts(&*content, base, save.bag_slots, save.equipped);

        let mut session = Self {
            content,
            game,
            config,
            selection: save.selection,
            inventory,
            resources: ResourceState::new(),
            auras: save.auras,
            buffs: save.buffs,
            learned: save.learned_abilities,
            skills_unlocked: save.skills_unlocked,
            sheet: AttributeSheet::default(),
            drag: DragState::new(),
            work: None,
            ids: Box::new(ClockInstanceIds::new()),
            clock_ms: now,
            last_regen_ms: None,
        };
        session.buffs.prune(now);
        session.sheet = session.compute_sheet();
        session.resources = ResourceState::init(
            &*session.content,
            &session.sheet.unlocked_resources,
            &session.sheet.final_resources,
            &save.resources,
        );

        tracing::info!(
            session = %session.config.session_id,
            resources = session.resources.as_map().len(),
            "session restored"
        );
        session
    }

    /// Replaces the bag instance id source (builder pattern).
    pub fn with_instance_ids(mut self, ids: impl InstanceIdSource + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn save(&self) -> SaveState {
        SaveState {
            version: SaveState::VERSION,
            selection: self.selection.clone(),
            inventory: self.inventory.base().clone(),
            bag_slots: self.inventory.bags().clone(),
            equipped: self.inventory.equipped().clone(),
            resources: self.resources.as_map().clone(),
            auras: self.auras.clone(),
            buffs: self.buffs.clone(),
            learned_abilities: self.learned.clone(),
            skills_unlocked: self.skills_unlocked,
        }
    }

    // ===== queries =====

    pub fn content(&self) -> &ContentTables {
        &self.content
    }

    pub fn game_config(&self) -> &GameConfig {
        &self.game
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn selection(&self) -> &AvatarSelection {
        &self.selection
    }

    pub fn sheet(&self) -> &AttributeSheet {
        &self.sheet
    }

    pub fn resources(&self) -> &ResourceState {
        &self.resources
    }

    pub fn inventory(&self) -> &InventoryState {
        &self.inventory
    }

    pub fn auras(&self) -> &ActiveAuras {
        &self.auras
    }

    pub fn buffs(&self) -> &ActiveBuffs {
        &self.buffs
    }

    pub fn learned_abilities(&self) -> &BTreeSet<String> {
        &self.learned
    }

    pub fn skills_unlocked(&self) -> bool {
        self.skills_unlocked
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn work(&self) -> Option<&WorkTimer> {
        self.work.as_ref()
    }

    pub fn aura_multipliers(&self) -> AuraMultipliers {
        aura_multipliers(&*self.content, &self.auras)
    }

    /// Learned abilities plus those granted by held perks.
    pub fn known_abilities(&self) -> BTreeSet<String> {
        let mut known = self.sheet.perk_abilities(&*self.content);
        known.extend(self.learned.iter().cloned());
        known
    }

    // ===== character =====

    pub fn set_selection(&mut self, selection: AvatarSelection) {
        self.selection = selection;
        self.recompute();
    }

    // ===== inventory =====

    /// Adds items to the inventory. Returns the units that did not fit.
    pub fn add_item(&mut self, item_id: &str, count: u32) -> Result<u32> {
        let env = InventoryEnv::new(&*self.content, &self.game);
        let overflow = self
            .inventory
            .add_item(&env, item_id, count)
            .inspect_err(rejected("add"))?;
        if overflow > 0 {
            tracing::debug!(item = item_id, overflow, "inventory full");
        }
        Ok(overflow)
    }

    pub fn move_item(&mut self, from: &SlotRef, to: &SlotRef) -> Result<MoveOutcome> {
        let env = InventoryEnv::new(&*self.content, &self.game);
        Ok(self
            .inventory
            .move_item(&env, from, to)
            .inspect_err(rejected("move"))?)
    }

    pub fn split_stack(&mut self, from: &SlotRef, to: &SlotRef, count: u32) -> Result<()> {
        Ok(self
            .inventory
            .split_stack(from, to, count)
            .inspect_err(rejected("split"))?)
    }

    pub fn remove_item(&mut self, at: &SlotRef, count: u32) -> Result<InventorySlot> {
        Ok(self
            .inventory
            .remove_at(at, count)
            .inspect_err(rejected("remove"))?)
    }

    /// Destroys a bag and, once confirmed, everything inside it.
    pub fn discard_bag(&mut self, at: &SlotRef, confirmed: bool) -> Result<Vec<InventorySlot>> {
        let lost = self
            .inventory
            .discard_bag(at, confirmed)
            .inspect_err(rejected("discard"))?;
        tracing::info!(lost = lost.len(), "bag discarded");
        Ok(lost)
    }

    /// Equips the item at `from`. Returns the slot it went into.
    pub fn equip(&mut self, from: &SlotRef, target: Option<&str>) -> Result<String> {
        let env = InventoryEnv::new(&*self.content, &self.game);
        let slot = self
            .inventory
            .equip(&env, self.ids.as_mut(), from, target)
            .inspect_err(rejected("equip"))?;
        tracing::info!(session = %self.config.session_id, slot = %slot, "equipped");
        self.recompute();
        Ok(slot)
    }

    /// Unequips `slot`. Returns where the item landed.
    pub fn unequip(&mut self, slot: &str, to: Option<&SlotRef>) -> Result<SlotRef> {
        let landed = self
            .inventory
            .unequip(slot, to)
            .inspect_err(rejected("unequip"))?;
        tracing::info!(session = %self.config.session_id, slot, "unequipped");
        self.recompute();
        Ok(landed)
    }

    pub fn move_equipped(&mut self, from: &str, to: &str) -> Result<MoveOutcome> {
        let env = InventoryEnv::new(&*self.content, &self.game);
        let outcome = self
            .inventory
            .move_equipped(&env, from, to)
            .inspect_err(rejected("equipment_move"))?;
        self.recompute();
        Ok(outcome)
    }

    // ===== drag and drop =====

    pub fn begin_drag(&mut self, source: Location) -> Result<()> {
        self.drag.begin(&self.inventory, source)?;
        Ok(())
    }

    pub fn cancel_drag(&mut self) -> bool {
        self.drag.cancel().is_some()
    }

    /// Drops the dragged item. The drag ends whether or not the drop succeeds.
    pub fn drop_on(&mut self, target: &Location) -> Result<DropOutcome> {
        let env = InventoryEnv::new(&*self.content, &self.game);
        let outcome = self
            .drag
            .drop_on(&mut self.inventory, &env, self.ids.as_mut(), target)
            .inspect_err(rejected("drop"))?;
        self.recompute();
        Ok(outcome)
    }

    // ===== items =====

    /// Consumes one unit of the item at `at` and applies its effects.
    ///
    /// Restores are capped at the resource's max and skip locked resources.
    /// Learned abilities are deduplicated.
    pub fn use_item(&mut self, at: &SlotRef) -> Result<ItemEffectOutcome> {
        let content = Arc::clone(&self.content);
        let item_id = self
            .inventory
            .slot(at)?
            .map(|slot| slot.id.clone())
            .ok_or(InventoryError::EmptySlot)?;
        let item = content
            .item(&item_id)
            .ok_or_else(|| InventoryError::UnknownItem {
                item: item_id.clone(),
            })?;

        let outcome = apply_item_effects(item);
        if outcome.is_empty() {
            return Err(RuntimeError::NotUsable { item: item_id });
        }
        self.inventory.remove_at(at, 1)?;

        for (resource, amount) in &outcome.resources_delta {
            if let Some(max) = self.sheet.resource_max(resource) {
                self.resources.add(resource, *amount, max);
            }
        }
        if outcome.learn_all_abilities {
            self.learned.extend(content.abilities.keys().cloned());
        }
        self.learned.extend(outcome.learn_ability_ids.iter().cloned());
        self.skills_unlocked |= outcome.unlock_skills;

        tracing::info!(session = %self.config.session_id, item = %item_id, "item used");
        Ok(outcome)
    }

    // ===== abilities =====

    /// Flips an aura. Returns whether it is now enabled.
    pub fn toggle_aura(&mut self, ability_id: &str) -> Result<bool> {
        let content = Arc::clone(&self.content);
        self.known_ability(&content, ability_id, AbilityKind::Aura)?;
        let enabled = self.auras.toggle(ability_id);
        tracing::info!(ability = ability_id, enabled, "aura toggled");
        Ok(enabled)
    }

    /// Pays the ability's cost and adds its stacks.
    pub fn use_buff(&mut self, ability_id: &str, now: Millis) -> Result<ActiveBuff> {
        let content = Arc::clone(&self.content);
        let ability = self.known_ability(&content, ability_id, AbilityKind::Buff)?;
        if ability.buff.is_none() {
            return Err(RuntimeError::WrongAbilityKind {
                ability: ability_id.to_string(),
                expected: AbilityKind::Buff,
            });
        }

        self.resources
            .consume_all(&ability.cost)
            .inspect_err(rejected("buff"))?;
        self.advance_clock(now);
        let buff = self
            .buffs
            .apply_use(ability, now)
            .ok_or_else(|| RuntimeError::WrongAbilityKind {
                ability: ability_id.to_string(),
                expected: AbilityKind::Buff,
            })?;
        tracing::info!(ability = ability_id, stacks = buff.stacks, "buff applied");
        self.recompute();
        Ok(buff)
    }

    // ===== timed work =====

    /// Pays the work cost and starts its timer.
    ///
    /// The stamina part of the cost is scaled by the aura stamina multiplier;
    /// the duration by the aura duration multiplier.
    pub fn start_work(&mut self, ability_id: &str, now: Millis) -> Result<&WorkTimer> {
        if let Some(current) = self.work.as_ref().filter(|w| w.is_pending()) {
            return Err(RuntimeError::WorkInProgress {
                ability: current.ability_id().to_string(),
            });
        }

        let content = Arc::clone(&self.content);
        let ability = self.known_ability(&content, ability_id, AbilityKind::Work)?;
        let multipliers = aura_multipliers(&*content, &self.auras);
        let costs: ValueMap = ability
            .cost
            .iter()
            .map(|(resource, amount)| {
                let scaled = if *resource == self.config.stamina_resource {
                    amount * multipliers.stamina_cost
                } else {
                    *amount
                };
                (resource.clone(), scaled)
            })
            .collect();
        self.resources
            .consume_all(&costs)
            .inspect_err(rejected("work"))?;

        let timer = WorkTimer::start(
            ability_id,
            now,
            ability.duration_ms.unwrap_or(0),
            multipliers.work_duration,
        );
        tracing::info!(
            ability = ability_id,
            duration_ms = timer.duration_ms(),
            "work started"
        );
        Ok(self.work.insert(timer))
    }

    /// Completes due work and adds its yields to the inventory.
    pub fn complete_work(&mut self, now: Millis) -> Result<WorkReport> {
        let timer = self
            .work
            .as_mut()
            .filter(|w| w.is_pending())
            .ok_or(RuntimeError::NoWorkInProgress)?;
        if !timer.complete(now) {
            return Err(RuntimeError::WorkNotDue {
                ability: timer.ability_id().to_string(),
                remaining_ms: timer.remaining_ms(now),
            });
        }

        let mut report = WorkReport {
            ability_id: timer.ability_id().to_string(),
            ..WorkReport::default()
        };
        let content = Arc::clone(&self.content);
        let env = InventoryEnv::new(&*content, &self.game);
        let yields = content
            .ability(&report.ability_id)
            .map(|a| &a.yields)
            .into_iter()
            .flatten();
        for (item, count) in yields {
            match self.inventory.add_item(&env, item, *count) {
                Ok(overflow) => {
                    if *count > overflow {
                        report.granted.insert(item.clone(), count - overflow);
                    }
                    if overflow > 0 {
                        report.overflow.insert(item.clone(), overflow);
                    }
                }
                Err(e) => {
                    rejected("work_yield")(&e);
                    if *count > 0 {
                        report.overflow.insert(item.clone(), *count);
                    }
                }
            }
        }

        tracing::info!(
            session = %self.config.session_id,
            ability = %report.ability_id,
            granted = report.granted.len(),
            "work completed"
        );
        Ok(report)
    }

    /// Cancels pending work. The cost is not refunded.
    pub fn cancel_work(&mut self) -> Result<WorkTimer> {
        let timer = self
            .work
            .as_mut()
            .filter(|w| w.is_pending())
            .ok_or(RuntimeError::NoWorkInProgress)?;
        timer.cancel();
        tracing::info!(ability = timer.ability_id(), "work cancelled");
        Ok(timer.clone())
    }

    // ===== time =====

    /// Advances the session clock.
    ///
    /// Applies one regeneration step per full regen interval since the last
    /// step, drops expired buffs, and reports whether work is due. The first
    /// call only starts the regen clock.
    pub fn tick(&mut self, now: Millis) -> TickReport {
        self.advance_clock(now);
        let mut report = TickReport::default();

        let interval = self.config.regen_interval_ms.max(1);
        let last = *self.last_regen_ms.get_or_insert(now);
        let steps = now.saturating_sub(last) / interval;
        if steps > 0 {
            self.last_regen_ms = Some(last + steps * interval);
            report.regenerated = self.regenerate(steps, now);
        }

        if self.buffs.prune(now) {
            report.buffs_expired = true;
            self.recompute();
        }
        report.work_due = self.work.as_ref().is_some_and(|w| w.is_due(now));

        tracing::debug!(
            now,
            steps,
            regenerated = report.regenerated.len(),
            "tick"
        );
        report
    }

    fn regenerate(&mut self, steps: u64, now: Millis) -> Vec<String> {
        let mana_bonus = buff_modifiers(&*self.content, &self.buffs, now).mana_regen;
        let tracked: Vec<String> = self.resources.iter().map(|(id, _)| id.to_string()).collect();

        let mut changed = Vec::new();
        for id in tracked {
            let Some(max) = self.sheet.resource_max(&id) else {
                continue;
            };
            let mut rate = self.regen_rate(&id);
            if id == self.config.mana_resource {
                rate += mana_bonus;
            }
            if rate > 0.0 && self.resources.regen_tick(&id, max, rate * steps as f64) {
                changed.push(id);
            }
        }
        changed
    }

    /// Declared node rate; stamina without one falls back to the configured amount.
    fn regen_rate(&self, resource: &str) -> f64 {
        match self.content.resource_node(resource).and_then(|n| n.regen) {
            Some(rate) if rate.is_finite() => rate,
            Some(_) => 0.0,
            None if resource == self.config.stamina_resource => self.game.regen_amount,
            None => 0.0,
        }
    }

    // ===== internals =====

    fn advance_clock(&mut self, now: Millis) {
        self.clock_ms = self.clock_ms.max(now);
    }

    fn compute_sheet(&self) -> AttributeSheet {
        let mut contributions = Contributions::new();
        contributions.add_stats(&self.inventory.equipment_stats(&*self.content));
        buff_modifiers(&*self.content, &self.buffs, self.clock_ms).apply_to(&mut contributions);
        compute_sheet(&*self.content, &self.selection, &contributions)
    }

    /// Recomputes the sheet and reconciles resources against it.
    fn recompute(&mut self) {
        self.sheet = self.compute_sheet();
        let reconciled = self
            .resources
            .reconcile(
                &*self.content,
                &self.sheet.unlocked_resources,
                &self.sheet.final_resources,
            )
            .into_owned();
        if reconciled != self.resources {
            tracing::debug!(
                before = ?self.resources.as_map(),
                after = ?reconciled.as_map(),
                "resources reconciled"
            );
            self.resources = reconciled;
        }
    }

    fn known_ability<'c>(
        &self,
        content: &'c ContentTables,
        ability_id: &str,
        expected: AbilityKind,
    ) -> Result<&'c AbilityDefinition> {
        let ability = content
            .ability(ability_id)
            .ok_or_else(|| RuntimeError::UnknownAbility {
                ability: ability_id.to_string(),
            })?;
        if ability.kind != expected {
            return Err(RuntimeError::WrongAbilityKind {
                ability: ability_id.to_string(),
                expected,
            });
        }
        if !self.learned.contains(ability_id)
            && !self.sheet.perk_abilities(content).contains(ability_id)
        {
            return Err(RuntimeError::AbilityNotLearned {
                ability: ability_id.to_string(),
            });
        }
        Ok(ability)
    }
}

/// Logs a rejected command with its error classification.
fn rejected<E: GameError>(command: &'static str) -> impl Fn(&E) {
    move |e| {
        tracing::warn!(
            command,
            code = e.error_code(),
            severity = e.severity().as_str(),
            "rejected: {e}"
        )
    }
}
