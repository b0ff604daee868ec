//! Shardtable — turn-order coordinator.
//!
//! A small state machine over the scene's combat flag plus the initiative
//! list mutations. Every function here mutates the shared scene document in
//! place; the caller persists the result with a full store write. There is
//! deliberately no channel path for turn order — it is low frequency and
//! correctness-sensitive, so broadcast fidelity is unnecessary.

use shardtable_core::error::SyncError;
use shardtable_core::rng::RandomSource;
use shardtable_scene::{Scene, TokenKind, TurnEntry};
use uuid::Uuid;

/// The die used for initiative draws.
pub const INITIATIVE_DIE: u32 = 20;

/// Minimum dice drawn when the relevant attribute is zero or negative.
pub const MIN_INITIATIVE_DICE: u32 = 2;

/// Initiative inputs for one character, supplied by the external character
/// collaborator.
#[derive(Debug, Clone)]
pub struct InitiativeProfile {
    /// The character identifier; at most one entry per id survives.
    pub character_id: String,
    /// Display name for the entry.
    pub name: String,
    /// The relevant attribute; decides dice count and draw selection.
    pub attribute: i32,
    /// The initiative-skill bonus added to the selected draw.
    pub bonus: i32,
}

/// Direction for a manual adjacent reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderDirection {
    /// Swap with the previous entry.
    Up,
    /// Swap with the next entry.
    Down,
}

/// Activates combat mode, clearing any stale entries from the last fight.
pub fn activate_combat(scene: &mut Scene) {
    scene.combat_active = true;
    scene.turn_entries.clear();
}

/// Deactivates combat mode and clears the list.
pub fn deactivate_combat(scene: &mut Scene) {
    scene.combat_active = false;
    scene.turn_entries.clear();
}

fn require_active(scene: &Scene) -> Result<(), SyncError> {
    if scene.combat_active {
        Ok(())
    } else {
        Err(SyncError::Validation("combat is not active".to_owned()))
    }
}

fn insert_sorted(scene: &mut Scene, entry: TurnEntry) {
    scene.turn_entries.retain(|e| e.character_id != entry.character_id);
    scene.turn_entries.push(entry);
    // Stable sort: ties keep insertion order.
    scene
        .turn_entries
        .sort_by(|a, b| b.initiative.cmp(&a.initiative));
}

/// Rolls initiative for a character and inserts (or replaces) its entry.
///
/// Draws `attribute` d20s and keeps the highest; when the attribute is zero
/// or negative, draws two and keeps the lowest. The skill bonus is added to
/// the selected draw.
///
/// # Errors
///
/// Returns `SyncError::Validation` if combat is not active.
#[allow(clippy::cast_possible_wrap)]
pub fn roll_initiative(
    scene: &mut Scene,
    profile: &InitiativeProfile,
    rng: &mut dyn RandomSource,
) -> Result<TurnEntry, SyncError> {
    require_active(scene)?;

    let disadvantaged = profile.attribute <= 0;
    let dice = if disadvantaged {
        MIN_INITIATIVE_DICE
    } else {
        // attribute > 0 here, so the cast is lossless.
        #[allow(clippy::cast_sign_loss)]
        {
            profile.attribute as u32
        }
    };

    let draws: Vec<u32> = (0..dice).map(|_| rng.roll(INITIATIVE_DIE)).collect();
    let selected = if disadvantaged {
        draws.iter().copied().min()
    } else {
        draws.iter().copied().max()
    }
    .unwrap_or(0);

    let roll = selected as i32;
    let entry = TurnEntry {
        character_id: profile.character_id.clone(),
        name: profile.name.clone(),
        initiative: roll + profile.bonus,
        roll,
        bonus: profile.bonus,
        kind: TokenKind::Participant,
    };
    insert_sorted(scene, entry.clone());
    Ok(entry)
}

/// Inserts (or replaces) an entry from a manually supplied raw roll; the
/// profile bonus is still applied.
///
/// # Errors
///
/// Returns `SyncError::Validation` if combat is not active.
pub fn enter_manual_initiative(
    scene: &mut Scene,
    profile: &InitiativeProfile,
    roll: i32,
) -> Result<TurnEntry, SyncError> {
    require_active(scene)?;

    let entry = TurnEntry {
        character_id: profile.character_id.clone(),
        name: profile.name.clone(),
        initiative: roll + profile.bonus,
        roll,
        bonus: profile.bonus,
        kind: TokenKind::Participant,
    };
    insert_sorted(scene, entry.clone());
    Ok(entry)
}

/// Appends an NPC entry with a director-supplied initiative total.
///
/// # Errors
///
/// Returns `SyncError::Validation` if combat is not active.
pub fn add_npc_entry(
    scene: &mut Scene,
    name: impl Into<String>,
    initiative: i32,
) -> Result<TurnEntry, SyncError> {
    require_active(scene)?;

    let entry = TurnEntry {
        character_id: Uuid::new_v4().to_string(),
        name: name.into(),
        initiative,
        roll: initiative,
        bonus: 0,
        kind: TokenKind::Npc,
    };
    insert_sorted(scene, entry.clone());
    Ok(entry)
}

/// Swaps an entry with its neighbor. Out-of-range moves are no-ops.
///
/// # Errors
///
/// Returns `SyncError::Validation` if combat is not active.
pub fn move_entry(
    scene: &mut Scene,
    index: usize,
    direction: ReorderDirection,
) -> Result<(), SyncError> {
    require_active(scene)?;

    let len = scene.turn_entries.len();
    match direction {
        ReorderDirection::Up if index > 0 && index < len => {
            scene.turn_entries.swap(index, index - 1);
        }
        ReorderDirection::Down if index + 1 < len => {
            scene.turn_entries.swap(index, index + 1);
        }
        _ => {}
    }
    Ok(())
}

/// Removes the entry at `index`, if any.
///
/// # Errors
///
/// Returns `SyncError::Validation` if combat is not active.
pub fn remove_entry(scene: &mut Scene, index: usize) -> Result<(), SyncError> {
    require_active(scene)?;

    if index < scene.turn_entries.len() {
        scene.turn_entries.remove(index);
    }
    Ok(())
}
