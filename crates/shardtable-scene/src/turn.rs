//! Turn-order entries.

use serde::{Deserialize, Serialize};

use crate::token::TokenKind;

/// One row in the initiative list.
///
/// At most one entry exists per owning identifier; re-submission replaces
/// the prior entry. The list is kept sorted descending by `initiative`, with
/// ties keeping insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnEntry {
    /// Owning character or NPC identifier.
    pub character_id: String,
    /// Display name.
    pub name: String,
    /// Computed initiative total (`roll + bonus`).
    pub initiative: i32,
    /// The raw die result that produced the total.
    pub roll: i32,
    /// The modifier applied to the roll.
    pub bonus: i32,
    /// Whether the entry belongs to a participant or an NPC.
    pub kind: TokenKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_document_shape() {
        let entry = TurnEntry {
            character_id: "char-1".to_owned(),
            name: "Ana".to_owned(),
            initiative: 17,
            roll: 14,
            bonus: 3,
            kind: TokenKind::Participant,
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["characterId"], "char-1");
        assert_eq!(value["initiative"], 17);
        assert_eq!(value["kind"], "PARTICIPANT");
    }
}
