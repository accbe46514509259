//! In-game result record: the client's view of one running game

use serde::{Deserialize, Serialize};

use super::{required, LedgerRecord, PubKey};
use crate::schema::{
    CodecError, CodecResult, EnumDef, FieldSpec, RecordSchema, RecordValue, SchemaError, Value,
};

/// Time control of an online game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameType {
    #[default]
    Speed,
    Rapid,
    Slow,
}

impl GameType {
    pub const ALL: [GameType; 3] = [GameType::Speed, GameType::Rapid, GameType::Slow];

    /// Tag on the wire
    pub fn tag(self) -> i64 {
        match self {
            GameType::Speed => 0,
            GameType::Rapid => 1,
            GameType::Slow => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            GameType::Speed => "Speed",
            GameType::Rapid => "Rapid",
            GameType::Slow => "Slow",
        }
    }

    /// Closed tag set used in schemas
    pub fn enum_def() -> EnumDef {
        Self::ALL
            .iter()
            .fold(EnumDef::new("game_type"), |def, t| def.variant(t.name(), t.tag()))
    }
}

impl TryFrom<i64> for GameType {
    /// The unrecognised tag
    type Error = i64;

    fn try_from(tag: i64) -> Result<Self, Self::Error> {
        Self::ALL.into_iter().find(|t| t.tag() == tag).ok_or(tag)
    }
}

/// One game the player takes part in, as reported by the ledger
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameData {
    pub game_rowid: i64,
    pub game_type: GameType,
    pub is_white: bool,
    pub opponent_pubkey: PubKey,
    pub opponent_name: String,
    pub opponent_elo: i64,
    /// 0 until the first move
    pub curr_turn_nr: i64,
    /// Creation time, opaque epoch offset
    pub created_at: i64,
}

impl LedgerRecord for GameData {
    const RECORD_ID: &'static str = "in_game_result";

    fn schema() -> Result<RecordSchema, SchemaError> {
        RecordSchema::builder(Self::RECORD_ID)
            .field(FieldSpec::integer("GameRowid", "game_rowid"))
            .field(FieldSpec::enumeration("GameType", GameType::enum_def(), "game_type"))
            .field(FieldSpec::boolean("IsWhite", "is_white"))
            .field(FieldSpec::bytes("OppPubKey", "opponent_pubkey"))
            .field(FieldSpec::text("OppName", "opponent_name"))
            .field(FieldSpec::integer("OppELO", "opponent_elo"))
            .field(FieldSpec::integer("CurrentTurnNumber", "curr_turn_nr"))
            .field(FieldSpec::timestamp("CreatedAt", "created_at"))
            .build()
    }

    fn to_record(&self) -> RecordValue {
        RecordValue::new()
            .with("game_rowid", Value::Integer(self.game_rowid))
            .with("game_type", Value::Enum(self.game_type.tag()))
            .with("is_white", Value::Boolean(self.is_white))
            .with("opponent_pubkey", Value::Bytes(self.opponent_pubkey.0.clone()))
            .with("opponent_name", Value::Text(self.opponent_name.clone()))
            .with("opponent_elo", Value::Integer(self.opponent_elo))
            .with("curr_turn_nr", Value::Integer(self.curr_turn_nr))
            .with("created_at", Value::Timestamp(self.created_at))
    }

    fn from_record(record: &RecordValue) -> CodecResult<Self> {
        let tag = required(record, "game_type", RecordValue::enum_tag)?;
        let game_type = GameType::try_from(tag).map_err(|tag| CodecError::UnknownEnumTag {
            field: "game_type".to_string(),
            tag,
        })?;

        Ok(Self {
            game_rowid: required(record, "game_rowid", RecordValue::integer)?,
            game_type,
            is_white: required(record, "is_white", RecordValue::boolean)?,
            opponent_pubkey: PubKey::from_bytes(required(
                record,
                "opponent_pubkey",
                RecordValue::bytes,
            )?),
            opponent_name: required(record, "opponent_name", RecordValue::text)?.to_string(),
            opponent_elo: required(record, "opponent_elo", RecordValue::integer)?,
            curr_turn_nr: required(record, "curr_turn_nr", RecordValue::integer)?,
            created_at: required(record, "created_at", RecordValue::timestamp)?,
        })
    }
}
