//! Timeout record: deadline state of a running game

use super::{required, LedgerRecord, PubKey};
use crate::schema::{CodecResult, FieldSpec, RecordSchema, RecordValue, SchemaError, Value};

/// Deadline state of a game as stored on the ledger.
///
/// Timestamps share the ledger's unit (milliseconds since epoch).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimeoutData {
    pub game_rowid: i64,
    pub last_move_at: i64,
    /// Deadline of the player to move
    pub timeout_at: i64,
    pub is_my_turn: bool,
    pub opponent_pubkey: PubKey,
}

impl LedgerRecord for TimeoutData {
    const RECORD_ID: &'static str = "timeout_data";

    fn schema() -> Result<RecordSchema, SchemaError> {
        RecordSchema::builder(Self::RECORD_ID)
            .field(FieldSpec::integer("GameRowid", "game_rowid"))
            .field(FieldSpec::timestamp("LastMoveAt", "last_move_at"))
            .field(FieldSpec::timestamp("TimeoutAt", "timeout_at"))
            .field(FieldSpec::boolean("IsMyTurn", "is_my_turn"))
            .field(FieldSpec::bytes("OppPubKey", "opponent_pubkey"))
            .build()
    }

    fn to_record(&self) -> RecordValue {
        RecordValue::new()
            .with("game_rowid", Value::Integer(self.game_rowid))
            .with("last_move_at", Value::Timestamp(self.last_move_at))
            .with("timeout_at", Value::Timestamp(self.timeout_at))
            .with("is_my_turn", Value::Boolean(self.is_my_turn))
            .with("opponent_pubkey", Value::Bytes(self.opponent_pubkey.0.clone()))
    }

    fn from_record(record: &RecordValue) -> CodecResult<Self> {
        Ok(Self {
            game_rowid: required(record, "game_rowid", RecordValue::integer)?,
            last_move_at: required(record, "last_move_at", RecordValue::timestamp)?,
            timeout_at: required(record, "timeout_at", RecordValue::timestamp)?,
            is_my_turn: required(record, "is_my_turn", RecordValue::boolean)?,
            opponent_pubkey: PubKey::from_bytes(required(
                record,
                "opponent_pubkey",
                RecordValue::bytes,
            )?),
        })
    }
}
